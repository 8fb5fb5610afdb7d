//! Owner of every effect on screen.
//!
//! Three effects are mutually exclusive: the notification arbiter, a pulse
//! text session and the glow banner. [`Stage::advance`] moves all of them
//! to a new instant and raises their sound cues; [`Stage::compose`] only
//! draws, so it can run as often as the host needs.

use std::fmt;

use tracing::{debug, info, warn};

use crate::animation::phase::PhaseTiming;
use crate::animation::pulse_text::{PulseSession, PulseTiming};
use crate::audio::AudioSink;
use crate::error::{FxError, FxResult};
use crate::notify::arbiter::{Admission, Arbiter, NotifyFrame};
use crate::notify::NotifyRequest;
use crate::render::compose::{compose_banner, compose_notification, compose_pulse_text, Align};
use crate::render::{Glow, Renderer};

/// Which effect currently owns the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Splash,
    PulseText,
    GlowBanner,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Idle => "idle",
            Mode::Splash => "splash",
            Mode::PulseText => "pulse text",
            Mode::GlowBanner => "glow banner",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
struct Banner {
    text: String,
    align: Align,
}

pub struct Stage {
    arbiter: Arbiter,
    pulse: Option<PulseSession>,
    pulse_timing: PulseTiming,
    glow: Glow,
    banner: Option<Banner>,
    frame: Option<NotifyFrame>,
    now: f64,
}

impl Stage {
    pub fn new(pulse_timing: PulseTiming, phase_timing: PhaseTiming, glow: Glow) -> Self {
        Self {
            arbiter: Arbiter::new(phase_timing),
            pulse: None,
            pulse_timing,
            glow,
            banner: None,
            frame: None,
            now: 0.0,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.pulse.as_ref().is_some_and(PulseSession::is_active) {
            Mode::PulseText
        } else if self.arbiter.is_busy() {
            Mode::Splash
        } else if self.banner.is_some() {
            Mode::GlowBanner
        } else {
            Mode::Idle
        }
    }

    pub fn arbiter(&self) -> &Arbiter {
        &self.arbiter
    }

    pub fn pulse(&self) -> Option<&PulseSession> {
        self.pulse.as_ref()
    }

    /// Text of the glow banner while it is on
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_ref().map(|b| b.text.as_str())
    }

    /// Notification drawn by the last [`Stage::advance`]
    #[cfg(test)]
    pub fn notify_frame(&self) -> Option<&NotifyFrame> {
        self.frame.as_ref()
    }

    /// Instant of the last [`Stage::advance`]
    pub fn now(&self) -> f64 {
        self.now
    }

    fn busy(&self, requested: Mode) -> FxError {
        let active = self.mode();
        warn!(%requested, %active, "request rejected");
        FxError::Busy { requested, active }
    }

    /// Hand a notification to the arbiter. Rejected while pulse text or the
    /// glow banner is showing; queued behind a running notification.
    pub fn request_notify(&mut self, request: NotifyRequest, now: f64) -> FxResult<Admission> {
        match self.mode() {
            Mode::PulseText | Mode::GlowBanner => Err(self.busy(Mode::Splash)),
            Mode::Idle | Mode::Splash => Ok(self.arbiter.notify(request, now)),
        }
    }

    /// Start pulse text, replacing a session that is still running.
    pub fn start_pulse_text(&mut self, text: &str, now: f64) -> FxResult<()> {
        match self.mode() {
            Mode::Splash | Mode::GlowBanner => Err(self.busy(Mode::PulseText)),
            Mode::PulseText | Mode::Idle => {
                if let Some(previous) = &self.pulse {
                    debug!(previous = previous.birth_time(), now, "pulse text restarted");
                }
                self.pulse = Some(PulseSession::start(text, now, self.pulse_timing));
                Ok(())
            }
        }
    }

    /// Switch the glow banner on or off; returns whether it is now on.
    pub fn toggle_banner(&mut self, text: &str, align: Align) -> FxResult<bool> {
        match self.mode() {
            Mode::Splash | Mode::PulseText => Err(self.busy(Mode::GlowBanner)),
            Mode::GlowBanner => {
                info!("glow banner off");
                self.banner = None;
                Ok(false)
            }
            Mode::Idle => {
                info!(text, "glow banner on");
                self.banner = Some(Banner {
                    text: text.to_string(),
                    align,
                });
                Ok(true)
            }
        }
    }

    /// Move every effect to `now` and play the cues raised on the way.
    ///
    /// Run once per frame. Repeating the same `now` raises nothing new.
    pub fn advance(&mut self, now: f64, audio: &mut dyn AudioSink) {
        self.now = now;
        let mut cues = Vec::new();

        if let Some(session) = self.pulse.as_mut() {
            cues.extend(session.advance(now));
            if !session.is_active() {
                self.pulse = None;
            }
        }
        self.frame = self.arbiter.tick(now, &mut cues);

        for cue in cues {
            audio.play_cue(cue);
        }
    }

    /// Draw the state of the last [`Stage::advance`]. Has no side effects.
    pub fn compose<R: Renderer + ?Sized>(&self, r: &mut R) {
        if let Some(session) = &self.pulse {
            compose_pulse_text(r, session, self.now, self.glow);
        }
        if let Some(frame) = &self.frame {
            compose_notification(r, frame);
        }
        if let Some(banner) = &self.banner {
            compose_banner(r, &banner.text, banner.align, self.now, self.glow.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Cue, CueLog};
    use crate::notify::NotifyKind;
    use crate::render::compose::PULSE_GLOW;
    use crate::render::recording::RecordingRenderer;

    const FRAME: f64 = 1.0 / 60.0;

    fn stage() -> Stage {
        Stage::new(PulseTiming::default(), PhaseTiming::default(), PULSE_GLOW)
    }

    fn splash() -> NotifyRequest {
        NotifyRequest::new(NotifyKind::Splash, "First Blood!")
    }

    fn run(stage: &mut Stage, log: &mut CueLog, from: f64, to: f64) {
        let mut now = from;
        while now < to {
            stage.advance(now, log);
            now += FRAME;
        }
    }

    fn busy(err: FxError) -> (Mode, Mode) {
        match err {
            FxError::Busy { requested, active } => (requested, active),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn starts_idle() {
        let s = stage();
        assert_eq!(s.mode(), Mode::Idle);
        assert!(s.notify_frame().is_none());
    }

    #[test]
    fn splash_blocks_pulse_and_banner() {
        let mut s = stage();
        assert_eq!(s.request_notify(splash(), 0.0).ok(), Some(Admission::Started));
        assert_eq!(s.mode(), Mode::Splash);

        let err = s.start_pulse_text("Eliminate enemy players.", 0.1).unwrap_err();
        assert_eq!(busy(err), (Mode::PulseText, Mode::Splash));
        let err = s.toggle_banner("Glow", Align::CENTER).unwrap_err();
        assert_eq!(busy(err), (Mode::GlowBanner, Mode::Splash));

        // a second notification queues instead of failing
        assert_eq!(s.request_notify(splash(), 0.1).ok(), Some(Admission::Queued));
    }

    #[test]
    fn pulse_text_blocks_notifications_and_restarts() {
        let mut s = stage();
        s.start_pulse_text("Eliminate", 0.0).unwrap();
        assert_eq!(s.mode(), Mode::PulseText);

        let err = s.request_notify(splash(), 0.1).unwrap_err();
        assert_eq!(busy(err), (Mode::Splash, Mode::PulseText));
        assert!(s.toggle_banner("Glow", Align::CENTER).is_err());

        s.start_pulse_text("Eliminate", 0.5).unwrap();
        assert_eq!(s.pulse().map(PulseSession::birth_time), Some(0.5));
    }

    #[test]
    fn banner_toggles_and_blocks_the_rest() {
        let mut s = stage();
        assert!(s.toggle_banner("Glow", Align::CENTER).unwrap());
        assert_eq!(s.mode(), Mode::GlowBanner);
        assert_eq!(s.banner(), Some("Glow"));
        assert!(s.request_notify(splash(), 0.0).is_err());
        assert!(s.start_pulse_text("x", 0.0).is_err());
        assert!(!s.toggle_banner("Glow", Align::CENTER).unwrap());
        assert_eq!(s.mode(), Mode::Idle);
    }

    #[test]
    fn pulse_cues_reach_the_sink_once() {
        let mut s = stage();
        let mut log = CueLog::new();
        s.start_pulse_text("ab", 0.0).unwrap();
        s.advance(0.0, &mut log);
        assert_eq!(log.last(), Some(Cue::LetterReveal));
        s.advance(0.0, &mut log);
        assert_eq!(log.total(), 1);
    }

    #[test]
    fn pulse_session_retires_to_idle() {
        let mut s = stage();
        let mut log = CueLog::new();
        s.start_pulse_text("ab", 0.0).unwrap();
        run(&mut s, &mut log, 0.0, 3.5);
        assert_eq!(s.mode(), Mode::Idle);
        assert!(s.pulse().is_none());
        assert!(log.recent().any(|c| *c == Cue::DecayStart));
    }

    #[test]
    fn splash_plays_through_and_goes_idle() {
        let mut s = stage();
        let mut log = CueLog::new();
        s.request_notify(splash(), 0.0).unwrap();
        run(&mut s, &mut log, 0.0, 3.0);
        assert_eq!(s.mode(), Mode::Idle);
        assert!(s.notify_frame().is_none());
        assert_eq!(log.total(), 1);
        assert_eq!(log.last(), Some(Cue::NotifyArrival(NotifyKind::Splash)));
    }

    #[test]
    fn compose_is_repeatable() {
        let mut s = stage();
        let mut log = CueLog::new();
        s.request_notify(splash().description("^3+100"), 0.0).unwrap();
        run(&mut s, &mut log, 0.0, 1.0);

        let mut first = RecordingRenderer::new();
        let mut second = RecordingRenderer::new();
        s.compose(&mut first);
        s.compose(&mut second);
        assert!(!first.calls.is_empty());
        assert_eq!(first.calls, second.calls);
        assert_eq!(s.mode(), Mode::Splash);
    }
}
