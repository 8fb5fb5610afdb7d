//! Decides which notification plays, and when.
//!
//! The arbiter owns at most one active notification plus a FIFO backlog.
//! Requests start immediately when nothing is showing and queue otherwise.
//! On every tick the backlog may cut the active notification short:
//!
//! - a splash still entering is replaced by a queued killstreak banner,
//! - a finished hold hands over directly to a queued notification of the
//!   same kind (killstreak banners always play their exit).

use std::collections::VecDeque;

use tracing::{debug, info};

use super::{Driver, NotifyKind, NotifyRequest};
use crate::animation::phase::{EasedPhase, Phase, PhaseState, PhaseTiming, TimedPhase};
use crate::audio::Cue;

/// Animation of the active notification, driven the way its kind requires
#[derive(Debug, Clone)]
pub enum NotifyAnim {
    Eased(EasedPhase),
    Timed(TimedPhase),
}

impl NotifyAnim {
    fn start(kind: NotifyKind, timing: PhaseTiming, now: f64) -> Self {
        match kind.style().driver {
            Driver::Eased => NotifyAnim::Eased(EasedPhase::start(timing, now)),
            Driver::Timed => NotifyAnim::Timed(TimedPhase::start(timing, now)),
        }
    }

    fn driver(&self) -> Driver {
        match self {
            NotifyAnim::Eased(_) => Driver::Eased,
            NotifyAnim::Timed(_) => Driver::Timed,
        }
    }

    pub fn state(&self) -> &PhaseState {
        match self {
            NotifyAnim::Eased(anim) => anim.state(),
            NotifyAnim::Timed(anim) => anim.state(),
        }
    }

    fn state_mut(&mut self) -> &mut PhaseState {
        match self {
            NotifyAnim::Eased(anim) => anim.state_mut(),
            NotifyAnim::Timed(anim) => anim.state_mut(),
        }
    }
}

/// Drawing parameters of the active notification for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyFrame {
    /// Fields currently on display; `kind` selects the style
    pub request: NotifyRequest,
    /// Phase the frame was sampled in
    pub phase: Phase,
    pub alpha: f64,
    /// Zoom multiplier of the main line (1 = rest size)
    pub scale: f64,
    /// Horizontal offset from the rest position
    pub slide: f64,
}

/// Outcome of [`Arbiter::notify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Started,
    Queued,
}

#[derive(Debug)]
struct ActiveNotify {
    display: NotifyRequest,
    anim: NotifyAnim,
    arrival_cued: bool,
}

impl ActiveNotify {
    fn drive(&mut self, now: f64) -> NotifyFrame {
        let style = self.display.kind.style();
        let (phase, alpha, scale, slide) = match &mut self.anim {
            NotifyAnim::Eased(anim) => {
                let frame = anim.advance(now);
                (
                    frame.phase,
                    frame.value(0.0, 1.0),
                    frame.value(style.zoom_from, 1.0),
                    0.0,
                )
            }
            NotifyAnim::Timed(anim) => {
                anim.update(now);
                (
                    anim.state().phase(),
                    anim.alpha(now),
                    1.0,
                    anim.slide(now, style.slide_offset),
                )
            }
        };
        NotifyFrame {
            request: self.display.clone(),
            phase,
            alpha,
            scale,
            slide,
        }
    }
}

#[derive(Debug)]
pub struct Arbiter {
    timing: PhaseTiming,
    current: Option<ActiveNotify>,
    queue: VecDeque<NotifyRequest>,
    doing_notify: bool,
}

impl Arbiter {
    pub fn new(timing: PhaseTiming) -> Self {
        Self {
            timing,
            current: None,
            queue: VecDeque::new(),
            doing_notify: false,
        }
    }

    /// True from acceptance of a request until the last one has finished
    pub fn is_busy(&self) -> bool {
        self.doing_notify
    }

    /// Request currently on display
    pub fn current(&self) -> Option<&NotifyRequest> {
        self.current.as_ref().map(|c| &c.display)
    }

    pub fn phase(&self) -> Option<Phase> {
        self.current.as_ref().map(|c| c.anim.state().phase())
    }

    pub fn queued(&self) -> impl Iterator<Item = &NotifyRequest> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Start `request` now if nothing is showing, otherwise queue it.
    pub fn notify(&mut self, request: NotifyRequest, now: f64) -> Admission {
        let finished = self
            .current
            .as_ref()
            .map_or(true, |c| c.anim.state().is_finished());
        if !self.doing_notify || finished {
            self.start(request, now);
            Admission::Started
        } else {
            debug!(kind = %request.kind, queued = self.queue.len() + 1, "notification queued");
            self.queue.push_back(request);
            Admission::Queued
        }
    }

    fn start(&mut self, request: NotifyRequest, now: f64) {
        info!(kind = %request.kind, text = %request.text, "notification started");
        let anim = match self.current.take() {
            // An animation of the same driver is rewound in place
            Some(mut prev) if prev.anim.driver() == request.kind.style().driver => {
                prev.anim.state_mut().restart(now);
                prev.anim
            }
            _ => NotifyAnim::start(request.kind, self.timing, now),
        };
        self.current = Some(ActiveNotify {
            display: request,
            anim,
            arrival_cued: false,
        });
        self.doing_notify = true;
    }

    /// Apply the queueing rules and advance the active animation.
    ///
    /// Call once per frame. Cues raised on the way are appended to `cues`.
    /// Returns what to draw, or `None` once the arbiter has gone idle.
    pub fn tick(&mut self, now: f64, cues: &mut Vec<Cue>) -> Option<NotifyFrame> {
        let front_kind = self.queue.front().map(|r| r.kind);
        let active = self.current.as_mut()?;
        let kind = active.display.kind;

        // A killstreak waiting behind a splash takes over the splash's exit
        if kind == NotifyKind::Splash
            && front_kind == Some(NotifyKind::Killstreak)
            && active.anim.state().phase() == Phase::In
        {
            if let Some(next) = self.queue.front() {
                debug!(text = %next.text, "splash interrupted by killstreak");
                active.display.text = next.text.clone();
                active.display.description = next.description.clone();
                active.display.icon = next.icon.clone();
                active.display.color = next.color;
                active.anim.state_mut().force_out(now);
            }
        }

        if !active.anim.state().is_active() {
            self.doing_notify = false;
            match self.queue.pop_front() {
                Some(next) => self.start(next, now),
                None => {
                    info!("notifications idle");
                    self.current = None;
                    return None;
                }
            }
        } else if active.anim.state().wants_to_finish(now)
            && front_kind == Some(kind)
            && kind != NotifyKind::Killstreak
        {
            active.anim.state_mut().cancel();
            if let Some(next) = self.queue.pop_front() {
                debug!(%kind, "same-kind handover");
                self.start(next, now);
            }
        }

        let active = self.current.as_mut()?;
        let frame = active.drive(now);
        if !active.arrival_cued && frame.phase == Phase::In {
            active.arrival_cued = true;
            let cue = Cue::NotifyArrival(active.display.kind);
            if cue.sound().is_some() {
                cues.push(cue);
            }
        }
        Some(frame)
    }
}
