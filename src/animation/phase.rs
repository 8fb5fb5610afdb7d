//! Enter / hold / exit animations for notification splashes.
//!
//! Two animation types share one phase core but are driven differently:
//!
//! - [`EasedPhase`] advances its phase while being sampled; one
//!   [`EasedPhase::advance`] per frame yields an [`EasedFrame`] from which
//!   any number of eased values are read.
//! - [`TimedPhase`] advances on [`TimedPhase::update`] and exposes the
//!   fixed-shape [`TimedPhase::alpha`] and [`TimedPhase::slide`] curves.
//!
//! An instance can only be driven the way its type allows.

use std::fmt;

use serde::Deserialize;
use tracing::debug;

use super::ease_out_cubic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    In,
    Hold,
    Out,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::In => "in",
            Phase::Hold => "hold",
            Phase::Out => "out",
            Phase::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// Lengths of the transition and hold phases, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhaseTiming {
    /// Length of the In and Out transitions
    pub duration: f64,
    /// Length of the Hold phase
    pub hold_time: f64,
}

impl Default for PhaseTiming {
    fn default() -> Self {
        Self {
            duration: 0.15,
            hold_time: 2.0,
        }
    }
}

// ── Shared phase core ─────────────────────────────────────────────────

/// Phase, phase start time and liveness shared by both animation types.
///
/// The phase only moves forward; [`PhaseState::restart`] is the one way back
/// to `In`.
#[derive(Debug, Clone)]
pub struct PhaseState {
    phase: Phase,
    start_time: f64,
    timing: PhaseTiming,
    active: bool,
}

impl PhaseState {
    fn started(timing: PhaseTiming, now: f64) -> Self {
        Self {
            phase: Phase::In,
            start_time: now,
            timing,
            active: true,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Seconds since the current phase began
    pub fn elapsed(&self, now: f64) -> f64 {
        (now - self.start_time).max(0.0)
    }

    /// Hold has run its course; the animation may be interrupted now.
    pub fn wants_to_finish(&self, now: f64) -> bool {
        self.phase == Phase::Hold && self.elapsed(now) >= self.timing.hold_time
    }

    /// Reset to the beginning of `In`
    pub fn restart(&mut self, now: f64) {
        self.phase = Phase::In;
        self.start_time = now;
        self.active = true;
    }

    /// Jump straight to `Out`, starting the exit transition at `now`.
    pub fn force_out(&mut self, now: f64) {
        if self.active && self.phase < Phase::Out {
            self.enter(Phase::Out, now);
        }
    }

    /// Terminate immediately without playing the remaining phases.
    pub fn cancel(&mut self) {
        self.finish();
    }

    /// Fraction of the current transition, clamped to [0, 1]
    fn progress(&self, now: f64) -> f64 {
        if self.timing.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed(now) / self.timing.duration).min(1.0)
    }

    fn enter(&mut self, phase: Phase, now: f64) {
        debug!(from = %self.phase, to = %phase, "phase change");
        self.phase = phase;
        self.start_time = now;
    }

    fn finish(&mut self) {
        if self.phase != Phase::Finished {
            debug!(from = %self.phase, "phase finished");
        }
        self.phase = Phase::Finished;
        self.active = false;
    }
}

// ── Eased value family ────────────────────────────────────────────────

/// One frame's sample of an [`EasedPhase`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasedFrame {
    /// Phase the sample was taken in
    pub phase: Phase,
    /// Weight of the `to` endpoint: 0 = `from`, 1 = `to`
    pub weight: f64,
}

impl EasedFrame {
    /// Eased value between `from` (hidden) and `to` (settled).
    ///
    /// In eases `from -> to`, Hold is `to`, Out eases back to `from`, and a
    /// finished animation stays at `from`.
    pub fn value(&self, from: f64, to: f64) -> f64 {
        from + self.weight * (to - from)
    }
}

/// Animation whose phase advances as it is sampled.
#[derive(Debug, Clone)]
pub struct EasedPhase {
    state: PhaseState,
}

impl EasedPhase {
    pub fn start(timing: PhaseTiming, now: f64) -> Self {
        Self {
            state: PhaseState::started(timing, now),
        }
    }

    pub fn state(&self) -> &PhaseState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PhaseState {
        &mut self.state
    }

    /// Sample the animation at `now`, moving to the next phase on the way
    /// if the current one has run out. Call once per frame.
    pub fn advance(&mut self, now: f64) -> EasedFrame {
        let state = &mut self.state;
        let phase = state.phase;
        let weight = match phase {
            Phase::In => {
                let t = state.progress(now);
                if t >= 1.0 {
                    state.enter(Phase::Hold, now);
                }
                ease_out_cubic(t)
            }
            Phase::Hold => {
                if state.elapsed(now) >= state.timing.hold_time {
                    state.enter(Phase::Out, now);
                }
                1.0
            }
            Phase::Out => {
                let t = state.progress(now);
                if t >= 1.0 {
                    state.finish();
                }
                1.0 - ease_out_cubic(t)
            }
            Phase::Finished => 0.0,
        };
        EasedFrame { phase, weight }
    }
}

// ── Fixed-shape alpha / slide family ──────────────────────────────────

/// Animation advanced by explicit [`TimedPhase::update`] calls.
#[derive(Debug, Clone)]
pub struct TimedPhase {
    state: PhaseState,
}

impl TimedPhase {
    pub fn start(timing: PhaseTiming, now: f64) -> Self {
        Self {
            state: PhaseState::started(timing, now),
        }
    }

    pub fn state(&self) -> &PhaseState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PhaseState {
        &mut self.state
    }

    /// Move to the next phase once the current one's time threshold passes.
    pub fn update(&mut self, now: f64) {
        let state = &mut self.state;
        if !state.active {
            return;
        }
        let threshold = match state.phase {
            Phase::Hold => state.timing.hold_time,
            _ => state.timing.duration,
        };
        if state.elapsed(now) < threshold {
            return;
        }
        match state.phase {
            Phase::In => state.enter(Phase::Hold, now),
            Phase::Hold => state.enter(Phase::Out, now),
            Phase::Out => state.finish(),
            Phase::Finished => {}
        }
    }

    /// Fades in over the first half of `duration`, out linearly over Out.
    pub fn alpha(&self, now: f64) -> f64 {
        let t = self.state.progress(now);
        match self.state.phase {
            Phase::In => (t * 2.0).min(1.0),
            Phase::Hold => 1.0,
            Phase::Out => 1.0 - t,
            Phase::Finished => 0.0,
        }
    }

    /// Horizontal offset: eases in from `-offset`, rests at 0, eases out to `offset`.
    pub fn slide(&self, now: f64, offset: f64) -> f64 {
        let t = ease_out_cubic(self.state.progress(now));
        match self.state.phase {
            Phase::In => -offset + t * offset,
            Phase::Hold => 0.0,
            Phase::Out => t * offset,
            Phase::Finished => 0.0,
        }
    }
}
