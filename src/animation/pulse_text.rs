//! Letter-by-letter reveal followed by a glitching, batched decay.
//!
//! A [`PulseSession`] is split into two calls per frame:
//! [`PulseSession::advance`] owns every side effect (sound cues, retirement)
//! and must run exactly once per frame, while [`PulseSession::layout`] is a
//! pure read that may be called for each render pass.

use serde::Deserialize;
use tracing::{debug, info};

use super::glitch::{seed_from_birth, stable_char, SubSequence};
use crate::audio::Cue;

/// Share of `decay_duration` a single glyph spends fading out
const DECAY_WINDOW: f64 = 0.3;
/// Added to the flicker seed while decaying so it differs from the reveal flicker
const DECAY_FLICKER_SALT: i64 = 789;

/// Timing knobs for a pulse session.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PulseTiming {
    /// Seconds between successive letters becoming the lead
    pub letter_delay: f64,
    /// Seconds the fully revealed text stays stable
    pub hold_time: f64,
    /// Seconds from decay start until the session is over
    pub decay_duration: f64,
    /// Flicker parameter carried for renderers; does not affect output
    pub pulse_speed: f64,
    /// Seconds between decay batches
    pub decay_step: f64,
    pub batch_min: usize,
    pub batch_max: usize,
    /// Upper bound (exclusive) of the per-entry jitter, in milliseconds
    pub jitter_ms: u32,
    /// Placeholder letter changes per second
    pub flicker_speed: f64,
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self {
            letter_delay: 0.08,
            hold_time: 2.0,
            decay_duration: 1.0,
            pulse_speed: 6.0,
            decay_step: 0.12,
            batch_min: 2,
            batch_max: 3,
            jitter_ms: 30,
            flicker_speed: 40.0,
        }
    }
}

// ── Decay plan ────────────────────────────────────────────────────────

/// When one character starts decaying, relative to the session's decay start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayEntry {
    pub index: usize,
    pub offset: f64,
}

/// Frozen decay schedule of a session.
///
/// Every character index appears exactly once. Indices are shuffled, cut
/// into batches of `batch_min..=batch_max`, and each batch gets the next
/// `decay_step` slot plus a small jitter per entry.
#[derive(Debug, Clone, Default)]
pub struct DecayPlan {
    entries: Vec<DecayEntry>,
}

impl DecayPlan {
    pub fn build(len: usize, seed: u64, timing: &PulseTiming) -> Self {
        let mut seq = SubSequence::new(seed);
        let order = seq.permute(len);

        let mut entries = Vec::with_capacity(len);
        let mut slot = 0.0;
        let mut rest = order.as_slice();

        while !rest.is_empty() {
            let batch = seq.batch_size(timing.batch_min, timing.batch_max);
            let (head, tail) = rest.split_at(batch.min(rest.len()));
            for &index in head {
                let offset = slot + seq.jitter(timing.jitter_ms);
                entries.push(DecayEntry { index, offset });
            }
            rest = tail;
            slot += timing.decay_step;
        }

        Self { entries }
    }

    /// Entries in the order they were scheduled
    #[cfg(test)]
    pub fn entries(&self) -> &[DecayEntry] {
        &self.entries
    }

    pub fn offset_of(&self, index: usize) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.index == index)
            .map(|entry| entry.offset)
    }
}

// ── Per-glyph output ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphState {
    /// Lead letter fading in behind a flickering placeholder
    Revealing,
    /// Real character at full alpha
    Stable,
    /// Flickering placeholder fading out
    Decaying,
    /// Gone; still occupies its advance
    Removed,
}

/// What to draw for one character of the text at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseGlyph {
    pub index: usize,
    /// Character of the text; its advance positions the cursor
    pub source: char,
    /// Character to draw in place of `source`
    pub shown: char,
    pub alpha: f64,
    pub state: GlyphState,
}

impl PulseGlyph {
    pub fn is_drawn(&self) -> bool {
        self.state != GlyphState::Removed && self.alpha > 0.0
    }
}

// ── Session ───────────────────────────────────────────────────────────

/// One running reveal/decay animation.
#[derive(Debug, Clone)]
pub struct PulseSession {
    text: Vec<char>,
    birth_time: f64,
    timing: PulseTiming,
    last_played: Option<usize>,
    played_decay_sound: bool,
    active: bool,
    plan: DecayPlan,
}

impl PulseSession {
    pub fn start(text: &str, now: f64, timing: PulseTiming) -> Self {
        let text: Vec<char> = text.chars().collect();
        let plan = DecayPlan::build(text.len(), seed_from_birth(now), &timing);
        info!(len = text.len(), birth = now, "pulse text started");
        Self {
            text,
            birth_time: now,
            timing,
            last_played: None,
            played_decay_sound: false,
            active: true,
            plan,
        }
    }

    pub fn text(&self) -> &[char] {
        &self.text
    }

    pub fn birth_time(&self) -> f64 {
        self.birth_time
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Last index whose reveal was handled; `None` before the first letter
    pub fn last_played(&self) -> Option<usize> {
        self.last_played
    }

    pub fn played_decay_sound(&self) -> bool {
        self.played_decay_sound
    }

    #[cfg(test)]
    pub fn plan(&self) -> &DecayPlan {
        &self.plan
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        (now - self.birth_time).max(0.0)
    }

    /// Seconds after birth at which the text starts to decay
    pub fn decay_start(&self) -> f64 {
        self.text.len() as f64 * self.timing.letter_delay + self.timing.hold_time
    }

    /// Seconds after birth after which the session retires
    pub fn end_time(&self) -> f64 {
        self.decay_start() + self.timing.decay_duration
    }

    /// Index of the letter currently being revealed (may be past the end)
    pub fn lead_index(&self, now: f64) -> usize {
        if self.timing.letter_delay <= 0.0 {
            return self.text.len();
        }
        (self.elapsed(now) / self.timing.letter_delay).floor() as usize
    }

    /// Advance lifecycle state to `now` and return the cues to play.
    ///
    /// Calling again with the same `now` yields no further cues.
    pub fn advance(&mut self, now: f64) -> Vec<Cue> {
        let mut cues = Vec::new();
        if !self.active {
            return cues;
        }

        let elapsed = self.elapsed(now);
        let lead = self.lead_index(now);
        if lead < self.text.len() && self.last_played.map_or(true, |played| lead > played) {
            if !self.text[lead].is_whitespace() {
                cues.push(Cue::LetterReveal);
            }
            self.last_played = Some(lead);
        }

        if elapsed >= self.decay_start() && !self.played_decay_sound {
            cues.push(Cue::DecayStart);
            self.played_decay_sound = true;
        }

        if elapsed > self.end_time() {
            self.retire();
        }
        cues
    }

    fn retire(&mut self) {
        debug!(birth = self.birth_time, "pulse text retired");
        self.active = false;
        self.last_played = None;
        self.played_decay_sound = false;
    }

    /// Visual state of every reached character at `now`.
    ///
    /// Reveal is strictly left to right: the first unreached character ends
    /// the list. Removed characters are still listed so the caller can
    /// advance its cursor over them.
    pub fn layout(&self, now: f64) -> Vec<PulseGlyph> {
        let elapsed = self.elapsed(now);
        let timing = &self.timing;
        let lead = self.lead_index(now);
        let decay_start = self.decay_start();
        let decaying = elapsed >= decay_start;
        let flicker = (elapsed * timing.flicker_speed) as i64;
        let window = timing.decay_duration * DECAY_WINDOW;

        let mut glyphs = Vec::with_capacity(self.text.len());
        for (index, &source) in self.text.iter().enumerate() {
            let appear = index as f64 * timing.letter_delay;
            if elapsed < appear {
                break;
            }

            let glyph = if !decaying {
                if index == lead {
                    let alpha = if timing.letter_delay > 0.0 {
                        ((elapsed - appear) / timing.letter_delay).min(1.0)
                    } else {
                        1.0
                    };
                    PulseGlyph {
                        index,
                        source,
                        shown: stable_char(index, flicker + index as i64),
                        alpha,
                        state: GlyphState::Revealing,
                    }
                } else {
                    stable(index, source)
                }
            } else {
                let offset = self.plan.offset_of(index).unwrap_or(0.0);
                let local = (elapsed - decay_start) - offset;
                if local >= window {
                    PulseGlyph {
                        index,
                        source,
                        shown: source,
                        alpha: 0.0,
                        state: GlyphState::Removed,
                    }
                } else if local > 0.0 {
                    PulseGlyph {
                        index,
                        source,
                        shown: stable_char(index, flicker + index as i64 + DECAY_FLICKER_SALT),
                        alpha: 1.0 - local / window,
                        state: GlyphState::Decaying,
                    }
                } else {
                    stable(index, source)
                }
            };
            glyphs.push(glyph);
        }
        glyphs
    }
}

fn stable(index: usize, source: char) -> PulseGlyph {
    PulseGlyph {
        index,
        source,
        shown: source,
        alpha: 1.0,
        state: GlyphState::Stable,
    }
}
