use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::notify::NotifyKind;

/// A discrete sound trigger raised by an animation milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A new letter became the lead of a pulse reveal
    LetterReveal,
    /// A pulse session started erasing itself
    DecayStart,
    /// A notification of the given kind entered the screen
    NotifyArrival(NotifyKind),
}

impl Cue {
    /// Sound asset played for this cue, if the cue has one
    pub fn sound(self) -> Option<&'static str> {
        match self {
            Cue::LetterReveal => Some("ui_computer_text_blip1x.wav"),
            Cue::DecayStart => Some("ui_computer_text_delete1.wav"),
            Cue::NotifyArrival(kind) => kind.style().arrival_sound,
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cue::LetterReveal => write!(f, "reveal"),
            Cue::DecayStart => write!(f, "decay"),
            Cue::NotifyArrival(kind) => write!(f, "{kind} arrival"),
        }
    }
}

/// Fire-and-forget audio playback. Called at most once per trigger.
pub trait AudioSink {
    fn play_cue(&mut self, cue: Cue);
}

/// Number of cues kept for display
const HISTORY_LEN: usize = 8;

/// Audio sink for hosts without a sound engine: every cue is logged and the
/// most recent ones are kept so the UI can show them.
#[derive(Debug, Default)]
pub struct CueLog {
    history: VecDeque<Cue>,
    total: u64,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent cues, oldest first
    pub fn recent(&self) -> impl Iterator<Item = &Cue> {
        self.history.iter()
    }

    pub fn last(&self) -> Option<Cue> {
        self.history.back().copied()
    }

    /// Count of cues played since startup
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl AudioSink for CueLog {
    fn play_cue(&mut self, cue: Cue) {
        debug!(%cue, sound = cue.sound().unwrap_or("-"), "cue");
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(cue);
        self.total += 1;
    }
}
