use thiserror::Error;

use crate::stage::Mode;

/// Unified error type for glowtext
#[derive(Error, Debug)]
pub enum FxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Config error: {0}")]
    Config(String),

    /// A start request collided with another mutually exclusive effect.
    #[error("Cannot start {requested} while {active} is running")]
    Busy { requested: Mode, active: Mode },
}

pub type FxResult<T> = Result<T, FxError>;
