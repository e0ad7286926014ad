use thiserror::Error;

use crate::element::QuarterLength;

/// Errors raised while building or validating score material
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid key specification '{0}'")]
    InvalidKey(String),

    #[error("invalid pitch '{0}'")]
    InvalidPitch(String),

    #[error("unknown accidental '{0}'")]
    InvalidAccidental(String),

    #[error("unknown mode '{0}', expected major or minor")]
    InvalidMode(String),

    #[error("scale degree {0} is outside 1..=7")]
    InvalidDegree(u8),

    #[error("element duration must be positive, got {0}")]
    NonPositiveDuration(QuarterLength),

    #[error("chord has no pitches")]
    EmptyChord,

    #[error("time signature must have at least one beat per measure")]
    InvalidTimeSignature,
}

pub type Result<T> = std::result::Result<T, NotationError>;
