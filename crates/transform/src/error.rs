use notation::{Key, NotationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("no harmonic annotation for pitch {index} of an element in {key}")]
    MissingAnnotation { key: Key, index: usize },

    #[error("rhythm must be exactly four positive integers, got '{0}'")]
    InvalidRhythm(String),

    #[error("measure {measure} has no sounding elements to stand in for its rests")]
    NoSoundingElements { measure: usize },

    #[error("measure {measure} has nothing sounding at or before beat {beat}")]
    EmptySlot { measure: usize, beat: usize },

    #[error("transformation cache unavailable: {0}")]
    Cache(String),

    #[error(transparent)]
    Notation(#[from] NotationError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
