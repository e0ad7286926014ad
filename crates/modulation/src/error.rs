use notation::{Key, NotationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModulationError {
    #[error("{0} is not one of the keys in the modulation graph")]
    UnknownKey(Key),

    #[error("beats per measure must be at least 2, got {0}")]
    InvalidMeter(u8),

    #[error(transparent)]
    Notation(#[from] NotationError),
}

pub type Result<T> = std::result::Result<T, ModulationError>;
