//! Transformations over analysed scores: key changes that keep scale
//! degrees, ostinato rhythm filling, and a cached session that combines
//! the two.

pub mod error;
pub mod mode_table;
pub mod rhythm;
pub mod session;
pub mod transpose;

pub use error::TransformError;
pub use mode_table::CorrectionTable;
pub use rhythm::{fill_ostinato, replace_rests, Rhythm, MAX_ATTACKS_PER_BEAT};
pub use session::{
    CacheKey, MemoryCache, Parts, RhythmChoice, TransformCache, TransformSession,
    DEFAULT_CACHE_CAPACITY,
};
pub use transpose::{tonic_shift, transpose, transpose_measures, transpose_parts};
