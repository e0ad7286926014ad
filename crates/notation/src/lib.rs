//! Symbolic score model for refrain.
//!
//! Scores arrive as parts of measures of notes, chords and rests. Each
//! element is placed in its key and meter as an [`AnalyzedElement`], which
//! the transformation engines consume and produce.
//!
//! # Example
//!
//! ```
//! use notation::{AnalyzedElement, Element, Key, Pitch, Rational32};
//!
//! let key: Key = "c major".parse().unwrap();
//! let e4 = Element::note(Pitch::from_midi(64), Rational32::from_integer(1));
//! let analyzed = AnalyzedElement::new(key, e4, Some(1), Some(4), Rational32::from_integer(1));
//! assert_eq!(analyzed.roman().map(|d| d.degree), Some(3));
//! ```

pub mod analysis;
pub mod analyzed;
pub mod element;
pub mod error;
pub mod key;
pub mod pitch;
pub mod score;
pub mod stats;
pub mod triad;

pub use analysis::{roman, DiatonicAnalyzer, HarmonicAnalyzer, HarmonicInfo, ScaleDegreeInfo};
pub use analyzed::{AnalyzedElement, ElementUpdate, Measure, Part};
pub use element::{Chord, Element, ElementKind, Note, QuarterLength, Rest};
pub use error::NotationError;
pub use key::{Key, KeyMode, TONICS};
pub use pitch::{Accidental, NoteName, Pitch, PitchName};
pub use score::ScoreDocument;
pub use triad::{voice_close, Triad};

pub use num_rational::Rational32;
