//! Key-to-key modulation over a common-chord graph.
//!
//! [`ModulationGraph`] links the 34 major and minor keys through the triads
//! they share. A breadth-first search finds the shortest chain of keys, and
//! the chain is voiced as pivot chords and cadences that can be packed into
//! measures.
//!
//! ```
//! use modulation::ModulationGraph;
//! use rand::SeedableRng;
//!
//! let graph = ModulationGraph::shared();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let from = "c major".parse().unwrap();
//! let to = "a minor".parse().unwrap();
//! let measures = graph.bridge(&from, &to, 4, &mut rng).unwrap().unwrap();
//! assert_eq!(measures.last().unwrap().len(), 1);
//! ```

pub mod cadence;
pub mod error;
pub mod graph;
pub mod packing;
pub mod path;

pub use cadence::{cadence, Seventh, CHORD_BEATS, VOICING_OCTAVE};
pub use error::ModulationError;
pub use graph::{EdgeSnapshot, KeyNode, ModulationGraph};
pub use packing::pack_into_measures;
pub use path::choose_pivot;
