//! Shortest modulation paths and the chord bridges built along them.

use std::collections::{HashMap, VecDeque};

use notation::{AnalyzedElement, Key, Measure, Triad};
use petgraph::graph::NodeIndex;
use rand::Rng;
use tracing::debug;

use crate::cadence::{cadence, tonic, triad_in};
use crate::error::{ModulationError, Result};
use crate::graph::ModulationGraph;
use crate::packing::pack_into_measures;

/// Scale degrees tried in order when picking a pivot, predominants first
const PIVOT_PREFERENCE: [u8; 7] = [4, 2, 6, 3, 5, 7, 1];

impl ModulationGraph {
    /// Breadth-first key path from `start` to `end`, both included.
    ///
    /// Neighbours are expanded in canonical key order, so among equally
    /// short paths the result is deterministic.
    pub fn find_key_path(&self, start: &Key, end: &Key) -> Result<Option<Vec<Key>>> {
        let from = self
            .index_of(start)
            .ok_or(ModulationError::UnknownKey(*start))?;
        let to = self.index_of(end).ok_or(ModulationError::UnknownKey(*end))?;

        let mut parents: HashMap<NodeIndex, Option<NodeIndex>> = HashMap::from([(from, None)]);
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(Some(parent)) = parents.get(&cursor) {
                    path.push(*parent);
                    cursor = *parent;
                }
                path.reverse();
                let keys = path
                    .into_iter()
                    .filter_map(|index| self.node_at(index).map(|n| n.key))
                    .collect();
                return Ok(Some(keys));
            }
            for neighbor in self.neighbor_indices(current) {
                if !parents.contains_key(&neighbor) {
                    parents.insert(neighbor, Some(current));
                    queue.push_back(neighbor);
                }
            }
        }

        Ok(None)
    }

    /// Chord progression modulating from `start` to `end`.
    ///
    /// The result opens on the start key's tonic triad and closes on a
    /// cadence (seventh chord and tonic) in the end key. Every step along
    /// the key path except the one leaving `start` confirms the key it
    /// leaves with a cadence, then plays a pivot chord shared with the next
    /// key. A direct neighbour is reached with no pivot at all.
    /// `Ok(None)` means no path.
    pub fn find_chord_path<R: Rng + ?Sized>(
        &self,
        start: &Key,
        end: &Key,
        rng: &mut R,
    ) -> Result<Option<Vec<AnalyzedElement>>> {
        let Some(keys) = self.find_key_path(start, end)? else {
            debug!(from = %start, to = %end, "no modulation path");
            return Ok(None);
        };
        debug!(
            from = %start,
            to = %end,
            steps = keys.len() - 1,
            "found modulation path"
        );

        let mut chords = vec![tonic(&keys[0])];
        for pair in keys.windows(2).skip(1) {
            let (parent, child) = (&pair[0], &pair[1]);
            chords.extend(cadence(parent, rng));
            let shared = self.shared_triads(parent, child).unwrap_or_default();
            if let Some(pivot) = choose_pivot(shared, child) {
                chords.push(triad_in(child, &pivot));
            }
        }
        if let Some(end) = keys.last() {
            chords.extend(cadence(end, rng));
        }

        Ok(Some(chords))
    }

    /// [`find_chord_path`](Self::find_chord_path) packed into measures
    pub fn bridge<R: Rng + ?Sized>(
        &self,
        start: &Key,
        end: &Key,
        beats_per_measure: u8,
        rng: &mut R,
    ) -> Result<Option<Vec<Measure>>> {
        match self.find_chord_path(start, end, rng)? {
            Some(chords) => pack_into_measures(beats_per_measure, &chords).map(Some),
            None => Ok(None),
        }
    }
}

/// Pick the shared triad that works best as a predominant in `child`.
///
/// Triads are ranked by their root's degree in `child` following
/// [`PIVOT_PREFERENCE`]; triads foreign to `child` rank last. Ties keep
/// the order of `shared`.
pub fn choose_pivot(shared: &[Triad], child: &Key) -> Option<Triad> {
    let diatonic = child.triads();
    shared
        .iter()
        .min_by_key(|triad| {
            diatonic
                .iter()
                .position(|t| t == *triad)
                .and_then(|i| PIVOT_PREFERENCE.iter().position(|&d| d as usize == i + 1))
                .unwrap_or(PIVOT_PREFERENCE.len())
        })
        .copied()
}
