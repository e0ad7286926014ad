//! Rhythmic statistics over element sequences.

use std::collections::BTreeMap;

use crate::element::{Element, QuarterLength};

/// Relative frequency of each duration
pub fn duration_frequencies<'a>(
    elements: impl IntoIterator<Item = &'a Element>,
) -> BTreeMap<QuarterLength, f64> {
    let mut counts: BTreeMap<QuarterLength, usize> = BTreeMap::new();
    let mut total = 0usize;
    for element in elements {
        *counts.entry(element.duration()).or_default() += 1;
        total += 1;
    }
    counts
        .into_iter()
        .map(|(duration, count)| (duration, count as f64 / total as f64))
        .collect()
}

/// First-order transition probabilities: `(from, to) -> P(to | from)`
pub fn duration_transitions<'a>(
    elements: impl IntoIterator<Item = &'a Element>,
) -> BTreeMap<(QuarterLength, QuarterLength), f64> {
    let durations: Vec<QuarterLength> = elements.into_iter().map(|e| e.duration()).collect();
    let mut pair_counts: BTreeMap<(QuarterLength, QuarterLength), usize> = BTreeMap::new();
    let mut from_counts: BTreeMap<QuarterLength, usize> = BTreeMap::new();
    for pair in durations.windows(2) {
        *pair_counts.entry((pair[0], pair[1])).or_default() += 1;
        *from_counts.entry(pair[0]).or_default() += 1;
    }
    pair_counts
        .into_iter()
        .map(|((from, to), count)| ((from, to), count as f64 / from_counts[&from] as f64))
        .collect()
}
