//! Scale-degree-preserving key changes.
//!
//! Every pitch moves by the interval between the two tonics. Between major
//! and minor, pitches on degrees 2-7 are also nudged by the
//! [`CorrectionTable`] so that, say, the third of C major lands on the third
//! of A minor rather than a chromatic neighbour.

use notation::{AnalyzedElement, ElementUpdate, Key, Measure, Part, Pitch};
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::mode_table::CorrectionTable;

/// Nearest signed shift between tonics, in semitones within -6..=6.
///
/// A tritone goes up when the source tonic's pitch class is the lower one,
/// so a there-and-back pair of shifts always cancels.
pub fn tonic_shift(from: &Key, to: &Key) -> i16 {
    let source = from.tonic_pitch_class() as i16;
    let target = to.tonic_pitch_class() as i16;
    let up = (target - source).rem_euclid(12);
    match up {
        0..=5 => up,
        6 if source < target => 6,
        _ => up - 12,
    }
}

/// Move one element into `target`, keeping every pitch on its scale degree
pub fn transpose(element: &AnalyzedElement, target: &Key) -> Result<AnalyzedElement> {
    if element.is_rest() {
        return Ok(element.clone());
    }

    let source = *element.key();
    let shift = tonic_shift(&source, target);
    let table = CorrectionTable::shared();
    let harmony = element.harmony();

    let moved = element.element().try_map_pitches(|index, pitch| -> Result<Pitch> {
        if source.mode == target.mode {
            return Ok(pitch.transpose(shift));
        }
        let degree = harmony
            .and_then(|h| h.pitch_degree(index))
            .ok_or(TransformError::MissingAnnotation { key: source, index })?;
        let correction = table.correction(source.mode, target.mode, degree.degree);
        Ok(pitch.transpose(shift + correction))
    })?;

    Ok(element.copy(ElementUpdate::new().key(*target).element(moved)))
}

/// Transpose every element, keeping measure grouping and order
pub fn transpose_measures(measures: &[Measure], target: &Key) -> Result<Vec<Measure>> {
    let transposed = measures
        .iter()
        .map(|measure| measure.iter().map(|e| transpose(e, target)).collect())
        .collect::<Result<Vec<Measure>>>()?;
    debug!(key = %target, measures = transposed.len(), "transposed measures");
    Ok(transposed)
}

/// Transpose each part's measures
pub fn transpose_parts(parts: &[Part], target: &Key) -> Result<Vec<Part>> {
    parts
        .iter()
        .map(|part| transpose_measures(part, target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notation::{Element, HarmonicInfo, Rational32, ScaleDegreeInfo};
    use pretty_assertions::assert_eq;

    fn key(s: &str) -> Key {
        s.parse().unwrap()
    }

    fn note(key_text: &str, midi: i16) -> AnalyzedElement {
        AnalyzedElement::new(
            key(key_text),
            Element::note(Pitch::from_midi(midi), Rational32::from_integer(1)),
            Some(1),
            Some(4),
            Rational32::from_integer(1),
        )
    }

    fn midi(element: &AnalyzedElement) -> Vec<i16> {
        element.pitches().iter().map(|p| p.midi()).collect()
    }

    #[test]
    fn test_tonic_shift_is_nearest() {
        assert_eq!(tonic_shift(&key("c major"), &key("g major")), -5);
        assert_eq!(tonic_shift(&key("c major"), &key("f major")), 5);
        assert_eq!(tonic_shift(&key("c major"), &key("a minor")), -3);
        assert_eq!(tonic_shift(&key("c major"), &key("f# major")), 6);
        assert_eq!(tonic_shift(&key("f# major"), &key("c major")), -6);
        assert_eq!(tonic_shift(&key("c# major"), &key("d- major")), 0);
    }

    #[test]
    fn test_major_to_major_moves_all_pitches_equally() {
        let e = note("c major", 64);
        let moved = transpose(&e, &key("d major")).unwrap();
        assert_eq!(midi(&moved), vec![66]);
        assert_eq!(moved.key(), &key("d major"));
        assert_eq!(moved.roman(), Some(ScaleDegreeInfo::diatonic(3)));
    }

    #[test]
    fn test_major_to_minor_keeps_degree() {
        // E is the third of C major; the third of A minor is C
        let moved = transpose(&note("c major", 64), &key("a minor")).unwrap();
        assert_eq!(midi(&moved), vec![60]);
        assert_eq!(moved.roman(), Some(ScaleDegreeInfo::diatonic(3)));
    }

    #[test]
    fn test_tonic_never_corrected() {
        let moved = transpose(&note("c major", 60), &key("c minor")).unwrap();
        assert_eq!(midi(&moved), vec![60]);
    }

    #[test]
    fn test_chord_corrected_per_pitch() {
        let chord = AnalyzedElement::new(
            key("c major"),
            Element::chord(
                vec![Pitch::from_midi(60), Pitch::from_midi(64), Pitch::from_midi(67)],
                Rational32::from_integer(2),
            ),
            Some(1),
            Some(4),
            Rational32::from_integer(1),
        );
        let moved = transpose(&chord, &key("c minor")).unwrap();
        assert_eq!(midi(&moved), vec![60, 63, 67]);
    }

    #[test]
    fn test_rest_is_identity() {
        let rest = AnalyzedElement::new(
            key("c major"),
            Element::rest(Rational32::from_integer(1)),
            Some(1),
            Some(4),
            Rational32::from_integer(3),
        );
        assert_eq!(transpose(&rest, &key("e- minor")).unwrap(), rest);
    }

    #[test]
    fn test_missing_annotation_across_modes() {
        let bare = note("c major", 64).with_harmony(None);
        assert_eq!(
            transpose(&bare, &key("a minor")),
            Err(TransformError::MissingAnnotation {
                key: key("c major"),
                index: 0
            })
        );
        // same mode needs no degree
        assert!(transpose(&bare, &key("d major")).is_ok());
    }

    #[test]
    fn test_external_harmony_drives_correction() {
        // Annotated as degree 6 even though E is diatonic degree 3
        let e = note("c major", 64).with_harmony(Some(HarmonicInfo {
            degree: ScaleDegreeInfo::diatonic(6),
            pitch_degrees: vec![ScaleDegreeInfo::diatonic(6)],
        }));
        let moved = transpose(&e, &key("c minor")).unwrap();
        assert_eq!(midi(&moved), vec![63]);
    }

    #[test]
    fn test_transpose_parts_keeps_shape() {
        let parts = vec![
            vec![vec![note("c major", 60), note("c major", 62)], vec![note("c major", 64)]],
            vec![vec![note("c major", 48)]],
        ];
        let moved = transpose_parts(&parts, &key("f major")).unwrap();
        let shape: Vec<Vec<usize>> = moved.iter().map(|p| p.iter().map(|m| m.len()).collect()).collect();
        assert_eq!(shape, vec![vec![2, 1], vec![1]]);
        assert_eq!(midi(&moved[1][0][0]), vec![53]);
    }
}
