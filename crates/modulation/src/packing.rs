//! Laying a chord progression out in measures.

use notation::{AnalyzedElement, ElementUpdate, Measure, Rational32};

use crate::cadence::CHORD_BEATS;
use crate::error::{ModulationError, Result};

/// Pack chords two beats each into measures of `beats_per_measure`.
///
/// Every chord but the last is grouped `beats_per_measure / 2` to a
/// measure, and a short final group is padded by repeating its last chord.
/// The last chord gets a closing measure of its own, held for the whole
/// measure. Measures are numbered from 1; offsets start at beat 1.
///
/// With `n` chords and `p = beats_per_measure / 2` this gives
/// `ceil((n - 1) / p) + 1` measures. Stretching the last chord inside the
/// final group would give `ceil(n / p)` and overflow that measure, so the
/// layout here is one measure longer unless `n - 1` is a multiple of `p`.
/// When the body ends on a short group its last chord is repeated, even if
/// the whole progression would have filled its measures evenly.
pub fn pack_into_measures(beats_per_measure: u8, chords: &[AnalyzedElement]) -> Result<Vec<Measure>> {
    if beats_per_measure < 2 {
        return Err(ModulationError::InvalidMeter(beats_per_measure));
    }
    let Some((last, body)) = chords.split_last() else {
        return Ok(Vec::new());
    };

    let per_measure = (beats_per_measure / 2) as usize;
    let two_beats = Rational32::from_integer(CHORD_BEATS);
    let mut measures: Vec<Measure> = Vec::new();

    for group in body.chunks(per_measure) {
        let number = measures.len() as u32 + 1;
        let padding = group.last().into_iter().cycle().take(per_measure - group.len());
        let measure = group
            .iter()
            .chain(padding)
            .enumerate()
            .map(|(slot, chord)| {
                place(
                    chord,
                    two_beats,
                    Rational32::from_integer(1 + CHORD_BEATS * slot as i32),
                    number,
                    beats_per_measure,
                )
            })
            .collect();
        measures.push(measure);
    }

    let number = measures.len() as u32 + 1;
    measures.push(vec![place(
        last,
        Rational32::from_integer(beats_per_measure as i32),
        Rational32::from_integer(1),
        number,
        beats_per_measure,
    )]);
    Ok(measures)
}

fn place(
    chord: &AnalyzedElement,
    duration: Rational32,
    offset: Rational32,
    measure: u32,
    beats_per_measure: u8,
) -> AnalyzedElement {
    chord
        .copy(
            ElementUpdate::new()
                .element(chord.element().with_duration(duration))
                .beat_offset(offset)
                .measure_number(measure)
                .time_signature(beats_per_measure),
        )
        .with_harmony(chord.harmony().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cadence::{chord_in, tonic};
    use notation::Key;
    use pretty_assertions::assert_eq;

    fn progression(n: usize) -> Vec<AnalyzedElement> {
        let c_major: Key = "c major".parse().unwrap();
        (0..n)
            .map(|i| {
                let degree = (i % 7) as u8 + 1;
                let triad = c_major.triad_on(degree).unwrap();
                chord_in(&c_major, &triad.tones())
            })
            .collect()
    }

    fn layout(measures: &[Measure]) -> Vec<Vec<(i32, i32, i32)>> {
        measures
            .iter()
            .map(|m| {
                m.iter()
                    .map(|e| {
                        (
                            e.beat_offset().to_integer(),
                            e.duration().to_integer(),
                            e.pitches()[0].pitch_class() as i32,
                        )
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_four_four_packs_two_per_measure() {
        let measures = pack_into_measures(4, &progression(4)).unwrap();
        // C Dm | Em Em (padded) | F held for the whole closing measure
        assert_eq!(
            layout(&measures),
            vec![
                vec![(1, 2, 0), (3, 2, 2)],
                vec![(1, 2, 4), (3, 2, 4)],
                vec![(1, 4, 5)],
            ]
        );
        let numbers: Vec<Option<u32>> = measures.iter().map(|m| m[0].measure_number()).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);
        assert!(measures.iter().flatten().all(|e| e.time_signature() == Some(4)));
    }

    #[test]
    fn test_no_measure_overflows() {
        for beats in 2..=9u8 {
            for n in 1..=9 {
                let measures = pack_into_measures(beats, &progression(n)).unwrap();
                for measure in &measures {
                    let total: Rational32 = measure.iter().map(|e| e.duration()).sum();
                    assert!(total <= Rational32::from_integer(beats as i32));
                }
                let closing = measures.last().unwrap();
                assert_eq!(closing.len(), 1);
                assert_eq!(closing[0].duration(), Rational32::from_integer(beats as i32));
            }
        }
    }

    #[test]
    fn test_measure_count_with_closing_measure() {
        let count = |beats: u8, n: usize| pack_into_measures(beats, &progression(n)).unwrap().len();
        // n - 1 a multiple of chords per measure: same count as stretching in place
        assert_eq!(count(4, 3), 2);
        assert_eq!(count(4, 9), 5);
        assert_eq!(count(6, 4), 2);
        assert_eq!(count(2, 5), 5);
        // otherwise one measure more
        assert_eq!(count(4, 2), 2);
        assert_eq!(count(4, 4), 3);
        assert_eq!(count(6, 6), 3);
    }

    #[test]
    fn test_bad_meter_and_empty_input() {
        assert_eq!(
            pack_into_measures(1, &progression(3)),
            Err(ModulationError::InvalidMeter(1))
        );
        assert_eq!(pack_into_measures(4, &[]), Ok(Vec::new()));
    }

    #[test]
    fn test_harmony_survives_packing() {
        let key: Key = "e- minor".parse().unwrap();
        let chords = vec![tonic(&key), tonic(&key)];
        let measures = pack_into_measures(3, &chords).unwrap();
        assert_eq!(measures[0][0].harmony(), chords[0].harmony());
        assert_eq!(measures[1][0].key(), &key);
    }
}
