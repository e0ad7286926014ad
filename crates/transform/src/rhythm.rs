//! Rest elimination and ostinato re-quantization.
//!
//! An ostinato rhythm gives, for each of the four beats of a measure, how
//! many equal attacks that beat is divided into. The measure's own material
//! is redistributed over those attacks.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use notation::{AnalyzedElement, ElementUpdate, Measure, QuarterLength, Rational32};
use tracing::debug;

use crate::error::{Result, TransformError};

/// Upper bound on the attacks a single beat can be divided into
pub const MAX_ATTACKS_PER_BEAT: u32 = 64;

/// Attacks per beat for the four beats of a measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rhythm([u32; 4]);

impl Rhythm {
    /// Every beat needs between 1 and [`MAX_ATTACKS_PER_BEAT`] attacks
    pub fn new(beats: [u32; 4]) -> Result<Self> {
        if beats.iter().any(|&n| n == 0 || n > MAX_ATTACKS_PER_BEAT) {
            return Err(TransformError::InvalidRhythm(
                beats.map(|n| n.to_string()).join(","),
            ));
        }
        Ok(Rhythm(beats))
    }

    pub fn from_slice(beats: &[u32]) -> Result<Self> {
        let beats: [u32; 4] = beats.try_into().map_err(|_| {
            TransformError::InvalidRhythm(
                beats.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(","),
            )
        })?;
        Self::new(beats)
    }

    pub fn beats(&self) -> [u32; 4] {
        self.0
    }

    /// Compact id, e.g. `2234`; comma-separated once any beat needs two digits
    pub fn id(&self) -> String {
        if self.0.iter().all(|&n| n < 10) {
            self.0.iter().map(|n| n.to_string()).collect()
        } else {
            self.0.map(|n| n.to_string()).join(",")
        }
    }
}

impl fmt::Display for Rhythm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Rhythm {
    type Err = TransformError;

    /// Parses `"2234"` (one digit per beat) or `"2,2,3,4"`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || TransformError::InvalidRhythm(s.to_string());
        let beats: Vec<u32> = if s.contains(',') {
            s.split(',')
                .map(|part| part.trim().parse::<u32>().map_err(|_| invalid()))
                .collect::<Result<_>>()?
        } else {
            s.chars()
                .map(|c| c.to_digit(10).ok_or_else(invalid))
                .collect::<Result<_>>()?
        };
        if beats.len() != 4 {
            return Err(invalid());
        }
        Self::from_slice(&beats)
    }
}

/// Replace every rest with a copy of a sounding neighbour.
///
/// For a rest at index `i` the source is the element at `i + 1` (or `i - 1`
/// when `i` is 0), taken modulo the number of sounding elements as an index
/// into the measure's sounding elements. The copy keeps the rest's key,
/// duration and position.
pub fn replace_rests(measures: &[Measure]) -> Result<Vec<Measure>> {
    measures
        .iter()
        .enumerate()
        .map(|(index, measure)| replace_rests_in(measure, index + 1))
        .collect()
}

fn replace_rests_in(measure: &Measure, position: usize) -> Result<Measure> {
    let sounding: Vec<&AnalyzedElement> = measure.iter().filter(|e| !e.is_rest()).collect();
    if sounding.is_empty() {
        return Err(TransformError::NoSoundingElements { measure: position });
    }

    Ok(measure
        .iter()
        .enumerate()
        .map(|(i, element)| {
            if !element.is_rest() {
                return element.clone();
            }
            let neighbour = if i == 0 { -1 } else { i as isize + 1 };
            let source = sounding[neighbour.rem_euclid(sounding.len() as isize) as usize];
            let copy = element.copy(
                ElementUpdate::new().element(source.element().with_duration(element.duration())),
            );
            if source.key() == element.key() {
                copy.with_harmony(source.harmony().cloned())
            } else {
                copy
            }
        })
        .collect())
}

/// Re-quantize each measure onto `rhythm`.
///
/// Rests are first replaced, then elements are grouped by the beat they
/// start on. Beat `b` is divided into `rhythm[b]` attacks of `1 / rhythm[b]`
/// each, filled from that beat's group (or the nearest earlier group when
/// nothing starts on it):
///
/// - as many elements as attacks: one each
/// - fewer elements: each repeats `attacks / k` times, the first
///   `attacks % k` once more
/// - more elements: even-indexed then odd-indexed, cut to the attack count
///
/// Attack `j` of beat `b` starts at `b + j / rhythm[b]`.
pub fn fill_ostinato(measures: &[Measure], rhythm: &Rhythm) -> Result<Vec<Measure>> {
    let filled = replace_rests(measures)?;
    let result = filled
        .iter()
        .enumerate()
        .map(|(index, measure)| fill_measure(measure, rhythm, index + 1))
        .collect::<Result<Vec<Measure>>>()?;
    debug!(rhythm = %rhythm, measures = result.len(), "filled ostinato");
    Ok(result)
}

fn fill_measure(measure: &Measure, rhythm: &Rhythm, position: usize) -> Result<Measure> {
    let mut groups: BTreeMap<i32, Vec<&AnalyzedElement>> = BTreeMap::new();
    for element in measure {
        groups
            .entry(element.beat_offset().floor().to_integer())
            .or_default()
            .push(element);
    }

    let mut emitted = Measure::new();
    for (slot, attacks) in rhythm.beats().into_iter().enumerate() {
        let beat = slot as i32 + 1;
        let group = groups
            .range(..=beat)
            .rev()
            .map(|(_, group)| group)
            .next()
            .ok_or(TransformError::EmptySlot {
                measure: position,
                beat: slot + 1,
            })?;

        let divisor =
            i32::try_from(attacks).map_err(|_| TransformError::InvalidRhythm(rhythm.id()))?;
        let duration: QuarterLength = Rational32::new(1, divisor);
        let slot_start = Rational32::from_integer(beat);
        for (j, element) in distribute(group, attacks as usize).into_iter().enumerate() {
            let copy = element.copy(
                ElementUpdate::new()
                    .element(element.element().with_duration(duration))
                    .beat_offset(slot_start + duration * Rational32::from_integer(j as i32)),
            );
            emitted.push(copy.with_harmony(element.harmony().cloned()));
        }
    }
    Ok(emitted)
}

/// Pick exactly `attacks` elements from `group` (non-empty)
fn distribute<'a>(group: &[&'a AnalyzedElement], attacks: usize) -> Vec<&'a AnalyzedElement> {
    let k = group.len();
    if attacks == k {
        return group.to_vec();
    }
    if attacks > k {
        let (each, extra) = (attacks / k, attacks % k);
        return group
            .iter()
            .enumerate()
            .flat_map(|(i, e)| std::iter::repeat(*e).take(each + usize::from(i < extra)))
            .collect();
    }
    group
        .iter()
        .step_by(2)
        .chain(group.iter().skip(1).step_by(2))
        .take(attacks)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notation::{Element, Key, Pitch};
    use pretty_assertions::assert_eq;

    fn c_major() -> Key {
        "c major".parse().unwrap()
    }

    fn at(element: Element, offset: Rational32) -> AnalyzedElement {
        AnalyzedElement::new(c_major(), element, Some(1), Some(4), offset)
    }

    fn note(midi: i16, duration: (i32, i32), offset: (i32, i32)) -> AnalyzedElement {
        at(
            Element::note(Pitch::from_midi(midi), Rational32::new(duration.0, duration.1)),
            Rational32::new(offset.0, offset.1),
        )
    }

    fn rest(duration: (i32, i32), offset: (i32, i32)) -> AnalyzedElement {
        at(
            Element::rest(Rational32::new(duration.0, duration.1)),
            Rational32::new(offset.0, offset.1),
        )
    }

    fn midi(measure: &Measure) -> Vec<i16> {
        measure
            .iter()
            .flat_map(|e| e.pitches())
            .map(|p| p.midi())
            .collect()
    }

    #[test]
    fn test_rhythm_parsing() {
        assert_eq!("2234".parse::<Rhythm>().unwrap().beats(), [2, 2, 3, 4]);
        assert_eq!("2, 2, 3, 12".parse::<Rhythm>().unwrap().beats(), [2, 2, 3, 12]);
        assert!("223".parse::<Rhythm>().is_err());
        assert!("2,2,0,4".parse::<Rhythm>().is_err());
        assert!("22a4".parse::<Rhythm>().is_err());
        assert!(Rhythm::from_slice(&[1, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn test_rhythm_rejects_oversized_beats() {
        assert_eq!(
            "1,1,1,2147483648".parse::<Rhythm>(),
            Err(TransformError::InvalidRhythm("1,1,1,2147483648".to_string()))
        );
        assert!("1,1,1,4294967295".parse::<Rhythm>().is_err());
        assert!(Rhythm::new([1, 1, 1, MAX_ATTACKS_PER_BEAT + 1]).is_err());

        let widest = Rhythm::new([1, 1, 1, MAX_ATTACKS_PER_BEAT]).unwrap();
        let measure = vec![note(60, (4, 1), (1, 1))];
        let filled = fill_ostinato(&[measure], &widest).unwrap();
        assert_eq!(filled[0].len(), 3 + MAX_ATTACKS_PER_BEAT as usize);
        let total: Rational32 = filled[0].iter().map(|e| e.duration()).sum();
        assert_eq!(total, Rational32::from_integer(4));
    }

    #[test]
    fn test_rhythm_id() {
        assert_eq!(Rhythm::new([1, 1, 2, 4]).unwrap().id(), "1124");
        assert_eq!(Rhythm::new([1, 1, 2, 12]).unwrap().to_string(), "1,1,2,12");
    }

    #[test]
    fn test_rest_takes_following_sounding_element() {
        let measure = vec![
            note(60, (1, 1), (1, 1)),
            rest((1, 1), (2, 1)),
            note(64, (1, 1), (3, 1)),
            note(67, (1, 1), (4, 1)),
        ];
        let replaced = replace_rests(&[measure]).unwrap();
        // rest at index 1 -> sounding[2 % 3] = G
        assert_eq!(midi(&replaced[0]), vec![60, 67, 64, 67]);
        assert_eq!(replaced[0][1].beat_offset(), Rational32::from_integer(2));
        assert_eq!(replaced[0][1].duration(), Rational32::from_integer(1));
    }

    #[test]
    fn test_leading_rest_wraps_to_last_sounding() {
        let measure = vec![
            rest((1, 1), (1, 1)),
            note(60, (1, 1), (2, 1)),
            note(64, (2, 1), (3, 1)),
        ];
        let replaced = replace_rests(&[measure]).unwrap();
        assert_eq!(midi(&replaced[0]), vec![64, 60, 64]);
        assert_eq!(replaced[0][0].duration(), Rational32::from_integer(1));
    }

    #[test]
    fn test_all_rest_measure_is_rejected() {
        let measure = vec![rest((4, 1), (1, 1))];
        assert_eq!(
            replace_rests(&[vec![note(60, (4, 1), (1, 1))], measure]),
            Err(TransformError::NoSoundingElements { measure: 2 })
        );
    }

    #[test]
    fn test_more_attacks_than_elements_repeats_in_order() {
        let measure = vec![
            note(60, (1, 2), (1, 1)),
            note(62, (1, 2), (3, 2)),
            note(64, (3, 1), (2, 1)),
        ];
        let rhythm = Rhythm::new([5, 1, 1, 1]).unwrap();
        let filled = fill_ostinato(&[measure], &rhythm).unwrap();
        assert_eq!(midi(&filled[0]), vec![60, 60, 60, 62, 62, 64, 64, 64]);
        let offsets: Vec<Rational32> = filled[0][..5].iter().map(|e| e.beat_offset()).collect();
        assert_eq!(
            offsets,
            vec![
                Rational32::from_integer(1),
                Rational32::new(6, 5),
                Rational32::new(7, 5),
                Rational32::new(8, 5),
                Rational32::new(9, 5),
            ]
        );
    }

    #[test]
    fn test_fewer_attacks_interleave_even_then_odd() {
        let measure = vec![
            note(60, (1, 4), (1, 1)),
            note(62, (1, 4), (5, 4)),
            note(64, (1, 4), (3, 2)),
            note(65, (1, 4), (7, 4)),
            note(67, (3, 1), (2, 1)),
        ];
        let rhythm = Rhythm::new([3, 1, 1, 1]).unwrap();
        let filled = fill_ostinato(&[measure], &rhythm).unwrap();
        assert_eq!(midi(&filled[0]), vec![60, 64, 62, 67, 67, 67]);
    }

    #[test]
    fn test_borrowed_elements_land_in_their_slot() {
        let measure = vec![note(60, (2, 1), (1, 1)), note(64, (2, 1), (3, 1))];
        let rhythm = Rhythm::new([1, 2, 1, 1]).unwrap();
        let filled = fill_ostinato(&[measure], &rhythm).unwrap();
        let offsets: Vec<Rational32> = filled[0].iter().map(|e| e.beat_offset()).collect();
        assert_eq!(
            offsets,
            vec![
                Rational32::from_integer(1),
                Rational32::from_integer(2),
                Rational32::new(5, 2),
                Rational32::from_integer(3),
                Rational32::from_integer(4),
            ]
        );
        assert_eq!(midi(&filled[0]), vec![60, 60, 60, 64, 64]);
    }

    #[test]
    fn test_empty_first_beat_is_an_error() {
        let measure = vec![note(60, (2, 1), (2, 1))];
        let rhythm = Rhythm::new([1, 1, 1, 1]).unwrap();
        assert_eq!(
            fill_ostinato(&[measure], &rhythm),
            Err(TransformError::EmptySlot { measure: 1, beat: 1 })
        );
    }
}
