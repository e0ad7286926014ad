//! Chord construction for cadences and pivots.

use notation::{voice_close, AnalyzedElement, Element, Key, KeyMode, PitchName, Rational32, Triad};
use rand::Rng;

/// Octave holding the root of every generated chord
pub const VOICING_OCTAVE: i8 = 4;

/// Length of a generated chord before packing, in quarter notes
pub const CHORD_BEATS: i32 = 2;

/// Which seventh chord leads into a cadence's tonic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seventh {
    Dominant,
    Diminished,
}

impl Seventh {
    /// Major keys pick either at random; minor keys always use vii°7
    pub fn choose<R: Rng + ?Sized>(key: &Key, rng: &mut R) -> Seventh {
        match key.mode {
            KeyMode::Major if rng.gen_bool(0.5) => Seventh::Dominant,
            _ => Seventh::Diminished,
        }
    }

    pub fn pitch_names(&self, key: &Key) -> [PitchName; 4] {
        match self {
            Seventh::Dominant => key.dominant_seventh(),
            Seventh::Diminished => key.diminished_seventh(),
        }
    }
}

/// A close-position chord on `names`, analysed in `key`
pub fn chord_in(key: &Key, names: &[PitchName]) -> AnalyzedElement {
    AnalyzedElement::new(
        *key,
        Element::chord(
            voice_close(names, VOICING_OCTAVE),
            Rational32::from_integer(CHORD_BEATS),
        ),
        None,
        None,
        Rational32::from_integer(1),
    )
}

pub fn triad_in(key: &Key, triad: &Triad) -> AnalyzedElement {
    chord_in(key, &triad.tones())
}

pub fn tonic(key: &Key) -> AnalyzedElement {
    triad_in(key, &key.tonic_triad())
}

/// Seventh chord resolving to the tonic triad
pub fn cadence<R: Rng + ?Sized>(key: &Key, rng: &mut R) -> [AnalyzedElement; 2] {
    let seventh = Seventh::choose(key, rng);
    [chord_in(key, &seventh.pitch_names(key)), tonic(key)]
}
