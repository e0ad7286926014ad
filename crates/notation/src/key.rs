//! Keys, their spelled scales, and key-specification parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NotationError, Result};
use crate::pitch::{Accidental, NoteName, PitchName};
use crate::triad::Triad;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    Major,
    Minor,
}

impl KeyMode {
    pub const ALL: [KeyMode; 2] = [KeyMode::Major, KeyMode::Minor];

    /// Semitones above the tonic for degrees 1-7 (natural minor for `Minor`)
    pub fn intervals(&self) -> [u8; 7] {
        match self {
            KeyMode::Major => [0, 2, 4, 5, 7, 9, 11],
            KeyMode::Minor => [0, 2, 3, 5, 7, 8, 10],
        }
    }

    /// Parse mode text (case-insensitive, allows abbreviations)
    pub fn parse(s: &str) -> Option<KeyMode> {
        match s.trim().to_lowercase().as_str() {
            "maj" | "major" | "" => Some(KeyMode::Major),
            "min" | "minor" | "m" => Some(KeyMode::Minor),
            _ => None,
        }
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::Major => write!(f, "major"),
            KeyMode::Minor => write!(f, "minor"),
        }
    }
}

/// The seventeen spelled tonics, in canonical order
pub const TONICS: [PitchName; 17] = [
    PitchName::new(NoteName::A, -1),
    PitchName::new(NoteName::A, 0),
    PitchName::new(NoteName::A, 1),
    PitchName::new(NoteName::B, -1),
    PitchName::new(NoteName::B, 0),
    PitchName::new(NoteName::C, 0),
    PitchName::new(NoteName::C, 1),
    PitchName::new(NoteName::D, -1),
    PitchName::new(NoteName::D, 0),
    PitchName::new(NoteName::D, 1),
    PitchName::new(NoteName::E, -1),
    PitchName::new(NoteName::E, 0),
    PitchName::new(NoteName::F, 0),
    PitchName::new(NoteName::F, 1),
    PitchName::new(NoteName::G, -1),
    PitchName::new(NoteName::G, 0),
    PitchName::new(NoteName::G, 1),
];

/// A tonic plus mode. Serialized as its display text, e.g. `"Eb minor"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key {
    pub tonic: PitchName,
    pub mode: KeyMode,
}

impl Key {
    pub const fn new(tonic: PitchName, mode: KeyMode) -> Self {
        Key { tonic, mode }
    }

    pub const fn major(tonic: PitchName) -> Self {
        Key::new(tonic, KeyMode::Major)
    }

    pub const fn minor(tonic: PitchName) -> Self {
        Key::new(tonic, KeyMode::Minor)
    }

    /// Build a key from its configuration triple, e.g. `('e', "-", "minor")`
    pub fn from_parts(letter: char, accidental: &str, mode: &str) -> Result<Key> {
        let step = NoteName::from_char(letter)
            .ok_or_else(|| NotationError::InvalidKey(format!("{letter}{accidental} {mode}")))?;
        let alter = Accidental::offset_of(accidental)?;
        let mode = KeyMode::parse(mode).ok_or_else(|| NotationError::InvalidMode(mode.to_string()))?;
        Ok(Key::new(PitchName::new(step, alter), mode))
    }

    /// All 34 keys in canonical order: tonic order of [`TONICS`], major before minor
    pub fn all() -> impl Iterator<Item = Key> {
        TONICS
            .iter()
            .flat_map(|tonic| KeyMode::ALL.iter().map(move |mode| Key::new(*tonic, *mode)))
    }

    /// Position in [`Key::all`], or `None` for a tonic outside the canonical set
    pub fn ordinal(&self) -> Option<usize> {
        let tonic = TONICS.iter().position(|t| *t == self.tonic)?;
        Some(tonic * 2 + self.mode as usize)
    }

    pub fn tonic_pitch_class(&self) -> u8 {
        self.tonic.pitch_class()
    }

    /// The same tonic in the other mode
    pub fn parallel(&self) -> Key {
        let mode = match self.mode {
            KeyMode::Major => KeyMode::Minor,
            KeyMode::Minor => KeyMode::Major,
        };
        Key::new(self.tonic, mode)
    }

    /// Spelled diatonic scale, degree 1 first
    pub fn scale(&self) -> [PitchName; 7] {
        let intervals = self.mode.intervals();
        std::array::from_fn(|i| self.tonic.interval(i, intervals[i]))
    }

    pub fn pitch_at(&self, degree: u8) -> Result<PitchName> {
        if !(1..=7).contains(&degree) {
            return Err(NotationError::InvalidDegree(degree));
        }
        Ok(self.scale()[degree as usize - 1])
    }

    pub fn pitch_class_at(&self, degree: u8) -> Result<u8> {
        self.pitch_at(degree).map(|p| p.pitch_class())
    }

    /// Diatonic degree (1-7) whose pitch class matches, if any
    pub fn degree_of(&self, pitch_class: u8) -> Option<u8> {
        self.scale()
            .iter()
            .position(|p| p.pitch_class() == pitch_class % 12)
            .map(|i| i as u8 + 1)
    }

    /// Triad stacked in thirds on `degree`
    pub fn triad_on(&self, degree: u8) -> Result<Triad> {
        if !(1..=7).contains(&degree) {
            return Err(NotationError::InvalidDegree(degree));
        }
        let scale = self.scale();
        let i = degree as usize - 1;
        Ok(Triad::new(scale[i], scale[(i + 2) % 7], scale[(i + 4) % 7]))
    }

    /// Diatonic triads on degrees 1-7
    pub fn triads(&self) -> [Triad; 7] {
        let scale = self.scale();
        std::array::from_fn(|i| Triad::new(scale[i], scale[(i + 2) % 7], scale[(i + 4) % 7]))
    }

    pub fn tonic_triad(&self) -> Triad {
        self.triads()[0]
    }

    /// Leading tone a semitone under the tonic (raised seventh in minor)
    pub fn leading_tone(&self) -> PitchName {
        self.tonic.interval(6, 11)
    }

    /// V7: dominant, leading tone, supertonic, subdominant
    pub fn dominant_seventh(&self) -> [PitchName; 4] {
        let scale = self.scale();
        [scale[4], self.leading_tone(), scale[1], scale[3]]
    }

    /// vii°7: leading tone, supertonic, subdominant, lowered submediant
    pub fn diminished_seventh(&self) -> [PitchName; 4] {
        let scale = self.scale();
        [
            self.leading_tone(),
            scale[1],
            scale[3],
            self.tonic.interval(5, 8),
        ]
    }
}

impl Default for Key {
    fn default() -> Self {
        Key::major(PitchName::natural(NoteName::C))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tonic, self.mode)
    }
}

impl FromStr for Key {
    type Err = NotationError;

    /// Parse `"c major"`, `"e- minor"`, `"F#m"`, `"Bb"`, `"bbm"`.
    ///
    /// A `b` after the letter is a flat only when what follows still reads
    /// as a mode, so `"bm"` is B minor and `"bbm"` is B-flat minor.
    fn from_str(s: &str) -> Result<Key> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let step = chars
            .next()
            .and_then(NoteName::from_char)
            .ok_or_else(|| NotationError::InvalidKey(s.to_string()))?;
        let rest = chars.as_str();

        let run = rest
            .char_indices()
            .find(|(_, c)| !matches!(c, '#' | '-' | 'b'))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        for split in (0..=run).rev() {
            let (accidental, mode) = rest.split_at(split);
            let Ok(alter) = Accidental::offset_of(accidental) else {
                continue;
            };
            if let Some(mode) = KeyMode::parse(mode) {
                return Ok(Key::new(PitchName::new(step, alter), mode));
            }
        }

        Err(NotationError::InvalidKey(s.to_string()))
    }
}

impl TryFrom<String> for Key {
    type Error = NotationError;

    fn try_from(value: String) -> Result<Key> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> String {
        key.to_string()
    }
}
