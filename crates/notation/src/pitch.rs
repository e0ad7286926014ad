//! Spelled pitch names and sounding pitches.
//!
//! Keys, scales and triads are compared by spelling (letter plus
//! alteration), so E-flat and D-sharp are different names. Sounding pitches
//! are MIDI note numbers and carry no spelling of their own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NotationError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    /// Semitones above C (0-11)
    pub fn to_semitone(&self) -> i8 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }

    /// All letters from C upwards
    pub fn all() -> [NoteName; 7] {
        [
            NoteName::C,
            NoteName::D,
            NoteName::E,
            NoteName::F,
            NoteName::G,
            NoteName::A,
            NoteName::B,
        ]
    }

    /// Position in the letter cycle, C = 0
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The letter `steps` letters above this one, wrapping after B
    pub fn up(&self, steps: usize) -> NoteName {
        Self::all()[(self.index() + steps) % 7]
    }

    /// Parse a single letter (case-insensitive)
    pub fn from_char(c: char) -> Option<NoteName> {
        match c.to_ascii_uppercase() {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            NoteName::C => 'C',
            NoteName::D => 'D',
            NoteName::E => 'E',
            NoteName::F => 'F',
            NoteName::G => 'G',
            NoteName::A => 'A',
            NoteName::B => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accidental {
    DoubleSharp,
    Sharp,
    Natural,
    Flat,
    DoubleFlat,
}

impl Accidental {
    pub fn to_semitone_offset(&self) -> i8 {
        match self {
            Accidental::DoubleSharp => 2,
            Accidental::Sharp => 1,
            Accidental::Natural => 0,
            Accidental::Flat => -1,
            Accidental::DoubleFlat => -2,
        }
    }

    /// Parse accidental text. Flats may be written `b` or `-`.
    pub fn parse(s: &str) -> Option<Accidental> {
        match s {
            "#" => Some(Accidental::Sharp),
            "##" | "x" => Some(Accidental::DoubleSharp),
            "b" | "-" => Some(Accidental::Flat),
            "bb" | "--" => Some(Accidental::DoubleFlat),
            "=" | "n" => Some(Accidental::Natural),
            _ => None,
        }
    }

    /// Offset for optional accidental text; empty text is natural
    pub fn offset_of(s: &str) -> Result<i8> {
        if s.is_empty() {
            return Ok(0);
        }
        Accidental::parse(s)
            .map(|a| a.to_semitone_offset())
            .ok_or_else(|| NotationError::InvalidAccidental(s.to_string()))
    }
}

/// A letter name with a chromatic alteration, e.g. `Eb` or `F##`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PitchName {
    pub step: NoteName,
    /// Semitones of alteration; negative is flat
    pub alter: i8,
}

impl PitchName {
    pub const fn new(step: NoteName, alter: i8) -> Self {
        PitchName { step, alter }
    }

    pub const fn natural(step: NoteName) -> Self {
        PitchName { step, alter: 0 }
    }

    /// Spell `pitch_class` on the given letter, choosing the smallest alteration
    pub fn spell(step: NoteName, pitch_class: u8) -> Self {
        let diff = (pitch_class as i8 - step.to_semitone()).rem_euclid(12);
        let alter = if diff > 6 { diff - 12 } else { diff };
        PitchName { step, alter }
    }

    pub fn pitch_class(&self) -> u8 {
        (self.step.to_semitone() + self.alter).rem_euclid(12) as u8
    }

    /// The name `semitones` above this one, keeping the letter distance `steps`
    pub fn interval(&self, steps: usize, semitones: u8) -> PitchName {
        PitchName::spell(self.step.up(steps), (self.pitch_class() + semitones) % 12)
    }

    /// This name sounding in `octave` (octave 4 holds middle C)
    pub fn at_octave(&self, octave: i8) -> Pitch {
        Pitch::from_midi(
            (octave as i16 + 1) * 12 + self.step.to_semitone() as i16 + self.alter as i16,
        )
    }
}

impl fmt::Display for PitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.step.as_char())?;
        let symbol = if self.alter > 0 { '#' } else { 'b' };
        for _ in 0..self.alter.unsigned_abs() {
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

impl FromStr for PitchName {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut chars = s.chars();
        let step = chars
            .next()
            .and_then(NoteName::from_char)
            .ok_or_else(|| NotationError::InvalidPitch(s.to_string()))?;
        let alter = Accidental::offset_of(chars.as_str())?;
        Ok(PitchName { step, alter })
    }
}

/// A sounding pitch as a MIDI note number (middle C = 60)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pitch(i16);

impl Pitch {
    pub const fn from_midi(midi: i16) -> Self {
        Pitch(midi)
    }

    pub fn new(name: PitchName, octave: i8) -> Self {
        name.at_octave(octave)
    }

    pub fn midi(&self) -> i16 {
        self.0
    }

    pub fn pitch_class(&self) -> u8 {
        self.0.rem_euclid(12) as u8
    }

    pub fn octave(&self) -> i8 {
        (self.0.div_euclid(12) - 1) as i8
    }

    pub fn transpose(&self, semitones: i16) -> Pitch {
        Pitch(self.0 + semitones)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SHARP_NAMES: [&str; 12] = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];
        write!(
            f,
            "{}{}",
            SHARP_NAMES[self.pitch_class() as usize],
            self.octave()
        )
    }
}

impl FromStr for Pitch {
    type Err = NotationError;

    /// Parses `C4`, `Eb5`, `E-5` (a `-` is always a flat), or a bare MIDI number
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(midi) = s.parse::<i16>() {
            return Ok(Pitch(midi));
        }
        let octave_start = s.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        if octave_start == 0 || octave_start == s.len() {
            return Err(NotationError::InvalidPitch(s.to_string()));
        }
        let name: PitchName = s[..octave_start]
            .parse()
            .map_err(|_| NotationError::InvalidPitch(s.to_string()))?;
        let octave: i8 = s[octave_start..]
            .parse()
            .map_err(|_| NotationError::InvalidPitch(s.to_string()))?;
        Ok(name.at_octave(octave))
    }
}
