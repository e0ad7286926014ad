//! Notes, chords and rests.

use num_rational::Rational32;
use serde::{Deserialize, Serialize};

use crate::error::{NotationError, Result};
use crate::pitch::Pitch;

/// Durations and offsets in quarter notes, exact so triplets sum cleanly
pub type QuarterLength = Rational32;

/// A single sounding pitch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Pitch,
    pub duration: QuarterLength,
}

/// Simultaneous pitches sharing one duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub pitches: Vec<Pitch>,
    pub duration: QuarterLength,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rest {
    pub duration: QuarterLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Note,
    Chord,
    Rest,
}

/// A sounding or silent unit of a measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Note(Note),
    Chord(Chord),
    Rest(Rest),
}

impl Element {
    pub fn note(pitch: Pitch, duration: QuarterLength) -> Self {
        Element::Note(Note { pitch, duration })
    }

    pub fn chord(pitches: Vec<Pitch>, duration: QuarterLength) -> Self {
        Element::Chord(Chord { pitches, duration })
    }

    pub fn rest(duration: QuarterLength) -> Self {
        Element::Rest(Rest { duration })
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Note(_) => ElementKind::Note,
            Element::Chord(_) => ElementKind::Chord,
            Element::Rest(_) => ElementKind::Rest,
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, Element::Note(_))
    }

    pub fn is_chord(&self) -> bool {
        matches!(self, Element::Chord(_))
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Element::Rest(_))
    }

    pub fn duration(&self) -> QuarterLength {
        match self {
            Element::Note(n) => n.duration,
            Element::Chord(c) => c.duration,
            Element::Rest(r) => r.duration,
        }
    }

    /// Pitches in order: none for a rest, one for a note, all for a chord
    pub fn pitches(&self) -> Vec<Pitch> {
        match self {
            Element::Note(n) => vec![n.pitch],
            Element::Chord(c) => c.pitches.clone(),
            Element::Rest(_) => Vec::new(),
        }
    }

    /// Same element with a new duration
    pub fn with_duration(&self, duration: QuarterLength) -> Element {
        match self {
            Element::Note(n) => Element::note(n.pitch, duration),
            Element::Chord(c) => Element::chord(c.pitches.clone(), duration),
            Element::Rest(_) => Element::rest(duration),
        }
    }

    /// Rewrite each pitch with `f(index, pitch)`; rests pass through untouched
    pub fn try_map_pitches<E>(
        &self,
        mut f: impl FnMut(usize, Pitch) -> std::result::Result<Pitch, E>,
    ) -> std::result::Result<Element, E> {
        Ok(match self {
            Element::Note(n) => Element::note(f(0, n.pitch)?, n.duration),
            Element::Chord(c) => {
                let pitches = c
                    .pitches
                    .iter()
                    .enumerate()
                    .map(|(i, p)| f(i, *p))
                    .collect::<std::result::Result<Vec<_>, E>>()?;
                Element::chord(pitches, c.duration)
            }
            Element::Rest(r) => Element::Rest(r.clone()),
        })
    }

    /// Check the duration is positive and chords are non-empty
    pub fn validate(&self) -> Result<()> {
        let duration = self.duration();
        if duration <= Rational32::from_integer(0) {
            return Err(NotationError::NonPositiveDuration(duration));
        }
        if let Element::Chord(c) = self {
            if c.pitches.is_empty() {
                return Err(NotationError::EmptyChord);
            }
        }
        Ok(())
    }
}
