//! Harmonic position of notes and chords within a key.
//!
//! The [`HarmonicAnalyzer`] trait is where a fuller analysis engine plugs
//! in. [`DiatonicAnalyzer`] is the built-in one: a pitch takes the diatonic
//! degree whose pitch class it matches, and a chromatic pitch takes the
//! degree a semitone below it with alteration +1.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::key::Key;
use crate::pitch::Pitch;

/// Where a pitch or chord sits in a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScaleDegreeInfo {
    /// 1-7
    pub degree: u8,
    /// Chromatic alteration relative to the diatonic degree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alteration: Option<i8>,
}

impl ScaleDegreeInfo {
    pub fn diatonic(degree: u8) -> Self {
        ScaleDegreeInfo {
            degree,
            alteration: None,
        }
    }

    pub fn altered(degree: u8, alteration: i8) -> Self {
        ScaleDegreeInfo {
            degree,
            alteration: Some(alteration),
        }
    }
}

/// Analysis of one element: its own degree plus one degree per sounding pitch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmonicInfo {
    pub degree: ScaleDegreeInfo,
    pub pitch_degrees: Vec<ScaleDegreeInfo>,
}

impl HarmonicInfo {
    /// Degree of the `index`th pitch; a note's only pitch falls back to the element degree
    pub fn pitch_degree(&self, index: usize) -> Option<ScaleDegreeInfo> {
        self.pitch_degrees
            .get(index)
            .copied()
            .or(if index == 0 { Some(self.degree) } else { None })
    }
}

/// Source of harmonic analysis for elements in a key
pub trait HarmonicAnalyzer: Send + Sync {
    /// `None` for rests or anything the analyzer cannot place
    fn analyze(&self, element: &Element, key: &Key) -> Option<HarmonicInfo>;
}

/// Scale-degree lookup against the key's diatonic pitch classes
#[derive(Debug, Clone, Copy, Default)]
pub struct DiatonicAnalyzer;

impl DiatonicAnalyzer {
    pub fn degree_of_pitch(pitch: Pitch, key: &Key) -> ScaleDegreeInfo {
        let pc = pitch.pitch_class();
        if let Some(degree) = key.degree_of(pc) {
            return ScaleDegreeInfo::diatonic(degree);
        }
        // Both major and natural minor have a diatonic step a semitone below
        // every chromatic pitch class.
        let below = (pc + 11) % 12;
        match key.degree_of(below) {
            Some(degree) => ScaleDegreeInfo::altered(degree, 1),
            None => ScaleDegreeInfo::altered(1, 0),
        }
    }
}

impl HarmonicAnalyzer for DiatonicAnalyzer {
    fn analyze(&self, element: &Element, key: &Key) -> Option<HarmonicInfo> {
        let pitches = element.pitches();
        let lowest = pitches.iter().min()?;
        Some(HarmonicInfo {
            degree: Self::degree_of_pitch(*lowest, key),
            pitch_degrees: pitches
                .iter()
                .map(|p| Self::degree_of_pitch(*p, key))
                .collect(),
        })
    }
}

/// Harmonic lookup: `None` for rests, the element's degree otherwise
pub fn roman(element: &Element, key: &Key) -> Option<ScaleDegreeInfo> {
    DiatonicAnalyzer.analyze(element, key).map(|info| info.degree)
}
