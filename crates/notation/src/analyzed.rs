//! Elements placed in harmonic and metric context.

use serde::{Deserialize, Serialize};

use crate::analysis::{DiatonicAnalyzer, HarmonicAnalyzer, HarmonicInfo, ScaleDegreeInfo};
use crate::element::{Element, QuarterLength};
use crate::key::Key;
use crate::pitch::Pitch;

/// An element with its key, analysis, and position in the score.
///
/// Instances are never mutated; use [`AnalyzedElement::copy`] to derive a
/// new one with some fields replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedElement {
    key: Key,
    element: Element,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    harmony: Option<HarmonicInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    measure_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_signature: Option<u8>,
    beat_offset: QuarterLength,
}

/// One measure of analysed elements, in time order
pub type Measure = Vec<AnalyzedElement>;

/// One part (voice) as a sequence of measures
pub type Part = Vec<Measure>;

/// Fields to replace in [`AnalyzedElement::copy`]; unset fields are inherited
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementUpdate {
    key: Option<Key>,
    element: Option<Element>,
    measure_number: Option<u32>,
    time_signature: Option<u8>,
    beat_offset: Option<QuarterLength>,
}

impl ElementUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    pub fn element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn measure_number(mut self, measure_number: u32) -> Self {
        self.measure_number = Some(measure_number);
        self
    }

    pub fn time_signature(mut self, time_signature: u8) -> Self {
        self.time_signature = Some(time_signature);
        self
    }

    pub fn beat_offset(mut self, beat_offset: QuarterLength) -> Self {
        self.beat_offset = Some(beat_offset);
        self
    }
}

impl AnalyzedElement {
    /// Analyse `element` in `key` with the built-in diatonic analyzer
    pub fn new(
        key: Key,
        element: Element,
        measure_number: Option<u32>,
        time_signature: Option<u8>,
        beat_offset: QuarterLength,
    ) -> Self {
        Self::analyze_with(
            &DiatonicAnalyzer,
            key,
            element,
            measure_number,
            time_signature,
            beat_offset,
        )
    }

    pub fn analyze_with(
        analyzer: &dyn HarmonicAnalyzer,
        key: Key,
        element: Element,
        measure_number: Option<u32>,
        time_signature: Option<u8>,
        beat_offset: QuarterLength,
    ) -> Self {
        let harmony = analyzer.analyze(&element, &key);
        AnalyzedElement {
            key,
            element,
            harmony,
            measure_number,
            time_signature,
            beat_offset,
        }
    }

    /// Replace the harmonic analysis, e.g. with one from an external analyzer
    pub fn with_harmony(mut self, harmony: Option<HarmonicInfo>) -> Self {
        self.harmony = harmony;
        self
    }

    /// New element with the fields in `update` replaced.
    ///
    /// Analysis is kept when neither key nor element changes and is
    /// re-derived diatonically otherwise.
    pub fn copy(&self, update: ElementUpdate) -> Self {
        let reanalyze = update.key.is_some() || update.element.is_some();
        let key = update.key.unwrap_or(self.key);
        let element = update.element.unwrap_or_else(|| self.element.clone());
        let harmony = if reanalyze {
            DiatonicAnalyzer.analyze(&element, &key)
        } else {
            self.harmony.clone()
        };
        AnalyzedElement {
            key,
            element,
            harmony,
            measure_number: update.measure_number.or(self.measure_number),
            time_signature: update.time_signature.or(self.time_signature),
            beat_offset: update.beat_offset.unwrap_or(self.beat_offset),
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn harmony(&self) -> Option<&HarmonicInfo> {
        self.harmony.as_ref()
    }

    /// Element-level degree, `None` for rests or unanalysed elements
    pub fn roman(&self) -> Option<ScaleDegreeInfo> {
        self.harmony.as_ref().map(|h| h.degree)
    }

    pub fn measure_number(&self) -> Option<u32> {
        self.measure_number
    }

    pub fn time_signature(&self) -> Option<u8> {
        self.time_signature
    }

    /// Offset within the measure; the downbeat is 1
    pub fn beat_offset(&self) -> QuarterLength {
        self.beat_offset
    }

    pub fn duration(&self) -> QuarterLength {
        self.element.duration()
    }

    pub fn pitches(&self) -> Vec<Pitch> {
        self.element.pitches()
    }

    pub fn is_note(&self) -> bool {
        self.element.is_note()
    }

    pub fn is_chord(&self) -> bool {
        self.element.is_chord()
    }

    pub fn is_rest(&self) -> bool {
        self.element.is_rest()
    }
}
