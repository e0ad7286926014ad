//! JSON score documents and their analysis into parts of measures.

use num_rational::Rational32;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{DiatonicAnalyzer, HarmonicAnalyzer};
use crate::analyzed::{AnalyzedElement, Part};
use crate::element::Element;
use crate::error::{NotationError, Result};
use crate::key::Key;

fn default_time_signature() -> u8 {
    4
}

/// Score as exchanged on disk: one key, one meter, parts of measures of elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDocument {
    pub key: Key,
    /// Beats per measure
    #[serde(default = "default_time_signature")]
    pub time_signature: u8,
    pub parts: Vec<Vec<Vec<Element>>>,
}

impl ScoreDocument {
    /// Analyse with the built-in diatonic analyzer
    pub fn analyze(&self) -> Result<Vec<Part>> {
        self.analyze_with(&DiatonicAnalyzer)
    }

    /// Place every element in the score's key and meter.
    ///
    /// Measures are numbered from 1 and beat offsets start at 1 on each
    /// downbeat, advancing by each element's duration.
    pub fn analyze_with(&self, analyzer: &dyn HarmonicAnalyzer) -> Result<Vec<Part>> {
        if self.time_signature == 0 {
            return Err(NotationError::InvalidTimeSignature);
        }
        let parts = self
            .parts
            .iter()
            .map(|measures| {
                measures
                    .iter()
                    .enumerate()
                    .map(|(index, elements)| {
                        let number = index as u32 + 1;
                        let mut offset = Rational32::from_integer(1);
                        elements
                            .iter()
                            .map(|element| {
                                element.validate()?;
                                let analyzed = AnalyzedElement::analyze_with(
                                    analyzer,
                                    self.key,
                                    element.clone(),
                                    Some(number),
                                    Some(self.time_signature),
                                    offset,
                                );
                                offset += element.duration();
                                Ok(analyzed)
                            })
                            .collect::<Result<Vec<_>>>()
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(key = %self.key, parts = parts.len(), "analysed score");
        Ok(parts)
    }

    /// Strip analysis back off; key and meter are taken from the first element
    pub fn from_parts(parts: &[Part]) -> Option<ScoreDocument> {
        let first = parts.iter().flatten().flatten().next()?;
        Some(ScoreDocument {
            key: *first.key(),
            time_signature: first.time_signature().unwrap_or_else(default_time_signature),
            parts: parts
                .iter()
                .map(|part| {
                    part.iter()
                        .map(|measure| measure.iter().map(|e| e.element().clone()).collect())
                        .collect()
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::Pitch;
    use pretty_assertions::assert_eq;

    const SCORE: &str = r#"{
        "key": "g major",
        "parts": [[
            [
                {"type": "note", "pitch": 67, "duration": [1, 1]},
                {"type": "rest", "duration": [1, 2]},
                {"type": "note", "pitch": 71, "duration": [1, 2]},
                {"type": "chord", "pitches": [62, 66, 69], "duration": [2, 1]}
            ],
            [
                {"type": "note", "pitch": 67, "duration": [4, 1]}
            ]
        ]]
    }"#;

    #[test]
    fn test_analyze_assigns_offsets_and_measures() {
        let doc: ScoreDocument = serde_json::from_str(SCORE).unwrap();
        assert_eq!(doc.time_signature, 4);
        let parts = doc.analyze().unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].len(), 2);

        let offsets: Vec<Rational32> = parts[0][0].iter().map(|e| e.beat_offset()).collect();
        assert_eq!(
            offsets,
            vec![
                Rational32::from_integer(1),
                Rational32::from_integer(2),
                Rational32::new(5, 2),
                Rational32::from_integer(3),
            ]
        );
        assert_eq!(parts[0][1][0].measure_number(), Some(2));
        assert_eq!(parts[0][1][0].beat_offset(), Rational32::from_integer(1));
        assert_eq!(parts[0][0][3].roman().map(|d| d.degree), Some(5));
    }

    #[test]
    fn test_analyze_rejects_bad_elements() {
        let doc = ScoreDocument {
            key: Key::default(),
            time_signature: 4,
            parts: vec![vec![vec![Element::note(Pitch::from_midi(60), Rational32::from_integer(0))]]],
        };
        assert!(matches!(doc.analyze(), Err(NotationError::NonPositiveDuration(_))));
    }

    #[test]
    fn test_from_parts_strips_analysis() {
        let doc: ScoreDocument = serde_json::from_str(SCORE).unwrap();
        let parts = doc.analyze().unwrap();
        assert_eq!(ScoreDocument::from_parts(&parts), Some(doc));
        assert_eq!(ScoreDocument::from_parts(&[]), None);
    }
}
