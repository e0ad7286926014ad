//! Spelled triads and close-position voicing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pitch::{Pitch, PitchName};

/// Three spelled pitch names stacked in thirds, root first.
///
/// Equality is by spelling: `C-E-G` and `B#-E-G` are different triads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triad {
    pub root: PitchName,
    pub third: PitchName,
    pub fifth: PitchName,
}

impl Triad {
    pub const fn new(root: PitchName, third: PitchName, fifth: PitchName) -> Self {
        Triad { root, third, fifth }
    }

    pub fn tones(&self) -> [PitchName; 3] {
        [self.root, self.third, self.fifth]
    }

    /// Sounding pitches with the root in `octave` and each tone above the last
    pub fn voice(&self, octave: i8) -> Vec<Pitch> {
        voice_close(&self.tones(), octave)
    }
}

impl fmt::Display for Triad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.root, self.third, self.fifth)
    }
}

/// Stack `names` upward from the first one in `octave`, each pitch the
/// nearest one strictly above its predecessor.
pub fn voice_close(names: &[PitchName], octave: i8) -> Vec<Pitch> {
    let mut pitches: Vec<Pitch> = Vec::with_capacity(names.len());
    for name in names {
        let pitch = match pitches.last() {
            None => name.at_octave(octave),
            Some(below) => {
                let up = (name.pitch_class() as i16 - below.pitch_class() as i16).rem_euclid(12);
                let up = if up == 0 { 12 } else { up };
                below.transpose(up)
            }
        };
        pitches.push(pitch);
    }
    pitches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_c_major_tonic_voicing() {
        let triad = Key::major("C".parse().unwrap()).tonic_triad();
        assert_eq!(triad.to_string(), "C-E-G");
        let midi: Vec<i16> = triad.voice(4).iter().map(|p| p.midi()).collect();
        assert_eq!(midi, vec![60, 64, 67]);
    }

    #[test]
    fn test_voicing_wraps_above_previous() {
        let names: Vec<PitchName> = ["G", "B", "D", "F"].iter().map(|s| s.parse().unwrap()).collect();
        let midi: Vec<i16> = voice_close(&names, 4).iter().map(|p| p.midi()).collect();
        assert_eq!(midi, vec![67, 71, 74, 77]);
    }

    #[test]
    fn test_spelled_triads_differ_from_enharmonics() {
        let a = Triad::new("C".parse().unwrap(), "E".parse().unwrap(), "G".parse().unwrap());
        let b = Triad::new("B#".parse().unwrap(), "E".parse().unwrap(), "G".parse().unwrap());
        assert!(a != b);
    }
}
