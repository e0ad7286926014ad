//! Semitone corrections for moving scale degrees between major and minor.

use std::sync::OnceLock;

use notation::KeyMode;

static TABLE: OnceLock<CorrectionTable> = OnceLock::new();

/// Per mode pair, the semitone shift to apply to degrees 2-7.
///
/// Each entry is `sum_target(degree) - sum_source(degree)`, where `sum` is
/// the cumulative diatonic step size from the tonic up to that degree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionTable {
    corrections: [[[i16; 6]; 2]; 2],
}

impl CorrectionTable {
    pub fn build() -> Self {
        let sums = |mode: KeyMode| -> [i16; 7] {
            let steps: [i16; 7] = match mode {
                KeyMode::Major => [2, 2, 1, 2, 2, 2, 1],
                KeyMode::Minor => [2, 1, 2, 2, 1, 2, 2],
            };
            let mut sums = [0i16; 7];
            for degree in 1..7 {
                sums[degree] = sums[degree - 1] + steps[degree - 1];
            }
            sums
        };

        let mut corrections = [[[0i16; 6]; 2]; 2];
        for from in KeyMode::ALL {
            for to in KeyMode::ALL {
                let (source, target) = (sums(from), sums(to));
                for degree in 2..=7 {
                    corrections[from as usize][to as usize][degree - 2] =
                        target[degree - 1] - source[degree - 1];
                }
            }
        }
        CorrectionTable { corrections }
    }

    /// Process-wide table, built on first use
    pub fn shared() -> &'static CorrectionTable {
        TABLE.get_or_init(Self::build)
    }

    /// Shift for `degree` moving from `from` to `to`; degree 1 never moves
    pub fn correction(&self, from: KeyMode, to: KeyMode, degree: u8) -> i16 {
        match degree {
            2..=7 => self.corrections[from as usize][to as usize][degree as usize - 2],
            _ => 0,
        }
    }
}
