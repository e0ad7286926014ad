//! Config sections, one struct per TOML table.

use serde::{Deserialize, Serialize};

/// Values used when a command is not told otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Target key for `transform` when `--key` is absent.
    /// Default: "c major"
    #[serde(default = "DefaultsConfig::default_key")]
    pub key: String,

    /// Ostinato rhythm, four beat subdivisions such as "2,2,3,4".
    /// Default: unset, the score keeps its own rhythm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhythm: Option<String>,

    /// Meter used when packing modulation bridges.
    /// Default: 4
    #[serde(default = "DefaultsConfig::default_beats_per_measure")]
    pub beats_per_measure: u8,
}

impl DefaultsConfig {
    fn default_key() -> String {
        "c major".to_string()
    }

    fn default_beats_per_measure() -> u8 {
        4
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            key: Self::default_key(),
            rhythm: None,
            beats_per_measure: Self::default_beats_per_measure(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulationConfig {
    /// Seed for seventh-chord selection; unset draws from entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of memoized (key, rhythm) results.
    /// Default: 50
    #[serde(default = "CacheConfig::default_capacity")]
    pub capacity: usize,
}

impl CacheConfig {
    fn default_capacity() -> usize {
        50
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter directive (trace, debug, info, warn, error, or a full
    /// `RUST_LOG` style filter).
    /// Default: info
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}
