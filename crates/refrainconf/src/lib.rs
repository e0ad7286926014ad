//! Configuration loading for refrain.
//!
//! # Usage
//!
//! ```rust,no_run
//! use refrainconf::RefrainConfig;
//!
//! let config = RefrainConfig::load().expect("Failed to load config");
//! println!("default key: {}", config.defaults.key);
//! println!("cache capacity: {}", config.cache.capacity);
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/refrain/config.toml` (system)
//! 2. `~/.config/refrain/config.toml` (user)
//! 3. `./refrain.toml` (local override), or the `--config` path instead
//! 4. Environment variables (`REFRAIN_*`, plus `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [defaults]
//! key = "e- minor"
//! rhythm = "2,2,3,4"
//! beats_per_measure = 3
//!
//! [modulation]
//! seed = 7
//!
//! [cache]
//! capacity = 50
//!
//! [telemetry]
//! log_level = "debug"
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use sections::{CacheConfig, DefaultsConfig, ModulationConfig, TelemetryConfig};

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete refrain configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefrainConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub modulation: ModulationConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl RefrainConfig {
    /// Load configuration from all sources.
    ///
    /// Load order (later wins):
    /// 1. Compiled defaults
    /// 2. `/etc/refrain/config.toml`
    /// 3. `~/.config/refrain/config.toml`
    /// 4. `./refrain.toml`
    /// 5. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load with `config_path` in place of `./refrain.toml`.
    ///
    /// System and user configs still load first. A path that cannot be read
    /// is an error rather than being skipped.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration and report which files and variables applied.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = RefrainConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::load_into(&mut config, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Render as TOML, with unset optional values left as comments.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# refrain configuration\n\n");

        output.push_str("[defaults]\n");
        let _ = writeln!(output, "key = \"{}\"", self.defaults.key);
        match &self.defaults.rhythm {
            Some(rhythm) => {
                let _ = writeln!(output, "rhythm = \"{}\"", rhythm);
            }
            None => output.push_str("# rhythm = \"1,1,1,1\"\n"),
        }
        let _ = writeln!(
            output,
            "beats_per_measure = {}",
            self.defaults.beats_per_measure
        );

        output.push_str("\n[modulation]\n");
        match self.modulation.seed {
            Some(seed) => {
                let _ = writeln!(output, "seed = {}", seed);
            }
            None => output.push_str("# seed = 0\n"),
        }

        output.push_str("\n[cache]\n");
        let _ = writeln!(output, "capacity = {}", self.cache.capacity);

        output.push_str("\n[telemetry]\n");
        let _ = writeln!(output, "log_level = \"{}\"", self.telemetry.log_level);

        output
    }
}
