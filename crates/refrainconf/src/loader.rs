//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, RefrainConfig};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local). System, user and
/// local files are only returned when they exist; a `cli_path` is always
/// returned so that a missing file surfaces as an error.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/refrain/config.toml");
    if system.exists() {
        files.push(system);
    }

    // XDG_CONFIG_HOME or ~/.config
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("refrain/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    let local = PathBuf::from("refrain.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read `path` and layer the values it sets over `config`.
pub fn load_into(config: &mut RefrainConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    apply_toml(config, &contents, path)
}

/// Layer the values set in a TOML document over `config`.
///
/// Keys absent from the document leave `config` untouched, so files can be
/// applied one after another. Unknown keys are ignored; known keys with
/// the wrong type are errors.
fn apply_toml(config: &mut RefrainConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let invalid = |key: &str, expected: &str| ConfigError::Parse {
        path: path.to_path_buf(),
        message: format!("{} must be {}", key, expected),
    };

    if let Some(defaults) = table.get("defaults").and_then(|v| v.as_table()) {
        if let Some(v) = defaults.get("key") {
            config.defaults.key = v
                .as_str()
                .ok_or_else(|| invalid("defaults.key", "a string"))?
                .to_string();
        }
        if let Some(v) = defaults.get("rhythm") {
            config.defaults.rhythm = Some(
                v.as_str()
                    .ok_or_else(|| invalid("defaults.rhythm", "a string"))?
                    .to_string(),
            );
        }
        if let Some(v) = defaults.get("beats_per_measure") {
            config.defaults.beats_per_measure = v
                .as_integer()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| invalid("defaults.beats_per_measure", "an integer from 0 to 255"))?;
        }
    }

    if let Some(modulation) = table.get("modulation").and_then(|v| v.as_table()) {
        if let Some(v) = modulation.get("seed") {
            let seed = v
                .as_integer()
                .and_then(|n| u64::try_from(n).ok())
                .ok_or_else(|| invalid("modulation.seed", "a non-negative integer"))?;
            config.modulation.seed = Some(seed);
        }
    }

    if let Some(cache) = table.get("cache").and_then(|v| v.as_table()) {
        if let Some(v) = cache.get("capacity") {
            config.cache.capacity = v
                .as_integer()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| invalid("cache.capacity", "a non-negative integer"))?;
        }
    }

    if let Some(telemetry) = table.get("telemetry").and_then(|v| v.as_table()) {
        if let Some(v) = telemetry.get("log_level") {
            config.telemetry.log_level = v
                .as_str()
                .ok_or_else(|| invalid("telemetry.log_level", "a string"))?
                .to_string();
        }
    }

    Ok(())
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut RefrainConfig, sources: &mut ConfigSources) {
    apply_overrides_from(config, sources, |name| env::var(name).ok());
}

/// Overrides read through `lookup`; values that fail to parse are skipped.
fn apply_overrides_from(
    config: &mut RefrainConfig,
    sources: &mut ConfigSources,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("REFRAIN_KEY") {
        config.defaults.key = v;
        sources.env_overrides.push("REFRAIN_KEY".to_string());
    }
    if let Some(v) = lookup("REFRAIN_RHYTHM") {
        config.defaults.rhythm = Some(v);
        sources.env_overrides.push("REFRAIN_RHYTHM".to_string());
    }
    if let Some(v) = lookup("REFRAIN_BEATS_PER_MEASURE") {
        if let Ok(beats) = v.parse() {
            config.defaults.beats_per_measure = beats;
            sources.env_overrides.push("REFRAIN_BEATS_PER_MEASURE".to_string());
        }
    }
    if let Some(v) = lookup("REFRAIN_SEED") {
        if let Ok(seed) = v.parse() {
            config.modulation.seed = Some(seed);
            sources.env_overrides.push("REFRAIN_SEED".to_string());
        }
    }
    if let Some(v) = lookup("REFRAIN_CACHE_CAPACITY") {
        if let Ok(capacity) = v.parse() {
            config.cache.capacity = capacity;
            sources.env_overrides.push("REFRAIN_CACHE_CAPACITY".to_string());
        }
    }

    if let Some(v) = lookup("REFRAIN_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("REFRAIN_LOG_LEVEL".to_string());
    }
    // RUST_LOG wins over everything else
    if let Some(v) = lookup("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn parse(contents: &str) -> Result<RefrainConfig, ConfigError> {
        let mut config = RefrainConfig::default();
        apply_toml(&mut config, contents, Path::new("test.toml"))?;
        Ok(config)
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = parse("[defaults]\nkey = \"a minor\"\n").unwrap();
        assert_eq!(config.defaults.key, "a minor");
        // everything else keeps its default
        assert_eq!(config.defaults.beats_per_measure, 4);
        assert_eq!(config.cache.capacity, 50);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
[defaults]
key = "e- minor"
rhythm = "2,2,3,4"
beats_per_measure = 3

[modulation]
seed = 42

[cache]
capacity = 8

[telemetry]
log_level = "debug"
"#;
        let config = parse(toml).unwrap();
        assert_eq!(config.defaults.key, "e- minor");
        assert_eq!(config.defaults.rhythm.as_deref(), Some("2,2,3,4"));
        assert_eq!(config.defaults.beats_per_measure, 3);
        assert_eq!(config.modulation.seed, Some(42));
        assert_eq!(config.cache.capacity, 8);
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = parse("[cache]\ncapacity = \"lots\"\n").unwrap_err();
        match err {
            ConfigError::Parse { message, .. } => assert!(message.contains("cache.capacity")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(parse("[modulation]\nseed = -1\n").is_err());
        assert!(parse("not = [valid").is_err());
    }

    #[test]
    fn test_later_files_layer_over_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.toml");
        let local = dir.path().join("local.toml");
        std::fs::File::create(&base)
            .unwrap()
            .write_all(b"[defaults]\nkey = \"d major\"\nbeats_per_measure = 6\n")
            .unwrap();
        std::fs::File::create(&local)
            .unwrap()
            .write_all(b"[defaults]\nkey = \"b minor\"\n")
            .unwrap();

        let mut config = RefrainConfig::default();
        load_into(&mut config, &base).unwrap();
        load_into(&mut config, &local).unwrap();
        assert_eq!(config.defaults.key, "b minor");
        assert_eq!(config.defaults.beats_per_measure, 6);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let mut config = RefrainConfig::default();
        assert!(matches!(
            load_into(&mut config, &missing),
            Err(ConfigError::FileRead { .. })
        ));
    }

    #[test]
    fn test_cli_path_replaces_local_override() {
        let path = Path::new("/definitely/not/here.toml");
        let files = discover_config_files_with_override(Some(path));
        assert_eq!(files.last().map(PathBuf::as_path), Some(path));
        assert!(!files.iter().any(|f| f == Path::new("refrain.toml")));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("REFRAIN_KEY", "f# minor"),
            ("REFRAIN_SEED", "9"),
            ("REFRAIN_CACHE_CAPACITY", "not a number"),
            ("REFRAIN_LOG_LEVEL", "warn"),
            ("RUST_LOG", "modulation=trace"),
        ]);
        let mut config = RefrainConfig::default();
        let mut sources = ConfigSources::default();
        apply_overrides_from(&mut config, &mut sources, |name| {
            vars.get(name).map(|v| v.to_string())
        });

        assert_eq!(config.defaults.key, "f# minor");
        assert_eq!(config.modulation.seed, Some(9));
        assert_eq!(config.cache.capacity, 50);
        assert_eq!(config.telemetry.log_level, "modulation=trace");
        assert_eq!(
            sources.env_overrides,
            vec!["REFRAIN_KEY", "REFRAIN_SEED", "REFRAIN_LOG_LEVEL", "RUST_LOG"]
        );
    }
}
