//! Configuration loading for holdback.
//!
//! Configuration is loaded from a TOML file (default: `holdback.toml`).
//! Every field has a default, so an empty or missing file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "holdback.toml";

/// Root configuration for holdback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Event holder behaviour.
    #[serde(default)]
    pub holder: HolderConfig,
    /// Timeline output.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Feed ingestion.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Event holder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderConfig {
    /// Switch to queued mode once the initial load is visible (default: false).
    #[serde(default)]
    pub queue_after_initial_load: bool,
    /// Events admitted immediately before queueing starts (default: 50).
    #[serde(default = "default_initial_load")]
    pub initial_load: usize,
    /// Flush once this many events are queued; 0 flushes only at end of
    /// stream (default: 0).
    #[serde(default)]
    pub flush_every: usize,
}

/// Timeline output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Maximum timeline lines printed (default: 20).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Author pubkeys hidden from the timeline.
    #[serde(default)]
    pub muted: Vec<String>,
}

/// Feed ingestion configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Events buffered between feed readers and the holder (default: 256).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

// Default value functions
fn default_initial_load() -> usize {
    50
}

fn default_limit() -> usize {
    20
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for HolderConfig {
    fn default() -> Self {
        Self {
            queue_after_initial_load: false,
            initial_load: default_initial_load(),
            flush_every: 0,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            muted: Vec::new(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load `explicit` if given, else `holdback.toml` if present, else defaults.
    ///
    /// An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)
                } else {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// Failed to render configuration.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.holder.initial_load, 50);
        assert_eq!(config.display.limit, 20);
        assert_eq!(config.feed.channel_capacity, 256);
        assert!(!config.holder.queue_after_initial_load);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [holder]
            queue_after_initial_load = true
            flush_every = 5

            [display]
            muted = ["deadbeef"]
            "#,
        )
        .unwrap();

        assert!(config.holder.queue_after_initial_load);
        assert_eq!(config.holder.flush_every, 5);
        assert_eq!(config.holder.initial_load, 50);
        assert_eq!(config.display.muted, vec!["deadbeef".to_string()]);
        assert_eq!(config.display.limit, 20);
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("holdback.toml");
        std::fs::write(&path, "[display]\nlimit = 3\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.display.limit, 3);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn bad_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[holder\ninitial_load = ").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("typed.toml");
        std::fs::write(&path, "[holder]\ninitial_load = \"many\"\n").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn rendered_toml_parses_back() {
        let mut config = Config::default();
        config.holder.flush_every = 7;
        config.display.muted.push("abc".into());

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("flush_every = 7"));
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
