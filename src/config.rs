//! Engine configuration
//!
//! Optional JSON file under the user config directory. Every field has a
//! default, so a missing file or a partial one is fine.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::colors::DEFAULT_PALETTE;
use crate::trends::Granularity;

/// Products shown before the rest collapse into one entry
pub const DEFAULT_TOP_N: usize = 10;

pub const DEFAULT_OTHER_LABEL: &str = "other";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_other_label() -> String {
    DEFAULT_OTHER_LABEL.to_string()
}

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Products kept verbatim in single-line product breakdowns
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Name of the merged tail category
    #[serde(default = "default_other_label")]
    pub other_label: String,

    /// Category colors, handed out in first-seen order
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    #[serde(default)]
    pub default_granularity: Granularity,

    /// Offset applied to timestamps that carry their own zone.
    /// `None` keeps them at the wall-clock time as written.
    #[serde(default)]
    pub timestamp_offset_minutes: Option<i32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            other_label: default_other_label(),
            palette: default_palette(),
            default_granularity: Granularity::default(),
            timestamp_offset_minutes: None,
        }
    }
}

impl EngineConfig {
    /// Default location: `<config dir>/sales-lens/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sales-lens").join("config.json"))
    }

    /// Load and validate a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the default location, if there is one
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".to_string()));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("palette must not be empty".to_string()));
        }
        if self.other_label.trim().is_empty() {
            return Err(ConfigError::Invalid("other_label must not be empty".to_string()));
        }
        if self.timestamp_offset().is_none() && self.timestamp_offset_minutes.is_some() {
            return Err(ConfigError::Invalid(
                "timestamp_offset_minutes must be within +/- 24 hours".to_string(),
            ));
        }
        Ok(())
    }

    /// Offset used when normalizing zoned timestamps
    pub fn timestamp_offset(&self) -> Option<FixedOffset> {
        self.timestamp_offset_minutes
            .and_then(|minutes| minutes.checked_mul(60))
            .and_then(FixedOffset::east_opt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.other_label, "other");
        assert_eq!(config.palette.len(), 20);
        assert_eq!(config.default_granularity, Granularity::Daily);
        assert!(config.timestamp_offset().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"top_n": 5, "default_granularity": "6h"}}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.default_granularity, Granularity::SixHour);
        assert_eq!(config.other_label, "other");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_validation_rejects_zero_top_n() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"top_n": 0}}"#).unwrap();
        assert!(matches!(
            EngineConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validation_rejects_empty_palette() {
        let config = EngineConfig {
            palette: Vec::new(),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(EngineConfig::load(file.path()), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_timestamp_offset() {
        let config = EngineConfig {
            timestamp_offset_minutes: Some(480),
            ..EngineConfig::default()
        };
        assert_eq!(config.timestamp_offset().unwrap().local_minus_utc(), 8 * 3600);

        let config = EngineConfig {
            timestamp_offset_minutes: Some(100_000),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
