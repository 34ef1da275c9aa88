//! Runtime configuration for the launcher host (`tvbox.toml`).
//!
//! This is the operator-facing layer: where settings are stored, how often
//! the clock ticks, and the column count of each grid. The user-facing
//! settings document (apps, banner, theme, clock) lives in the settings
//! store and is edited through the admin panel.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TvboxConfig {
    /// Directory backing the file settings store.
    pub data_dir: PathBuf,
    /// `env_logger` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Clock refresh period in milliseconds.
    pub clock_tick_ms: u64,
    /// Column counts per grid section.
    pub columns: ColumnsConfig,
}

impl Default for TvboxConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("tvbox-data"),
            log_filter: "info".to_string(),
            clock_tick_ms: 1000,
            columns: ColumnsConfig::default(),
        }
    }
}

/// Column counts for the three app grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub system: usize,
    pub entertainment: usize,
    pub music: usize,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            system: 6,
            entertainment: 3,
            music: 3,
        }
    }
}

impl TvboxConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = TvboxConfig::default();
        assert_eq!(c.clock_tick_ms, 1000);
        assert_eq!(c.columns.system, 6);
        assert_eq!(c.columns.entertainment, 3);
        assert_eq!(c.columns.music, 3);
        assert_eq!(c.log_filter, "info");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let toml = r#"
data_dir = "/var/lib/tvbox"

[columns]
music = 4
"#;
        let c = TvboxConfig::from_toml_str(toml).unwrap();
        assert_eq!(c.data_dir, PathBuf::from("/var/lib/tvbox"));
        assert_eq!(c.columns.music, 4);
        assert_eq!(c.columns.system, 6);
        assert_eq!(c.clock_tick_ms, 1000);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(TvboxConfig::from_toml_str("columns = [[[").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = TvboxConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(c, TvboxConfig::default());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tvbox.toml");
        std::fs::write(&path, "clock_tick_ms = 500\n").unwrap();
        let c = TvboxConfig::load(&path).unwrap();
        assert_eq!(c.clock_tick_ms, 500);
    }
}
