//! Configuration management.
//!
//! Configuration is read from `~/.config/brief/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::OrderKey;
use crate::scraper::ScraperConfig;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub playback: PlaybackConfig,
    pub batch: BatchConfig,
    pub scraper: ScraperConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file. Defaults to `<data dir>/brief/brief.db`.
    pub db_path: Option<PathBuf>,
    /// Order articles are renumbered in after a delete.
    pub item_order: OrderKey,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial playback speed for `read`.
    pub speed: f64,
    /// Text-to-speech program, invoked as `<cmd> --file <path> --speed <speed>`.
    pub tts_command: String,
    /// Program used by `open`. The system opener is used when unset.
    pub viewer: Option<String>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            tts_command: "tts".to_string(),
            viewer: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Deletes matching more rows than this ask for confirmation.
    pub confirm_threshold: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            confirm_threshold: 1,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, creating a commented default file there
    /// if it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::create_default_config(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/brief/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("brief").join("config.toml"))
    }

    /// Resolve the database path, creating its parent directory.
    pub fn db_path(&self) -> Result<PathBuf, ConfigError> {
        let path = match &self.store.db_path {
            Some(p) => p.clone(),
            None => dirs::data_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join("brief")
                .join("brief.db"),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        Ok(path)
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        r##"# brief configuration

[store]
# Database file (default: <data dir>/brief/brief.db)
# db_path = "/home/me/.local/share/brief/brief.db"

# Order articles are renumbered in after a delete:
# "id" keeps the existing order, "published" sorts oldest first
item_order = "id"

[playback]
# Initial speed for `article read`
speed = 1.0

# Text-to-speech program, called as: <tts_command> --file <path> --speed <speed>
tts_command = "tts"

# Program used by `article open` (default: system opener)
# viewer = "less"

[batch]
# Deleting more rows than this asks for confirmation
confirm_threshold = 1

[scraper]
# Page download timeout in seconds
timeout_secs = 30

# Extracted bodies shorter than this are treated as a failed extraction
min_body_length = 0
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl From<ConfigError> for crate::app::BriefError {
    fn from(e: ConfigError) -> Self {
        crate::app::BriefError::Config(e.to_string())
    }
}
