use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::errors::FlingError;

/// Global file-fling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where finished archives are saved (defaults to the Downloads folder)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Deflate level used for every entry (1-9)
    #[serde(default = "default_compression_level")]
    pub compression_level: i64,

    /// Prefix of generated archive names
    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,

    /// Longest edge of rendered preview thumbnails, in pixels
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,

    /// Output format preference
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

pub const DEFAULT_COMPRESSION_LEVEL: i64 = 6;
pub const DEFAULT_ARCHIVE_PREFIX: &str = "file-fling";

fn default_compression_level() -> i64 {
    DEFAULT_COMPRESSION_LEVEL
}
fn default_archive_prefix() -> String {
    DEFAULT_ARCHIVE_PREFIX.to_string()
}
fn default_thumbnail_size() -> u32 {
    128
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: None,
            compression_level: default_compression_level(),
            archive_prefix: default_archive_prefix(),
            thumbnail_size: default_thumbnail_size(),
            output_format: OutputFormat::Human,
        }
    }
}

impl Config {
    /// Get the file-fling data directory (~/.file-fling)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".file-fling")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Get the logs directory
    pub fn logs_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    /// Load config from file, or fall back to defaults if not present
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("Invalid config: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let path = Self::config_path();
        let dir = Self::data_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Initialize the data and logs directories
    pub fn init_dirs() -> Result<()> {
        for dir in [Self::data_dir(), Self::logs_dir()] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Resolve the directory archives are saved into
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Reject values the archive builder cannot honor
    pub fn validate(&self) -> std::result::Result<(), FlingError> {
        validate_compression_level(self.compression_level)?;
        validate_prefix(&self.archive_prefix)?;
        if self.thumbnail_size == 0 {
            return Err(FlingError::Config {
                message: "thumbnail_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Update a single key from its string form (used by `config set`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "output_dir" => self.output_dir = Some(PathBuf::from(value)),
            "compression_level" => {
                self.compression_level = value
                    .parse()
                    .with_context(|| format!("Not a number: {}", value))?
            }
            "archive_prefix" => self.archive_prefix = value.to_string(),
            "thumbnail_size" => {
                self.thumbnail_size = value
                    .parse()
                    .with_context(|| format!("Not a number: {}", value))?
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        self.validate()?;
        Ok(())
    }
}

/// Deflate levels run from 1 (fastest) to 9 (smallest)
pub fn validate_compression_level(level: i64) -> std::result::Result<(), FlingError> {
    if !(1..=9).contains(&level) {
        return Err(FlingError::Config {
            message: format!("compression_level must be between 1 and 9, got {}", level),
        });
    }
    Ok(())
}

/// Prefixes end up in file names, so they cannot be empty or contain separators
pub fn validate_prefix(prefix: &str) -> std::result::Result<(), FlingError> {
    if prefix.is_empty() || prefix.contains(['/', '\\']) {
        return Err(FlingError::Config {
            message: format!("archive_prefix is not a valid file name prefix: '{}'", prefix),
        });
    }
    Ok(())
}
