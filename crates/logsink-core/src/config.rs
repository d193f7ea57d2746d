//! Configuration for the file sink
//!
//! Supports multiple configuration file formats:
//! - TOML (.toml)
//! - YAML (.yaml, .yml)
//! - JSON (.json)
//!
//! Sink settings live under a `file` section:
//!
//! ```toml
//! [file]
//! app_name = "myapp"
//! level = "info"
//! max_size = 1048576
//! max_items = 4
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::{Error, Result};
use crate::types::{deserialize_threshold, serialize_threshold, Level};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

fn default_append() -> bool {
    true
}

/// How the active file is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOptions {
    /// Append to existing content; when false the file is truncated on open
    #[serde(default = "default_append")]
    pub append: bool,
    /// Unix permission bits applied when the file is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            append: true,
            mode: None,
        }
    }
}

/// Settings read by the sink on every write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Active log file; discovered from `app_name` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Application name used by platform log path discovery
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// Line template
    pub format: String,
    /// Archive postfix template
    pub archive_format: String,
    /// Severity threshold; `None` disables the sink
    #[serde(
        deserialize_with = "deserialize_threshold",
        serialize_with = "serialize_threshold"
    )]
    pub level: Option<Level>,
    /// Rotate once the active file exceeds this many bytes; `<= 0` disables rotation
    pub max_size: i64,
    /// Retention count, the archive created by a rotation included
    pub max_items: usize,
    pub stream: StreamOptions,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            file: None,
            app_name: None,
            format: DEFAULT_FORMAT.to_string(),
            archive_format: DEFAULT_ARCHIVE_FORMAT.to_string(),
            level: Some(Level::Warn),
            max_size: DEFAULT_MAX_SIZE,
            max_items: DEFAULT_MAX_ITEMS,
            stream: StreamOptions::default(),
        }
    }
}

impl SinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file<P: Into<PathBuf>>(mut self, file: P) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_app_name<S: Into<String>>(mut self, app_name: S) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_level(mut self, level: Option<Level>) -> Self {
        self.level = level;
        self
    }

    pub fn with_max_size(mut self, max_size: i64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_format<S: Into<String>>(mut self, format: S) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_archive_format<S: Into<String>>(mut self, archive_format: S) -> Self {
        self.archive_format = archive_format.into();
        self
    }

    /// Size threshold in bytes, or `None` when rotation is disabled
    pub fn rotation_threshold(&self) -> Option<u64> {
        u64::try_from(self.max_size).ok().filter(|size| *size > 0)
    }
}

/// Configuration file structure (logsink.toml/yaml/json)
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub file: SinkConfig,
}

impl ConfigFile {
    /// Load config from file, automatically detecting format from extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format =
            ConfigFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Parse config content with specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Toml => Self::from_toml(content),
            ConfigFormat::Yaml => Self::from_yaml(content),
            ConfigFormat::Json => Self::from_json(content),
        }
    }

    /// Parse TOML config content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ConfigFile = toml::from_str(content)?;
        Ok(config)
    }

    /// Parse YAML config content
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ConfigFile = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Parse JSON config content
    pub fn from_json(content: &str) -> Result<Self> {
        let config: ConfigFile = serde_json::from_str(content)?;
        Ok(config)
    }

    /// Find the first default config file in `dir`
    pub fn find(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Find and load config file from a directory
    pub fn find_and_load(dir: &Path) -> Result<(Self, PathBuf)> {
        let path = Self::find(dir).ok_or_else(|| {
            Error::ConfigError(format!(
                "No config file found in {}. Expected one of: {:?}",
                dir.display(),
                CONFIG_FILES
            ))
        })?;
        let config = Self::load(&path)?;
        Ok((config, path))
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::config(e.to_string()))
    }
}
