//! Core types for logsink

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Record severity, most severe first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    Info,
    Verbose,
    Debug,
    Silly,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Verbose => "verbose",
            Level::Debug => "debug",
            Level::Silly => "silly",
        }
    }

    /// Whether a record at this level passes `threshold`
    ///
    /// A `None` threshold is the disabled sentinel and lets nothing through.
    pub fn passes(&self, threshold: Option<Level>) -> bool {
        threshold.map_or(false, |t| *self <= t)
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Warn
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "verbose" => Ok(Level::Verbose),
            "debug" => Ok(Level::Debug),
            "silly" => Ok(Level::Silly),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Threshold as written in config files: a level name, or `false` to disable.
#[derive(Deserialize)]
#[serde(untagged)]
enum ThresholdRepr {
    Enabled(bool),
    Level(Level),
}

/// Deserialize an `Option<Level>` threshold from `"info"`, `true` or `false`
pub fn deserialize_threshold<'de, D>(deserializer: D) -> std::result::Result<Option<Level>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ThresholdRepr::deserialize(deserializer)? {
        ThresholdRepr::Enabled(true) => Some(Level::default()),
        ThresholdRepr::Enabled(false) => None,
        ThresholdRepr::Level(level) => Some(level),
    })
}

/// Serialize an `Option<Level>` threshold, writing `false` for disabled
pub fn serialize_threshold<S>(threshold: &Option<Level>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match threshold {
        Some(level) => level.serialize(serializer),
        None => serializer.serialize_bool(false),
    }
}

/// A single log record handed to the sink
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub level: Level,
    /// Local wall-clock time the record was created
    pub timestamp: NaiveDateTime,
    /// Free-form payload; rendered into `{text}`
    #[serde(default)]
    pub payload: Vec<Value>,
}

impl Record {
    /// Create a record stamped with the current local time
    pub fn new(level: Level, payload: Vec<Value>) -> Self {
        Self {
            level,
            timestamp: Local::now().naive_local(),
            payload,
        }
    }

    /// Create a single-message record stamped with the current local time
    pub fn message<S: Into<String>>(level: Level, text: S) -> Self {
        Self::new(level, vec![Value::String(text.into())])
    }

    pub fn at(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Payload joined with single spaces: strings verbatim, anything else as JSON
    pub fn text(&self) -> String {
        self.payload
            .iter()
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
