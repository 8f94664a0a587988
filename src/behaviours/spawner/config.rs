//! Spawner configuration
//!
//! Configs are plain serde data and can be loaded from RON or JSON.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ecs::Prefab;

/// Construction-time options shared by both spawner variants.
///
/// The prewarm and retention options only matter for the pooled variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Template every spawned item is created from
    pub template: Option<Prefab>,
    /// Seconds between spawns, must be positive
    pub spawn_interval_seconds: f32,
    /// Create `prewarm_count` idle items when the spawner starts up
    pub prewarm_on_init: bool,
    /// Number of items created by prewarming
    pub prewarm_count: usize,
    /// Idle items kept for reuse; releases beyond this destroy the item
    pub max_retained_count: usize,
    /// Begin spawning as soon as the spawner starts up
    pub start_on_init: bool,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            template: None,
            spawn_interval_seconds: 1.0,
            prewarm_on_init: false,
            prewarm_count: 50,
            max_retained_count: 300,
            start_on_init: false,
        }
    }
}

impl SpawnerConfig {
    /// Config spawning `template` every `interval` seconds, other options default
    #[must_use]
    pub fn new(template: Prefab, interval: f32) -> Self {
        Self {
            template: Some(template),
            spawn_interval_seconds: interval,
            ..Default::default()
        }
    }

    /// Prewarm `count` idle items on init
    #[must_use]
    pub fn with_prewarm(mut self, count: usize) -> Self {
        self.prewarm_on_init = true;
        self.prewarm_count = count;
        self
    }

    /// Set the maximum number of idle items kept
    #[must_use]
    pub fn with_max_retained(mut self, count: usize) -> Self {
        self.max_retained_count = count;
        self
    }

    /// Start spawning on init
    #[must_use]
    pub fn with_start_on_init(mut self, start: bool) -> Self {
        self.start_on_init = start;
        self
    }

    /// Check the options a spawner cannot run without
    ///
    /// # Errors
    ///
    /// Returns an error if the template is missing or the interval is not a
    /// positive number of seconds that fits in a `Duration` and is at least
    /// one microsecond
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.template.is_none() {
            return Err(ConfigError::MissingTemplate);
        }
        interval_duration(self.spawn_interval_seconds).map(|_| ())
    }

    /// Spawn interval as a `Duration`, if valid
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        interval_duration(self.spawn_interval_seconds).ok()
    }

    /// Parse a config from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }
}

/// Convert seconds to a whole number of microseconds.
///
/// Rounding keeps decimal intervals such as `0.1` on exact frame
/// boundaries instead of a nanosecond past them.
fn interval_duration(seconds: f32) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidInterval(seconds);
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(invalid());
    }
    let exact = Duration::try_from_secs_f32(seconds).map_err(|_| invalid())?;
    let micros = u64::try_from((exact.as_nanos() + 500) / 1_000).map_err(|_| invalid())?;
    if micros == 0 {
        return Err(invalid());
    }
    Ok(Duration::from_micros(micros))
}

/// Errors from loading or validating a spawner config
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Deserialization error
    DeserializeError(String),
    /// No template to spawn from
    MissingTemplate,
    /// Spawn interval is not a positive number of seconds
    InvalidInterval(f32),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::MissingTemplate => write!(f, "no template to spawn"),
            Self::InvalidInterval(s) => {
                write!(f, "spawn interval must be positive, got {s} seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
