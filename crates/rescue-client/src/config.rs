//! Configuration loading for the snapshot client.
//!
//! All client settings are loaded from a TOML configuration file. Every
//! section is optional and falls back to its defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Simulation server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Scene placement settings
    #[serde(default)]
    pub scene: SceneConfig,
    /// Visual templates per object kind
    #[serde(default)]
    pub prefabs: PrefabSet,
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("server.endpoint must not be empty".into()));
        }
        if self.server.timeout_secs == 0 {
            return Err(ConfigError::Invalid("server.timeout_secs must be at least 1".into()));
        }
        if !self.scene.cell_size.is_finite() || self.scene.cell_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scene.cell_size must be a positive number, got {}",
                self.scene.cell_size
            )));
        }
        Ok(())
    }
}

/// Simulation server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// URL of the snapshot endpoint
    pub endpoint: String,
    /// HTTP method used to request a snapshot
    pub method: RequestMethod,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Seconds between automatic refreshes, 0 disables polling
    pub poll_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8585".into(),
            method: RequestMethod::Get,
            timeout_secs: 10,
            poll_interval_secs: 0,
        }
    }
}

impl ServerConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Poll interval, or `None` when polling is disabled.
    pub fn poll_interval(&self) -> Option<Duration> {
        (self.poll_interval_secs > 0).then(|| Duration::from_secs(self.poll_interval_secs))
    }
}

/// HTTP method for snapshot requests.
///
/// The bundled Python server only returns snapshot data on POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
}

/// Scene placement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// World units per grid cell
    pub cell_size: f32,
    /// How door coordinates map to world positions
    pub door_placement: DoorPlacement,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            door_placement: DoorPlacement::Raw,
        }
    }
}

/// How door keys are turned into world positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DoorPlacement {
    /// Door coordinates are used as world units directly, ignoring the cell
    /// size. Matches what existing server/viewer pairs expect.
    #[default]
    Raw,
    /// Door coordinates are scaled by the cell size like walls and fires.
    Scaled,
}

/// Visual template identifiers handed to the rendering host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefabSet {
    pub door: String,
    pub wall: String,
    /// Snapshots only carry a point-of-interest count, so the rebuild never
    /// places this template. Hosts may use it for their own overlays.
    pub point_of_interest: String,
    pub fire: String,
}

impl Default for PrefabSet {
    fn default() -> Self {
        Self {
            door: "door".into(),
            wall: "wall".into(),
            point_of_interest: "poi".into(),
            fire: "fire".into(),
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    /// Error serializing TOML config
    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
    /// A value parsed but is unusable
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Returns a commented default configuration file.
pub fn default_config_toml() -> String {
    r#"# Fire Rescue Viewer Configuration

[server]
# Snapshot endpoint of the simulation server
endpoint = "http://localhost:8585"
# "get" or "post"
method = "get"
timeout_secs = 10
# 0 disables automatic refresh
poll_interval_secs = 0

[scene]
cell_size = 1.0
# "raw" places doors at unscaled grid coordinates, "scaled" multiplies by cell_size
door_placement = "raw"

[prefabs]
door = "door"
wall = "wall"
point_of_interest = "poi"
fire = "fire"
"#
    .to_string()
}
