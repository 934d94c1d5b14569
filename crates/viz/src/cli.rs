//! Command line arguments and their merge with the config file.

use clap::{Parser, ValueEnum};
use rescue_client::{ClientConfig, ConfigError, DoorPlacement, RequestMethod};
use std::path::PathBuf;

/// Fire Rescue Viewer
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "viz")]
#[command(about = "Viewer for the fire rescue simulation server")]
pub struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Snapshot endpoint URL (overrides the config file)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// HTTP method for snapshot requests
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// World units per grid cell
    #[arg(long)]
    pub cell_size: Option<f32>,

    /// How door coordinates map to world positions
    #[arg(long, value_enum)]
    pub door_placement: Option<DoorPlacementArg>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Seconds between automatic refreshes (0 disables polling)
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Run without a window, logging each rebuild
    #[arg(long)]
    pub headless: bool,

    /// With --headless, run a single fetch and exit
    #[arg(long)]
    pub once: bool,

    /// With --headless, print each rebuild summary as a JSON line
    #[arg(long)]
    pub json: bool,

    /// Print the default config file and exit
    #[arg(long)]
    pub print_default_config: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodArg {
    Get,
    Post,
}

impl From<MethodArg> for RequestMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Get => RequestMethod::Get,
            MethodArg::Post => RequestMethod::Post,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorPlacementArg {
    Raw,
    Scaled,
}

impl From<DoorPlacementArg> for DoorPlacement {
    fn from(arg: DoorPlacementArg) -> Self {
        match arg {
            DoorPlacementArg::Raw => DoorPlacement::Raw,
            DoorPlacementArg::Scaled => DoorPlacement::Scaled,
        }
    }
}

impl Args {
    /// Loads the config file (or defaults) and applies flag overrides.
    pub fn resolve_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.server.endpoint = endpoint.clone();
        }
        if let Some(method) = self.method {
            config.server.method = method.into();
        }
        if let Some(timeout) = self.timeout {
            config.server.timeout_secs = timeout;
        }
        if let Some(poll_interval) = self.poll_interval {
            config.server.poll_interval_secs = poll_interval;
        }
        if let Some(cell_size) = self.cell_size {
            config.scene.cell_size = cell_size;
        }
        if let Some(door_placement) = self.door_placement {
            config.scene.door_placement = door_placement.into();
        }

        config.validate()?;
        Ok(config)
    }
}
