//! Snapshot Types
//!
//! Serialization structs for the simulation state served over HTTP.
//!
//! A snapshot captures the whole board at one simulation step: the cell grid,
//! the wall layer, door states and burning cells. The server wraps it in a
//! `{"model": ...}` envelope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{parse_door_key, parse_fire_position, GridCoord, GridStats, ParseCoordError};

/// Wall flag value marking a wall in `wall_grid`.
pub const WALL_PRESENT: i32 = 1;

/// Top-level response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    pub model: SimulationSnapshot,
}

/// Full simulation snapshot.
///
/// Every field is required when decoding. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub current_step: i64,
    /// Door status keyed by `"x,y"`. Ordered so rebuilds are deterministic.
    #[serde(rename = "door_data")]
    pub doors: BTreeMap<String, String>,
    #[serde(rename = "poi")]
    pub points_of_interest: i64,
    /// Opaque status code defined by the server.
    #[serde(rename = "simulation_status")]
    pub status: i64,
    pub survivor_losses: i64,
    #[serde(rename = "damage_tracker")]
    pub damage: i64,
    /// Row-major cell codes: `grid[y][x]`.
    pub grid: Vec<Vec<i32>>,
    /// Wall flags aligned with `grid`.
    #[serde(rename = "grid_walls")]
    pub wall_grid: Vec<Vec<i32>>,
    /// Burning cells as `"x y"`.
    #[serde(rename = "fire")]
    pub fires: Vec<String>,
}

impl SimulationSnapshot {
    /// Creates an empty snapshot at the given step.
    pub fn new(current_step: i64) -> Self {
        Self {
            current_step,
            ..Default::default()
        }
    }

    /// Sets the cell grid and wall layer.
    pub fn with_grid(mut self, grid: Vec<Vec<i32>>, wall_grid: Vec<Vec<i32>>) -> Self {
        self.grid = grid;
        self.wall_grid = wall_grid;
        self
    }

    /// Adds a door entry.
    pub fn with_door(mut self, key: impl Into<String>, status: impl Into<String>) -> Self {
        self.doors.insert(key.into(), status.into());
        self
    }

    /// Adds a fire entry.
    pub fn with_fire(mut self, position: impl Into<String>) -> Self {
        self.fires.push(position.into());
        self
    }

    /// Number of cells flagged as walls.
    pub fn wall_count(&self) -> usize {
        self.wall_grid
            .iter()
            .flatten()
            .filter(|&&flag| flag == WALL_PRESENT)
            .count()
    }

    /// Parses every door key, in key order.
    pub fn door_coords(&self) -> Result<Vec<(GridCoord, &str)>, ParseCoordError> {
        self.doors
            .iter()
            .map(|(key, status)| Ok((parse_door_key(key)?, status.as_str())))
            .collect()
    }

    /// Parses every fire entry, in list order.
    pub fn fire_coords(&self) -> Result<Vec<GridCoord>, ParseCoordError> {
        self.fires.iter().map(|p| parse_fire_position(p)).collect()
    }

    /// Tallies the cell codes of `grid`.
    pub fn grid_stats(&self) -> GridStats {
        GridStats::from_grid(&self.grid)
    }

    /// Decodes a snapshot from a full `{"model": ...}` response body.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<SnapshotEnvelope>(json).map(|envelope| envelope.model)
    }

    /// Decodes a snapshot from response bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice::<SnapshotEnvelope>(bytes).map(|envelope| envelope.model)
    }

    /// Serializes the snapshot wrapped in its envelope.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&SnapshotEnvelope {
            model: self.clone(),
        })
    }
}
