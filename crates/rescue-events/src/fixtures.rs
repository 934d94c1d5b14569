//! Sample data fixtures for testing.
//!
//! This module provides ready-made snapshots for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // rescue-events = { path = "../rescue-events", features = ["test-fixtures"] }
//!
//! use rescue_events::fixtures;
//!
//! let body = fixtures::sample_snapshot_json();
//! let snapshot = fixtures::sample_snapshot();
//! ```

use crate::SimulationSnapshot;

/// Walls in the sample snapshot: the outer ring of an 8x6 board.
pub const SAMPLE_WALLS: usize = 24;
/// Doors in the sample snapshot.
pub const SAMPLE_DOORS: usize = 4;
/// Fire entries in the sample snapshot.
pub const SAMPLE_FIRES: usize = 4;

/// Returns the raw response body of the sample snapshot.
pub fn sample_snapshot_json() -> &'static str {
    include_str!("../tests/fixtures/sample_snapshot.json")
}

/// Returns the sample snapshot, decoded.
///
/// Contains:
/// - an 8x6 grid with 4 fire-coded cells, 2 firefighters and 2 points of interest
/// - 24 walls around the border
/// - 4 doors (2 open, 2 closed)
/// - 4 fire entries matching the fire-coded cells
pub fn sample_snapshot() -> SimulationSnapshot {
    SimulationSnapshot::from_json(sample_snapshot_json())
        .expect("Failed to parse sample_snapshot.json")
}

/// The 2x2 board with a single wall at column 1, row 0.
pub fn single_wall_snapshot() -> SimulationSnapshot {
    SimulationSnapshot::new(1).with_grid(
        vec![vec![1, 1], vec![1, 1]],
        vec![vec![0, 1], vec![0, 0]],
    )
}

/// A snapshot whose only door key has no comma.
pub fn malformed_door_snapshot() -> SimulationSnapshot {
    SimulationSnapshot::new(1).with_door("3", "open")
}
