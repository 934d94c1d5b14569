//! Shared snapshot types for the fire rescue viewer.
//!
//! This crate contains pure data structures with no networking or rendering
//! logic. It is a dependency for all other crates in the workspace.

pub mod cell;
pub mod coords;
pub mod snapshot;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export coordinate types
pub use coords::{parse_door_key, parse_fire_position, GridCoord, ParseCoordError};

// Re-export cell types
pub use cell::{CellCode, GridStats};

// Re-export snapshot types
pub use snapshot::{SimulationSnapshot, SnapshotEnvelope};
