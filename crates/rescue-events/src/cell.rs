//! Cell codes carried in the snapshot grid.
//!
//! The viewer never spawns objects from these codes; fire markers come from
//! the snapshot's fire list. The codes are classified for summaries only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a raw grid cell value as the server emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellCode {
    /// 0: nothing in the cell.
    Empty,
    /// 1: smoke, or plain floor in older server builds.
    Smoke,
    /// 2: active fire.
    Fire,
    /// 3: a firefighter occupies the cell.
    Firefighter,
    /// 4: an unrevealed point of interest.
    PointOfInterest,
    /// Any other value.
    Unknown(i32),
}

impl CellCode {
    /// Classifies a raw cell value.
    pub fn from_raw(value: i32) -> Self {
        match value {
            0 => CellCode::Empty,
            1 => CellCode::Smoke,
            2 => CellCode::Fire,
            3 => CellCode::Firefighter,
            4 => CellCode::PointOfInterest,
            other => CellCode::Unknown(other),
        }
    }

    /// Returns the raw wire value.
    pub fn raw(&self) -> i32 {
        match self {
            CellCode::Empty => 0,
            CellCode::Smoke => 1,
            CellCode::Fire => 2,
            CellCode::Firefighter => 3,
            CellCode::PointOfInterest => 4,
            CellCode::Unknown(v) => *v,
        }
    }
}

impl From<i32> for CellCode {
    fn from(value: i32) -> Self {
        CellCode::from_raw(value)
    }
}

impl fmt::Display for CellCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellCode::Empty => write!(f, "empty"),
            CellCode::Smoke => write!(f, "smoke"),
            CellCode::Fire => write!(f, "fire"),
            CellCode::Firefighter => write!(f, "firefighter"),
            CellCode::PointOfInterest => write!(f, "point_of_interest"),
            CellCode::Unknown(v) => write!(f, "unknown({})", v),
        }
    }
}

/// Per-code tallies over a grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStats {
    pub rows: usize,
    /// Length of the longest row. Rows are not required to be equal.
    pub columns: usize,
    pub empty: usize,
    pub smoke: usize,
    pub fire: usize,
    pub firefighters: usize,
    pub points_of_interest: usize,
    pub unknown: usize,
}

impl GridStats {
    /// Tallies every cell of a row-major grid.
    pub fn from_grid(grid: &[Vec<i32>]) -> Self {
        let mut stats = GridStats {
            rows: grid.len(),
            columns: grid.iter().map(Vec::len).max().unwrap_or(0),
            ..Default::default()
        };

        for &value in grid.iter().flatten() {
            match CellCode::from_raw(value) {
                CellCode::Empty => stats.empty += 1,
                CellCode::Smoke => stats.smoke += 1,
                CellCode::Fire => stats.fire += 1,
                CellCode::Firefighter => stats.firefighters += 1,
                CellCode::PointOfInterest => stats.points_of_interest += 1,
                CellCode::Unknown(_) => stats.unknown += 1,
            }
        }

        stats
    }

    /// Total number of cells counted.
    pub fn total(&self) -> usize {
        self.empty
            + self.smoke
            + self.fire
            + self.firefighters
            + self.points_of_interest
            + self.unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_code_from_raw() {
        assert_eq!(CellCode::from_raw(0), CellCode::Empty);
        assert_eq!(CellCode::from_raw(2), CellCode::Fire);
        assert_eq!(CellCode::from_raw(4), CellCode::PointOfInterest);
        assert_eq!(CellCode::from_raw(-1), CellCode::Unknown(-1));
        assert_eq!(CellCode::from(9).raw(), 9);
    }

    #[test]
    fn test_cell_code_display() {
        assert_eq!(CellCode::Fire.to_string(), "fire");
        assert_eq!(CellCode::Unknown(7).to_string(), "unknown(7)");
    }

    #[test]
    fn test_grid_stats() {
        let grid = vec![vec![0, 1, 2], vec![2, 3, 4], vec![9]];
        let stats = GridStats::from_grid(&grid);

        assert_eq!(stats.rows, 3);
        assert_eq!(stats.columns, 3);
        assert_eq!(stats.fire, 2);
        assert_eq!(stats.firefighters, 1);
        assert_eq!(stats.points_of_interest, 1);
        assert_eq!(stats.unknown, 1);
        assert_eq!(stats.total(), 7);
    }

    #[test]
    fn test_grid_stats_empty() {
        let stats = GridStats::from_grid(&[]);
        assert_eq!(stats, GridStats::default());
    }
}
