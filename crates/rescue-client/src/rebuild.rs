//! Snapshot to scene conversion.
//!
//! A rebuild runs in two phases: every object is planned from the snapshot
//! first, and only a fully planned scene replaces the contents of the
//! [`SceneRoot`]. A snapshot with a malformed coordinate therefore leaves the
//! previous scene untouched.

use rescue_events::snapshot::WALL_PRESENT;
use rescue_events::{GridCoord, GridStats, ParseCoordError, SimulationSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ClientConfig, DoorPlacement, PrefabSet};
use crate::scene::{ObjectKind, SceneObject, SceneRoot, WorldPosition};

/// Placement rules applied to every snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    /// World units per grid cell.
    pub cell_size: f32,
    pub door_placement: DoorPlacement,
    pub prefabs: PrefabSet,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            door_placement: DoorPlacement::Raw,
            prefabs: PrefabSet::default(),
        }
    }
}

impl SceneLayout {
    /// Builds a layout from the scene and prefab sections of a config.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            cell_size: config.scene.cell_size,
            door_placement: config.scene.door_placement,
            prefabs: config.prefabs.clone(),
        }
    }

    /// Sets the cell size. Values that are not finite and positive are
    /// rejected when planning.
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Sets the door placement mode.
    pub fn with_door_placement(mut self, door_placement: DoorPlacement) -> Self {
        self.door_placement = door_placement;
        self
    }

    /// World position of a wall or fire at `cell`.
    pub fn cell_position(&self, cell: GridCoord) -> WorldPosition {
        WorldPosition::on_ground(cell, self.cell_size)
    }

    /// World position of a door at `cell`.
    pub fn door_position(&self, cell: GridCoord) -> WorldPosition {
        match self.door_placement {
            DoorPlacement::Raw => WorldPosition::on_ground(cell, 1.0),
            DoorPlacement::Scaled => self.cell_position(cell),
        }
    }

    fn prefab(&self, kind: ObjectKind) -> &str {
        match kind {
            ObjectKind::Wall => &self.prefabs.wall,
            ObjectKind::Door => &self.prefabs.door,
            ObjectKind::Fire => &self.prefabs.fire,
        }
    }

    fn object(&self, kind: ObjectKind, cell: GridCoord, position: WorldPosition) -> SceneObject {
        SceneObject {
            kind,
            prefab: self.prefab(kind).to_string(),
            cell,
            position,
            status: None,
        }
    }

    /// Plans every object for `snapshot` without touching any scene.
    ///
    /// Order is walls (row-major), then doors (by key), then fires (list
    /// order).
    pub fn plan(&self, snapshot: &SimulationSnapshot) -> Result<Vec<SceneObject>, RebuildError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(RebuildError::InvalidCellSize(self.cell_size));
        }

        let mut objects = Vec::new();

        // Grid walk. Cell codes themselves spawn nothing.
        for (y, row) in snapshot.grid.iter().enumerate() {
            let wall_row = snapshot
                .wall_grid
                .get(y)
                .ok_or(RebuildError::MissingWallRow {
                    row: y,
                    wall_rows: snapshot.wall_grid.len(),
                })?;

            if wall_row.len() < row.len() {
                return Err(RebuildError::ShortWallRow {
                    row: y,
                    grid_columns: row.len(),
                    wall_columns: wall_row.len(),
                });
            }

            for (x, &flag) in wall_row.iter().take(row.len()).enumerate() {
                if flag == WALL_PRESENT {
                    let cell = GridCoord::new(x as i32, y as i32);
                    objects.push(self.object(ObjectKind::Wall, cell, self.cell_position(cell)));
                }
            }
        }

        for (cell, status) in snapshot.door_coords().map_err(RebuildError::DoorKey)? {
            let mut door = self.object(ObjectKind::Door, cell, self.door_position(cell));
            door.status = Some(status.to_string());
            objects.push(door);
        }

        for cell in snapshot.fire_coords().map_err(RebuildError::FirePosition)? {
            objects.push(self.object(ObjectKind::Fire, cell, self.cell_position(cell)));
        }

        Ok(objects)
    }
}

/// Errors that make a snapshot impossible to place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RebuildError {
    #[error("cell size must be finite and positive, got {0}")]
    InvalidCellSize(f32),
    #[error("bad door key: {0}")]
    DoorKey(ParseCoordError),
    #[error("bad fire position: {0}")]
    FirePosition(ParseCoordError),
    #[error("wall grid has {wall_rows} rows, grid row {row} has no wall row")]
    MissingWallRow { row: usize, wall_rows: usize },
    #[error("wall grid row {row} has {wall_columns} columns, grid row has {grid_columns}")]
    ShortWallRow {
        row: usize,
        grid_columns: usize,
        wall_columns: usize,
    },
}

/// Outcome of a successful rebuild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RebuildSummary {
    pub current_step: i64,
    pub status: i64,
    pub damage: i64,
    pub survivor_losses: i64,
    pub points_of_interest: i64,
    pub walls: usize,
    pub doors: usize,
    pub fires: usize,
    /// Objects released from the previous scene.
    pub released: usize,
    /// Cell code tallies of the snapshot grid.
    pub grid: GridStats,
}

impl RebuildSummary {
    /// Objects created by the rebuild.
    pub fn total_objects(&self) -> usize {
        self.walls + self.doors + self.fires
    }

    /// True when the grid's fire-coded cells disagree with the fire list.
    pub fn fire_layers_disagree(&self) -> bool {
        self.grid.fire != self.fires
    }
}

/// Replaces the contents of `root` with the objects derived from `snapshot`.
///
/// On error `root` is not modified.
pub fn rebuild_scene(
    root: &mut SceneRoot,
    layout: &SceneLayout,
    snapshot: &SimulationSnapshot,
) -> Result<RebuildSummary, RebuildError> {
    let objects = layout.plan(snapshot)?;

    let count = |kind: ObjectKind| objects.iter().filter(|o| o.kind == kind).count();
    let mut summary = RebuildSummary {
        current_step: snapshot.current_step,
        status: snapshot.status,
        damage: snapshot.damage,
        survivor_losses: snapshot.survivor_losses,
        points_of_interest: snapshot.points_of_interest,
        walls: count(ObjectKind::Wall),
        doors: count(ObjectKind::Door),
        fires: count(ObjectKind::Fire),
        released: 0,
        grid: snapshot.grid_stats(),
    };

    summary.released = root.replace_all(objects);

    if summary.fire_layers_disagree() {
        tracing::debug!(
            "Grid marks {} fire cells but the fire list has {} entries",
            summary.grid.fire,
            summary.fires
        );
    }

    tracing::debug!(
        "Rebuilt scene: {} walls, {} doors, {} fires ({} released)",
        summary.walls,
        summary.doors,
        summary.fires,
        summary.released
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_events::fixtures;

    fn positions(root: &SceneRoot, kind: ObjectKind) -> Vec<WorldPosition> {
        root.objects_of(kind).map(|o| o.position).collect()
    }

    #[test]
    fn test_single_wall_position() {
        let mut root = SceneRoot::new();
        let layout = SceneLayout::default().with_cell_size(2.0);

        rebuild_scene(&mut root, &layout, &fixtures::single_wall_snapshot()).unwrap();

        assert_eq!(root.len(), 1);
        assert_eq!(
            positions(&root, ObjectKind::Wall),
            vec![WorldPosition::new(2.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn test_raw_door_ignores_cell_size() {
        let mut root = SceneRoot::new();
        let layout = SceneLayout::default().with_cell_size(3.0);
        let snapshot = SimulationSnapshot::new(1).with_door("3,4", "open");

        rebuild_scene(&mut root, &layout, &snapshot).unwrap();

        assert_eq!(root.len(), 1);
        let door = root.objects_of(ObjectKind::Door).next().unwrap();
        assert_eq!(door.position, WorldPosition::new(3.0, 0.0, 4.0));
        assert_eq!(door.status.as_deref(), Some("open"));
        assert_eq!(door.prefab, "door");
    }

    #[test]
    fn test_scaled_door_uses_cell_size() {
        let layout = SceneLayout::default()
            .with_cell_size(2.0)
            .with_door_placement(DoorPlacement::Scaled);

        assert_eq!(
            layout.door_position(GridCoord::new(3, 4)),
            WorldPosition::new(6.0, 0.0, 8.0)
        );
    }

    #[test]
    fn test_fire_position() {
        let mut root = SceneRoot::new();
        let layout = SceneLayout::default().with_cell_size(1.5);
        let snapshot = SimulationSnapshot::new(1).with_fire("1 2");

        rebuild_scene(&mut root, &layout, &snapshot).unwrap();

        assert_eq!(
            positions(&root, ObjectKind::Fire),
            vec![WorldPosition::new(1.5, 0.0, 3.0)]
        );
    }

    #[test]
    fn test_object_count_matches_snapshot() {
        let mut root = SceneRoot::new();
        let summary =
            rebuild_scene(&mut root, &SceneLayout::default(), &fixtures::sample_snapshot())
                .unwrap();

        let expected = fixtures::SAMPLE_WALLS + fixtures::SAMPLE_DOORS + fixtures::SAMPLE_FIRES;
        assert_eq!(root.len(), expected);
        assert_eq!(summary.total_objects(), expected);
        assert_eq!(summary.walls, fixtures::SAMPLE_WALLS);
        assert_eq!(summary.doors, fixtures::SAMPLE_DOORS);
        assert_eq!(summary.fires, fixtures::SAMPLE_FIRES);
        assert_eq!(summary.current_step, 7);
        assert_eq!(summary.damage, 4);
        assert!(!summary.fire_layers_disagree());
    }

    #[test]
    fn test_second_rebuild_replaces_first() {
        let mut root = SceneRoot::new();
        let layout = SceneLayout::default();

        rebuild_scene(&mut root, &layout, &fixtures::sample_snapshot()).unwrap();
        let snapshot_b = SimulationSnapshot::new(8).with_fire("5 5");
        let summary = rebuild_scene(&mut root, &layout, &snapshot_b).unwrap();

        assert_eq!(summary.released, 32);
        assert_eq!(root.len(), 1);
        let fire = root.objects_of(ObjectKind::Fire).next().unwrap();
        assert_eq!(fire.cell, GridCoord::new(5, 5));
        assert_eq!(root.count_of(ObjectKind::Wall), 0);
        assert_eq!(root.count_of(ObjectKind::Door), 0);
    }

    #[test]
    fn test_empty_snapshot_clears_scene() {
        let mut root = SceneRoot::new();
        let layout = SceneLayout::default();

        rebuild_scene(&mut root, &layout, &fixtures::sample_snapshot()).unwrap();
        rebuild_scene(&mut root, &layout, &SimulationSnapshot::default()).unwrap();

        assert!(root.is_empty());
    }

    #[test]
    fn test_malformed_door_key_fails_without_touching_scene() {
        let mut root = SceneRoot::new();
        let layout = SceneLayout::default();
        rebuild_scene(&mut root, &layout, &fixtures::sample_snapshot()).unwrap();

        let err = rebuild_scene(&mut root, &layout, &fixtures::malformed_door_snapshot())
            .unwrap_err();

        assert!(matches!(err, RebuildError::DoorKey(_)));
        assert_eq!(root.len(), 32);
        assert_eq!(root.revision(), 1);
        assert!(root
            .objects_of(ObjectKind::Door)
            .all(|door| door.cell != GridCoord::new(0, 0)));
    }

    #[test]
    fn test_malformed_fire_entry_fails() {
        let mut root = SceneRoot::new();
        let snapshot = SimulationSnapshot::new(1).with_fire("1 2").with_fire("oops");

        let err = rebuild_scene(&mut root, &SceneLayout::default(), &snapshot).unwrap_err();

        assert!(matches!(err, RebuildError::FirePosition(_)));
        assert!(root.is_empty());
        assert_eq!(root.revision(), 0);
    }

    #[test]
    fn test_short_wall_grid_fails() {
        let snapshot = SimulationSnapshot::new(1).with_grid(vec![vec![1, 1]], vec![vec![0]]);
        let err = SceneLayout::default().plan(&snapshot).unwrap_err();

        assert_eq!(
            err,
            RebuildError::ShortWallRow {
                row: 0,
                grid_columns: 2,
                wall_columns: 1,
            }
        );
    }

    #[test]
    fn test_missing_wall_row_fails() {
        let snapshot = SimulationSnapshot::new(1).with_grid(vec![vec![1], vec![1]], vec![vec![1]]);
        let err = SceneLayout::default().plan(&snapshot).unwrap_err();

        assert!(matches!(err, RebuildError::MissingWallRow { row: 1, .. }));
    }

    #[test]
    fn test_grid_fire_code_spawns_nothing() {
        let snapshot = SimulationSnapshot::new(1).with_grid(vec![vec![2, 2]], vec![vec![0, 0]]);
        let mut root = SceneRoot::new();

        let summary = rebuild_scene(&mut root, &SceneLayout::default(), &snapshot).unwrap();

        assert!(root.is_empty());
        assert_eq!(summary.grid.fire, 2);
        assert!(summary.fire_layers_disagree());
    }

    #[test]
    fn test_invalid_cell_size_fails_without_touching_scene() {
        let mut root = SceneRoot::new();
        rebuild_scene(&mut root, &SceneLayout::default(), &fixtures::sample_snapshot()).unwrap();

        for cell_size in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let layout = SceneLayout::default().with_cell_size(cell_size);
            let err = rebuild_scene(&mut root, &layout, &fixtures::single_wall_snapshot())
                .unwrap_err();

            assert!(matches!(err, RebuildError::InvalidCellSize(_)));
        }
        assert_eq!(root.len(), 32);
        assert_eq!(root.revision(), 1);
    }

    #[test]
    fn test_rebuild_order_independent_of_previous_scene() {
        let layout = SceneLayout::default();
        let snapshot = SimulationSnapshot::new(2)
            .with_fire("0 0")
            .with_fire("1 0")
            .with_fire("2 0");
        let fire_columns = |root: &SceneRoot| -> Vec<i32> {
            root.objects_of(ObjectKind::Fire).map(|o| o.cell.x).collect()
        };

        let mut fresh = SceneRoot::new();
        rebuild_scene(&mut fresh, &layout, &snapshot).unwrap();

        let mut reused = SceneRoot::new();
        let previous = SimulationSnapshot::new(1).with_fire("5 5").with_fire("6 6");
        rebuild_scene(&mut reused, &layout, &previous).unwrap();
        rebuild_scene(&mut reused, &layout, &snapshot).unwrap();

        assert_eq!(fire_columns(&fresh), vec![0, 1, 2]);
        assert_eq!(fire_columns(&reused), vec![0, 1, 2]);
    }

    #[test]
    fn test_plan_order() {
        let objects = SceneLayout::default()
            .plan(&fixtures::sample_snapshot())
            .unwrap();

        let kinds: Vec<_> = objects.iter().map(|o| o.kind).collect();
        let first_door = kinds.iter().position(|k| *k == ObjectKind::Door).unwrap();
        let first_fire = kinds.iter().position(|k| *k == ObjectKind::Fire).unwrap();

        assert!(kinds[..first_door].iter().all(|k| *k == ObjectKind::Wall));
        assert!(kinds[first_door..first_fire].iter().all(|k| *k == ObjectKind::Door));
        assert!(kinds[first_fire..].iter().all(|k| *k == ObjectKind::Fire));
    }
}
