//! Scene mirroring: turns the client's scene root into Bevy entities.
//!
//! A single root entity parents every rendered object. On each rebuild all of
//! its descendants are despawned and respawned from the client's scene; there
//! is no per-object diffing.

use bevy::prelude::*;
use rescue_client::{ObjectHandle, ObjectKind, SceneObject, WorldPosition};
use rescue_events::GridCoord;
use std::collections::HashMap;

use crate::client_runner::{SceneRebuiltEvent, SnapshotRunner};

/// Plugin for mirroring the snapshot scene into the Bevy world.
pub struct SceneSyncPlugin;

impl Plugin for SceneSyncPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_palette, spawn_scene_root))
            .add_systems(
                Update,
                sync_scene_entities.run_if(on_event::<SceneRebuiltEvent>()),
            );
    }
}

/// Marker component for the entity that parents every scene object.
#[derive(Component)]
pub struct SceneRootEntity;

/// Visual representation of one scene object.
#[derive(Component, Debug, Clone)]
pub struct VisualObject {
    /// Handle of the mirrored object; resolves through `SceneRoot::get` until
    /// the next rebuild.
    pub handle: ObjectHandle,
    pub kind: ObjectKind,
    /// Grid cell the object came from.
    pub cell: GridCoord,
    /// Prefab name requested by the client.
    pub prefab: String,
}

/// Shared mesh and per-kind materials.
#[derive(Resource)]
pub struct ScenePalette {
    /// Unit cube, scaled per object.
    pub cube: Handle<Mesh>,
    pub materials: HashMap<ObjectKind, Handle<StandardMaterial>>,
}

/// Base color for each object kind.
pub fn kind_color(kind: ObjectKind) -> Color {
    match kind {
        ObjectKind::Wall => Color::srgb(0.55, 0.55, 0.6), // Concrete gray
        ObjectKind::Door => Color::srgb(0.55, 0.35, 0.2), // Wood brown
        ObjectKind::Fire => Color::srgb(0.95, 0.35, 0.05), // Flame orange
    }
}

/// Size of an object's box, in world units.
pub fn object_size(kind: ObjectKind, cell_size: f32) -> Vec3 {
    match kind {
        ObjectKind::Wall => Vec3::new(cell_size, cell_size, cell_size),
        ObjectKind::Door => Vec3::new(0.8 * cell_size, 0.9 * cell_size, 0.15 * cell_size),
        ObjectKind::Fire => Vec3::new(0.6 * cell_size, 0.3 * cell_size, 0.6 * cell_size),
    }
}

/// Transform for an object: positioned at its world position, resting on the
/// ground plane.
pub fn object_transform(position: WorldPosition, size: Vec3) -> Transform {
    Transform::from_xyz(position.x, position.y + size.y / 2.0, position.z).with_scale(size)
}

/// Converts a client position to a Bevy vector.
pub fn to_vec3(position: WorldPosition) -> Vec3 {
    Vec3::new(position.x, position.y, position.z)
}

/// System to create the shared mesh and materials.
fn setup_palette(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let cube = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    let materials = ObjectKind::ALL
        .iter()
        .map(|&kind| {
            let material = materials.add(StandardMaterial {
                base_color: kind_color(kind),
                perceptual_roughness: 0.8,
                ..default()
            });
            (kind, material)
        })
        .collect();

    commands.insert_resource(ScenePalette { cube, materials });
}

/// System to spawn the scene root.
fn spawn_scene_root(mut commands: Commands) {
    commands.spawn((SpatialBundle::default(), SceneRootEntity));
    tracing::info!("Spawned scene root");
}

/// System to replace every rendered object after a rebuild.
fn sync_scene_entities(
    mut commands: Commands,
    runner: Option<Res<SnapshotRunner>>,
    palette: Option<Res<ScenePalette>>,
    roots: Query<Entity, With<SceneRootEntity>>,
) {
    let (Some(runner), Some(palette)) = (runner, palette) else {
        return;
    };
    let Ok(root) = roots.get_single() else {
        return;
    };

    let client = runner.client();
    let cell_size = client.layout().cell_size;

    commands.entity(root).despawn_descendants();
    commands.entity(root).with_children(|parent| {
        for (handle, object) in client.scene().iter() {
            spawn_object(parent, &palette, handle, object, cell_size);
        }
    });

    tracing::debug!("Mirrored {} scene objects", client.scene().len());
}

fn spawn_object(
    parent: &mut ChildBuilder,
    palette: &ScenePalette,
    handle: ObjectHandle,
    object: &SceneObject,
    cell_size: f32,
) {
    let size = object_size(object.kind, cell_size);
    let material = palette
        .materials
        .get(&object.kind)
        .cloned()
        .unwrap_or_default();

    parent.spawn((
        PbrBundle {
            mesh: palette.cube.clone(),
            material,
            transform: object_transform(object.position, size),
            ..default()
        },
        VisualObject {
            handle,
            kind: object.kind,
            cell: object.cell,
            prefab: object.prefab.clone(),
        },
    ));
}
