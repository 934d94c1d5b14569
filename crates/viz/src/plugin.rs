//! Main visualization plugin that ties all systems together.

use bevy::prelude::*;

use crate::camera::CameraPlugin;
use crate::client_runner::ClientRunnerPlugin;
use crate::overlay::OverlayPlugin;
use crate::scene_sync::SceneSyncPlugin;

/// Main plugin for the fire rescue viewer.
///
/// This plugin sets up the window, adds all sub-plugins, and configures
/// the Bevy app for visualization. Insert a `SnapshotRunner` resource before
/// adding it.
pub struct RescueVizPlugin;

impl Plugin for RescueVizPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Fire Rescue".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.08, 0.08, 0.1)))
        .add_plugins((
            ClientRunnerPlugin,
            SceneSyncPlugin,
            CameraPlugin,
            OverlayPlugin,
        ));
    }
}
