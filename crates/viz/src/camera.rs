//! Camera system: orbit controller, scene framing, and keyboard input.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;

use crate::client_runner::{SceneRebuiltEvent, SnapshotRunner};
use crate::scene_sync::to_vec3;

/// Plugin for camera control and movement.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraController>()
            .init_resource::<CameraConstraints>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (
                    frame_scene_on_rebuild,
                    handle_keyboard_input,
                    handle_scroll_zoom,
                    apply_camera_to_transform,
                )
                    .chain(),
            );
    }
}

/// Orbit camera controller resource.
#[derive(Resource, Debug, Clone)]
pub struct CameraController {
    /// Point the camera looks at.
    pub focus: Vec3,
    /// Distance from the focus point.
    pub distance: f32,
    /// Rotation around the vertical axis, in radians.
    pub yaw: f32,
    /// Angle above the ground plane, in radians.
    pub pitch: f32,
    /// Whether the camera has been framed on a scene yet.
    pub framed: bool,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            distance: 15.0,
            yaw: 0.0,
            pitch: 0.9,
            framed: false,
        }
    }
}

impl CameraController {
    /// Camera position derived from focus, distance, yaw and pitch.
    pub fn eye(&self) -> Vec3 {
        let horizontal = self.distance * self.pitch.cos();
        self.focus
            + Vec3::new(
                horizontal * self.yaw.sin(),
                self.distance * self.pitch.sin(),
                horizontal * self.yaw.cos(),
            )
    }

    /// Centers the camera on a bounding box so all of it is visible.
    pub fn frame(&mut self, min: Vec3, max: Vec3, constraints: &CameraConstraints) {
        self.focus = (min + max) / 2.0;
        let extent = (max - min).max_element().max(1.0);
        self.distance = constraints.clamp_distance(extent * 1.5);
        self.framed = true;
    }
}

/// Camera constraints for zooming and tilting.
#[derive(Resource, Debug, Clone)]
pub struct CameraConstraints {
    /// Closest allowed distance to the focus.
    pub min_distance: f32,
    /// Farthest allowed distance from the focus.
    pub max_distance: f32,
    /// Lowest allowed pitch.
    pub min_pitch: f32,
    /// Highest allowed pitch.
    pub max_pitch: f32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            min_distance: 2.0,
            max_distance: 200.0,
            min_pitch: 0.15,
            max_pitch: 1.5,
        }
    }
}

impl CameraConstraints {
    /// Clamp a distance to valid range.
    pub fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance)
    }

    /// Clamp a pitch to valid range.
    pub fn clamp_pitch(&self, pitch: f32) -> f32 {
        pitch.clamp(self.min_pitch, self.max_pitch)
    }
}

/// Axis-aligned bounds of a set of points, or `None` if there are none.
pub fn bounds(points: impl IntoIterator<Item = Vec3>) -> Option<(Vec3, Vec3)> {
    points.into_iter().fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((min, max)) => Some((min.min(p), max.max(p))),
    })
}

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// System to set up the camera and light on startup.
fn setup_camera(mut commands: Commands, controller: Res<CameraController>) {
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(controller.eye())
                .looking_at(controller.focus, Vec3::Y),
            ..default()
        },
        MainCamera,
    ));

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
}

/// System to frame the first scene that arrives.
fn frame_scene_on_rebuild(
    mut events: EventReader<SceneRebuiltEvent>,
    mut controller: ResMut<CameraController>,
    constraints: Res<CameraConstraints>,
    runner: Option<Res<SnapshotRunner>>,
) {
    // Only process on rebuild events
    if events.read().next().is_none() || controller.framed {
        return;
    }

    let Some(runner) = runner else {
        return;
    };

    let points = runner
        .client()
        .scene()
        .iter()
        .map(|(_, object)| to_vec3(object.position));

    if let Some((min, max)) = bounds(points) {
        controller.frame(min, max, &constraints);
        tracing::debug!("Framed camera on scene centered at {:?}", controller.focus);
    }
}

/// System to handle keyboard input for camera controls.
fn handle_keyboard_input(
    mut controller: ResMut<CameraController>,
    constraints: Res<CameraConstraints>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    runner: Option<Res<SnapshotRunner>>,
) {
    let delta = time.delta_seconds();

    // Arrow keys orbit, shift doubles speed
    let shift_held = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);
    let turn_speed = (if shift_held { 2.0 } else { 1.0 }) * delta;

    if keyboard.pressed(KeyCode::ArrowLeft) {
        controller.yaw -= turn_speed;
    }
    if keyboard.pressed(KeyCode::ArrowRight) {
        controller.yaw += turn_speed;
    }
    if keyboard.pressed(KeyCode::ArrowUp) {
        controller.pitch = constraints.clamp_pitch(controller.pitch + turn_speed);
    }
    if keyboard.pressed(KeyCode::ArrowDown) {
        controller.pitch = constraints.clamp_pitch(controller.pitch - turn_speed);
    }

    // +/- keys for discrete zoom steps
    if keyboard.just_pressed(KeyCode::Equal) {
        controller.distance = constraints.clamp_distance(controller.distance / 1.25);
    }
    if keyboard.just_pressed(KeyCode::Minus) {
        controller.distance = constraints.clamp_distance(controller.distance * 1.25);
    }

    // Home key - reframe the current scene
    if keyboard.just_pressed(KeyCode::Home) {
        if let Some(runner) = runner {
            let points = runner
                .client()
                .scene()
                .iter()
                .map(|(_, object)| to_vec3(object.position));
            if let Some((min, max)) = bounds(points) {
                controller.frame(min, max, &constraints);
            }
        }
    }
}

/// System to zoom with the scroll wheel.
fn handle_scroll_zoom(
    mut controller: ResMut<CameraController>,
    constraints: Res<CameraConstraints>,
    mut scroll: EventReader<MouseWheel>,
) {
    for ev in scroll.read() {
        let factor = 1.0 - ev.y * 0.1;
        controller.distance = constraints.clamp_distance(controller.distance * factor);
    }
}

/// System to apply the controller to the camera transform.
fn apply_camera_to_transform(
    controller: Res<CameraController>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    if !controller.is_changed() {
        return;
    }

    for mut transform in cameras.iter_mut() {
        *transform =
            Transform::from_translation(controller.eye()).looking_at(controller.focus, Vec3::Y);
    }
}
