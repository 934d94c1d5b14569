//! UI overlay: snapshot counters and fetch status.

use bevy::prelude::*;
use rescue_client::RebuildSummary;

use crate::client_runner::{FetchStatus, SnapshotRunner};

/// Plugin for UI overlay rendering.
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_overlay)
            .add_systems(Update, update_overlay_text);
    }
}

/// Marker component for the status text.
#[derive(Component)]
pub struct OverlayText;

/// Builds the overlay text for the current state.
pub fn status_text(status: &FetchStatus, summary: Option<&RebuildSummary>) -> String {
    let mut lines = Vec::new();

    match summary {
        Some(s) => {
            lines.push(format!("Step {}  |  Status {}", s.current_step, s.status));
            lines.push(format!(
                "Damage {}  |  Survivor losses {}  |  POI {}",
                s.damage, s.survivor_losses, s.points_of_interest
            ));
            lines.push(format!(
                "Walls {}  Doors {}  Fires {}",
                s.walls, s.doors, s.fires
            ));
        }
        None => lines.push("No snapshot loaded".to_string()),
    }

    match status {
        FetchStatus::Idle => {}
        FetchStatus::Fetching => lines.push("Fetching...".to_string()),
        FetchStatus::Failed(error) => lines.push(error.clone()),
    }

    lines.push("[R] refresh  [Home] reframe".to_string());
    lines.join("\n")
}

/// System to spawn the overlay text node.
fn spawn_overlay(mut commands: Commands) {
    commands.spawn((
        TextBundle::from_section(
            status_text(&FetchStatus::Idle, None),
            TextStyle {
                font_size: 16.0,
                color: Color::WHITE,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        }),
        OverlayText,
    ));
}

/// System to refresh the overlay when the runner changes.
fn update_overlay_text(
    runner: Option<Res<SnapshotRunner>>,
    mut texts: Query<&mut Text, With<OverlayText>>,
) {
    let Some(runner) = runner else {
        return;
    };
    if !runner.is_changed() {
        return;
    }

    let value = status_text(&runner.status, runner.client().last_summary());
    for mut text in texts.iter_mut() {
        if let Some(section) = text.sections.first_mut() {
            section.value = value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_client::{SceneLayout, SceneRoot};
    use rescue_events::fixtures;

    #[test]
    fn test_status_text_without_snapshot() {
        let text = status_text(&FetchStatus::Fetching, None);

        assert!(text.starts_with("No snapshot loaded"));
        assert!(text.contains("Fetching..."));
    }

    #[test]
    fn test_status_text_with_summary() {
        let mut root = SceneRoot::new();
        let summary = rescue_client::rebuild_scene(
            &mut root,
            &SceneLayout::default(),
            &fixtures::sample_snapshot(),
        )
        .unwrap();

        let text = status_text(&FetchStatus::Idle, Some(&summary));

        assert!(text.contains("Step 7"));
        assert!(text.contains("Damage 4"));
        assert!(text.contains("Walls 24  Doors 4  Fires 4"));
        assert!(!text.contains("Fetching"));
    }

    #[test]
    fn test_status_text_shows_error() {
        let text = status_text(&FetchStatus::Failed("transport error: refused".into()), None);
        assert!(text.contains("transport error: refused"));
    }
}
