//! Integration tests for the visualization layer.

use clap::Parser;
use rescue_client::{ClientError, ObjectKind, RequestMethod, SceneLayout};
use rescue_events::fixtures;
use viz::cli::Args;
use viz::client_runner::{FetchStatus, SnapshotRunner};
use viz::overlay::status_text;
use viz::scene_sync::{object_size, object_transform};

/// Test that the runner mirrors the sample snapshot into its scene.
#[test]
fn test_runner_applies_sample_snapshot() {
    let mut runner = SnapshotRunner::new(&Default::default()).unwrap();
    let summary = runner.finish(Ok(fixtures::sample_snapshot())).unwrap();

    let scene = runner.client().scene();
    assert_eq!(scene.count_of(ObjectKind::Wall), fixtures::SAMPLE_WALLS);
    assert_eq!(scene.count_of(ObjectKind::Door), fixtures::SAMPLE_DOORS);
    assert_eq!(scene.count_of(ObjectKind::Fire), fixtures::SAMPLE_FIRES);
    assert_eq!(scene.revision(), 1);

    let text = status_text(&runner.status, runner.client().last_summary());
    assert!(text.contains(&format!("Step {}", summary.current_step)));
}

/// Test that a malformed door leaves the previous scene in place.
#[test]
fn test_runner_rejects_malformed_door() {
    let mut runner = SnapshotRunner::new(&Default::default()).unwrap();
    runner.finish(Ok(fixtures::sample_snapshot()));

    assert!(runner
        .finish(Ok(fixtures::malformed_door_snapshot()))
        .is_none());

    assert!(matches!(runner.status, FetchStatus::Failed(_)));
    assert_eq!(runner.client().scene().revision(), 1);
    assert_eq!(runner.client().scene().count_of(ObjectKind::Door), 4);
}

/// Test that every rendered object sits on or above the ground plane.
#[test]
fn test_rendered_objects_rest_on_ground() {
    let mut runner = SnapshotRunner::new(&Default::default()).unwrap();
    runner.finish(Ok(fixtures::sample_snapshot()));

    let layout = SceneLayout::default();
    for (_, object) in runner.client().scene().iter() {
        let size = object_size(object.kind, layout.cell_size);
        let transform = object_transform(object.position, size);
        assert!(transform.translation.y - size.y / 2.0 >= 0.0);
    }
}

/// Test CLI overrides flowing into the runner.
#[test]
fn test_cli_config_reaches_runner() {
    let args = Args::parse_from([
        "viz",
        "--endpoint",
        "http://127.0.0.1:9/state",
        "--method",
        "post",
        "--cell-size",
        "2",
    ]);
    let config = args.resolve_config().unwrap();
    assert_eq!(config.server.method, RequestMethod::Post);

    let runner = SnapshotRunner::new(&config).unwrap();
    assert_eq!(
        runner.client().fetcher().endpoint(),
        "http://127.0.0.1:9/state"
    );
    assert_eq!(runner.client().layout().cell_size, 2.0);
}

/// Test that a transport failure is reported in the overlay.
#[test]
fn test_failure_shown_in_overlay() {
    let mut runner = SnapshotRunner::new(&Default::default()).unwrap();
    runner.finish(Err(ClientError::Transport("connection refused".into())));

    let text = status_text(&runner.status, runner.client().last_summary());
    assert!(text.contains("connection refused"));
    assert!(text.contains("No snapshot loaded"));
}

/// Test that handles mirrored into entities stop resolving after a rebuild.
#[test]
fn test_handles_expire_on_rebuild() {
    let mut runner = SnapshotRunner::new(&Default::default()).unwrap();
    runner.finish(Ok(fixtures::sample_snapshot()));

    let handles: Vec<_> = runner.client().scene().iter().map(|(h, _)| h).collect();
    assert!(handles
        .iter()
        .all(|h| runner.client().scene().get(*h).is_some()));

    runner.finish(Ok(fixtures::single_wall_snapshot()));

    assert!(handles
        .iter()
        .all(|h| runner.client().scene().get(*h).is_none()));
    assert_eq!(runner.client().scene().len(), 1);
}
