//! The snapshot client.
//!
//! Owns the fetcher, the placement rules and the scene root. Every mutating
//! call takes `&mut self`, so two rebuilds can never interleave on the same
//! scene.

use rescue_events::SimulationSnapshot;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::fetch::SnapshotFetcher;
use crate::rebuild::{rebuild_scene, RebuildSummary, SceneLayout};
use crate::scene::SceneRoot;

/// Fetches snapshots and keeps the scene in sync with the latest one.
#[derive(Debug)]
pub struct SnapshotClient {
    fetcher: SnapshotFetcher,
    layout: SceneLayout,
    scene: SceneRoot,
    /// Step of the last snapshot applied.
    last_step: Option<i64>,
    /// Summary of the last successful rebuild.
    last_summary: Option<RebuildSummary>,
    /// Message of the last failed cycle, cleared on success.
    last_error: Option<String>,
}

impl SnapshotClient {
    /// Creates a client with an empty scene.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_parts(
            SnapshotFetcher::new(&config.server)?,
            SceneLayout::from_config(config),
        ))
    }

    /// Creates a client from an existing fetcher and layout.
    pub fn with_parts(fetcher: SnapshotFetcher, layout: SceneLayout) -> Self {
        Self {
            fetcher,
            layout,
            scene: SceneRoot::new(),
            last_step: None,
            last_summary: None,
            last_error: None,
        }
    }

    pub fn fetcher(&self) -> &SnapshotFetcher {
        &self.fetcher
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// The scene as of the last successful rebuild.
    pub fn scene(&self) -> &SceneRoot {
        &self.scene
    }

    pub fn last_summary(&self) -> Option<&RebuildSummary> {
        self.last_summary.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fetches one snapshot. Never touches the scene.
    pub async fn fetch_snapshot(&self) -> Result<SimulationSnapshot, ClientError> {
        self.fetcher.fetch().await
    }

    /// Replaces the scene with the objects derived from `snapshot`.
    ///
    /// On error the scene is left exactly as it was.
    pub fn rebuild_scene(
        &mut self,
        snapshot: &SimulationSnapshot,
    ) -> Result<RebuildSummary, ClientError> {
        let summary = rebuild_scene(&mut self.scene, &self.layout, snapshot)?;

        if let Some(previous) = self.last_step {
            if snapshot.current_step < previous {
                tracing::warn!(
                    "Snapshot step went backwards: {} -> {}",
                    previous,
                    snapshot.current_step
                );
            }
        }
        self.last_step = Some(snapshot.current_step);
        self.last_summary = Some(summary.clone());
        Ok(summary)
    }

    /// Applies the outcome of a fetch performed elsewhere, logging the result.
    ///
    /// Hosts that fetch on a background task hand the result back through
    /// this method.
    pub fn apply(
        &mut self,
        fetched: Result<SimulationSnapshot, ClientError>,
    ) -> Result<RebuildSummary, ClientError> {
        let result = fetched.and_then(|snapshot| self.rebuild_scene(&snapshot));

        match &result {
            Ok(summary) => {
                self.last_error = None;
                log_summary(summary);
            }
            Err(e) => {
                let error_msg = format!("Error: {}", e);
                tracing::error!("{}", error_msg);
                self.last_error = Some(error_msg);
            }
        }

        result
    }

    /// Fetches a snapshot and rebuilds the scene from it.
    ///
    /// Any failure is logged and returned; the scene is only replaced when
    /// both steps succeed.
    pub async fn fetch_and_rebuild(&mut self) -> Result<RebuildSummary, ClientError> {
        let fetched = self.fetch_snapshot().await;
        self.apply(fetched)
    }
}

fn log_summary(summary: &RebuildSummary) {
    tracing::info!("Current step: {}", summary.current_step);
    tracing::info!("Simulation status: {}", summary.status);
    tracing::info!("Total damage: {}", summary.damage);
    tracing::info!(
        "Survivor losses: {}, points of interest: {}",
        summary.survivor_losses,
        summary.points_of_interest
    );
}
