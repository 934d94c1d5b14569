//! Headless runner: fetch/rebuild cycles without a window.
//!
//! Runs one cycle, or keeps polling on the configured interval until Ctrl-C.
//! Each rebuild is logged; with JSON output enabled the summary is also
//! printed to stdout, one object per line.

use rescue_client::{ClientConfig, ClientError, ObjectKind, RebuildSummary, SnapshotClient};
use std::future::Future;
use std::io::Write;

/// Options for a headless run.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessOptions {
    /// Stop after the first cycle even if polling is configured.
    pub once: bool,
    /// Print summaries as JSON lines.
    pub json: bool,
}

/// Runs headless cycles until done, stopping early on Ctrl-C.
///
/// A single-cycle run returns that cycle's error. While polling, failed
/// cycles are logged and the loop continues.
pub async fn run(config: &ClientConfig, options: HeadlessOptions) -> Result<(), ClientError> {
    run_until(config, options, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// Like [`run`], but polling stops when `shutdown` completes. An in-flight
/// fetch is dropped and the scene keeps its last state.
pub async fn run_until(
    config: &ClientConfig,
    options: HeadlessOptions,
    shutdown: impl Future<Output = ()>,
) -> Result<(), ClientError> {
    let mut client = SnapshotClient::new(config)?;
    let interval = if options.once {
        None
    } else {
        config.server.poll_interval()
    };

    tracing::info!("Fetching snapshots from {}", config.server.endpoint);

    let Some(interval) = interval else {
        let summary = client.fetch_and_rebuild().await?;
        report(&client, &summary, options.json);
        return Ok(());
    };

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }

        tokio::select! {
            result = client.fetch_and_rebuild() => {
                if let Ok(summary) = result {
                    report(&client, &summary, options.json);
                }
            }
            _ = &mut shutdown => break,
        }
    }

    tracing::info!("Interrupted, stopping");
    Ok(())
}

fn report(client: &SnapshotClient, summary: &RebuildSummary, json: bool) {
    let scene = client.scene();
    tracing::info!(
        "Scene revision {}: {} objects ({} walls, {} doors, {} fires)",
        scene.revision(),
        scene.len(),
        scene.count_of(ObjectKind::Wall),
        scene.count_of(ObjectKind::Door),
        scene.count_of(ObjectKind::Fire),
    );

    if json {
        match summary_line(summary) {
            Ok(line) => {
                let mut stdout = std::io::stdout().lock();
                let _ = writeln!(stdout, "{}", line);
            }
            Err(e) => tracing::warn!("Failed to serialize summary: {}", e),
        }
    }
}

/// Serializes a summary as one compact JSON line.
pub fn summary_line(summary: &RebuildSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string(summary)
}
