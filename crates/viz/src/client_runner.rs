//! Snapshot runner: drives the snapshot client from inside the Bevy app.
//!
//! Requests run on a small background tokio runtime so the frame loop never
//! waits on the network. Results come back over a channel and are applied to
//! the client on the main schedule. Only one request is in flight at a time.

use bevy::prelude::*;
use rescue_client::{ClientConfig, ClientError, RebuildSummary, SnapshotClient};
use rescue_events::SimulationSnapshot;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Mutex;
use std::time::Duration;

/// Plugin for fetching snapshots and rebuilding the scene.
pub struct ClientRunnerPlugin;

impl Plugin for ClientRunnerPlugin {
    fn build(&self, app: &mut App) {
        // SnapshotRunner is inserted by main.rs; without it the systems idle.
        app.add_event::<FetchRequested>()
            .add_event::<SceneRebuiltEvent>()
            .init_resource::<PollTimer>()
            .add_systems(Startup, (setup_poll_timer, request_initial_fetch))
            .add_systems(
                Update,
                (
                    handle_refresh_key,
                    tick_poll_timer,
                    start_requested_fetch,
                    receive_fetch_result,
                )
                    .chain(),
            );
    }
}

/// Event asking for a fresh snapshot.
#[derive(Event, Debug, Clone, Copy)]
pub struct FetchRequested;

/// Event emitted after the client's scene has been replaced.
#[derive(Event, Debug, Clone)]
pub struct SceneRebuiltEvent {
    /// Scene revision after the rebuild.
    pub revision: u64,
    /// Step of the snapshot now displayed.
    pub step: i64,
}

/// Current status of the fetch cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchStatus {
    /// No request in flight.
    #[default]
    Idle,
    /// A request is in flight.
    Fetching,
    /// The last cycle failed with an error.
    Failed(String),
}

/// Errors that prevent the runner from starting.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The HTTP client could not be created.
    #[error("failed to create snapshot client: {0}")]
    Client(#[source] ClientError),
    /// The background runtime could not be started.
    #[error("failed to start network runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

type FetchResult = Result<SimulationSnapshot, ClientError>;

/// Resource owning the snapshot client and its background runtime.
#[derive(Resource)]
pub struct SnapshotRunner {
    client: SnapshotClient,
    runtime: tokio::runtime::Runtime,
    /// Receiver for the in-flight request (wrapped for thread safety).
    pending: Option<Mutex<Receiver<FetchResult>>>,
    /// Refresh interval, if polling is enabled.
    poll_interval: Option<Duration>,
    /// Current fetch status.
    pub status: FetchStatus,
}

impl SnapshotRunner {
    /// Creates a runner for the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, RunnerError> {
        let client = SnapshotClient::new(config).map_err(RunnerError::Client)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("snapshot-fetch")
            .enable_all()
            .build()
            .map_err(RunnerError::Runtime)?;

        Ok(Self {
            client,
            runtime,
            pending: None,
            poll_interval: config.server.poll_interval(),
            status: FetchStatus::Idle,
        })
    }

    /// The client, including the current scene.
    pub fn client(&self) -> &SnapshotClient {
        &self.client
    }

    /// Check if a request is currently in flight.
    pub fn is_fetching(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts a background request. Returns false if one is already running.
    pub fn start_fetch(&mut self) -> bool {
        if self.pending.is_some() {
            tracing::debug!("Fetch already in flight, ignoring request");
            return false;
        }

        let (tx, rx) = mpsc::channel();
        let fetcher = self.client.fetcher().clone();
        self.runtime.spawn(async move {
            let result = fetcher.fetch().await;
            let _ = tx.send(result);
        });

        tracing::debug!("Requesting snapshot from {}", self.client.fetcher().endpoint());
        self.pending = Some(Mutex::new(rx));
        self.status = FetchStatus::Fetching;
        true
    }

    /// Applies a finished request, if any. Returns the rebuild summary when
    /// the scene was replaced.
    pub fn poll(&mut self) -> Option<RebuildSummary> {
        let received = {
            let rx_mutex = self.pending.as_ref()?;
            let rx = rx_mutex.lock().ok()?;
            let outcome = rx.try_recv();
            match outcome {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => Err(ClientError::Transport(
                    "fetch task ended without a result".into(),
                )),
            }
        };

        self.pending = None;
        self.finish(received)
    }

    /// Hands a fetch result to the client and updates the status.
    pub fn finish(&mut self, fetched: FetchResult) -> Option<RebuildSummary> {
        match self.client.apply(fetched) {
            Ok(summary) => {
                self.status = FetchStatus::Idle;
                Some(summary)
            }
            Err(e) => {
                self.status = FetchStatus::Failed(e.to_string());
                None
            }
        }
    }

    /// Refresh interval, if polling is enabled.
    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval
    }
}

/// Refresh timer for poll mode. Ticking it never touches [`SnapshotRunner`].
#[derive(Resource, Debug, Default)]
pub struct PollTimer(Option<Timer>);

impl PollTimer {
    /// Creates a repeating timer, or a disabled one for `None`.
    pub fn new(interval: Option<Duration>) -> Self {
        Self(interval.map(|interval| Timer::new(interval, TimerMode::Repeating)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }

    /// Advances the timer. Returns true when a refresh is due.
    pub fn tick(&mut self, delta: Duration) -> bool {
        match self.0.as_mut() {
            Some(timer) => timer.tick(delta).just_finished(),
            None => false,
        }
    }
}

/// System to start the poll timer from the runner's config.
fn setup_poll_timer(runner: Option<Res<SnapshotRunner>>, mut timer: ResMut<PollTimer>) {
    let Some(runner) = runner else {
        return;
    };

    *timer = PollTimer::new(runner.poll_interval());
    if let Some(interval) = runner.poll_interval() {
        tracing::info!("Polling for snapshots every {:?}", interval);
    }
}

/// System to fetch once on startup.
fn request_initial_fetch(mut requests: EventWriter<FetchRequested>) {
    requests.send(FetchRequested);
}

/// Handle R key to force a refresh.
fn handle_refresh_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut requests: EventWriter<FetchRequested>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        tracing::info!("Manual refresh triggered");
        requests.send(FetchRequested);
    }
}

/// System to request snapshots on the poll interval.
fn tick_poll_timer(
    time: Res<Time>,
    mut timer: ResMut<PollTimer>,
    mut requests: EventWriter<FetchRequested>,
) {
    if !timer.is_enabled() {
        return;
    }

    if timer.tick(time.delta()) {
        requests.send(FetchRequested);
    }
}

/// System to start a request when one was asked for.
fn start_requested_fetch(
    mut requests: EventReader<FetchRequested>,
    runner: Option<ResMut<SnapshotRunner>>,
) {
    // Collapse any number of requests in one frame into a single fetch
    if requests.read().count() == 0 {
        return;
    }

    let Some(mut runner) = runner else {
        tracing::warn!("Snapshot requested but no runner is configured");
        return;
    };

    runner.start_fetch();
}

/// System to apply finished requests.
fn receive_fetch_result(
    runner: Option<ResMut<SnapshotRunner>>,
    mut rebuilt: EventWriter<SceneRebuiltEvent>,
) {
    let Some(mut runner) = runner else {
        return;
    };

    if !runner.is_fetching() {
        return;
    }

    if let Some(summary) = runner.poll() {
        rebuilt.send(SceneRebuiltEvent {
            revision: runner.client().scene().revision(),
            step: summary.current_step,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_events::fixtures;

    fn runner() -> SnapshotRunner {
        SnapshotRunner::new(&ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_runner_starts_idle() {
        let runner = runner();
        assert_eq!(runner.status, FetchStatus::Idle);
        assert!(!runner.is_fetching());
        assert!(runner.client().scene().is_empty());
    }

    #[test]
    fn test_finish_success() {
        let mut runner = runner();
        let summary = runner.finish(Ok(fixtures::sample_snapshot())).unwrap();

        assert_eq!(summary.current_step, 7);
        assert_eq!(runner.status, FetchStatus::Idle);
        assert_eq!(runner.client().scene().len(), summary.total_objects());
    }

    #[test]
    fn test_finish_failure_keeps_scene() {
        let mut runner = runner();
        runner.finish(Ok(fixtures::sample_snapshot()));

        let summary = runner.finish(Err(ClientError::Transport("refused".into())));

        assert!(summary.is_none());
        assert!(matches!(runner.status, FetchStatus::Failed(ref msg) if msg.contains("refused")));
        assert_eq!(runner.client().scene().len(), 32);
    }

    #[test]
    fn test_runner_error_message_and_source() {
        use std::error::Error as _;

        let err = RunnerError::Client(ClientError::Transport("bad proxy".into()));

        assert_eq!(
            err.to_string(),
            "failed to create snapshot client: transport error: bad proxy"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_poll_timer_disabled_by_default() {
        let runner = runner();
        let mut timer = PollTimer::new(runner.poll_interval());

        assert!(!timer.is_enabled());
        assert!(!timer.tick(Duration::from_secs(3600)));
    }

    #[test]
    fn test_poll_timer_fires() {
        let mut config = ClientConfig::default();
        config.server.poll_interval_secs = 2;
        let runner = SnapshotRunner::new(&config).unwrap();
        let mut timer = PollTimer::new(runner.poll_interval());

        assert!(timer.is_enabled());
        assert!(!timer.tick(Duration::from_secs(1)));
        assert!(timer.tick(Duration::from_secs(1)));
    }

    #[test]
    fn test_poll_ticks_leave_runner_unchanged() {
        let mut config = ClientConfig::default();
        config.server.poll_interval_secs = 60;

        let mut app = App::new();
        app.init_resource::<Time>()
            .add_event::<FetchRequested>()
            .init_resource::<PollTimer>()
            .insert_resource(SnapshotRunner::new(&config).unwrap())
            .add_systems(Startup, setup_poll_timer)
            .add_systems(Update, tick_poll_timer);

        app.update();
        let inserted = app.world().resource_ref::<SnapshotRunner>().last_changed();
        app.update();
        app.update();

        assert!(app.world().resource::<PollTimer>().is_enabled());
        assert_eq!(
            app.world().resource_ref::<SnapshotRunner>().last_changed(),
            inserted
        );
    }

    #[test]
    fn test_second_fetch_rejected_while_in_flight() {
        let mut config = ClientConfig::default();
        // The result stays pending until polled, whether or not it failed.
        config.server.endpoint = "http://127.0.0.1:9/".into();
        let mut runner = SnapshotRunner::new(&config).unwrap();

        assert!(runner.start_fetch());
        assert!(!runner.start_fetch());
        assert_eq!(runner.status, FetchStatus::Fetching);
    }
}
