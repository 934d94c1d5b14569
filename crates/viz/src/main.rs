//! Fire Rescue Viewer
//!
//! Run with: cargo run -p viz
//!
//! Examples:
//!   cargo run -p viz -- --endpoint http://localhost:8585 --poll-interval 2
//!   cargo run -p viz -- --headless --once --json

use bevy::prelude::*;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use viz::cli::Args;
use viz::client_runner::SnapshotRunner;
use viz::headless::{self, HeadlessOptions};
use viz::RescueVizPlugin;

fn main() -> ExitCode {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", rescue_client::default_config_toml());
        return ExitCode::SUCCESS;
    }

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.headless {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();

        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                eprintln!("Error: failed to start runtime: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let options = HeadlessOptions {
            once: args.once,
            json: args.json,
        };
        return match runtime.block_on(headless::run(&config, options)) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("Snapshot cycle failed: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let runner = match SnapshotRunner::new(&config) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    App::new()
        .insert_resource(runner)
        .add_plugins(RescueVizPlugin)
        .run();

    ExitCode::SUCCESS
}
