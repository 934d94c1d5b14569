//! Visualization layer: Bevy-based renderer and headless runner.

pub mod camera;
pub mod cli;
pub mod client_runner;
pub mod headless;
pub mod overlay;
pub mod plugin;
pub mod scene_sync;

pub use plugin::RescueVizPlugin;
