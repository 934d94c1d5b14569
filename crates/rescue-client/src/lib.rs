//! Snapshot client: fetches simulation state and rebuilds the scene.
//!
//! The client polls the simulation server, decodes the returned snapshot and
//! replaces every object in its [`SceneRoot`] with walls, doors and fire
//! markers derived from that snapshot.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   GET /   ┌─────────────────┐  plan   ┌───────────┐
//! │ sim server │ ───────▶  │ SnapshotFetcher │ ──────▶ │ SceneRoot │
//! └────────────┘   JSON    └─────────────────┘ replace └───────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: TOML configuration (endpoint, cell size, prefabs)
//! - [`fetch`]: HTTP transport and decoding
//! - [`scene`]: Generational arena owning the scene objects
//! - [`rebuild`]: Snapshot to scene planning and replacement
//! - [`client`]: The `SnapshotClient` tying it together

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod rebuild;
pub mod scene;

pub use client::SnapshotClient;

pub use config::{
    default_config_toml, ClientConfig, ConfigError, DoorPlacement, PrefabSet, RequestMethod,
    SceneConfig, ServerConfig,
};

pub use error::{ClientError, ErrorKind};

pub use fetch::SnapshotFetcher;

pub use rebuild::{rebuild_scene, RebuildError, RebuildSummary, SceneLayout};

pub use scene::{ObjectHandle, ObjectKind, SceneObject, SceneRoot, WorldPosition};
