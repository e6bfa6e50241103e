//! # Claimb Core
//!
//! Offline-first data layer for the Claimb client.
//!
//! ## Layout
//!
//! ```text
//! claimb-core/src/
//! ├── sync/      # SyncCoordinator + per-key in-flight registry
//! ├── store/     # LocalStore trait, SQLite and in-memory backends
//! ├── remote.rs  # RemoteSource seam over the proxy and Data Dragon
//! ├── stats.rs   # Role / champion / performance aggregation
//! ├── config.rs  # config.json + CLAIMB_* overrides
//! ├── paths.rs   # data directory resolution
//! └── logger.rs  # tracing subscriber setup
//! ```
//!
//! HTTP retries, connectivity checks and response decoding live in
//! `claimb-client`; this crate only sees the errors they surface.

#![allow(
    clippy::significant_drop_tightening,
    reason = "Registry guards are held across publish + remove on purpose"
)]
#![allow(clippy::implicit_clone, reason = "Explicit .clone() vs .to_string() is stylistic")]
#![cfg_attr(test, allow(clippy::panic, clippy::float_cmp))]

pub mod config;
pub mod error;
pub mod logger;
pub mod paths;
pub mod remote;
pub mod stats;
pub mod store;
pub mod sync;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use remote::{ProxyRemote, RemoteSource};
pub use store::{LocalStore, MemoryStore, SqliteStore, StoredRecord};
pub use sync::SyncCoordinator;
