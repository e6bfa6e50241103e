//! # Claimb Types
//!
//! Core types, models, and error definitions for the Claimb data layer.
//!
//! This crate provides the foundational type system shared by the client and
//! the sync core:
//!
//! - **`error`** - Serializable error snapshot delivered to every sync waiter
//! - **`key`** - Structured request keys used for in-flight deduplication
//! - **`models`** - Entity snapshots (Match, Champion, Summoner) and proxy payloads
//! - **`result`** - Tagged sync outcome consumed by the UI layer
//!
//! ## Architecture Role
//!
//! `claimb-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!                 claimb-types (this crate)
//!                        │
//!          ┌─────────────┴─────────────┐
//!          ▼                           ▼
//!    claimb-client ──────────────▶ claimb-core
//!                                      │
//!                                      ▼
//!                                 claimb-cli
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde for caching and IPC
//! - **Clone** for cheap fan-out across async waiters
//! - **PartialEq** for testing and comparison

pub mod error;
pub mod key;
pub mod models;
pub mod result;

pub use error::SyncError;
pub use key::{EntityKind, KeyParams, RequestKey};
pub use models::{
    Account, CategoryStats, Champion, CoachRequest, CoachResponse, Entity, LeagueEntry, Match,
    MatchPayload, MatchesPage, Participant, PerformanceSummary, Summoner, TimelineLite,
};
pub use result::SyncResult;
