//! Core domain models for the Claimb data layer.
//!
//! Cached entities (`Match`, `Champion`, `Summoner`) implement [`Entity`] so
//! the store can key and order them without knowing their shape. The other
//! models are pass-through proxy payloads.

mod account;
mod champion;
mod coach;
mod matches;
mod stats;
mod summoner;
mod timeline;

use crate::key::EntityKind;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use account::{Account, LeagueEntry};
pub use champion::{Champion, ChampionCatalog};
pub use coach::{CoachRequest, CoachResponse};
pub use matches::{Match, MatchInfo, MatchMetadata, MatchPayload, MatchesPage, Participant};
pub use stats::{CategoryStats, PerformanceSummary};
pub use summoner::Summoner;
pub use timeline::{Checkpoint, TimelineLite, TimelineTimings, VisionStats};

/// Immutable snapshot the local store can cache.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Storage discriminator.
    const KIND: EntityKind;

    /// Stable external identity (match id, champion key, puuid).
    fn entity_id(&self) -> String;

    /// Ordering key for reads, newest (largest) first.
    fn sort_key(&self) -> i64;
}
