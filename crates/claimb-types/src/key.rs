//! Structured request keys.
//!
//! A [`RequestKey`] identifies one logical fetch. Equality and hashing use the
//! structured fields, so `("ab", "c")` and `("a", "bc")` never collide the way
//! concatenated strings would.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Family of cached entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Match,
    Champion,
    Summoner,
}

impl EntityKind {
    /// Stable label used as the storage discriminator.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Champion => "champion",
            Self::Summoner => "summoner",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pagination and routing parameters that distinguish otherwise equal keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Deterministic identifier for a logical fetch operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub kind: EntityKind,
    pub owner: String,
    #[serde(default)]
    pub params: KeyParams,
}

impl RequestKey {
    pub fn new(kind: EntityKind, owner: impl Into<String>, params: KeyParams) -> Self {
        Self { kind, owner: owner.into(), params }
    }

    /// Key for a player's match history page.
    pub fn matches(puuid: impl Into<String>, region: impl Into<String>, limit: usize) -> Self {
        Self::new(
            EntityKind::Match,
            puuid,
            KeyParams { region: Some(region.into()), limit: Some(limit) },
        )
    }

    /// Key for the champion catalogue of a locale.
    pub fn champions(locale: impl Into<String>) -> Self {
        Self::new(EntityKind::Champion, locale, KeyParams::default())
    }

    /// Key for a summoner profile.
    pub fn summoner(puuid: impl Into<String>, region: impl Into<String>) -> Self {
        Self::new(
            EntityKind::Summoner,
            puuid,
            KeyParams { region: Some(region.into()), limit: None },
        )
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.owner)?;
        if let Some(region) = &self.params.region {
            write!(f, ":{}", region)?;
        }
        if let Some(limit) = self.params.limit {
            write!(f, ":{}", limit)?;
        }
        Ok(())
    }
}
