//! Champion catalogue entries (Data Dragon `champion.json`).

use super::Entity;
use crate::key::EntityKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Champion {
    /// Numeric champion id as a string (e.g. `"266"`).
    pub key: String,
    /// Internal name (e.g. `"Aatrox"`).
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Entity for Champion {
    const KIND: EntityKind = EntityKind::Champion;

    fn entity_id(&self) -> String {
        self.key.clone()
    }

    fn sort_key(&self) -> i64 {
        0
    }
}

/// Top-level `champion.json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct ChampionCatalog {
    #[serde(default)]
    pub version: String,
    pub data: BTreeMap<String, Champion>,
}

impl ChampionCatalog {
    /// Champions sorted by display name.
    pub fn into_champions(self) -> Vec<Champion> {
        let mut champions: Vec<Champion> = self.data.into_values().collect();
        champions.sort_by(|a, b| a.name.cmp(&b.name));
        champions
    }
}
