//! Summoner profile.

use super::Entity;
use crate::key::EntityKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Summoner {
    pub puuid: String,
    /// Encrypted summoner id; older regions still return it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub summoner_level: i64,
    #[serde(default)]
    pub profile_icon_id: i64,
    /// Last profile change, unix millis.
    #[serde(default)]
    pub revision_date: i64,
}

impl Entity for Summoner {
    const KIND: EntityKind = EntityKind::Summoner;

    fn entity_id(&self) -> String {
        self.puuid.clone()
    }

    fn sort_key(&self) -> i64 {
        self.revision_date
    }
}
