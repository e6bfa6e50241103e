//! Early-game timeline digest from `POST /riot/timeline-lite`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    #[serde(default)]
    pub cs: u32,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub xp: u32,
    /// `kills/deaths/assists`
    #[serde(default)]
    pub kda: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineTimings {
    pub first_back_min: Option<f64>,
    pub first_full_item_min: Option<f64>,
    pub first_kill_min: Option<f64>,
    pub first_death_min: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisionStats {
    #[serde(default)]
    pub wards_placed: u32,
    #[serde(default)]
    pub wards_killed: u32,
    #[serde(default)]
    pub control_wards: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineLite {
    pub match_id: String,
    #[serde(default)]
    pub region: String,
    pub puuid: String,
    #[serde(default)]
    pub participant_id: u32,
    /// Keyed by checkpoint label (`"10min"`, `"15min"`).
    #[serde(default)]
    pub checkpoints: BTreeMap<String, Checkpoint>,
    #[serde(default)]
    pub timings: TimelineTimings,
    #[serde(default)]
    pub vision_pre15: VisionStats,
    #[serde(default)]
    pub plates_pre14: u32,
}
