//! Aggregated performance statistics.

use serde::{Deserialize, Serialize};

/// Win/loss tally for one category (role, champion, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: String,
    pub wins: u32,
    pub total: u32,
    pub win_rate: f64,
}

impl CategoryStats {
    pub fn losses(&self) -> u32 {
        self.total - self.wins
    }
}

/// Headline numbers across a set of matches for one player.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub average_kda: f64,
    pub cs_per_minute: f64,
    pub vision_per_game: f64,
}
