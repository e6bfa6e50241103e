//! Match snapshots and the proxy's match wire format.

use super::Entity;
use crate::key::EntityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One player's line in a match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub puuid: String,
    #[serde(default)]
    pub champion_id: i64,
    #[serde(default)]
    pub champion_name: String,
    /// `TOP`, `JUNGLE`, `MIDDLE`, `BOTTOM`, `UTILITY`, or empty for modes without lanes.
    #[serde(default)]
    pub team_position: String,
    #[serde(default)]
    pub win: bool,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub total_minions_killed: u32,
    #[serde(default)]
    pub neutral_minions_killed: u32,
    #[serde(default)]
    pub gold_earned: u32,
    #[serde(default)]
    pub vision_score: u32,
}

impl Participant {
    pub fn creep_score(&self) -> u32 {
        self.total_minions_killed.saturating_add(self.neutral_minions_killed)
    }

    /// `(kills + assists) / max(deaths, 1)`.
    pub fn kda(&self) -> f64 {
        f64::from(self.kills.saturating_add(self.assists)) / f64::from(self.deaths.max(1))
    }
}

/// Cached match snapshot.
///
/// Serialized camelCase; the snake_case names of older flat snapshots are
/// still accepted on input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(alias = "match_id")]
    pub match_id: String,
    /// Game start, unix millis.
    #[serde(alias = "game_creation")]
    pub game_creation: i64,
    /// Duration in seconds.
    #[serde(alias = "game_duration")]
    pub game_duration: i64,
    #[serde(alias = "queue_id")]
    pub queue_id: i64,
    #[serde(default, alias = "game_version")]
    pub game_version: String,
    pub participants: Vec<Participant>,
}

impl Match {
    /// The participant row belonging to `puuid`, if they played in this match.
    pub fn participant(&self, puuid: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.puuid == puuid)
    }

    pub fn duration_minutes(&self) -> f64 {
        self.game_duration as f64 / 60.0
    }

    pub fn played_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.game_creation)
    }
}

impl Entity for Match {
    const KIND: EntityKind = EntityKind::Match;

    fn entity_id(&self) -> String {
        self.match_id.clone()
    }

    fn sort_key(&self) -> i64 {
        self.game_creation
    }
}

/// `metadata` block of a match-v5 payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
}

/// `info` block of a match-v5 payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    #[serde(default)]
    pub game_creation: i64,
    #[serde(default)]
    pub game_duration: i64,
    #[serde(default)]
    pub queue_id: i64,
    #[serde(default)]
    pub game_version: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

/// Match as returned by `GET /riot/match`.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchPayload {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

impl From<MatchPayload> for Match {
    fn from(payload: MatchPayload) -> Self {
        Self {
            match_id: payload.metadata.match_id,
            game_creation: payload.info.game_creation,
            game_duration: payload.info.game_duration,
            queue_id: payload.info.queue_id,
            game_version: payload.info.game_version,
            participants: payload.info.participants,
        }
    }
}

/// Page returned by `GET /riot/matches`.
///
/// `ids` are newest first. `history` may inline some or all of the matches
/// behind those ids; entries that do not parse are ignored by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchesPage {
    #[serde(default)]
    pub puuid: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub history: Vec<serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_converts_to_snapshot() {
        let raw = serde_json::json!({
            "metadata": {"matchId": "EUW1_1", "participants": ["p1"]},
            "info": {
                "gameCreation": 1_700_000_000_000_i64,
                "gameDuration": 1800,
                "queueId": 420,
                "gameVersion": "14.1.1",
                "participants": [{
                    "puuid": "p1",
                    "championId": 266,
                    "championName": "Aatrox",
                    "teamPosition": "TOP",
                    "win": true,
                    "kills": 5,
                    "deaths": 2,
                    "assists": 7,
                    "totalMinionsKilled": 180,
                    "neutralMinionsKilled": 12,
                    "goldEarned": 12000,
                    "visionScore": 20,
                    "unknownField": "ignored"
                }]
            }
        });

        let payload: MatchPayload = serde_json::from_value(raw).unwrap();
        let m = Match::from(payload);
        assert_eq!(m.match_id, "EUW1_1");
        assert_eq!(m.sort_key(), 1_700_000_000_000);
        assert_eq!(m.played_at().map(|t| t.timestamp()), Some(1_700_000_000));

        let p = m.participant("p1").unwrap();
        assert_eq!(p.creep_score(), 192);
        assert!((p.kda() - 6.0).abs() < f64::EPSILON);
        assert!(m.participant("other").is_none());
    }

    #[test]
    fn test_kda_with_zero_deaths() {
        let p = Participant { kills: 3, assists: 4, deaths: 0, ..Default::default() };
        assert!((p.kda() - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kda_saturates_instead_of_overflowing() {
        let p = Participant { kills: u32::MAX, assists: 1, deaths: 1, ..Default::default() };
        assert!((p.kda() - f64::from(u32::MAX)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_serializes_camel_case_and_reads_snake_case() {
        let m = Match {
            match_id: "EUW1_9".to_string(),
            game_creation: 9,
            game_duration: 1200,
            queue_id: 420,
            game_version: "14.2".to_string(),
            participants: vec![Participant { puuid: "p1".to_string(), ..Default::default() }],
        };
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["matchId"], "EUW1_9");
        assert_eq!(value["gameCreation"], 9);
        assert!(value.get("match_id").is_none());
        assert_eq!(value["participants"][0]["teamPosition"], "");

        let legacy = serde_json::json!({
            "match_id": "EUW1_9",
            "game_creation": 9,
            "game_duration": 1200,
            "queue_id": 420,
            "game_version": "14.2",
            "participants": [{"puuid": "p1"}]
        });
        assert_eq!(serde_json::from_value::<Match>(legacy).unwrap(), m);
        assert_eq!(serde_json::from_value::<Match>(value).unwrap(), m);
    }
}
