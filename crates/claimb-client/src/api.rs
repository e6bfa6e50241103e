//! Typed endpoints of the Claimb proxy.

use crate::client::{RequestSpec, ResilientClient};
use crate::decoder::decode;
use crate::error::ClientError;
use claimb_types::{
    Account, CoachRequest, CoachResponse, LeagueEntry, Match, MatchPayload, MatchesPage, Summoner,
    TimelineLite,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub struct ProxyApi {
    client: Arc<ResilientClient>,
}

impl ProxyApi {
    pub fn new(client: Arc<ResilientClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ResilientClient> {
        &self.client
    }

    async fn fetch<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T, ClientError> {
        let response = self.client.execute(&spec).await?;
        decode(&response.body).map_err(|e| {
            tracing::warn!(
                path = %spec.path,
                target = e.target,
                original_len = e.original_len,
                cleaned_len = e.cleaned_len,
                "Failed to decode proxy response"
            );
            ClientError::Decode(e)
        })
    }

    /// One page of match history, newest first.
    pub async fn matches_page(
        &self,
        puuid: &str,
        region: &str,
        count: usize,
        start: usize,
    ) -> Result<MatchesPage, ClientError> {
        self.fetch(
            RequestSpec::get("/riot/matches")
                .query("puuid", puuid)
                .query("region", region)
                .query("count", count)
                .query("start", start),
        )
        .await
    }

    pub async fn match_detail(&self, match_id: &str, region: &str) -> Result<Match, ClientError> {
        let payload: MatchPayload = self
            .fetch(RequestSpec::get("/riot/match").query("matchId", match_id).query("region", region))
            .await?;
        Ok(payload.into())
    }

    pub async fn summoner(&self, puuid: &str, region: &str) -> Result<Summoner, ClientError> {
        self.fetch(RequestSpec::get("/riot/summoner").query("puuid", puuid).query("region", region))
            .await
    }

    /// Resolve a Riot ID (`gameName#tagLine`) to an account.
    pub async fn account(
        &self,
        game_name: &str,
        tag_line: &str,
        region: &str,
    ) -> Result<Account, ClientError> {
        self.fetch(
            RequestSpec::get("/riot/account")
                .query("gameName", game_name)
                .query("tagLine", tag_line)
                .query("region", region),
        )
        .await
    }

    pub async fn league_entries(
        &self,
        puuid: &str,
        region: &str,
    ) -> Result<Vec<LeagueEntry>, ClientError> {
        self.fetch(
            RequestSpec::get("/riot/league-entries").query("puuid", puuid).query("region", region),
        )
        .await
    }

    pub async fn timeline_lite(
        &self,
        match_id: &str,
        puuid: &str,
        region: &str,
    ) -> Result<TimelineLite, ClientError> {
        let body = serde_json::json!({ "matchId": match_id, "puuid": puuid, "region": region });
        self.fetch(RequestSpec::post("/riot/timeline-lite", body)).await
    }

    pub async fn coach(&self, request: &CoachRequest) -> Result<CoachResponse, ClientError> {
        let body = serde_json::to_value(request)
            .map_err(|e| ClientError::InvalidResponse(format!("unserializable coach request: {}", e)))?;
        self.fetch(RequestSpec::post("/ai/coach", body)).await
    }

    /// Ask the coach for a structured answer and decode its text as `T`.
    ///
    /// Models tend to wrap JSON output in code fences; the decoder strips them.
    pub async fn coach_json<T: DeserializeOwned>(
        &self,
        request: &CoachRequest,
    ) -> Result<T, ClientError> {
        let response = self.coach(request).await?;
        Ok(decode(&response.text)?)
    }
}
