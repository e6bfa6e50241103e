//! Remote source of truth consumed by the sync coordinator.

use crate::config::AppConfig;
use crate::error::AppResult;
use async_trait::async_trait;
use claimb_client::{ClaimbAuth, ClientError, DataDragon, ProxyApi, ResilientClient};
use claimb_types::{Champion, Match, MatchesPage, Summoner};
use std::sync::Arc;

#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Match ids (newest first) starting at `start`, with optional inline payloads.
    async fn match_page(
        &self,
        puuid: &str,
        region: &str,
        count: usize,
        start: usize,
    ) -> Result<MatchesPage, ClientError>;

    async fn match_detail(&self, match_id: &str, region: &str) -> Result<Match, ClientError>;

    async fn summoner(&self, puuid: &str, region: &str) -> Result<Summoner, ClientError>;

    async fn champions(&self, locale: &str) -> Result<Vec<Champion>, ClientError>;
}

/// Production source: Claimb proxy for player data, Data Dragon for champions.
pub struct ProxyRemote {
    api: ProxyApi,
    ddragon: DataDragon,
}

impl ProxyRemote {
    pub fn new(api: ProxyApi, ddragon: DataDragon) -> Self {
        Self { api, ddragon }
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let auth = ClaimbAuth::new(
            config.proxy.anon_key.clone(),
            config.proxy.app_token.clone(),
            config.proxy.device_id.clone(),
        );
        let proxy = ResilientClient::new(config.client_config())?.with_decorator(Arc::new(auth));
        let ddragon = ResilientClient::new(config.ddragon_client_config())?;
        Ok(Self::new(ProxyApi::new(Arc::new(proxy)), DataDragon::new(Arc::new(ddragon))))
    }

    pub fn api(&self) -> &ProxyApi {
        &self.api
    }
}

#[async_trait]
impl RemoteSource for ProxyRemote {
    async fn match_page(
        &self,
        puuid: &str,
        region: &str,
        count: usize,
        start: usize,
    ) -> Result<MatchesPage, ClientError> {
        self.api.matches_page(puuid, region, count, start).await
    }

    async fn match_detail(&self, match_id: &str, region: &str) -> Result<Match, ClientError> {
        self.api.match_detail(match_id, region).await
    }

    async fn summoner(&self, puuid: &str, region: &str) -> Result<Summoner, ClientError> {
        self.api.summoner(puuid, region).await
    }

    async fn champions(&self, locale: &str) -> Result<Vec<Champion>, ClientError> {
        self.ddragon.latest_champions(locale).await
    }
}
