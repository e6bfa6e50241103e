//! Champion catalogue from Riot's public Data Dragon CDN.

use crate::client::{RequestSpec, ResilientClient};
use crate::decoder::decode;
use crate::error::ClientError;
use claimb_types::models::ChampionCatalog;
use claimb_types::Champion;
use std::sync::Arc;

pub const DEFAULT_DDRAGON_URL: &str = "https://ddragon.leagueoflegends.com";

pub struct DataDragon {
    client: Arc<ResilientClient>,
}

impl DataDragon {
    /// `client` must point at the Data Dragon host and carry no proxy credentials.
    pub fn new(client: Arc<ResilientClient>) -> Self {
        Self { client }
    }

    pub async fn latest_version(&self) -> Result<String, ClientError> {
        let response = self.client.execute(&RequestSpec::get("/api/versions.json")).await?;
        let versions: Vec<String> = decode(&response.body)?;
        versions
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::InvalidResponse("empty Data Dragon version list".to_string()))
    }

    pub async fn champions(&self, version: &str, locale: &str) -> Result<Vec<Champion>, ClientError> {
        let path = format!("/cdn/{}/data/{}/champion.json", version, locale);
        let response = self.client.execute(&RequestSpec::get(path)).await?;
        let catalog: ChampionCatalog = decode(&response.body)?;
        Ok(catalog.into_champions())
    }

    /// Champions for the newest published patch.
    pub async fn latest_champions(&self, locale: &str) -> Result<Vec<Champion>, ClientError> {
        let version = self.latest_version().await?;
        tracing::debug!(%version, %locale, "Fetching champion catalogue");
        self.champions(&version, locale).await
    }
}
