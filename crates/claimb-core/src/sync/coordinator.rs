use super::inflight::InFlightRegistry;
use super::matches::{is_last_page, new_match_ids, resolve_matches};
use crate::error::AppResult;
use crate::remote::RemoteSource;
use crate::store::{read_entities, write_entities, LocalStore};
use claimb_types::{Champion, Match, RequestKey, Summoner, SyncError, SyncResult};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Reconciles remote data with the local store, one fetch per key at a time.
///
/// Cheap to clone; clones share the store, the remote and the in-flight
/// registries.
#[derive(Clone)]
pub struct SyncCoordinator {
    remote: Arc<dyn RemoteSource>,
    store: Arc<dyn LocalStore>,
    matches: Arc<InFlightRegistry<Vec<Match>>>,
    champions: Arc<InFlightRegistry<Vec<Champion>>>,
    summoners: Arc<InFlightRegistry<Summoner>>,
}

impl SyncCoordinator {
    pub fn new(remote: Arc<dyn RemoteSource>, store: Arc<dyn LocalStore>) -> Self {
        Self {
            remote,
            store,
            matches: Arc::new(InFlightRegistry::new()),
            champions: Arc::new(InFlightRegistry::new()),
            summoners: Arc::new(InFlightRegistry::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn LocalStore> {
        &self.store
    }

    /// Number of keys currently being fetched, across all families.
    pub async fn in_flight(&self) -> usize {
        self.matches.len().await + self.champions.len().await + self.summoners.len().await
    }

    pub async fn is_in_flight(&self, key: &RequestKey) -> bool {
        self.matches.contains(key).await
            || self.champions.contains(key).await
            || self.summoners.contains(key).await
    }

    // ---- Matches ----

    /// Newest `limit` matches for `puuid`, syncing with the remote first.
    pub async fn request_matches(
        &self,
        puuid: &str,
        region: &str,
        limit: usize,
    ) -> SyncResult<Vec<Match>> {
        let key = RequestKey::matches(puuid, region, limit);
        let this = self.clone();
        let (puuid, region) = (puuid.to_string(), region.to_string());
        self.matches
            .run(key.clone(), move || async move {
                this.sync_matches(&key, &puuid, &region, limit).await
            })
            .await
    }

    /// Incremental sync that bypasses request deduplication.
    pub async fn refresh_matches(
        &self,
        puuid: &str,
        region: &str,
        limit: usize,
    ) -> SyncResult<Vec<Match>> {
        let key = RequestKey::matches(puuid, region, limit);
        self.sync_matches(&key, puuid, region, limit).await
    }

    /// Cached matches without touching the remote.
    pub async fn cached_matches(&self, puuid: &str, limit: Option<usize>) -> AppResult<Vec<Match>> {
        read_entities(self.store.as_ref(), puuid, limit).await
    }

    async fn sync_matches(
        &self,
        key: &RequestKey,
        puuid: &str,
        region: &str,
        limit: usize,
    ) -> SyncResult<Vec<Match>> {
        let started = Instant::now();
        let outcome = self.merge_matches(puuid, region, limit).await;
        finish(key, started, outcome, Vec::len)
    }

    /// Full fetch of one page on a cold cache. On a warm cache, pages back
    /// until the listing meets the cache so no gap is left between them.
    async fn merge_matches(
        &self,
        puuid: &str,
        region: &str,
        limit: usize,
    ) -> AppResult<Vec<Match>> {
        let store = self.store.as_ref();
        let cached: Vec<Match> = read_entities(store, puuid, None).await?;
        let cached_ids: HashSet<String> = cached.into_iter().map(|m| m.match_id).collect();

        let mut seen = cached_ids.clone();
        let mut fresh = Vec::new();
        let mut start = 0;
        let mut pages = 0_usize;
        loop {
            let page = self.remote.match_page(puuid, region, limit, start).await?;
            pages += 1;
            let new_ids = new_match_ids(&page.ids, &mut seen);
            fresh.extend(resolve_matches(self.remote.as_ref(), &page, &new_ids, region).await?);
            if is_last_page(&page.ids, limit, &cached_ids) {
                break;
            }
            start += page.ids.len();
        }
        info!(
            puuid,
            cached = cached_ids.len(),
            pages,
            new = fresh.len(),
            full = cached_ids.is_empty(),
            "Reconciling match history"
        );

        write_entities(store, puuid, &fresh).await?;
        read_entities(store, puuid, Some(limit)).await
    }

    // ---- Champions ----

    /// Champion catalogue for `locale`, sorted by name.
    pub async fn request_champions(&self, locale: &str) -> SyncResult<Vec<Champion>> {
        let key = RequestKey::champions(locale);
        let this = self.clone();
        let locale = locale.to_string();
        self.champions
            .run(key.clone(), move || async move { this.sync_champions(&key, &locale).await })
            .await
    }

    pub async fn refresh_champions(&self, locale: &str) -> SyncResult<Vec<Champion>> {
        self.sync_champions(&RequestKey::champions(locale), locale).await
    }

    async fn sync_champions(&self, key: &RequestKey, locale: &str) -> SyncResult<Vec<Champion>> {
        let started = Instant::now();
        let outcome = self.merge_champions(locale).await;
        finish(key, started, outcome, Vec::len)
    }

    async fn merge_champions(&self, locale: &str) -> AppResult<Vec<Champion>> {
        let fetched = self.remote.champions(locale).await?;
        write_entities(self.store.as_ref(), locale, &fetched).await?;
        let mut champions: Vec<Champion> = read_entities(self.store.as_ref(), locale, None).await?;
        champions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(champions)
    }

    // ---- Summoner ----

    pub async fn request_summoner(&self, puuid: &str, region: &str) -> SyncResult<Summoner> {
        let key = RequestKey::summoner(puuid, region);
        let this = self.clone();
        let (puuid, region) = (puuid.to_string(), region.to_string());
        self.summoners
            .run(key.clone(), move || async move {
                this.sync_summoner(&key, &puuid, &region).await
            })
            .await
    }

    pub async fn refresh_summoner(&self, puuid: &str, region: &str) -> SyncResult<Summoner> {
        self.sync_summoner(&RequestKey::summoner(puuid, region), puuid, region).await
    }

    async fn sync_summoner(
        &self,
        key: &RequestKey,
        puuid: &str,
        region: &str,
    ) -> SyncResult<Summoner> {
        let started = Instant::now();
        let outcome = self.merge_summoner(puuid, region).await;
        finish(key, started, outcome, |_| 1)
    }

    async fn merge_summoner(&self, puuid: &str, region: &str) -> AppResult<Summoner> {
        let fetched = self.remote.summoner(puuid, region).await?;
        write_entities(self.store.as_ref(), puuid, std::slice::from_ref(&fetched)).await?;
        let cached: Vec<Summoner> = read_entities(self.store.as_ref(), puuid, Some(1)).await?;
        Ok(cached.into_iter().next().unwrap_or(fetched))
    }

    /// Drop every cached entity. In-flight fetches are unaffected.
    pub async fn clear_cache(&self) -> AppResult<()> {
        self.store.clear_all().await?;
        info!("Local cache cleared");
        Ok(())
    }
}

fn finish<T>(
    key: &RequestKey,
    started: Instant,
    outcome: AppResult<T>,
    count: impl FnOnce(&T) -> usize,
) -> SyncResult<T> {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match outcome {
        Ok(value) => {
            info!(%key, count = count(&value), elapsed_ms, "⏱️ Sync complete");
            SyncResult::Loaded(value)
        },
        Err(e) => {
            warn!(%key, elapsed_ms, error = %e, "Sync failed");
            SyncResult::Error(SyncError::from(e))
        },
    }
}
