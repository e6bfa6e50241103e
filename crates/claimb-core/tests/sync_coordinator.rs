#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "panics are the assertion mechanism in tests")]

use async_trait::async_trait;
use claimb_client::ClientError;
use claimb_core::{
    AppConfig, LocalStore, MemoryStore, ProxyRemote, RemoteSource, SqliteStore, SyncCoordinator,
};
use claimb_types::{
    Champion, EntityKind, Match, MatchesPage, Participant, RequestKey, Summoner, SyncError,
    SyncResult,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PUUID: &str = "puuid-1";
const REGION: &str = "europe";

/// Match `m<n>` was created at `n` seconds; higher numbers are newer.
fn match_for(id: &str) -> Match {
    let n: i64 = id.trim_start_matches('m').parse().expect("numeric match id");
    Match {
        match_id: id.to_string(),
        game_creation: n * 1000,
        game_duration: 1800,
        queue_id: 420,
        game_version: "14.1".to_string(),
        participants: vec![Participant {
            puuid: PUUID.to_string(),
            team_position: if n % 2 == 0 { "TOP" } else { "JUNGLE" }.to_string(),
            champion_name: "Aatrox".to_string(),
            win: n % 2 == 0,
            ..Default::default()
        }],
    }
}

fn ids(n_newest: usize, n_oldest: usize) -> Vec<String> {
    (n_oldest..=n_newest).rev().map(|n| format!("m{}", n)).collect()
}

fn match_ids(matches: &[Match]) -> Vec<&str> {
    matches.iter().map(|m| m.match_id.as_str()).collect()
}

/// Scripted remote: serves `ids` newest first and resolves details on demand.
#[derive(Default)]
struct FakeRemote {
    ids: Mutex<Vec<String>>,
    failing_details: Mutex<HashSet<String>>,
    page_status: Mutex<Option<u16>>,
    delay: Duration,
    page_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    summoner_calls: AtomicUsize,
    champion_calls: AtomicUsize,
}

impl FakeRemote {
    fn with_ids(ids: Vec<String>) -> Self {
        Self { ids: Mutex::new(ids), ..Default::default() }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn set_ids(&self, ids: Vec<String>) {
        *self.ids.lock() = ids;
    }

    fn fail_page_with(&self, status: u16) {
        *self.page_status.lock() = Some(status);
    }

    fn fail_detail(&self, id: &str) {
        self.failing_details.lock().insert(id.to_string());
    }

    fn pages(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    fn details(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteSource for FakeRemote {
    async fn match_page(
        &self,
        puuid: &str,
        region: &str,
        count: usize,
        start: usize,
    ) -> Result<MatchesPage, ClientError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if let Some(status) = *self.page_status.lock() {
            return Err(ClientError::Http { status, body: "scripted failure".to_string() });
        }
        let ids: Vec<String> = self.ids.lock().iter().skip(start).take(count).cloned().collect();
        Ok(MatchesPage {
            puuid: puuid.to_string(),
            region: region.to_string(),
            start,
            count: ids.len(),
            ids,
            history: Vec::new(),
        })
    }

    async fn match_detail(&self, match_id: &str, _region: &str) -> Result<Match, ClientError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_details.lock().contains(match_id) {
            return Err(ClientError::Http { status: 404, body: "match not found".to_string() });
        }
        Ok(match_for(match_id))
    }

    async fn summoner(&self, puuid: &str, _region: &str) -> Result<Summoner, ClientError> {
        let calls = self.summoner_calls.fetch_add(1, Ordering::SeqCst) as i64;
        tokio::time::sleep(self.delay).await;
        Ok(Summoner {
            puuid: puuid.to_string(),
            id: None,
            summoner_level: 100 + calls,
            profile_icon_id: 7,
            revision_date: calls,
        })
    }

    async fn champions(&self, _locale: &str) -> Result<Vec<Champion>, ClientError> {
        self.champion_calls.fetch_add(1, Ordering::SeqCst);
        Ok(["Zed", "Ahri"]
            .iter()
            .enumerate()
            .map(|(i, name)| Champion {
                key: i.to_string(),
                id: (*name).to_string(),
                name: (*name).to_string(),
                title: String::new(),
                tags: Vec::new(),
            })
            .collect())
    }
}

fn coordinator(remote: &Arc<FakeRemote>, store: &Arc<MemoryStore>) -> SyncCoordinator {
    SyncCoordinator::new(remote.clone(), store.clone())
}

#[tokio::test]
async fn test_concurrent_requests_share_one_fetch() {
    let remote = Arc::new(FakeRemote::with_ids(ids(3, 1)).slow(Duration::from_millis(50)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);

    let calls = (0..10).map(|_| {
        let sync = sync.clone();
        async move { sync.request_matches(PUUID, REGION, 20).await }
    });
    let results = futures::future::join_all(calls).await;

    assert_eq!(remote.pages(), 1);
    assert_eq!(remote.details(), 3);
    let first = results[0].loaded().expect("loaded");
    assert_eq!(match_ids(first), vec!["m3", "m2", "m1"]);
    assert!(results.iter().all(|r| r == &results[0]));
    assert_eq!(sync.in_flight().await, 0);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_error() {
    let remote = Arc::new(FakeRemote::with_ids(ids(3, 1)).slow(Duration::from_millis(50)));
    remote.fail_page_with(500);
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);

    let calls = (0..5).map(|_| {
        let sync = sync.clone();
        async move { sync.request_matches(PUUID, REGION, 20).await }
    });
    let results = futures::future::join_all(calls).await;

    assert_eq!(remote.pages(), 1);
    for result in &results {
        match result {
            SyncResult::Error(SyncError::Http { status, .. }) => assert_eq!(*status, 500),
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }
    assert!(results.iter().all(|r| r == &results[0]));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_resolved_key_is_removed_and_refetched() {
    let remote = Arc::new(FakeRemote::with_ids(ids(2, 1)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);
    let key = RequestKey::matches(PUUID, REGION, 20);

    assert!(sync.request_matches(PUUID, REGION, 20).await.is_loaded());
    assert!(!sync.is_in_flight(&key).await);

    assert!(sync.request_matches(PUUID, REGION, 20).await.is_loaded());
    assert_eq!(remote.pages(), 2);
}

#[tokio::test]
async fn test_different_keys_do_not_share() {
    let remote = Arc::new(FakeRemote::with_ids(ids(2, 1)).slow(Duration::from_millis(20)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);

    let (a, b) = tokio::join!(
        sync.request_matches(PUUID, REGION, 20),
        sync.request_matches(PUUID, REGION, 1)
    );
    assert_eq!(remote.pages(), 2);
    assert_eq!(a.loaded().map(Vec::len), Some(2));
    assert_eq!(b.loaded().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_refresh_fetches_only_new_matches_and_keeps_old_ones() {
    let remote = Arc::new(FakeRemote::with_ids(ids(3, 1)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);

    assert!(sync.request_matches(PUUID, REGION, 20).await.is_loaded());
    assert_eq!(remote.details(), 3);

    // Page now only lists the two newest games; m1..m3 fell off it.
    remote.set_ids(vec!["m5".to_string(), "m4".to_string()]);
    let refreshed = sync.refresh_matches(PUUID, REGION, 20).await;

    assert_eq!(remote.details(), 5);
    let refreshed = refreshed.loaded().expect("loaded");
    assert_eq!(match_ids(refreshed), vec!["m5", "m4", "m3", "m2", "m1"]);
    assert_eq!(store.len(EntityKind::Match, PUUID), 5);
}

#[tokio::test]
async fn test_request_on_warm_cache_fetches_only_new_details() {
    let remote = Arc::new(FakeRemote::with_ids(ids(3, 1)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);
    assert!(sync.request_matches(PUUID, REGION, 20).await.is_loaded());
    assert_eq!(remote.details(), 3);

    remote.set_ids(ids(5, 1));
    let merged = sync.request_matches(PUUID, REGION, 20).await;

    assert_eq!(match_ids(merged.loaded().expect("loaded")), vec!["m5", "m4", "m3", "m2", "m1"]);
    assert_eq!(remote.details(), 5);
    assert_eq!(remote.pages(), 2);
}

#[tokio::test]
async fn test_larger_limit_fills_in_older_matches() {
    let remote = Arc::new(FakeRemote::with_ids(ids(6, 1)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);

    let small = sync.request_matches(PUUID, REGION, 2).await;
    assert_eq!(match_ids(small.loaded().expect("loaded")), vec!["m6", "m5"]);

    let larger = sync.request_matches(PUUID, REGION, 5).await;
    assert_eq!(match_ids(larger.loaded().expect("loaded")), vec!["m6", "m5", "m4", "m3", "m2"]);
    assert_eq!(remote.details(), 5);

    let refreshed = sync.refresh_matches(PUUID, REGION, 6).await;
    assert_eq!(refreshed.loaded().map(Vec::len), Some(6));
    assert_eq!(remote.details(), 6);
}

#[tokio::test]
async fn test_refresh_pages_back_until_it_meets_the_cache() {
    let remote = Arc::new(FakeRemote::with_ids(ids(3, 1)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);
    assert!(sync.request_matches(PUUID, REGION, 3).await.is_loaded());
    assert_eq!(remote.pages(), 1);

    // Seven games were played since the last sync, more than one page holds.
    remote.set_ids(ids(10, 1));
    let newest = sync.refresh_matches(PUUID, REGION, 3).await;

    assert_eq!(match_ids(newest.loaded().expect("loaded")), vec!["m10", "m9", "m8"]);
    assert_eq!(remote.pages(), 4);
    assert_eq!(remote.details(), 10);
    assert_eq!(store.len(EntityKind::Match, PUUID), 10);

    let all = sync.refresh_matches(PUUID, REGION, 10).await;
    let expected = ids(10, 1);
    assert_eq!(
        match_ids(all.loaded().expect("loaded")),
        expected.iter().map(String::as_str).collect::<Vec<_>>()
    );
    assert_eq!(remote.details(), 10);
}

#[tokio::test]
async fn test_refresh_is_not_deduplicated_against_request() {
    let remote = Arc::new(FakeRemote::with_ids(ids(3, 1)).slow(Duration::from_millis(50)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);

    let (requested, refreshed) = tokio::join!(
        sync.request_matches(PUUID, REGION, 20),
        sync.refresh_matches(PUUID, REGION, 20)
    );

    assert_eq!(remote.pages(), 2);
    assert_eq!(requested.loaded().map(Vec::len), Some(3));
    assert_eq!(requested, refreshed);
    assert_eq!(store.len(EntityKind::Match, PUUID), 3);
}

#[tokio::test]
async fn test_refresh_is_idempotent() {
    let remote = Arc::new(FakeRemote::with_ids(ids(4, 1)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);

    let first = sync.refresh_matches(PUUID, REGION, 20).await;
    let details_after_first = remote.details();
    let second = sync.refresh_matches(PUUID, REGION, 20).await;

    assert!(first.is_loaded());
    assert_eq!(first, second);
    assert_eq!(remote.details(), details_after_first);
    assert_eq!(store.len(EntityKind::Match, PUUID), 4);
}

#[tokio::test]
async fn test_failed_refresh_leaves_cache_untouched() {
    let remote = Arc::new(FakeRemote::with_ids(ids(2, 1)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);
    assert!(sync.request_matches(PUUID, REGION, 20).await.is_loaded());

    remote.set_ids(ids(5, 1));
    remote.fail_detail("m4");
    let result = sync.refresh_matches(PUUID, REGION, 20).await;

    assert!(matches!(result, SyncResult::Error(SyncError::Http { status: 404, .. })));
    let cached = sync.cached_matches(PUUID, None).await.expect("cache readable");
    assert_eq!(match_ids(&cached), vec!["m2", "m1"]);
}

#[tokio::test]
async fn test_limit_caps_returned_matches() {
    let remote = Arc::new(FakeRemote::with_ids(ids(6, 1)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);

    assert!(sync.request_matches(PUUID, REGION, 20).await.is_loaded());
    let limited = sync.request_matches(PUUID, REGION, 2).await;

    assert_eq!(match_ids(limited.loaded().expect("loaded")), vec!["m6", "m5"]);
    assert_eq!(store.len(EntityKind::Match, PUUID), 6);
}

#[tokio::test]
async fn test_dropped_caller_does_not_cancel_fetch() {
    let remote = Arc::new(FakeRemote::with_ids(ids(3, 1)).slow(Duration::from_millis(50)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);
    let key = RequestKey::matches(PUUID, REGION, 20);

    let caller = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.request_matches(PUUID, REGION, 20).await })
    };
    while !sync.is_in_flight(&key).await {
        tokio::task::yield_now().await;
    }
    caller.abort();

    tokio::time::timeout(Duration::from_secs(5), async {
        while sync.is_in_flight(&key).await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("fetch resolves");

    assert_eq!(store.len(EntityKind::Match, PUUID), 3);
}

#[tokio::test]
async fn test_summoner_is_superseded_on_refresh() {
    let remote = Arc::new(FakeRemote::default());
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);

    let first = sync.request_summoner(PUUID, REGION).await;
    assert_eq!(first.loaded().map(|s| s.summoner_level), Some(100));

    let second = sync.refresh_summoner(PUUID, REGION).await;
    assert_eq!(second.loaded().map(|s| s.summoner_level), Some(101));
    assert_eq!(store.len(EntityKind::Summoner, PUUID), 1);
}

#[tokio::test]
async fn test_champions_sorted_and_cached_per_locale() {
    let remote = Arc::new(FakeRemote::default());
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);

    let champions = sync.request_champions("en_US").await;
    let names: Vec<&str> =
        champions.loaded().expect("loaded").iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ahri", "Zed"]);

    assert!(sync.refresh_champions("en_US").await.is_loaded());
    assert_eq!(remote.champion_calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.len(EntityKind::Champion, "en_US"), 2);
    assert_eq!(store.len(EntityKind::Champion, "ko_KR"), 0);
}

#[tokio::test]
async fn test_clear_cache_forces_full_fetch() {
    let remote = Arc::new(FakeRemote::with_ids(ids(2, 1)));
    let store = Arc::new(MemoryStore::new());
    let sync = coordinator(&remote, &store);

    assert!(sync.request_matches(PUUID, REGION, 20).await.is_loaded());
    sync.clear_cache().await.expect("clears");
    assert!(store.is_empty());

    assert!(sync.request_matches(PUUID, REGION, 20).await.is_loaded());
    assert_eq!(remote.details(), 4);
}

fn proxy_match(id: &str, creation: i64) -> serde_json::Value {
    serde_json::json!({
        "metadata": {"matchId": id},
        "info": {
            "gameCreation": creation,
            "gameDuration": 1500,
            "queueId": 420,
            "participants": [{"puuid": PUUID, "teamPosition": "MIDDLE", "win": true}]
        }
    })
}

#[tokio::test]
async fn test_proxy_remote_with_sqlite_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/riot/matches"))
        .and(query_param("puuid", PUUID))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "puuid": PUUID,
            "region": REGION,
            "start": 0,
            "count": 2,
            "ids": ["EUW1_2", "EUW1_1"],
            "history": [proxy_match("EUW1_2", 2000)]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/riot/match"))
        .and(query_param("matchId", "EUW1_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(proxy_match("EUW1_1", 1000)))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = AppConfig::default();
    config.proxy.base_url = server.uri();
    config.ddragon_url = server.uri();
    let remote = Arc::new(ProxyRemote::from_config(&config).expect("remote builds"));

    let dir = tempfile::tempdir().expect("tempdir");
    let store: Arc<dyn LocalStore> =
        Arc::new(SqliteStore::open(&dir.path().join("cache.db")).expect("db opens"));
    let sync = SyncCoordinator::new(remote, store);

    let result = sync.request_matches(PUUID, REGION, 20).await;
    let matches = result.loaded().expect("loaded");
    assert_eq!(match_ids(matches), vec!["EUW1_2", "EUW1_1"]);

    let stats = claimb_core::stats::role_stats(matches, PUUID);
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].category, "MIDDLE");
    assert_eq!(stats[0].total, 2);
}
