//! Match history reconciliation.

use crate::error::AppResult;
use crate::remote::RemoteSource;
use claimb_types::{Match, MatchPayload, MatchesPage};
use futures::{StreamExt, TryStreamExt};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Detail lookups issued concurrently while resolving one page.
const DETAIL_FETCH_CONCURRENCY: usize = 4;

/// Ids on `page_ids` not in `seen`, in page order. Returned ids are added to `seen`.
pub(crate) fn new_match_ids(page_ids: &[String], seen: &mut HashSet<String>) -> Vec<String> {
    page_ids.iter().filter(|id| seen.insert((*id).clone())).cloned().collect()
}

/// Whether paging can stop after a page of `page_size` ids.
///
/// A cold cache takes a single page. A warm cache keeps paging until the page
/// overlaps the cache or the remote history runs out.
pub(crate) fn is_last_page(
    page_ids: &[String],
    page_size: usize,
    cached: &HashSet<String>,
) -> bool {
    cached.is_empty()
        || page_ids.is_empty()
        || page_ids.len() < page_size
        || page_ids.iter().any(|id| cached.contains(id))
}

/// Matches inlined in `history`, by id. Accepts the match-v5 payload shape
/// and the flat snapshot shape; anything else is skipped.
pub(crate) fn inline_matches(history: &[serde_json::Value]) -> HashMap<String, Match> {
    let mut found = HashMap::new();
    for entry in history {
        let parsed = serde_json::from_value::<MatchPayload>(entry.clone())
            .map(Match::from)
            .or_else(|_| serde_json::from_value::<Match>(entry.clone()));
        match parsed {
            Ok(m) => {
                found.insert(m.match_id.clone(), m);
            },
            Err(e) => debug!(error = %e, "Skipping unparseable history entry"),
        }
    }
    found
}

/// Resolve every id in `ids` to a full match, preferring inline payloads.
///
/// Fails as a whole if any detail lookup fails, so nothing partial reaches the
/// store.
pub(crate) async fn resolve_matches(
    remote: &dyn RemoteSource,
    page: &MatchesPage,
    ids: &[String],
    region: &str,
) -> AppResult<Vec<Match>> {
    let mut inline = inline_matches(&page.history);
    let mut resolved = Vec::with_capacity(ids.len());
    let mut missing = Vec::new();
    for id in ids {
        match inline.remove(id) {
            Some(m) => resolved.push(m),
            None => missing.push(id.as_str()),
        }
    }

    if !missing.is_empty() {
        debug!(count = missing.len(), "Fetching match details");
        let lookups: Vec<_> = missing.iter().map(|id| remote.match_detail(id, region)).collect();
        let fetched: Vec<Match> = futures::stream::iter(lookups)
            .buffered(DETAIL_FETCH_CONCURRENCY)
            .try_collect()
            .await
            .inspect_err(|e| warn!(error = %e, "Match detail fetch failed"))?;
        resolved.extend(fetched);
    }
    Ok(resolved)
}
