//! Per-key in-flight registry.
//!
//! The first caller for a key registers a `watch` channel and spawns the
//! fetch; later callers subscribe to the same channel. The spawned task
//! publishes the result and removes the entry under one lock acquisition, so
//! a key is never in flight twice and never lingers after resolution.

use claimb_types::{RequestKey, SyncError, SyncResult};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::debug;

type Slot<T> = watch::Receiver<Option<SyncResult<T>>>;

pub struct InFlightRegistry<T> {
    entries: Mutex<HashMap<RequestKey, Slot<T>>>,
}

impl<T> Default for InFlightRegistry<T> {
    fn default() -> Self {
        Self { entries: Mutex::new(HashMap::new()) }
    }
}

impl<T> InFlightRegistry<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &RequestKey) -> bool {
        self.entries.lock().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Await the in-flight fetch for `key`, starting `start()` if there is none.
    ///
    /// The fetch runs on its own task: dropping this future abandons only this
    /// caller's wait.
    pub async fn run<F, Fut>(self: &Arc<Self>, key: RequestKey, start: F) -> SyncResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SyncResult<T>> + Send + 'static,
    {
        let slot = {
            let mut entries = self.entries.lock().await;
            if let Some(slot) = entries.get(&key) {
                debug!(%key, "Joining in-flight request");
                slot.clone()
            } else {
                let (tx, rx) = watch::channel(None);
                entries.insert(key.clone(), rx.clone());
                self.spawn(key, tx, start());
                rx
            }
        };
        wait(slot).await
    }

    fn spawn<Fut>(
        self: &Arc<Self>,
        key: RequestKey,
        tx: watch::Sender<Option<SyncResult<T>>>,
        fut: Fut,
    ) where
        Fut: Future<Output = SyncResult<T>> + Send + 'static,
    {
        let registry = Arc::clone(self);
        debug!(%key, "Starting request");
        tokio::spawn(async move {
            let result = match tokio::spawn(fut).await {
                Ok(result) => result,
                Err(e) => SyncResult::Error(SyncError::InvalidResponse {
                    message: format!("sync task for {} aborted: {}", key, e),
                }),
            };
            registry.complete(&key, &tx, result).await;
        });
    }

    async fn complete(
        &self,
        key: &RequestKey,
        tx: &watch::Sender<Option<SyncResult<T>>>,
        result: SyncResult<T>,
    ) {
        let mut entries = self.entries.lock().await;
        tx.send_replace(Some(result));
        entries.remove(key);
        debug!(%key, "Request resolved");
    }
}

async fn wait<T: Clone>(mut slot: Slot<T>) -> SyncResult<T> {
    let resolved = match slot.wait_for(Option::is_some).await {
        Ok(value) => value.clone(),
        Err(_) => None,
    };
    resolved.unwrap_or_else(|| {
        SyncResult::Error(SyncError::InvalidResponse {
            message: "sync task ended without publishing a result".to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn key() -> RequestKey {
        RequestKey::matches("p1", "europe", 10)
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_execution() {
        let registry = Arc::new(InFlightRegistry::<u32>::new());
        let runs = Arc::new(AtomicUsize::new(0));

        let calls = (0..8).map(|_| {
            let registry = Arc::clone(&registry);
            let runs = Arc::clone(&runs);
            async move {
                registry
                    .run(key(), move || async move {
                        runs.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        SyncResult::Loaded(7)
                    })
                    .await
            }
        });
        let results = futures::future::join_all(calls).await;

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| *r == SyncResult::Loaded(7)));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_entry_removed_after_error_and_next_call_runs_again() {
        let registry = Arc::new(InFlightRegistry::<u32>::new());
        let err = SyncError::Network { message: "offline".into() };

        let first = registry.run(key(), || {
            let err = err.clone();
            async move { SyncResult::Error(err) }
        });
        assert_eq!(first.await, SyncResult::Error(err.clone()));
        assert!(!registry.contains(&key()).await);

        let second = registry.run(key(), || async { SyncResult::Loaded(1) }).await;
        assert_eq!(second, SyncResult::Loaded(1));
    }

    #[tokio::test]
    async fn test_cancelled_caller_does_not_cancel_fetch() {
        let registry = Arc::new(InFlightRegistry::<u32>::new());
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let owner = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry
                    .run(key(), move || async move {
                        let _ = release_rx.await;
                        SyncResult::Loaded(42)
                    })
                    .await
            })
        };
        while !registry.contains(&key()).await {
            tokio::task::yield_now().await;
        }

        let joiner = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry.run(key(), || async { SyncResult::Loaded(0) }).await
            })
        };
        tokio::task::yield_now().await;

        owner.abort();
        let _ = release_tx.send(());

        assert_eq!(joiner.await.ok(), Some(SyncResult::Loaded(42)));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_panicking_fetch_still_cleans_up() {
        let registry = Arc::new(InFlightRegistry::<u32>::new());
        let result = registry
            .run(key(), || async {
                if key().owner == "p1" {
                    panic!("boom");
                }
                SyncResult::Loaded(0)
            })
            .await;

        assert!(matches!(result, SyncResult::Error(SyncError::InvalidResponse { .. })));
        assert!(registry.is_empty().await);
    }
}
