//! Reachability hints consulted before the first attempt.
//!
//! A negative answer only delays the request by the configured grace period;
//! it never fails it.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

/// Issues a lightweight `HEAD` against the proxy host.
///
/// Any HTTP response, whatever its status, counts as reachable.
pub struct HttpProbe {
    http: Client,
    url: String,
}

impl HttpProbe {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }
}

#[async_trait]
impl ConnectivityProbe for HttpProbe {
    async fn is_reachable(&self) -> bool {
        match self.http.head(&self.url).timeout(PROBE_TIMEOUT).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(url = %self.url, error = %e, "Reachability probe failed");
                false
            },
        }
    }
}

/// Fixed answer, for tests and for callers that manage connectivity themselves.
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub bool);

impl StaticProbe {
    pub const fn reachable() -> Self {
        Self(true)
    }

    pub const fn unreachable() -> Self {
        Self(false)
    }
}

#[async_trait]
impl ConnectivityProbe for StaticProbe {
    async fn is_reachable(&self) -> bool {
        self.0
    }
}
