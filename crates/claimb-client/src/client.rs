use crate::auth::{NoAuth, RequestDecorator};
use crate::config::ClientConfig;
use crate::connectivity::{ConnectivityProbe, HttpProbe};
use crate::error::ClientError;
use crate::retry::{decide, RetryDecision, Sleeper, TokioSleeper};
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: String,
}

impl ProxyResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Everything needed to (re)issue one request.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::GET, path: path.into(), query: Vec::new(), body: None }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self { method: Method::POST, path: path.into(), query: Vec::new(), body: Some(body) }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

pub(crate) fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// HTTP client that retries transient failures with status-specific backoff.
pub struct ResilientClient {
    http: Client,
    config: ClientConfig,
    decorator: Arc<dyn RequestDecorator>,
    probe: Arc<dyn ConnectivityProbe>,
    sleeper: Arc<dyn Sleeper>,
}

impl ResilientClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        url::Url::parse(&config.base_url).map_err(|e| {
            ClientError::Config(format!("invalid base URL {}: {}", config.base_url, e))
        })?;

        let http = Client::builder()
            .connect_timeout(config.request_timeout)
            .read_timeout(config.request_timeout)
            .timeout(config.resource_timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ClientError::Config(format!("HTTP client builder failed: {}", e)))?;

        let probe = Arc::new(HttpProbe::new(http.clone(), config.base_url.clone()));
        Ok(Self {
            http,
            config,
            decorator: Arc::new(NoAuth),
            probe,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    pub fn with_decorator(mut self, decorator: Arc<dyn RequestDecorator>) -> Self {
        self.decorator = decorator;
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn ConnectivityProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run `spec` until it succeeds, fails with a non-transient error, or
    /// exhausts the configured attempts.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<ProxyResponse, ClientError> {
        self.await_connectivity().await;

        let max_attempts = self.config.retry.effective_attempts();
        let mut last_cause = None;

        for attempt in 0..max_attempts {
            let outcome = self.send_once(spec).await;
            match decide(outcome, attempt) {
                RetryDecision::Succeed(response) => {
                    if attempt > 0 {
                        info!(
                            path = %spec.path,
                            attempt = attempt + 1,
                            status = response.status,
                            "Request succeeded after retry"
                        );
                    }
                    return Ok(response);
                },
                RetryDecision::FailFast(err) => {
                    warn!(
                        path = %spec.path,
                        attempt = attempt + 1,
                        error = %err,
                        "Non-retriable failure"
                    );
                    return Err(err);
                },
                RetryDecision::RetryAfter { delay, cause } => {
                    if attempt + 1 >= max_attempts {
                        last_cause = Some(cause);
                        break;
                    }
                    info!(
                        path = %spec.path,
                        attempt = attempt + 1,
                        max_attempts,
                        backoff_ms = delay.as_millis() as u64,
                        status = ?cause.status(),
                        error = %cause,
                        "⏱️ Retrying after backoff"
                    );
                    self.sleeper.sleep(delay).await;
                    last_cause = Some(cause);
                },
            }
        }

        let last = last_cause
            .unwrap_or_else(|| ClientError::InvalidResponse("no attempt was executed".to_string()));
        warn!(path = %spec.path, attempts = max_attempts, error = %last, "Retries exhausted");
        Err(ClientError::RetriesExhausted { attempts: max_attempts, last: Box::new(last) })
    }

    async fn await_connectivity(&self) {
        if self.probe.is_reachable().await {
            return;
        }
        let grace = self.config.connectivity_grace;
        warn!(
            grace_ms = grace.as_millis() as u64,
            "Proxy looks unreachable, waiting before first attempt"
        );
        self.sleeper.sleep(grace).await;
    }

    async fn send_once(&self, spec: &RequestSpec) -> Result<ProxyResponse, ClientError> {
        let url = build_url(&self.config.base_url, &spec.path);
        let mut builder = self.http.request(spec.method.clone(), &url);
        if !spec.query.is_empty() {
            builder = builder.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            builder = builder.json(body);
        }
        builder = self.decorator.decorate(builder);

        debug!(method = %spec.method, url = %url, "Sending request");
        let response = builder.send().await.map_err(|e| ClientError::transport(&e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| ClientError::transport(&e))?;
        Ok(ProxyResponse { status, body })
    }
}
