use std::time::Duration;

/// Default proxy location (Supabase edge function).
pub const DEFAULT_BASE_URL: &str =
    "https://vqwgvfqrkoqgbwimiagi.supabase.co/functions/v1/claimb-function";

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
}

impl RetryConfig {
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Connect and idle-read timeout for a single attempt.
    pub request_timeout: Duration,
    /// Upper bound on a single attempt from send to fully read body.
    pub resource_timeout: Duration,
    /// How long to wait before the first attempt when the probe says offline.
    pub connectivity_grace: Duration,
    pub retry: RetryConfig,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            resource_timeout: Duration::from_secs(60),
            connectivity_grace: Duration::from_secs(2),
            retry: RetryConfig::default(),
        }
    }
}
