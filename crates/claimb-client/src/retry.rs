//! Retry policy keyed by response status or transport failure class.

use crate::client::ProxyResponse;
use crate::decoder::extract_error_message;
use crate::error::ClientError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

/// Exponential backoff family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `2^attempt` seconds.
    Doubling,
    /// `3^attempt` seconds, for rate limiting and gateway timeouts.
    Tripling,
}

impl Backoff {
    /// Delay before retrying after the zero-based `attempt` failed.
    pub fn delay(self, attempt: u32) -> Duration {
        let base: u64 = match self {
            Self::Doubling => 2,
            Self::Tripling => 3,
        };
        Duration::from_secs(base.saturating_pow(attempt))
    }
}

/// What to do with the outcome of one attempt.
#[derive(Debug)]
pub enum RetryDecision {
    Succeed(ProxyResponse),
    RetryAfter { delay: Duration, cause: ClientError },
    FailFast(ClientError),
}

/// Backoff family for a non-2xx status, or `None` when the status is not transient.
pub fn status_backoff(status: u16) -> Option<Backoff> {
    match status {
        429 | 504 => Some(Backoff::Tripling),
        500..=599 => Some(Backoff::Doubling),
        _ => None,
    }
}

/// Classify the outcome of attempt number `attempt` (zero-based).
pub fn decide(outcome: Result<ProxyResponse, ClientError>, attempt: u32) -> RetryDecision {
    match outcome {
        Ok(response) if response.is_success() => RetryDecision::Succeed(response),
        Ok(response) => {
            let status = response.status;
            let body = if status == 502 {
                extract_error_message(&response.body).unwrap_or(response.body)
            } else {
                response.body
            };
            let cause = ClientError::Http { status, body };
            match status_backoff(status) {
                Some(backoff) => RetryDecision::RetryAfter { delay: backoff.delay(attempt), cause },
                None => RetryDecision::FailFast(cause),
            }
        },
        Err(ClientError::Transport { kind, message }) if kind.is_retriable() => {
            RetryDecision::RetryAfter {
                delay: Backoff::Doubling.delay(attempt),
                cause: ClientError::Transport { kind, message },
            }
        },
        Err(err) => RetryDecision::FailFast(err),
    }
}

/// Suspends the caller for a backoff or grace period.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested sleeps and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.slept.lock().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().push(duration);
        tokio::task::yield_now().await;
    }
}
