//! Error types for the Claimb client.

use crate::decoder::DecodeError;
use claimb_types::SyncError;
use std::error::Error as _;
use std::fmt;
use thiserror::Error;

/// Connection-level failure class.
///
/// Everything except [`TransportKind::Other`] is considered transient and is
/// retried by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    ConnectionLost,
    NotConnected,
    TimedOut,
    CannotConnect,
    CannotFindHost,
    DnsFailure,
    ResourceUnavailable,
    Tls,
    Other,
}

impl TransportKind {
    pub const fn is_retriable(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Classify a reqwest failure by walking its source chain.
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::TimedOut;
        }
        if err.is_builder() || err.is_redirect() || err.is_decode() {
            return Self::Other;
        }

        let mut source = err.source();
        while let Some(cause) = source {
            if let Some(kind) = Self::from_cause(cause) {
                return kind;
            }
            source = cause.source();
        }

        if err.is_connect() {
            Self::CannotConnect
        } else if err.is_request() || err.is_body() {
            Self::ConnectionLost
        } else {
            Self::Other
        }
    }

    /// Class implied by one link of an error chain, if it is specific enough.
    fn from_cause(cause: &(dyn std::error::Error + 'static)) -> Option<Self> {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            use std::io::ErrorKind;
            match io.kind() {
                ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::BrokenPipe
                | ErrorKind::UnexpectedEof => return Some(Self::ConnectionLost),
                ErrorKind::ConnectionRefused => return Some(Self::CannotConnect),
                ErrorKind::NotConnected => return Some(Self::NotConnected),
                ErrorKind::TimedOut => return Some(Self::TimedOut),
                ErrorKind::AddrNotAvailable => return Some(Self::ResourceUnavailable),
                _ => {},
            }
        }

        let text = cause.to_string().to_ascii_lowercase();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            Some(Self::DnsFailure)
        } else if text.contains("no such host") || text.contains("name or service not known") {
            Some(Self::CannotFindHost)
        } else if ["certificate", "tls", "handshake"].iter().any(|t| text.contains(t)) {
            Some(Self::Tls)
        } else {
            None
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ConnectionLost => "connection lost",
            Self::NotConnected => "not connected",
            Self::TimedOut => "timed out",
            Self::CannotConnect => "cannot connect to host",
            Self::CannotFindHost => "cannot find host",
            Self::DnsFailure => "DNS lookup failed",
            Self::ResourceUnavailable => "resource unavailable",
            Self::Tls => "secure connection failed",
            Self::Other => "transport failure",
        };
        f.write_str(label)
    }
}

/// Errors that can occur when talking to the Claimb proxy.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Response lacked the metadata needed to interpret it.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Non-2xx status.
    #[error("HTTP error {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, or the structured message extracted from it.
        body: String,
    },

    /// Body could not be decoded into the requested type.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Connection-level failure.
    #[error("Network error ({kind}): {message}")]
    Transport {
        /// Failure class driving the retry decision.
        kind: TransportKind,
        /// Underlying error text.
        message: String,
    },

    /// Retriable failures persisted through every attempt.
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Attempts executed.
        attempts: u32,
        /// Cause observed on the final attempt.
        last: Box<ClientError>,
    },

    /// Client could not be constructed.
    #[error("Client configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn transport(err: &reqwest::Error) -> Self {
        Self::Transport { kind: TransportKind::classify(err), message: err.to_string() }
    }

    /// HTTP status of this error, looking through `RetriesExhausted`.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// Innermost cause, looking through `RetriesExhausted`.
    pub fn root(&self) -> &ClientError {
        match self {
            Self::RetriesExhausted { last, .. } => last.root(),
            other => other,
        }
    }
}

/// Flatten into the cloneable snapshot fanned out to sync waiters.
impl From<&ClientError> for SyncError {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::InvalidResponse(message) | ClientError::Config(message) => {
                SyncError::InvalidResponse { message: message.clone() }
            },
            ClientError::Http { status, body } => {
                SyncError::Http { status: *status, message: body.clone() }
            },
            ClientError::Decode(detail) => SyncError::Decode { detail: detail.to_string() },
            ClientError::Transport { .. } => SyncError::Network { message: err.to_string() },
            ClientError::RetriesExhausted { last, .. } => match last.root() {
                ClientError::Http { status, .. } => {
                    SyncError::Http { status: *status, message: err.to_string() }
                },
                _ => SyncError::Network { message: err.to_string() },
            },
        }
    }
}
