//! # Claimb Client
//!
//! HTTP access to the Claimb proxy (Riot API + AI coach) with:
//!
//! - status- and transport-aware retries (`2^n` / `3^n` second backoff)
//! - a connectivity hint consulted before the first attempt
//! - credential header injection
//! - tolerant JSON decoding that strips markdown code fences
//!
//! ```rust,no_run
//! use claimb_client::{ClaimbAuth, ClientConfig, ProxyApi, ResilientClient};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), claimb_client::ClientError> {
//! let client = ResilientClient::new(ClientConfig::default())?
//!     .with_decorator(Arc::new(ClaimbAuth::new("anon-key", "app-token", "device-1")));
//! let api = ProxyApi::new(Arc::new(client));
//! let page = api.matches_page("puuid", "europe", 20, 0).await?;
//! println!("{} match ids", page.ids.len());
//! # Ok(())
//! # }
//! ```

mod api;
mod auth;
mod client;
mod config;
mod connectivity;
mod ddragon;
pub mod decoder;
mod error;
pub mod retry;

pub use api::ProxyApi;
pub use auth::{ClaimbAuth, NoAuth, RequestDecorator, APP_TOKEN_HEADER, DEVICE_HEADER};
pub use client::{ProxyResponse, RequestSpec, ResilientClient};
pub use config::{ClientConfig, RetryConfig, DEFAULT_BASE_URL};
pub use connectivity::{ConnectivityProbe, HttpProbe, StaticProbe};
pub use ddragon::{DataDragon, DEFAULT_DDRAGON_URL};
pub use decoder::{decode, DecodeError};
pub use error::{ClientError, TransportKind};
pub use retry::{Backoff, RecordingSleeper, RetryDecision, Sleeper, TokioSleeper};
