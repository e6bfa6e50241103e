//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_level` when set. Calling this twice is a no-op.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},reqwest=warn,hyper=warn", default_level)));

    let result = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }
}
