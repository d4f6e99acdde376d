//! Progress and diagnostic output via `tracing`.
//!
//! The submitter reports each step (skipped, broadcast, recorded) at `info`
//! and load failures it recovers from at `warn`. Deployment binaries call
//! [`init`] once at startup; library users may install their own subscriber.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` env var, defaulting to `info`. Output: stderr, compact
/// format. An already installed global subscriber is left in place.
///
/// # Example
/// ```bash
/// RUST_LOG=submitter=debug cargo test -- --nocapture
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
