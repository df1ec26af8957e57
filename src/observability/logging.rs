//! Structured logging initialization.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// The filter defaults to info-level output for this crate and can be
/// overridden through `RUST_LOG`.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forward_proxy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
