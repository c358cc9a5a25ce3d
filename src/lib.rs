pub mod api; // HTTP router, middleware, server lifecycle
pub mod config;
pub mod dashboard; // Stats, activity feed, charts
pub mod db;
pub mod models;
pub mod safety; // LASA + interaction tables

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` takes precedence
/// over `fallback_filter`.
pub fn init_tracing(fallback_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_filter)),
        )
        .init();
}
