//! Logging setup for providers
//!
//! Logs go to stderr. Stdout belongs to the plugin handshake once the
//! provider is served by a host.
//!
//! `RUST_LOG` controls filtering, e.g. `RUST_LOG=langsmith=debug`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

/// Installs the global stderr subscriber, defaulting to `info` when RUST_LOG
/// is unset. Returns false when a subscriber is already installed, so tests
/// call this freely.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(filter("info"))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}
