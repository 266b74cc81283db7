//! Tracing setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber, filtered by `RUST_LOG`
/// (default `info`).
///
/// Call once at startup; later calls are no-ops so tests can call it
/// freely.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
