//! Logging setup

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber
///
/// Honors `RUST_LOG`, falling back to `info`. Calling this more than once
/// leaves the first subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
