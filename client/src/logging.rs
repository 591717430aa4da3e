//! One-shot tracing setup for embedding hosts.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber at the configured level. `RUST_LOG`
/// overrides the level when set. Safe to call more than once; later
/// calls are no-ops.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
