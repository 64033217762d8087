//! Logging setup using `tracing-subscriber`
//!
//! The crate itself only emits `tracing` events (target `firestack`). Hosts
//! that don't install their own subscriber can call [`init_tracing`].

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FIRESTACK_LOG";

/// Install a stderr fmt subscriber filtered by `FIRESTACK_LOG`
///
/// Defaults to `info`. Returns `false` if a global subscriber was already set.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    install(filter)
}

/// Install a stderr fmt subscriber with an explicit filter (tests, embedding)
pub fn init_tracing_with_filter(filter: &str) -> bool {
    install(EnvFilter::new(filter))
}

fn install(filter: EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
