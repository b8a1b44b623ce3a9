//! Logging setup
//!
//! The library only emits `tracing` events. Binaries and tests embedding it
//! install a subscriber with the functions below.

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn";

/// Installs a global subscriber writing human-readable lines to stderr
///
/// The filter is read from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
/// Calling it again after a subscriber is installed has no effect.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .ok();
}

static TEST_LOGGING: OnceCell<()> = OnceCell::new();

/// Installs a quiet subscriber whose output is captured by the test harness
///
/// The level comes from `TEST_LOG`, then `RUST_LOG`, then defaults to
/// `warn`. Safe to call from every test.
pub fn init_test_logging() {
    TEST_LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_test_logging();
        init_test_logging();
        init_tracing();
        tracing::info!("logging initialized");
    }
}
