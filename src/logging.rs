//! Optional tracing subscriber setup.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application. This helper covers binaries and tests that just want
//! console output filtered by `RUST_LOG`.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a console subscriber. Safe to call more than once.
///
/// Does nothing if another global subscriber is already installed.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let _ = fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}
