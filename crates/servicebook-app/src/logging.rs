//! Logging bootstrap
//!
//! Tracing-based diagnostics for the store and service layers; user-facing
//! command output stays on stdout/stderr, not in the log stream.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging system.
///
/// `verbose` raises the default filter to debug; the `RUST_LOG` environment
/// variable takes precedence either way. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "servicebook=debug"
    } else {
        "servicebook=info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr));

    let _ = subscriber.try_init();
}
