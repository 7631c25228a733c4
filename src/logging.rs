//! Logging configuration for mql-eval.
//!
//! Diagnostics go to stderr so the summary report on stdout stays
//! machine-readable.

use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Initializes stderr logging.
///
/// Verbosity is controlled through `RUST_LOG`; `--verbose` raises the
/// fallback level to `debug`.
pub fn init_stderr_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Builds the env filter, falling back to the default level.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_level(verbose)))
}

fn fallback_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        DEFAULT_FILTER
    }
}
