//! Log output for matrix-lock.
//!
//! Progress and warnings go through `tracing`. The subscriber prints plain
//! lines without timestamps or targets, since the CI runner already stamps
//! every line of step output.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding a log filter (e.g. `debug`).
pub const LOG_ENV: &str = "MATRIX_LOCK_LOG";

/// Install the global subscriber.
///
/// `MATRIX_LOCK_LOG` takes precedence; otherwise the level is `info`, or
/// `debug` when `verbose` is set.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().without_time().with_target(false))
        .try_init();
}
