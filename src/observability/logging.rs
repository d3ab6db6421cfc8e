//! Log output for the command-line binary
//!
//! The library logs through the `log` facade and opens `tracing` spans around
//! batch work. The binary installs one `tracing-subscriber` fmt subscriber,
//! which also receives `log` records.

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the `-v` derived filter
pub const LOG_ENV: &str = "PURECHECK_LOG";

/// Filter directive for a `-v` count
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        log::debug!("Logging already initialized");
    }
}
