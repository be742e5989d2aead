//! Wires `tracing-subscriber` for binaries and tests that want readable
//! output. Library crates in this workspace only ever call
//! `tracing::{debug,info,warn,error}`; nothing below `lace-session`
//! installs a subscriber of its own.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Install a global subscriber reading its filter from `LACE_LOG`
/// (falling back to `info` for everything), formatting with ANSI colors.
///
/// Idempotent in practice: a second call after one has already installed
/// a global subscriber is a no-op (the `tracing` default dispatcher only
/// accepts the first one), so it's safe to call from every binary
/// entrypoint and every integration test's setup.
pub fn init() {
    let filter = EnvFilter::try_from_env("LACE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(true))
        .try_init();
}

#[cfg(test)]
#[path = "logging.test.rs"]
mod tests;
