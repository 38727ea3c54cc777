#![allow(clippy::multiple_crate_versions)]

//! Startpage CLI entry point.

use startpage_lib::constants::{APP_NAME, LOG_ENV_VAR};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    if let Err(err) = startpage_lib::cli::run() {
        eprintln!("{APP_NAME}: {err}");
        std::process::exit(1);
    }
}

/// Logs to stderr, filtered by `STARTPAGE_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
