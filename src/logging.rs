//! Logging initialisation.
//!
//! Installs a `tracing-subscriber` fmt subscriber on stdout. The filter is
//! read from `RIG_RELAY_LOG`, then `RUST_LOG`, and defaults to `info`.

use std::io;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LEVEL_ENV: &str = "RIG_RELAY_LOG";
const ALT_LEVEL_ENV: &str = "RUST_LOG";
const DEFAULT_LEVEL: &str = "info";

static LOGGER: OnceLock<Result<(), String>> = OnceLock::new();

/// Initialises logging. Later calls return the outcome of the first one.
pub fn init() -> io::Result<()> {
    match LOGGER.get_or_init(configure_logger) {
        Ok(()) => Ok(()),
        Err(err) => Err(io::Error::other(err.clone())),
    }
}

fn configure_logger() -> Result<(), String> {
    let env_filter = EnvFilter::try_from_env(LEVEL_ENV)
        .or_else(|_| EnvFilter::try_from_env(ALT_LEVEL_ENV))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let stdout_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init()
        .map_err(|err| format!("failed to install tracing subscriber: {err}"))
}
