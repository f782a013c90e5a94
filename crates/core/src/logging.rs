//! Logging initialization for native and browser builds

use crate::{CoreError, CoreResult};
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn default_filter(level: Level) -> String {
    let level_str = level.as_str().to_lowercase();
    format!("medibuddy_core={level_str},medibuddy_client={level_str}")
}

/// Install the global tracing subscriber writing to stderr
///
/// `RUST_LOG` takes precedence over `level` when set.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(level: Level) -> CoreResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| CoreError::logging(e.to_string()))
}

/// Install the global tracing subscriber writing to the browser console
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
#[cfg(target_arch = "wasm32")]
pub fn init_logging(level: Level) -> CoreResult<()> {
    use tracing_web::MakeWebConsoleWriter;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());

    tracing_subscriber::registry()
        .with(EnvFilter::new(default_filter(level)))
        .with(fmt_layer)
        .try_init()
        .map_err(|e| CoreError::logging(e.to_string()))
}
