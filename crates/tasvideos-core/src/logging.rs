//! Logging and tracing initialization.
//!
//! Call one of these once at startup, before building the `App`.
//! The level is controlled by `RUST_LOG` and defaults to `info`:
//!
//! ```bash
//! RUST_LOG=debug cargo run
//! RUST_LOG=tasvideos_api=debug,tower_http=debug,sqlx=warn cargo run
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize logging in the format chosen by configuration.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_logging_with_format(format: LogFormat) {
    match format {
        LogFormat::Plain => init_logging(),
        LogFormat::Pretty => init_logging_pretty(),
        LogFormat::Json => init_logging_json(),
    }
}

/// Initialize single-line logging with sensible defaults.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize pretty-formatted logging (recommended for development).
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_logging_pretty() {
    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_line_number(true)
                .with_thread_ids(true)
                .with_target(true),
        )
        .init();
}

/// Initialize JSON-formatted logging (recommended for production).
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_logging_json() {
    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}
