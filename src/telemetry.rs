// src/telemetry.rs

use std::env;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` is honoured as usual and `LOG_LEVEL` (default `info`) is added
/// on top as a directive. Colours are off because output lands in CloudWatch.
pub fn init() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let _ = fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
