//! Structured Logger
//!
//! Wraps `tracing` to provide console output, optional daily-rotated NDJSON
//! files, and environment-based level control.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global structured logger.
///
/// `RUST_LOG` overrides `level`. With `json` the console emits one JSON object
/// per line; with a `log_dir` a rolling `wabot.log.YYYY-MM-DD` NDJSON file is
/// written as well. Calling this twice is harmless: the second call is a no-op.
pub fn init_logger(log_dir: Option<&Path>, level: &str, json: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "wabot.log");
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file_appender)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    let json_console = json.then(|| fmt::layer().json().with_writer(std::io::stdout));
    let plain_console = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_console)
        .with(plain_console)
        .with(file_layer)
        .try_init();

    Ok(())
}
