//! Logging setup for the command-line tool.
//!
//! Diagnostics go to stderr so report text on stdout stays clean. When a log
//! directory is requested, a daily-rolling file layer is added as well.
//!
//! ```no_run
//! socialstats::logging::init(0, false).expect("Failed to initialize logging");
//! tracing::info!("Report started");
//! ```

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/socialstats/logs`
/// - macOS: `~/Library/Application Support/socialstats/logs`
/// - Linux: `~/.local/share/socialstats/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    Ok(base_dir.join("socialstats").join("logs"))
}

/// Maps `-v` repetitions to a default filter. `RUST_LOG` still wins.
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initializes stderr logging, plus a rolling `socialstats.log` when `to_file` is set.
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the filter is invalid
pub fn init(verbosity: u8, to_file: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level(verbosity)))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    let file_layer = if to_file {
        let log_dir = get_log_dir()?;
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(10)
            .filename_prefix("socialstats")
            .filename_suffix("log")
            .build(&log_dir)
            .context("Failed to create file appender")?;
        Some(
            fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(appender)
                .with_filter(EnvFilter::new("debug")),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
