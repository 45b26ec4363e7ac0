//! Logging configuration using tracing

use crate::app_dirs::AppDirs;
use crate::error::Result;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem
///
/// Logs go to a daily rolling file under the state directory so they never
/// mix with practice output. The level is controlled by `RECITE_LOG`.
///
/// # Examples
/// ```bash
/// RECITE_LOG=debug recite practice --doc poem
/// ```
pub fn init() -> Result<()> {
    init_in(&AppDirs::log_dir())
}

pub fn init_in(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "recite.log");

    let env_filter =
        EnvFilter::try_from_env("RECITE_LOG").unwrap_or_else(|_| EnvFilter::new("recite=info,warn"));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init();

    tracing::info!("recite starting, logging to {}", log_dir.display());

    Ok(())
}
