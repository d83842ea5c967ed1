//! File-based tracing. The terminal belongs to the UI, so events go to a daily
//! rolling file under the data directory instead of stdout.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "lead-tracker.log";

/// Install the global subscriber. Keep the returned guard alive for the whole
/// run or buffered lines are lost on exit.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir).context("failed to create log directory")?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    Ok(guard)
}
