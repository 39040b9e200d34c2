//! File logging for the plugin.
//!
//! The host has no console, so log output goes to a timestamped file per
//! session. Old session files are pruned at startup.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, error, info, LevelFilter};

const LOG_PREFIX: &str = concat!(env!("CARGO_PKG_NAME"), "-");
const LOG_SUFFIX: &str = ".log";

/// Session files older than this are deleted at startup
pub const MAX_LOG_AGE: Duration = Duration::from_secs(24 * 60 * 60);

fn log_file_name() -> String {
    let date = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
    format!("{LOG_PREFIX}{date}{LOG_SUFFIX}")
}

fn is_log_file(name: &str) -> bool {
    name.starts_with(LOG_PREFIX) && name.ends_with(LOG_SUFFIX)
}

/// Install a logger writing to a new file in `dir`.
///
/// Returns the path of the log file. If a logger is already installed the
/// file is still created but stays empty.
pub fn init(dir: &Path, level: LevelFilter) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating log dir {}", dir.display()))?;

    let path = dir.join(log_file_name());
    let file =
        File::create(&path).with_context(|| format!("creating log file {}", path.display()))?;

    let installed = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();

    match installed {
        Ok(()) => info!("Logging to {}", path.display()),
        Err(e) => debug!("Logger already installed: {}", e),
    }

    if let Err(e) = prune_logs(dir, MAX_LOG_AGE) {
        error!("Pruning logs in {}: {:#}", dir.display(), e);
    }

    Ok(path)
}

/// Delete session log files in `dir` last modified more than `max_age` ago.
///
/// Returns the number of files removed.
pub fn prune_logs(dir: &Path, max_age: Duration) -> Result<usize> {
    let mut removed = 0;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            debug!("Skipping non-UTF-8 file name in log dir");
            continue;
        };
        if !is_log_file(name) {
            continue;
        }

        let path = entry.path();
        let age = entry.metadata()?.modified()?.elapsed().unwrap_or_default();
        if age > max_age {
            std::fs::remove_file(&path)
                .with_context(|| format!("removing {}", path.display()))?;
            removed += 1;
        }
    }

    Ok(removed)
}
