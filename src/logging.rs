//! Log setup for the binary.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the program embedding it. [`init`] is what `shell_dispatch` uses.

use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Log file written next to the working directory unless configured otherwise.
pub const DEFAULT_LOG_FILE: &str = "shell_dispatch.log";

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    File(PathBuf),
    Stderr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    pub destination: LogDestination,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: default_level().to_string(),
            destination: LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_level() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "info" }
}

/// Install the global subscriber. Call once near the start of `main`.
///
/// When logging to a file, the returned guard must be kept alive for as long
/// as records should be flushed.
pub fn init(options: &LogOptions) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&options.level))
        .with_context(|| format!("invalid log level '{}'", options.level))?;

    match &options.destination {
        LogDestination::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| anyhow!("failed to install logger: {err}"))?;
            Ok(None)
        }
        LogDestination::File(path) => {
            let (dir, file_name) = split_log_path(path)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name)
                .build(&dir)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|err| anyhow!("failed to install logger: {err}"))?;
            Ok(Some(guard))
        }
    }
}

fn split_log_path(path: &Path) -> Result<(PathBuf, String)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log path '{}' does not name a file", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name.to_string_lossy().into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_log_to_file() {
        let options = LogOptions::default();
        assert_eq!(
            options.destination,
            LogDestination::File(PathBuf::from("shell_dispatch.log"))
        );
        assert_eq!(options.level, default_level());
    }

    #[test]
    fn test_split_log_path() {
        assert_eq!(
            split_log_path(Path::new("app.log")).unwrap(),
            (PathBuf::from("."), "app.log".to_string())
        );
        assert_eq!(
            split_log_path(Path::new("/var/log/app.log")).unwrap(),
            (PathBuf::from("/var/log"), "app.log".to_string())
        );
        assert!(split_log_path(Path::new("/")).is_err());
    }
}
