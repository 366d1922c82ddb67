//! Tracing setup.
//!
//! Filter comes from `DASH_LOG` (e.g. `DASH_LOG=perf_dash=debug`), default `info`.
//! CLI commands log to stderr. The dashboard owns the terminal, so it only
//! logs when `--log-file` is given.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub const LOG_ENV: &str = "DASH_LOG";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    Off,
}

/// Pick a target for a front-end.
pub fn target(log_file: Option<&Path>, interactive: bool) -> LogTarget<'_> {
    match (log_file, interactive) {
        (Some(path), _) => LogTarget::File(path),
        (None, false) => LogTarget::Stderr,
        (None, true) => LogTarget::Off,
    }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(target: LogTarget<'_>) -> Result<(), AppError> {
    match target {
        LogTarget::Off => {}
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(io::stderr)
                .try_init();
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::new(2, format!("Failed to open log file '{}': {e}", path.display())))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_is_silent_without_a_file() {
        assert_eq!(target(None, true), LogTarget::Off);
        assert_eq!(target(None, false), LogTarget::Stderr);
        let p = Path::new("dash.log");
        assert_eq!(target(Some(p), true), LogTarget::File(p));
    }

    #[test]
    fn unopenable_log_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope").join("dash.log");
        let err = init(LogTarget::File(&missing)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
