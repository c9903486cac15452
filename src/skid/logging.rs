// src/skid/logging.rs
//! Installs the tracing subscriber: stdout plus a per-run log file that gets
//! attached to the notification email.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::settings::{DEFAULT_LOG_FILTER, LOG_FILE_NAME, SKID_NAME};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The run's temporary directory; removed with the value.
pub struct RunLog {
    _dir: TempDir,
    path: PathBuf,
}

impl RunLog {
    pub fn create() -> std::io::Result<(Self, File)> {
        let dir = tempfile::Builder::new().prefix(SKID_NAME).tempdir()?;
        let path = dir.path().join(format!("{}.txt", LOG_FILE_NAME));
        let file = File::create(&path)?;
        Ok((Self { _dir: dir, path }, file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

pub fn init() -> std::io::Result<RunLog> {
    let (run_log, file) = RunLog::create()?;

    let stdout_layer = fmt::layer()
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_target(true)
        .with_line_number(true);
    let file_layer = fmt::layer()
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_target(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter())
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("Logging was already initialized: {}", e);
    }

    Ok(run_log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_log_lives_in_removable_temp_dir() {
        let (run_log, _file) = RunLog::create().unwrap();
        let path = run_log.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), "log.txt");

        drop(run_log);
        assert!(!path.exists());
    }
}
