//! Structured log sink setup.
//!
//! Logs are JSON lines filtered by `RUST_LOG` (default `info`). They go to
//! stdout unless a log file is configured, in which case the file is opened
//! in append mode and its parent directories are created.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Failures while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log file could not be opened.
    #[error("failed to open log file {path}: {source}")]
    OpenLogFile {
        /// Configured path.
        path: String,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn json_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(writer)
        .finish()
}

/// Open `path` for appending, creating it and its parent directories.
///
/// # Errors
/// Returns [`LoggingError::OpenLogFile`] when the file cannot be opened.
pub fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    let open = || -> io::Result<File> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    };
    open().map_err(|source| LoggingError::OpenLogFile {
        path: path.display().to_string(),
        source,
    })
}

/// Install the process-wide JSON subscriber.
///
/// # Errors
/// Returns [`LoggingError`] when the log file cannot be opened or a
/// subscriber is already installed.
pub fn init_logging(log_path: Option<&Path>) -> Result<(), LoggingError> {
    match log_path {
        Some(path) => {
            let file = open_log_file(path)?;
            tracing::subscriber::set_global_default(json_subscriber(
                default_filter(),
                Mutex::new(file),
            ))?;
        }
        None => {
            tracing::subscriber::set_global_default(json_subscriber(
                default_filter(),
                io::stdout,
            ))?;
        }
    }
    Ok(())
}
