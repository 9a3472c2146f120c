//! Error types shared by the session core and its collaborators.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure reported by an external collaborator call.
///
/// Every backend operation (validate, complexity check, scan, cancel, delete,
/// open) may fail with one of these. The session core never lets them escape:
/// each is turned into a phase transition or a log event at the call site.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The collaborator could not be reached or is not running.
    #[error("Service unavailable: {message}")]
    Unavailable { message: String },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend stopped because it was asked to.
    #[error("Operation cancelled")]
    Cancelled,

    /// Other error, carrying the backend's own message.
    #[error("{message}")]
    Other { message: String },
}

impl ServiceError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an error from a plain backend message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Why a scan request was refused before anything was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanRefusal {
    /// No watched path is set.
    NoPath,
    /// Another scan is already in flight.
    AlreadyScanning,
}

/// Outcome of a scan that did not produce a fresh folder list.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan was never issued.
    #[error("Scan refused: {0:?}")]
    Refused(ScanRefusal),

    /// The deadline fired before the scanner answered.
    #[error("Scan timed out after {}s", timeout.as_secs())]
    TimedOut { timeout: Duration },

    /// The scanner rejected the request.
    #[error("Scan failed: {0}")]
    Failed(#[source] ServiceError),

    /// The session abandoned the scan (cancel, path change, reset).
    #[error("Scan cancelled")]
    Cancelled,

    /// A result arrived for a scan the session no longer tracks.
    #[error("Stale scan result discarded")]
    Discarded,
}

impl ScanError {
    /// Whether this outcome is the timeout that should trigger recovery.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// Errors from the persisted settings store.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No per-user configuration directory on this platform.
    #[error("No config directory")]
    NoConfigDir,

    /// Reading or writing the settings file failed.
    #[error("Settings I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON.
    #[error("Malformed settings file: {0}")]
    Json(#[from] serde_json::Error),
}
