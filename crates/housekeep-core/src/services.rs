//! Collaborator traits the session core talks to.
//!
//! Each trait is a boundary to something the core does not implement itself:
//! the scanning backend, the complexity estimator, the dialog layer, and the
//! settings file. All methods return boxed futures so the traits stay
//! object-safe and can be shared as `Arc<dyn Trait>`.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::check::{ComplexityCheck, PathValidation};
use crate::error::{ServiceError, SettingsError};
use crate::folder::ScanReport;

/// Type alias for boxed futures returned by async collaborator methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result type for collaborator calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Judges whether a path is safe to scan.
pub trait PathValidator: Send + Sync {
    /// Validate `path`.
    fn validate<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, ServiceResult<PathValidation>>;
}

/// Estimates how expensive a scan of a path would be.
pub trait ComplexityEstimator: Send + Sync {
    /// Estimate the cost of scanning `path`.
    fn check_complexity<'a>(
        &'a self,
        path: &'a Path,
    ) -> BoxFuture<'a, ServiceResult<ComplexityCheck>>;
}

/// The scanning backend.
pub trait ScannerService: Send + Sync {
    /// Scan `path` for heavy sub-folders.
    fn scan_folders<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, ServiceResult<ScanReport>>;

    /// Ask the backend to stop the running scan.
    fn cancel_scan(&self) -> BoxFuture<'_, ServiceResult<()>>;

    /// Move `path` to the trash.
    fn delete_folder<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, ServiceResult<()>>;

    /// Reveal `path` in the system file browser.
    fn open_location<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, ServiceResult<()>>;
}

/// Shape of a prompt, which decides the buttons shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Single acknowledgement button; the answer carries no decision.
    Notice,
    /// Cancel plus a confirm button.
    Warning,
    /// Cancel plus a destructive confirm button.
    Destructive,
}

/// A confirm or warning prompt shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub title: String,
    pub message: String,
    /// Label of the confirm (or acknowledgement) button.
    pub confirm_label: String,
}

impl Prompt {
    /// A single-button notice.
    pub fn notice(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: PromptKind::Notice,
            title: title.into(),
            message: message.into(),
            confirm_label: "OK".to_string(),
        }
    }

    /// A warning with Cancel and `confirm_label`.
    pub fn warning(
        title: impl Into<String>,
        message: impl Into<String>,
        confirm_label: impl Into<String>,
    ) -> Self {
        Self {
            kind: PromptKind::Warning,
            title: title.into(),
            message: message.into(),
            confirm_label: confirm_label.into(),
        }
    }

    /// A destructive confirmation with Cancel and `confirm_label`.
    pub fn destructive(
        title: impl Into<String>,
        message: impl Into<String>,
        confirm_label: impl Into<String>,
    ) -> Self {
        Self {
            kind: PromptKind::Destructive,
            title: title.into(),
            message: message.into(),
            confirm_label: confirm_label.into(),
        }
    }
}

/// Renders prompts and returns the user's choice.
pub trait DialogService: Send + Sync {
    /// Show `prompt`; `true` means the confirm button was chosen.
    fn confirm(&self, prompt: Prompt) -> BoxFuture<'_, bool>;

    /// Let the user pick a directory. `None` if the picker was dismissed.
    fn pick_directory(&self) -> BoxFuture<'_, Option<PathBuf>>;
}

/// Key-value persisted settings.
pub trait SettingsStore: Send + Sync {
    /// Read a value.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, SettingsError>>;

    /// Write a value.
    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, Result<(), SettingsError>>;

    /// Remove a value. Removing a missing key is not an error.
    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), SettingsError>>;
}
