//! Path safety rules for choosing a watched folder.

use std::path::{Path, PathBuf};

use crate::check::PathValidation;
use crate::services::{BoxFuture, PathValidator, ServiceResult};

/// System locations that are never scanned.
pub const DANGEROUS_PATHS: &[&str] = &[
    "/",
    "/Users",
    "/home",
    "/System",
    "/Applications",
    "/Library",
    "/usr",
    "/var",
    "/bin",
    "/sbin",
    "/etc",
    "/opt",
    "/private",
    "C:\\",
    "C:\\Windows",
    "C:\\Program Files",
    "C:\\Program Files (x86)",
    "C:\\Users",
];

/// Minimum number of path components (root included) a watched folder needs.
pub const MIN_PATH_COMPONENTS: usize = 3;

const TOO_SHALLOW: &str = "This folder is too close to the system root. Please select a folder \
                           at least 3 levels deep (e.g., /Users/name/projects).";

/// Validator that rejects missing paths, non-directories, and folders too
/// close to the filesystem root.
#[derive(Debug, Clone)]
pub struct SafetyValidator {
    denied: Vec<PathBuf>,
    min_components: usize,
}

impl Default for SafetyValidator {
    fn default() -> Self {
        Self {
            denied: DANGEROUS_PATHS.iter().map(PathBuf::from).collect(),
            min_components: MIN_PATH_COMPONENTS,
        }
    }
}

impl SafetyValidator {
    /// Create a validator with the built-in deny list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also refuse `path`.
    pub fn deny(mut self, path: impl Into<PathBuf>) -> Self {
        self.denied.push(path.into());
        self
    }

    /// Check `path` against the rules.
    pub fn check(&self, path: &Path) -> PathValidation {
        if !path.exists() {
            return PathValidation::invalid("Path does not exist");
        }
        if !path.is_dir() {
            return PathValidation::invalid("Path is not a directory");
        }
        if self.is_dangerous(path) {
            return PathValidation::invalid(TOO_SHALLOW);
        }
        PathValidation::valid()
    }

    /// Whether `path` is on the deny list or too shallow.
    pub fn is_dangerous(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        let denied = self
            .denied
            .iter()
            .any(|d| d.to_string_lossy().eq_ignore_ascii_case(&path_str));

        denied || path.components().count() < self.min_components
    }
}

impl PathValidator for SafetyValidator {
    fn validate<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, ServiceResult<PathValidation>> {
        Box::pin(async move { Ok(self.check(path)) })
    }
}
