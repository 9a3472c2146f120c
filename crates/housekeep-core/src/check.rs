//! Pre-scan check results: path safety and complexity estimate.

use serde::{Deserialize, Serialize};

/// Verdict of the path validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathValidation {
    /// Whether the path may be scanned.
    pub valid: bool,
    /// Why the path was rejected. Only set when `valid` is false.
    pub reason: Option<String>,
}

impl PathValidation {
    /// A passing verdict.
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// A failing verdict with its reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Cost estimate for scanning a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityCheck {
    /// Estimated number of directories below the path.
    pub estimated_directories: u64,
    /// The scan is expected to be slow; the user should confirm.
    pub is_large: bool,
    /// The scan must not run at all. Implies `is_large`.
    pub is_blocked: bool,
    /// Human-readable advice shown in dialogs.
    pub recommendation: String,
}

impl ComplexityCheck {
    /// Create a complexity estimate. A blocked estimate is always large.
    pub fn new(
        estimated_directories: u64,
        is_large: bool,
        is_blocked: bool,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            estimated_directories,
            is_large: is_large || is_blocked,
            is_blocked,
            recommendation: recommendation.into(),
        }
    }

    /// Whether the user must be warned before scanning.
    ///
    /// Also true for a blocked estimate whose `is_large` flag was left unset
    /// by the backend.
    pub fn needs_warning(&self) -> bool {
        self.is_large || self.is_blocked
    }
}
