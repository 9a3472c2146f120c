//! Recovery paths: invalid saved path, scan timeout, emergency reset.
//!
//! All three end in the same primitive, [`Orchestrator::clear_saved_path`],
//! which forgets the watched path in memory and in the settings store.

use std::path::Path;

use housekeep_core::Prompt;

use crate::FailureKind;
use crate::orchestrator::Orchestrator;

const TIMEOUT_MESSAGE: &str = "The scan took too long. This folder may be too large.\n\n\
                               Would you like to clear the saved folder and select a different one?";

const RESET_MESSAGE: &str = "This will clear all saved settings and stop any running scans. Continue?";

impl Orchestrator {
    /// Forget the watched path: session cleared to Idle with no folders and
    /// no banner, and the saved value deleted. Idempotent.
    pub async fn clear_saved_path(&self) {
        self.session.clear_path();
        if let Err(e) = self
            .services
            .settings
            .delete(&self.config.settings_key)
            .await
        {
            tracing::warn!(kind = %FailureKind::SettingsFailure, error = %e, "could not delete saved path");
        }
        tracing::info!("saved path cleared");
    }

    /// Confirm with the user, then wipe everything and start over.
    ///
    /// Works in any phase, including a stuck `Scanning`. Returns whether the
    /// reset ran.
    pub async fn emergency_reset(&self) -> bool {
        let confirmed = self
            .services
            .dialogs
            .confirm(Prompt::warning("Reset Application", RESET_MESSAGE, "Reset"))
            .await;
        if !confirmed {
            tracing::debug!(kind = %FailureKind::UserDeclined, "emergency reset declined");
            return false;
        }

        // Local state is cleared before the backend is told to stop
        let was_scanning = self.session.phase().is_in_flight();
        self.session.clear_path();
        if was_scanning {
            self.request_backend_cancel();
        }

        self.clear_saved_path().await;
        self.reinitialize().await;
        tracing::info!("emergency reset complete");
        true
    }

    /// Replace the session with a fresh record and rerun startup.
    pub async fn reinitialize(&self) {
        self.session.reset();
        self.startup().await;
    }

    /// Check the path loaded at startup.
    ///
    /// An invalid path is dropped from memory and the banner raised, without
    /// a dialog and without touching the settings store; the banner's action
    /// performs the actual reset.
    pub(crate) async fn validate_saved_path(&self, path: &Path) -> bool {
        let reason = match self.services.validator.validate(path).await {
            Ok(validation) if validation.valid => return true,
            Ok(validation) => validation.reason.unwrap_or_default(),
            Err(e) => e.to_string(),
        };

        tracing::warn!(
            kind = %FailureKind::InvalidPath,
            path = %path.display(),
            %reason,
            "saved path is invalid"
        );
        self.session.clear_path();
        self.session.set_recovery_banner(true);
        false
    }

    /// Offer to reset after a timeout. Returns whether the user accepted.
    pub(crate) async fn recover_from_timeout(&self) -> bool {
        let reset = self
            .services
            .dialogs
            .confirm(Prompt::warning("Scan Timed Out", TIMEOUT_MESSAGE, "Clear & Reset"))
            .await;

        if reset {
            self.clear_saved_path().await;
        }
        reset
    }
}
