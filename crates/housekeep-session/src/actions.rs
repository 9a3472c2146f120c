//! Folder actions: delete to trash, reveal in file browser.

use std::path::Path;

use housekeep_core::Prompt;

use crate::FailureKind;
use crate::orchestrator::Orchestrator;

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user did not confirm; nothing happened.
    Declined,
    Deleted,
    /// The backend reported a failure. A rescan still ran.
    Failed,
}

impl Orchestrator {
    /// Confirm, move `folder` to the trash, then rescan the watched path.
    ///
    /// The rescan runs whether or not the delete succeeded.
    pub async fn request_delete(&self, folder: &Path) -> DeleteOutcome {
        let confirmed = self
            .services
            .dialogs
            .confirm(Prompt::destructive(
                "Delete folder?",
                format!("This will move to trash:\n{}", folder.display()),
                "Delete",
            ))
            .await;
        if !confirmed {
            return DeleteOutcome::Declined;
        }

        let outcome = match self.services.scanner.delete_folder(folder).await {
            Ok(()) => {
                tracing::info!(path = %folder.display(), "folder moved to trash");
                DeleteOutcome::Deleted
            }
            Err(e) => {
                tracing::warn!(
                    kind = %FailureKind::DeleteFailure,
                    path = %folder.display(),
                    error = %e,
                    "delete failed"
                );
                DeleteOutcome::Failed
            }
        };

        self.scan_quietly().await;
        outcome
    }

    /// Reveal `folder` in the file browser. Failures are only logged.
    pub async fn open_location(&self, folder: &Path) {
        if let Err(e) = self.services.scanner.open_location(folder).await {
            tracing::warn!(
                kind = %FailureKind::OpenFailure,
                path = %folder.display(),
                error = %e,
                "failed to open location"
            );
        }
    }
}
