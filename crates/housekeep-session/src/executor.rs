//! Timed scan execution and cancellation.

use std::sync::Arc;
use std::time::Duration;

use housekeep_core::{
    FolderInfo, ScanError, ScanRefusal, ScanReport, ScannerService, ServiceResult, total_size,
};
use humansize::{DECIMAL, format_size};

use crate::FailureKind;
use crate::state::SessionState;

/// Which party settled the scan race first.
enum Race {
    Settled(ServiceResult<ScanReport>),
    Deadline,
    Abandoned,
}

/// Runs scans against a deadline and applies the outcome to the session.
///
/// Losing the race does not stop the backend: a timed-out or abandoned scan
/// may keep running and answer later. Such late answers are dropped by the
/// session's generation guard.
pub struct ScanExecutor {
    session: Arc<SessionState>,
    scanner: Arc<dyn ScannerService>,
    timeout: Duration,
}

impl ScanExecutor {
    pub fn new(session: Arc<SessionState>, scanner: Arc<dyn ScannerService>, timeout: Duration) -> Self {
        Self {
            session,
            scanner,
            timeout,
        }
    }

    /// Scan the current watched path.
    ///
    /// On success the returned folders are also the session's new folders.
    pub async fn execute_scan(&self) -> Result<Vec<FolderInfo>, ScanError> {
        let Some(ticket) = self.session.begin_scan() else {
            let refusal = if self.session.path().is_none() {
                ScanRefusal::NoPath
            } else {
                ScanRefusal::AlreadyScanning
            };
            tracing::debug!(?refusal, "scan request refused");
            return Err(ScanError::Refused(refusal));
        };

        let path = ticket.path().to_path_buf();
        tracing::info!(path = %path.display(), generation = ticket.generation(), "scan started");

        let race = tokio::select! {
            result = self.scanner.scan_folders(&path) => Race::Settled(result),
            () = tokio::time::sleep(self.timeout) => Race::Deadline,
            () = ticket.token().cancelled() => Race::Abandoned,
        };

        match race {
            Race::Settled(Ok(report)) => {
                if report.scan_path != path {
                    tracing::debug!(
                        requested = %path.display(),
                        reported = %report.scan_path.display(),
                        "scanner reported a different scan path"
                    );
                }
                let folders = report.folders;
                if !self.session.complete_scan(&ticket, folders.clone()) {
                    return Err(ScanError::Discarded);
                }
                tracing::info!(
                    path = %path.display(),
                    folders = folders.len(),
                    total = %format_size(total_size(&folders), DECIMAL),
                    "scan completed"
                );
                Ok(folders)
            }
            Race::Settled(Err(e)) => {
                if !self.session.fail_scan(&ticket) {
                    return Err(ScanError::Discarded);
                }
                tracing::warn!(
                    kind = %FailureKind::ScanFailure,
                    path = %path.display(),
                    error = %e,
                    "scan failed"
                );
                Err(ScanError::Failed(e))
            }
            Race::Deadline => {
                if !self.session.mark_timed_out(&ticket) {
                    return Err(ScanError::Discarded);
                }
                tracing::warn!(
                    kind = %FailureKind::ScanTimeout,
                    path = %path.display(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "scan timed out"
                );
                Err(ScanError::TimedOut {
                    timeout: self.timeout,
                })
            }
            Race::Abandoned => {
                tracing::info!(path = %path.display(), "scan abandoned");
                Err(ScanError::Cancelled)
            }
        }
    }

    /// Stop the running scan.
    ///
    /// The session passes through `Cancelling` and settles `Idle` before
    /// this returns. The backend is asked to stop in the background and its
    /// answer is never awaited. Returns `false` without doing anything if no
    /// scan is running.
    pub fn cancel_scan(&self) -> bool {
        let Some(generation) = self.session.begin_cancel() else {
            return false;
        };

        self.request_backend_cancel();
        self.session.finish_cancel(generation);
        tracing::info!("scan cancelled");
        true
    }

    /// Ask the scanner to stop without waiting for it.
    pub(crate) fn request_backend_cancel(&self) {
        let scanner = Arc::clone(&self.scanner);
        tokio::spawn(async move {
            if let Err(e) = scanner.cancel_scan().await {
                tracing::warn!(kind = %FailureKind::CancelFailure, error = %e, "failed to cancel scan");
            }
        });
    }
}
