//! The orchestrator: owns the session and routes intents.

use std::path::PathBuf;
use std::sync::Arc;

use housekeep_core::{
    ComplexityEstimator, DialogService, FolderInfo, PathValidator, ScanError, ScannerService,
    SessionConfig, SettingsStore,
};
use tokio::sync::watch;

use crate::FailureKind;
use crate::executor::ScanExecutor;
use crate::gate::{GateDecision, RejectReason, ValidationGate};
use crate::intent::Intent;
use crate::state::{ScanSession, SessionState};

/// The external collaborators the orchestrator calls.
#[derive(Clone)]
pub struct Services {
    pub validator: Arc<dyn PathValidator>,
    pub estimator: Arc<dyn ComplexityEstimator>,
    pub scanner: Arc<dyn ScannerService>,
    pub dialogs: Arc<dyn DialogService>,
    pub settings: Arc<dyn SettingsStore>,
}

/// Scan-session orchestrator.
///
/// Construct one per process and share it by reference (or `Arc`). All
/// methods take `&self` and may be called while another handler is suspended
/// on an external call; consistency comes from the session's phase and
/// generation checks.
pub struct Orchestrator {
    pub(crate) session: Arc<SessionState>,
    pub(crate) services: Services,
    pub(crate) config: SessionConfig,
    gate: ValidationGate,
    executor: ScanExecutor,
}

impl Orchestrator {
    /// Create an orchestrator with a fresh session. Call [`startup`] next.
    ///
    /// [`startup`]: Self::startup
    pub fn new(services: Services, config: SessionConfig) -> Self {
        let session = Arc::new(SessionState::new());
        let gate = ValidationGate::new(
            Arc::clone(&session),
            Arc::clone(&services.validator),
            Arc::clone(&services.estimator),
            Arc::clone(&services.dialogs),
        );
        let executor = ScanExecutor::new(
            Arc::clone(&session),
            Arc::clone(&services.scanner),
            config.scan_timeout(),
        );

        Self {
            session,
            services,
            config,
            gate,
            executor,
        }
    }

    /// The session record's owner.
    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Copy of the current session record.
    pub fn snapshot(&self) -> ScanSession {
        self.session.snapshot()
    }

    /// Receive a snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<ScanSession> {
        self.session.subscribe()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Load the saved path, validate it, and scan it if it is still usable.
    ///
    /// An invalid saved path raises the recovery banner without prompting.
    pub async fn startup(&self) {
        let saved = match self.services.settings.get(&self.config.settings_key).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(kind = %FailureKind::SettingsFailure, error = %e, "could not read saved path");
                None
            }
        };

        let Some(saved) = saved.filter(|s| !s.trim().is_empty()) else {
            tracing::debug!("no saved path");
            return;
        };

        let path = PathBuf::from(saved);
        if !self.validate_saved_path(&path).await {
            return;
        }

        tracing::info!(path = %path.display(), "resuming saved path");
        self.session.set_path(path);
        self.scan_quietly().await;
    }

    /// Route an intent to its handler.
    pub async fn dispatch(&self, intent: Intent) {
        tracing::debug!(?intent, "dispatching intent");
        match intent {
            Intent::SelectFolder => {
                self.select_folder().await;
            }
            Intent::SelectPath(path) => {
                self.select_path(path).await;
            }
            Intent::Refresh => self.scan_quietly().await,
            Intent::Cancel => {
                self.cancel_scan().await;
            }
            Intent::Delete(path) => {
                self.request_delete(&path).await;
            }
            Intent::Open(path) => self.open_location(&path).await,
            Intent::ClearSavedPath => self.clear_saved_path().await,
            Intent::EmergencyReset => {
                self.emergency_reset().await;
            }
        }
    }

    /// Ask the user for a folder and select it.
    ///
    /// Returns `None` if the picker was dismissed.
    pub async fn select_folder(&self) -> Option<GateDecision> {
        let path = self.services.dialogs.pick_directory().await?;
        Some(self.select_path(path).await)
    }

    /// Validate `path` and, if accepted, watch it and scan it.
    ///
    /// A running scan keeps going while the gate runs and is only cancelled
    /// once the new path is accepted. If the session is reset or a scan
    /// starts while the gate is waiting, the selection is dropped.
    pub async fn select_path(&self, path: PathBuf) -> GateDecision {
        let generation = self.session.generation();
        let decision = self.gate.evaluate(&path).await;
        self.session.leave_gate();
        if !decision.is_accepted() {
            return decision;
        }
        if self.session.generation() != generation {
            tracing::info!(path = %path.display(), "session moved on during validation, selection dropped");
            return GateDecision::Rejected(RejectReason::Superseded);
        }

        if self.session.is_scanning() {
            self.executor.cancel_scan();
        }
        self.session.set_path(path.clone());
        let value = path.to_string_lossy();
        if let Err(e) = self
            .services
            .settings
            .set(&self.config.settings_key, &value)
            .await
        {
            tracing::warn!(kind = %FailureKind::SettingsFailure, error = %e, "could not save watched path");
        }
        tracing::info!(path = %path.display(), "watching folder");

        self.scan_quietly().await;
        decision
    }

    /// Rescan the watched path.
    ///
    /// A timeout hands over to the timeout recovery dialog before returning.
    pub async fn refresh(&self) -> Result<Vec<FolderInfo>, ScanError> {
        let result = self.executor.execute_scan().await;
        if let Err(ScanError::TimedOut { .. }) = &result {
            self.recover_from_timeout().await;
        }
        result
    }

    /// Stop the running scan. No-op (returns `false`) when not scanning.
    pub async fn cancel_scan(&self) -> bool {
        self.executor.cancel_scan()
    }

    /// Ask the scanner to stop in the background.
    pub(crate) fn request_backend_cancel(&self) {
        self.executor.request_backend_cancel();
    }

    /// Refresh, keeping the outcome to the log.
    pub(crate) async fn scan_quietly(&self) {
        if let Err(e) = self.refresh().await {
            tracing::debug!(error = %e, "scan did not produce new results");
        }
    }
}
