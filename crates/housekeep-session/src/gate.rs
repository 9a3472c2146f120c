//! Pre-scan validation gate: path safety, then complexity.

use std::path::Path;
use std::sync::Arc;

use housekeep_core::{ComplexityCheck, ComplexityEstimator, DialogService, PathValidator, Prompt};

use crate::FailureKind;
use crate::state::{GateStep, SessionState};

const FALLBACK_INVALID_REASON: &str = "This folder cannot be scanned.";

/// Why a candidate path was turned down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The path validator refused it.
    InvalidPath(String),
    /// The user declined the large-folder warning.
    UserDeclined,
    /// Accepted, but the session was reset or started scanning before the
    /// path could be committed.
    Superseded,
}

/// Verdict of the gate for a candidate path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Rejected(RejectReason),
    /// The estimator refuses the scan outright.
    Blocked {
        recommendation: String,
        estimated_directories: u64,
    },
    /// Large folder, user chose to continue.
    WarnedAndAccepted,
    Accepted,
}

impl GateDecision {
    /// Whether the caller may commit the path and scan.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted | Self::WarnedAndAccepted)
    }
}

/// Sequences path validation and the complexity estimate before a path is
/// committed.
pub struct ValidationGate {
    session: Arc<SessionState>,
    validator: Arc<dyn PathValidator>,
    estimator: Arc<dyn ComplexityEstimator>,
    dialogs: Arc<dyn DialogService>,
}

impl ValidationGate {
    pub fn new(
        session: Arc<SessionState>,
        validator: Arc<dyn PathValidator>,
        estimator: Arc<dyn ComplexityEstimator>,
        dialogs: Arc<dyn DialogService>,
    ) -> Self {
        Self {
            session,
            validator,
            estimator,
            dialogs,
        }
    }

    /// Run the gate for `path`, posting each step to the session.
    ///
    /// The caller is responsible for calling [`SessionState::leave_gate`]
    /// once it has acted on the decision.
    pub async fn evaluate(&self, path: &Path) -> GateDecision {
        self.session.enter_gate(GateStep::Validating);
        let validation = match self.validator.validate(path).await {
            Ok(validation) => validation,
            Err(e) => {
                tracing::warn!(
                    kind = %FailureKind::InvalidPath,
                    path = %path.display(),
                    error = %e,
                    "path validator failed"
                );
                housekeep_core::PathValidation::invalid(e.to_string())
            }
        };

        if !validation.valid {
            let reason = validation
                .reason
                .unwrap_or_else(|| FALLBACK_INVALID_REASON.to_string());
            tracing::info!(path = %path.display(), %reason, "folder rejected");
            self.dialogs
                .confirm(Prompt::notice("Invalid Folder", reason.clone()))
                .await;
            return GateDecision::Rejected(RejectReason::InvalidPath(reason));
        }

        self.session.enter_gate(GateStep::CheckingComplexity);
        let complexity = match self.estimator.check_complexity(path).await {
            Ok(check) => check,
            Err(e) => {
                // Fail open: a broken estimator must not block scanning
                tracing::warn!(
                    kind = %FailureKind::ComplexityCheckUnavailable,
                    path = %path.display(),
                    error = %e,
                    "complexity check failed, continuing"
                );
                return GateDecision::Accepted;
            }
        };

        if complexity.is_blocked {
            tracing::info!(
                kind = %FailureKind::Blocked,
                path = %path.display(),
                estimated = complexity.estimated_directories,
                "folder blocked"
            );
            self.session.enter_gate(GateStep::AwaitingUserDecision);
            self.dialogs
                .confirm(Prompt::notice("Folder Too Large", describe(&complexity, false)))
                .await;
            return GateDecision::Blocked {
                recommendation: complexity.recommendation,
                estimated_directories: complexity.estimated_directories,
            };
        }

        if complexity.needs_warning() {
            self.session.enter_gate(GateStep::AwaitingUserDecision);
            let proceed = self
                .dialogs
                .confirm(Prompt::warning(
                    "Large Folder Warning",
                    describe(&complexity, true),
                    "Continue",
                ))
                .await;

            if !proceed {
                tracing::info!(kind = %FailureKind::UserDeclined, path = %path.display(), "large folder declined");
                return GateDecision::Rejected(RejectReason::UserDeclined);
            }
            return GateDecision::WarnedAndAccepted;
        }

        GateDecision::Accepted
    }
}

/// Dialog body for a complexity estimate.
fn describe(check: &ComplexityCheck, ask: bool) -> String {
    let mut message = format!(
        "{}\n\nEstimated directories: ~{}",
        check.recommendation,
        group_thousands(check.estimated_directories)
    );
    if ask {
        message.push_str("\n\nContinue anyway?");
    }
    message
}

/// `1234567` -> `1,234,567`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
