//! The session record and its transition API.
//!
//! [`SessionState`] owns the one [`ScanSession`] of the process. Nothing else
//! mutates it: callers go through the transition methods, each of which
//! applies fully under a lock (never held across an await) and publishes
//! exactly one snapshot to observers when it takes effect.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local};
use housekeep_core::{FolderInfo, total_size};
use strum::Display;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SessionPhase {
    #[default]
    Idle,
    Validating,
    CheckingComplexity,
    AwaitingUserDecision,
    Scanning,
    Cancelling,
    Completed,
    Failed,
    TimedOut,
}

impl SessionPhase {
    /// Phases posted by the validation gate.
    pub fn is_gate(self) -> bool {
        matches!(
            self,
            Self::Validating | Self::CheckingComplexity | Self::AwaitingUserDecision
        )
    }

    /// A scan is running or being torn down.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Scanning | Self::Cancelling)
    }
}

/// Steps of the validation gate, as posted to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStep {
    Validating,
    CheckingComplexity,
    AwaitingUserDecision,
}

impl From<GateStep> for SessionPhase {
    fn from(step: GateStep) -> Self {
        match step {
            GateStep::Validating => Self::Validating,
            GateStep::CheckingComplexity => Self::CheckingComplexity,
            GateStep::AwaitingUserDecision => Self::AwaitingUserDecision,
        }
    }
}

/// Snapshot of the orchestration record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanSession {
    /// The watched path.
    pub path: Option<PathBuf>,
    pub phase: SessionPhase,
    /// Folders from the most recent completed scan of `path`.
    pub folders: Vec<FolderInfo>,
    pub recovery_banner_visible: bool,
    /// When the folders were produced.
    pub last_completed: Option<DateTime<Local>>,
    /// Bumped whenever a scan starts or is abandoned.
    pub generation: u64,
    /// Bumped once per applied transition.
    pub revision: u64,
}

impl ScanSession {
    /// Sum of all folder sizes.
    pub fn total_size(&self) -> u64 {
        total_size(&self.folders)
    }
}

/// Proof that a scan was started, stamped with the session generation.
///
/// Results are only applied while the ticket is still current.
#[derive(Debug, Clone)]
pub struct ScanTicket {
    generation: u64,
    path: PathBuf,
    token: CancellationToken,
}

impl ScanTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The path the scan was issued against.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fired when the session abandons this scan.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[derive(Debug, Default)]
struct Inner {
    session: ScanSession,
    /// Phase to return to when the gate finishes.
    resting: SessionPhase,
    scan_token: Option<CancellationToken>,
}

impl Inner {
    fn owns(&self, ticket: &ScanTicket) -> bool {
        self.session.phase == SessionPhase::Scanning
            && self.session.generation == ticket.generation
            && self.session.path.as_deref() == Some(ticket.path.as_path())
    }

    /// Drop any running scan: new generation, token fired.
    fn abandon_scan(&mut self) {
        self.session.generation += 1;
        if let Some(token) = self.scan_token.take() {
            token.cancel();
        }
        if self.session.phase.is_in_flight() {
            self.session.phase = SessionPhase::Idle;
        }
    }
}

/// Owner of the process-wide [`ScanSession`].
#[derive(Debug)]
pub struct SessionState {
    inner: Mutex<Inner>,
    tx: watch::Sender<ScanSession>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ScanSession::default());
        Self {
            inner: Mutex::new(Inner::default()),
            tx,
        }
    }

    /// Receive a snapshot after every applied transition.
    pub fn subscribe(&self) -> watch::Receiver<ScanSession> {
        self.tx.subscribe()
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> ScanSession {
        self.lock().session.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().session.phase
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.lock().session.path.clone()
    }

    pub fn is_scanning(&self) -> bool {
        self.phase() == SessionPhase::Scanning
    }

    /// Current generation. Changes whenever a scan starts or the session
    /// abandons its work (path change, clear, cancel, reset).
    pub fn generation(&self) -> u64 {
        self.lock().session.generation
    }

    /// Commit a new watched path.
    ///
    /// Abandons any running scan and hides the banner. Folders are dropped
    /// when the path actually changes.
    pub fn set_path(&self, path: PathBuf) {
        self.transition(|inner| {
            inner.abandon_scan();
            let session = &mut inner.session;
            if session.path.as_ref() != Some(&path) {
                session.folders.clear();
                session.last_completed = None;
                if !session.phase.is_gate() {
                    session.phase = SessionPhase::Idle;
                }
                inner.resting = SessionPhase::Idle;
                session.path = Some(path);
            }
            session.recovery_banner_visible = false;
            Some(())
        });
    }

    /// Forget the watched path: no path, no folders, Idle, banner hidden.
    pub fn clear_path(&self) {
        self.transition(|inner| {
            inner.abandon_scan();
            inner.resting = SessionPhase::Idle;
            let session = &mut inner.session;
            session.path = None;
            session.folders.clear();
            session.last_completed = None;
            session.phase = SessionPhase::Idle;
            session.recovery_banner_visible = false;
            Some(())
        });
    }

    /// Enter `Scanning` for the current path.
    ///
    /// Refused (returns `None`) while a scan is running or no path is set.
    pub fn begin_scan(&self) -> Option<ScanTicket> {
        self.transition(|inner| {
            if inner.session.phase == SessionPhase::Scanning {
                return None;
            }
            let path = inner.session.path.clone()?;

            inner.abandon_scan();
            let token = CancellationToken::new();
            inner.scan_token = Some(token.clone());
            inner.session.phase = SessionPhase::Scanning;

            Some(ScanTicket {
                generation: inner.session.generation,
                path,
                token,
            })
        })
    }

    /// Replace the folders with a completed scan's result.
    ///
    /// Returns `false` and changes nothing if `ticket` is stale.
    pub fn complete_scan(&self, ticket: &ScanTicket, folders: Vec<FolderInfo>) -> bool {
        self.finish(ticket, |session| {
            session.folders = folders;
            session.last_completed = Some(Local::now());
            session.phase = SessionPhase::Completed;
        })
    }

    /// Record a failed scan. Folders are cleared.
    pub fn fail_scan(&self, ticket: &ScanTicket) -> bool {
        self.finish(ticket, |session| {
            session.folders.clear();
            session.last_completed = None;
            session.phase = SessionPhase::Failed;
        })
    }

    /// Record a scan that missed its deadline. Folders are cleared and the
    /// recovery banner raised.
    pub fn mark_timed_out(&self, ticket: &ScanTicket) -> bool {
        self.finish(ticket, |session| {
            session.folders.clear();
            session.last_completed = None;
            session.phase = SessionPhase::TimedOut;
            session.recovery_banner_visible = true;
        })
    }

    /// Show or hide the recovery banner. No-op if unchanged.
    pub fn set_recovery_banner(&self, visible: bool) -> bool {
        self.transition(|inner| {
            if inner.session.recovery_banner_visible == visible {
                return None;
            }
            inner.session.recovery_banner_visible = visible;
            Some(())
        })
        .is_some()
    }

    /// Post a validation step. Refused while a scan is in flight.
    pub fn enter_gate(&self, step: GateStep) -> bool {
        self.transition(|inner| {
            let current = inner.session.phase;
            if current.is_in_flight() {
                return None;
            }
            if !current.is_gate() {
                inner.resting = current;
            }
            inner.session.phase = step.into();
            Some(())
        })
        .is_some()
    }

    /// Leave the gate, restoring the phase it interrupted.
    ///
    /// Returns `false` if something else moved the session on meanwhile.
    pub fn leave_gate(&self) -> bool {
        self.transition(|inner| {
            if !inner.session.phase.is_gate() {
                return None;
            }
            inner.session.phase = inner.resting;
            Some(())
        })
        .is_some()
    }

    /// Move a running scan to `Cancelling`.
    ///
    /// Returns the generation to hand back to [`finish_cancel`], or `None` if
    /// no scan was running.
    ///
    /// [`finish_cancel`]: Self::finish_cancel
    pub fn begin_cancel(&self) -> Option<u64> {
        self.transition(|inner| {
            if inner.session.phase != SessionPhase::Scanning {
                return None;
            }
            inner.abandon_scan();
            inner.session.phase = SessionPhase::Cancelling;
            Some(inner.session.generation)
        })
    }

    /// Settle a cancellation at `Idle`, unless another transition already
    /// moved the session on.
    pub fn finish_cancel(&self, generation: u64) -> bool {
        self.transition(|inner| {
            if inner.session.phase != SessionPhase::Cancelling
                || inner.session.generation != generation
            {
                return None;
            }
            inner.session.phase = SessionPhase::Idle;
            Some(())
        })
        .is_some()
    }

    /// Replace the record with a fresh one, abandoning everything in flight.
    pub fn reset(&self) {
        self.transition(|inner| {
            inner.abandon_scan();
            let generation = inner.session.generation;
            let revision = inner.session.revision;
            inner.session = ScanSession {
                generation,
                revision,
                ..ScanSession::default()
            };
            inner.resting = SessionPhase::Idle;
            Some(())
        });
    }

    fn finish(&self, ticket: &ScanTicket, apply: impl FnOnce(&mut ScanSession)) -> bool {
        let applied = self
            .transition(|inner| {
                if !inner.owns(ticket) {
                    return None;
                }
                inner.scan_token = None;
                apply(&mut inner.session);
                Some(())
            })
            .is_some();

        if !applied {
            tracing::debug!(
                generation = ticket.generation,
                path = %ticket.path.display(),
                "discarding result of a scan the session no longer tracks"
            );
        }
        applied
    }

    /// Apply `change` atomically; publish one snapshot if it returns `Some`.
    fn transition<R>(&self, change: impl FnOnce(&mut Inner) -> Option<R>) -> Option<R> {
        let mut inner = self.lock();
        let result = change(&mut inner)?;
        inner.session.revision += 1;
        self.tx.send_replace(inner.session.clone());
        Some(result)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
