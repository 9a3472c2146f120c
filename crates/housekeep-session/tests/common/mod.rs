//! Scripted collaborators for orchestrator tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use housekeep_core::{
    BoxFuture, ComplexityCheck, ComplexityEstimator, DialogService, FolderInfo, PathValidation,
    PathValidator, Prompt, ScanReport, ScannerService, ServiceError, ServiceResult,
    SessionConfig, SettingsError, SettingsStore,
};
use housekeep_session::{Orchestrator, Services, SessionPhase, SessionState};
use tokio::sync::oneshot;

pub const MB: u64 = 1_000_000;

/// How the mock scanner answers one scan request.
#[derive(Debug, Clone)]
pub enum ScanScript {
    Report(Vec<FolderInfo>),
    Fail(String),
    /// Never answers.
    Hang,
    /// Answers after a delay.
    Delayed(Duration, Vec<FolderInfo>),
}

/// Validator, estimator, and scanner in one scripted backend.
pub struct MockBackend {
    invalid: Mutex<HashMap<PathBuf, String>>,
    complexity: Mutex<Result<ComplexityCheck, String>>,
    scripts: Mutex<VecDeque<ScanScript>>,
    pub scan_calls: Mutex<Vec<PathBuf>>,
    pub cancel_calls: AtomicUsize,
    pub delete_calls: Mutex<Vec<PathBuf>>,
    pub open_calls: Mutex<Vec<PathBuf>>,
    pub fail_deletes: AtomicBool,
    pub fail_opens: AtomicBool,
    pub fail_cancels: AtomicBool,
    /// Cancel requests never answer.
    pub hang_cancels: AtomicBool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            invalid: Mutex::new(HashMap::new()),
            complexity: Mutex::new(Ok(ComplexityCheck::new(
                120,
                false,
                false,
                "Folder size looks reasonable for scanning.",
            ))),
            scripts: Mutex::new(VecDeque::new()),
            scan_calls: Mutex::new(Vec::new()),
            cancel_calls: AtomicUsize::new(0),
            delete_calls: Mutex::new(Vec::new()),
            open_calls: Mutex::new(Vec::new()),
            fail_deletes: AtomicBool::new(false),
            fail_opens: AtomicBool::new(false),
            fail_cancels: AtomicBool::new(false),
            hang_cancels: AtomicBool::new(false),
        }
    }
}

impl MockBackend {
    pub fn reject_path(&self, path: impl Into<PathBuf>, reason: &str) {
        self.invalid
            .lock()
            .unwrap()
            .insert(path.into(), reason.to_string());
    }

    pub fn set_complexity(&self, check: ComplexityCheck) {
        *self.complexity.lock().unwrap() = Ok(check);
    }

    pub fn fail_complexity(&self, message: &str) {
        *self.complexity.lock().unwrap() = Err(message.to_string());
    }

    /// Queue the answer for the next scan request. Unscripted scans return
    /// an empty report.
    pub fn script(&self, script: ScanScript) {
        self.scripts.lock().unwrap().push_back(script);
    }

    pub fn scans(&self) -> Vec<PathBuf> {
        self.scan_calls.lock().unwrap().clone()
    }

    pub fn cancels(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }
}

impl PathValidator for MockBackend {
    fn validate<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, ServiceResult<PathValidation>> {
        let verdict = match self.invalid.lock().unwrap().get(path) {
            Some(reason) => PathValidation::invalid(reason.clone()),
            None => PathValidation::valid(),
        };
        Box::pin(async move { Ok(verdict) })
    }
}

impl ComplexityEstimator for MockBackend {
    fn check_complexity<'a>(
        &'a self,
        _path: &'a Path,
    ) -> BoxFuture<'a, ServiceResult<ComplexityCheck>> {
        let answer = self.complexity.lock().unwrap().clone();
        Box::pin(async move { answer.map_err(ServiceError::other) })
    }
}

impl ScannerService for MockBackend {
    fn scan_folders<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, ServiceResult<ScanReport>> {
        self.scan_calls.lock().unwrap().push(path.to_path_buf());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ScanScript::Report(Vec::new()));

        Box::pin(async move {
            match script {
                ScanScript::Report(folders) => Ok(ScanReport::new(path, folders)),
                ScanScript::Fail(message) => Err(ServiceError::other(message)),
                ScanScript::Hang => std::future::pending().await,
                ScanScript::Delayed(delay, folders) => {
                    tokio::time::sleep(delay).await;
                    Ok(ScanReport::new(path, folders))
                }
            }
        })
    }

    fn cancel_scan(&self) -> BoxFuture<'_, ServiceResult<()>> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        let fail = self.fail_cancels.load(Ordering::SeqCst);
        let hang = self.hang_cancels.load(Ordering::SeqCst);
        Box::pin(async move {
            if hang {
                return std::future::pending().await;
            }
            if fail {
                Err(ServiceError::Unavailable {
                    message: "backend gone".to_string(),
                })
            } else {
                Ok(())
            }
        })
    }

    fn delete_folder<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, ServiceResult<()>> {
        self.delete_calls.lock().unwrap().push(path.to_path_buf());
        let fail = self.fail_deletes.load(Ordering::SeqCst);
        Box::pin(async move {
            if fail {
                Err(ServiceError::other("Failed to delete: permission denied"))
            } else {
                Ok(())
            }
        })
    }

    fn open_location<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, ServiceResult<()>> {
        self.open_calls.lock().unwrap().push(path.to_path_buf());
        let fail = self.fail_opens.load(Ordering::SeqCst);
        Box::pin(async move {
            if fail {
                Err(ServiceError::NotFound {
                    path: path.to_path_buf(),
                })
            } else {
                Ok(())
            }
        })
    }
}

/// Dialogs answered from a queue; unanswered prompts are declined.
///
/// A held prompt stays open until the test sends its answer.
#[derive(Default)]
pub struct MockDialogs {
    answers: Mutex<VecDeque<bool>>,
    held: Mutex<Option<oneshot::Receiver<bool>>>,
    pub prompts: Mutex<Vec<Prompt>>,
    picked: Mutex<Option<PathBuf>>,
}

impl MockDialogs {
    /// Keep the next prompt open until the returned sender answers it.
    pub fn hold_next(&self) -> oneshot::Sender<bool> {
        let (tx, rx) = oneshot::channel();
        *self.held.lock().unwrap() = Some(rx);
        tx
    }

    pub fn answer(&self, answer: bool) {
        self.answers.lock().unwrap().push_back(answer);
    }

    pub fn pick(&self, path: impl Into<PathBuf>) {
        *self.picked.lock().unwrap() = Some(path.into());
    }

    pub fn shown(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.shown().into_iter().map(|p| p.title).collect()
    }
}

impl DialogService for MockDialogs {
    fn confirm(&self, prompt: Prompt) -> BoxFuture<'_, bool> {
        self.prompts.lock().unwrap().push(prompt);
        if let Some(held) = self.held.lock().unwrap().take() {
            return Box::pin(async move { held.await.unwrap_or(false) });
        }
        let answer = self.answers.lock().unwrap().pop_front().unwrap_or(false);
        Box::pin(async move { answer })
    }

    fn pick_directory(&self) -> BoxFuture<'_, Option<PathBuf>> {
        let picked = self.picked.lock().unwrap().take();
        Box::pin(async move { picked })
    }
}

/// In-memory settings.
#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

impl SettingsStore for MemorySettings {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, SettingsError>> {
        let value = self.value(key);
        Box::pin(async move { Ok(value) })
    }

    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, Result<(), SettingsError>> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Box::pin(async move { Ok(()) })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), SettingsError>> {
        self.values.lock().unwrap().remove(key);
        Box::pin(async move { Ok(()) })
    }
}

/// An orchestrator wired to mocks, with handles to inspect them.
pub struct Harness {
    pub orchestrator: Arc<Orchestrator>,
    pub backend: Arc<MockBackend>,
    pub dialogs: Arc<MockDialogs>,
    pub settings: Arc<MemorySettings>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(MemorySettings::default())
    }

    pub fn with_settings(settings: MemorySettings) -> Self {
        let backend = Arc::new(MockBackend::default());
        let dialogs = Arc::new(MockDialogs::default());
        let settings = Arc::new(settings);

        let services = Services {
            validator: backend.clone(),
            estimator: backend.clone(),
            scanner: backend.clone(),
            dialogs: dialogs.clone(),
            settings: settings.clone(),
        };

        Self {
            orchestrator: Arc::new(Orchestrator::new(services, SessionConfig::default())),
            backend,
            dialogs,
            settings,
        }
    }

    pub fn session(&self) -> &SessionState {
        self.orchestrator.session()
    }
}

pub fn folder(path: &str, size: u64, file_count: u64) -> FolderInfo {
    let name = Path::new(path)
        .iter()
        .rev()
        .take(2)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(|c| c.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    FolderInfo::new(path, name, size, file_count)
}

/// Let spawned tasks run until the session reaches `phase`.
pub async fn wait_for_phase(session: &SessionState, phase: SessionPhase) {
    for _ in 0..1_000 {
        if session.phase() == phase {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("session never reached {phase}, stuck at {}", session.phase());
}

/// Let every ready task run, including background cancel requests.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
