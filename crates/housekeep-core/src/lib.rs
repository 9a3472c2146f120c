//! Core types and collaborator traits for housekeep.
//!
//! This crate provides the data exchanged with the scanning backend, the
//! traits the session core calls through, the session configuration, and the
//! two collaborators implemented in-tree: the path safety validator and the
//! JSON settings store.

mod check;
mod config;
mod error;
mod folder;
mod safety;
mod services;
mod settings;

pub use check::{ComplexityCheck, PathValidation};
pub use config::{
    DEFAULT_SCAN_TIMEOUT_MS, SessionConfig, SessionConfigBuilder, WATCHED_PATH_KEY,
};
pub use error::{ScanError, ScanRefusal, ServiceError, SettingsError};
pub use folder::{FolderInfo, ScanReport, total_size};
pub use safety::{DANGEROUS_PATHS, MIN_PATH_COMPONENTS, SafetyValidator};
pub use services::{
    BoxFuture, ComplexityEstimator, DialogService, PathValidator, Prompt, PromptKind,
    ScannerService, ServiceResult, SettingsStore,
};
pub use settings::{APP_DIR, JsonSettingsStore, SETTINGS_FILE};
