//! Failure taxonomy used to tag log events.

use strum::Display;

/// Kinds of failure the session core handles.
///
/// None of these propagate to the caller as a hard error; each is either
/// shown in a dialog or logged with this kind attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FailureKind {
    /// The validator rejected the path.
    InvalidPath,
    /// The estimator call failed; the scan goes ahead.
    ComplexityCheckUnavailable,
    /// The estimator refused the path.
    Blocked,
    /// The user declined a warning or confirmation.
    UserDeclined,
    /// The scan missed its deadline.
    ScanTimeout,
    /// The scanner rejected the request.
    ScanFailure,
    CancelFailure,
    DeleteFailure,
    OpenFailure,
    /// The settings store could not be read or written.
    SettingsFailure,
}
