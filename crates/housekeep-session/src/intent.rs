//! User intents and the input mappings that produce them.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Signal name the tray menu emits for "Scan Now".
pub const TRIGGER_SCAN_SIGNAL: &str = "trigger-scan";

/// A discrete user gesture for the orchestrator to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Open the folder picker, then validate and watch the choice.
    SelectFolder,
    /// Validate and watch a known path.
    SelectPath(PathBuf),
    /// Rescan the watched path.
    Refresh,
    /// Stop the running scan.
    Cancel,
    /// Move a folder to the trash after confirmation.
    Delete(PathBuf),
    /// Reveal a folder in the file browser.
    Open(PathBuf),
    /// The recovery banner's "Clear & Reset" action.
    ClearSavedPath,
    /// Confirm, then wipe all state and start over.
    EmergencyReset,
}

impl Intent {
    /// Map a key press to an intent.
    ///
    /// Only the emergency reset chord is bound: Ctrl+Shift+R, or
    /// Super+Shift+R (Cmd on macOS).
    pub fn from_key_event(event: KeyEvent) -> Option<Self> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        let modifiers = event.modifiers;
        let platform = modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
        match event.code {
            KeyCode::Char('r' | 'R') if platform && modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Intent::EmergencyReset)
            }
            _ => None,
        }
    }

    /// Map a process-level signal to an intent.
    pub fn from_signal(name: &str) -> Option<Self> {
        match name {
            TRIGGER_SCAN_SIGNAL => Some(Intent::Refresh),
            _ => None,
        }
    }
}
