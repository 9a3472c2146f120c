//! Folder records produced by a scan.

use std::path::PathBuf;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A heavy sub-folder found under the watched path.
///
/// Immutable once produced; a completed scan replaces the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderInfo {
    /// Absolute path of the folder.
    pub path: PathBuf,
    /// Display name, usually `parent/folder`.
    pub name: CompactString,
    /// Aggregate size in bytes.
    pub size: u64,
    /// Number of files below the folder.
    pub file_count: u64,
}

impl FolderInfo {
    /// Create a new folder record.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<CompactString>,
        size: u64,
        file_count: u64,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            size,
            file_count,
        }
    }
}

/// Response of the scanner's "scan folders" operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Folders found, largest first.
    pub folders: Vec<FolderInfo>,
    /// Sum of all folder sizes.
    pub total_size: u64,
    /// The path the scanner actually walked.
    pub scan_path: PathBuf,
}

impl ScanReport {
    /// Build a report, deriving the total from the folders.
    pub fn new(scan_path: impl Into<PathBuf>, folders: Vec<FolderInfo>) -> Self {
        let total_size = total_size(&folders);
        Self {
            folders,
            total_size,
            scan_path: scan_path.into(),
        }
    }
}

/// Sum of the sizes of `folders`.
pub fn total_size(folders: &[FolderInfo]) -> u64 {
    folders.iter().map(|f| f.size).sum()
}
