//! Platform paths used by Markpad.
//!
//! Markpad stores nothing of its own apart from log files. Everything else
//! here is a starting point for dialogs.
//!
//! ```text
//! ~/Documents/                   # Default directory for save dialogs
//! ~/.local/share/markpad/logs/   # Rolling log files (Linux; platform equivalent elsewhere)
//! └── markpad.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "markpad";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Neither the platform directory nor the home directory could be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct MarkpadPaths;

impl MarkpadPaths {
    /// Directory offered by save dialogs for untitled documents.
    ///
    /// Falls back to the home directory on platforms without a documents folder.
    pub fn documents_dir() -> Result<PathBuf, PathError> {
        dirs::document_dir()
            .or_else(dirs::home_dir)
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Per-user data directory for Markpad.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_local_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Directory for rolling log files.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("logs"))
    }
}
