//! Error types for the Markpad document engine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::window::WindowId;

/// A shared error type for the document engine.
///
/// Dismissing a dialog is not an error; see [`crate::event::Outcome::Cancelled`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkpadError {
    /// Read, write, permission or encoding failure on a document file
    #[error("IO error on '{}': {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// The window has no saved document (untitled) for an operation that needs one
    #[error("There is currently no active document")]
    NoActiveDocument,

    /// The window was never registered or has already been closed
    #[error("Window not found: '{0}'")]
    WindowNotFound(WindowId),

    /// A dropped or requested file whose extension is not a text/markdown type
    #[error("Unsupported file type: '{}'", .0.display())]
    UnsupportedFileType(PathBuf),

    /// Another content replacement is already awaiting a decision for this window
    #[error("A document change is already pending for window '{0}'")]
    ReconciliationInProgress(WindowId),

    /// Filesystem watch could not be installed
    #[error("Watch error: {0}")]
    Watch(String),

    /// Host dialog failed (not dismissed; dismissal is a cancellation)
    #[error("Dialog error: {0}")]
    Dialog(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarkpadError {
    /// Creates an Io error for `path`
    pub fn io(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Creates an Io error from a `std::io::Error`
    pub fn from_io(path: impl AsRef<Path>, err: &std::io::Error) -> Self {
        Self::io(path, err.to_string())
    }

    /// Creates a Watch error
    pub fn watch(message: impl Into<String>) -> Self {
        Self::Watch(message.into())
    }

    /// Creates a Dialog error
    pub fn dialog(message: impl Into<String>) -> Self {
        Self::Dialog(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true for failures of the underlying filesystem.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Result type alias using MarkpadError
pub type Result<T> = std::result::Result<T, MarkpadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_includes_path() {
        let err = MarkpadError::io("/tmp/a.md", "permission denied");
        assert_eq!(err.to_string(), "IO error on '/tmp/a.md': permission denied");
        assert!(err.is_io());
    }

    #[test]
    fn test_no_active_document_message() {
        let err = MarkpadError::NoActiveDocument;
        assert_eq!(err.to_string(), "There is currently no active document");
        assert!(!err.is_io());
    }

    #[test]
    fn test_error_serialization() {
        let err = MarkpadError::ReconciliationInProgress(WindowId::new("main"));
        let json = serde_json::to_string(&err).unwrap();
        let back: MarkpadError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
