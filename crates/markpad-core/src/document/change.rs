use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where incoming document content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeSource {
    /// The user picked a file in the open dialog (or the OS asked us to open one)
    OpenRequest,
    /// The watched file was modified by another application
    ExternalChange,
    /// A file was dragged onto the window
    Drop,
    /// The user asked to reload the file from disk
    Revert,
}

/// Content waiting for a reconciliation decision.
///
/// Lives only for the duration of one decision and is consumed by
/// [`crate::reconcile::ChangeReconciler::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    pub incoming_path: PathBuf,
    pub incoming_content: String,
    pub source: ChangeSource,
}

impl PendingChange {
    pub fn new(
        incoming_path: impl Into<PathBuf>,
        incoming_content: impl Into<String>,
        source: ChangeSource,
    ) -> Self {
        Self {
            incoming_path: incoming_path.into(),
            incoming_content: incoming_content.into(),
            source,
        }
    }
}
