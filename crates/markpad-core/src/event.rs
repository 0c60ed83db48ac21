//! Messages between the presentation layer and the document engine.

use std::path::PathBuf;

use serde::Serialize;

use crate::watch::WatchNotice;
use crate::window::WindowId;

/// Requests raised by a window (or by the engine's own watch loop).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentCommand {
    /// A host window was created and needs an untitled document.
    WindowOpened { window: WindowId },
    /// The user asked to close a window.
    CloseRequest { window: WindowId },
    /// The host has torn the window down.
    WindowClosed { window: WindowId },
    /// Show the open dialog and load the chosen file.
    OpenFileRequest { window: WindowId },
    /// Load `path` into the window (OS open-file request, command line).
    OpenPath { window: WindowId, path: PathBuf },
    /// A file was dragged onto the window.
    DropFile { window: WindowId, path: PathBuf },
    /// The user's buffer changed.
    Edit { window: WindowId, content: String },
    /// Persist the buffer to the document's path, asking for one if untitled.
    SaveMarkdown { window: WindowId, content: String },
    /// Persist the buffer to a newly chosen path.
    SaveMarkdownAs { window: WindowId, content: String },
    /// Export rendered HTML to a chosen path.
    SaveHtml { window: WindowId, html: String },
    /// Reload the document from disk.
    Revert { window: WindowId },
    /// A watched file changed on disk.
    FileChanged(WatchNotice),
    ShowInFolder { window: WindowId },
    OpenExternally { window: WindowId },
}

/// Notifications pushed to one window's presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum DocumentEvent {
    /// Authoritative content for the window after an open, drop or revert.
    FileOpened { path: PathBuf, content: String },
    /// The watched file was modified elsewhere and the window accepted it.
    FileChanged { path: PathBuf, content: String },
    /// The window's edited state flipped, or a save moved its baseline.
    EditedChanged { edited: bool, path: Option<PathBuf> },
}

impl DocumentEvent {
    /// Event name used on the host's event bus.
    pub fn name(&self) -> &'static str {
        match self {
            DocumentEvent::FileOpened { .. } => "file-opened",
            DocumentEvent::FileChanged { .. } => "file-changed",
            DocumentEvent::EditedChanged { .. } => "edited-changed",
        }
    }
}

/// Result of an operation the user can abandon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum Outcome<T> {
    Completed(T),
    /// A dialog was dismissed or a confirmation declined. Nothing changed.
    Cancelled,
    /// The request carried nothing to act on (spurious or stale watch event).
    Ignored,
}

impl<T> Outcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Cancelled | Outcome::Ignored => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Completed(value) => Outcome::Completed(f(value)),
            Outcome::Cancelled => Outcome::Cancelled,
            Outcome::Ignored => Outcome::Ignored,
        }
    }
}

/// What a completed [`DocumentCommand`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum Reply {
    WindowReady,
    CloseAllowed,
    WindowReleased,
    Opened(PathBuf),
    Edited(bool),
    Saved(PathBuf),
    Exported(PathBuf),
    Reloaded(PathBuf),
    Revealed(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_shape() {
        let event = DocumentEvent::FileOpened {
            path: PathBuf::from("/a.md"),
            content: "# A".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "file-opened");
        assert_eq!(json["data"]["content"], "# A");
        assert_eq!(event.name(), "file-opened");
    }

    #[test]
    fn test_outcome_helpers() {
        let done: Outcome<u8> = Outcome::Completed(3);
        assert!(done.is_completed());
        assert_eq!(done.map(|v| v * 2).completed(), Some(6));
        assert_eq!(Outcome::<u8>::Cancelled.completed(), None);
    }
}
