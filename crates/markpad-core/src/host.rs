//! Collaborators the document engine delegates to.
//!
//! The engine never touches the filesystem, dialogs or windows directly.
//! Infrastructure provides [`DocumentIo`]; the desktop host provides the
//! rest. Tests substitute in-memory doubles.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::document::{FileFilter, SaveTarget};
use crate::error::Result;
use crate::event::DocumentEvent;
use crate::reconcile::ConfirmationPrompt;
use crate::window::WindowId;

/// Reads and writes document text.
#[async_trait]
pub trait DocumentIo: Send + Sync {
    /// Reads `path` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns `MarkpadError::Io` if the file is missing, unreadable or not
    /// valid UTF-8.
    async fn read_text(&self, path: &Path) -> Result<String>;

    /// Writes `content` to `path`, replacing any existing file.
    async fn write_text(&self, path: &Path, content: &str) -> Result<()>;
}

/// Modal dialogs scoped to one window.
///
/// Each call suspends only the requesting window's flow and resolves to a
/// single value. Dismissal is `None`/`false`, never an error.
#[async_trait]
pub trait DialogHost: Send + Sync {
    /// Asks for a file to open.
    async fn pick_open_path(
        &self,
        window: &WindowId,
        filters: &[FileFilter],
    ) -> Result<Option<PathBuf>>;

    /// Asks for a destination, starting in `default_dir` when given.
    async fn pick_save_path(
        &self,
        window: &WindowId,
        target: SaveTarget,
        default_dir: Option<&Path>,
    ) -> Result<Option<PathBuf>>;

    /// Shows a yes/cancel question. `true` means the confirm button.
    async fn confirm(&self, window: &WindowId, prompt: &ConfirmationPrompt) -> Result<bool>;

    /// Shows a blocking error notice.
    async fn alert(&self, window: &WindowId, title: &str, message: &str) -> Result<()>;
}

/// Delivers state to a window's presentation layer.
pub trait PresentationSink: Send + Sync {
    fn emit(&self, window: &WindowId, event: DocumentEvent) -> Result<()>;

    /// Associates the window with the file on disk (title bar, proxy icon).
    fn set_represented_file(&self, window: &WindowId, path: Option<&Path>) -> Result<()>;
}

/// Native shell integration.
pub trait ShellHost: Send + Sync {
    fn reveal_in_folder(&self, path: &Path) -> Result<()>;

    fn open_externally(&self, path: &Path) -> Result<()>;
}
