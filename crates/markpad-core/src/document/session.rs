use std::path::{Path, PathBuf};

/// Display name used for documents that have never been saved.
pub const UNTITLED: &str = "Untitled";

/// Per-window document state.
///
/// `DocumentSession` holds the last content read from or written to disk
/// (`saved_content`) next to the user's live buffer (`live_content`). The
/// edited flag is never stored: it is always `live_content != saved_content`,
/// so it cannot drift from the buffers it describes.
///
/// The session performs no I/O. Callers are responsible for having authorized
/// any overwrite (see [`crate::reconcile::ChangeReconciler`]) before calling
/// [`DocumentSession::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSession {
    path: Option<PathBuf>,
    saved_content: String,
    live_content: String,
}

impl DocumentSession {
    /// Creates an empty, never-saved session.
    pub fn untitled() -> Self {
        Self::default()
    }

    /// Replaces the whole session with content read from `path`.
    ///
    /// Afterwards `saved_content == live_content == content` and the session
    /// is clean.
    pub fn load(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let content = content.into();
        self.path = Some(path.into());
        self.live_content.clone_from(&content);
        self.saved_content = content;
    }

    /// Records the user's current buffer.
    ///
    /// Returns `true` when this edit flipped the edited state in either
    /// direction, which is when the host needs to refresh its title bar.
    pub fn record_edit(&mut self, live_content: impl Into<String>) -> bool {
        let was_edited = self.is_edited();
        self.live_content = live_content.into();
        was_edited != self.is_edited()
    }

    pub fn is_edited(&self) -> bool {
        self.live_content != self.saved_content
    }

    /// Records a successful write of `content` to `path`.
    ///
    /// The session stays edited if the written content is not the live
    /// buffer (an edit raced the write).
    pub fn mark_saved(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.path = Some(path.into());
        self.saved_content = content.into();
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn saved_content(&self) -> &str {
        &self.saved_content
    }

    pub fn live_content(&self) -> &str {
        &self.live_content
    }

    pub fn is_untitled(&self) -> bool {
        self.path.is_none()
    }

    /// File name for window titles, or [`UNTITLED`].
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untitled_session_is_clean() {
        let session = DocumentSession::untitled();
        assert!(session.is_untitled());
        assert!(!session.is_edited());
        assert_eq!(session.display_name(), "Untitled");
    }

    #[test]
    fn test_edited_tracks_content_after_every_edit() {
        let mut session = DocumentSession::untitled();
        session.load("/docs/a.md", "# A");

        let edits = ["# A!", "# A", "", "# A", "# B", "# A"];
        for edit in edits {
            session.record_edit(edit);
            assert_eq!(
                session.is_edited(),
                session.live_content() != session.saved_content(),
                "edited flag drifted after edit {:?}",
                edit
            );
        }
    }

    #[test]
    fn test_record_edit_reports_transitions_only() {
        let mut session = DocumentSession::untitled();
        session.load("/docs/a.md", "# A");

        assert!(session.record_edit("# A!"));
        assert!(!session.record_edit("# A!!"));
        assert!(session.record_edit("# A"));
        assert!(!session.record_edit("# A"));
    }

    #[test]
    fn test_load_clears_edited() {
        let mut session = DocumentSession::untitled();
        session.record_edit("scratch");
        assert!(session.is_edited());

        session.load("/docs/b.md", "# B");

        assert!(!session.is_edited());
        assert_eq!(session.saved_content(), "# B");
        assert_eq!(session.live_content(), "# B");
        assert_eq!(session.path(), Some(Path::new("/docs/b.md")));
        assert_eq!(session.display_name(), "b.md");
    }

    #[test]
    fn test_mark_saved_with_live_content_clears_edited() {
        let mut session = DocumentSession::untitled();
        session.record_edit("hello");

        session.mark_saved("/tmp/x.md", "hello");

        assert!(!session.is_edited());
        assert_eq!(session.path(), Some(Path::new("/tmp/x.md")));
    }

    #[test]
    fn test_mark_saved_with_stale_content_stays_edited() {
        let mut session = DocumentSession::untitled();
        session.record_edit("hello world");

        session.mark_saved("/tmp/x.md", "hello");

        assert!(session.is_edited());
        assert_eq!(session.saved_content(), "hello");
        assert_eq!(session.live_content(), "hello world");
    }
}
