//! Document coordinator implementation.
//!
//! This module provides the `DocumentCoordinator` which sequences every
//! document operation of every window: reading and writing files, asking the
//! [`ChangeReconciler`] before content is replaced, re-arming the window's
//! filesystem watch and telling the presentation layer what happened.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use markpad_core::config::EditorConfig;
use markpad_core::document::{
    ChangeSource, DocumentSession, PendingChange, SaveTarget, is_openable, kind::OPEN_FILTERS,
};
use markpad_core::error::{MarkpadError, Result};
use markpad_core::event::{DocumentEvent, Outcome};
use markpad_core::host::{DialogHost, DocumentIo, PresentationSink, ShellHost};
use markpad_core::recent::{RecentDocument, RecentDocuments};
use markpad_core::reconcile::{Assessment, ChangeReconciler, Decision, InFlight};
use markpad_core::sync::lock;
use markpad_core::watch::{FileWatchRegistry, WatchBackend, WatchNotice};
use markpad_core::window::WindowId;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

const OPEN_FAILED: &str = "Cannot Open File";
const SAVE_FAILED: &str = "Cannot Save File";
const EXPORT_FAILED: &str = "Cannot Export HTML";
const SHOW_FAILED: &str = "Cannot Show File's Location";
const UNSUPPORTED_FILE: &str = "Unsupported File Type";

/// Coordinates documents, watches and host collaborators for all windows.
///
/// # Responsibilities
///
/// - Registering and releasing one [`DocumentSession`] per window
/// - Opening files from dialogs, drops, reverts and external changes, always
///   through the reconciler
/// - Saving markdown (write, then re-baseline and re-watch the written file) and
///   exporting HTML
/// - Keeping the recent documents list
///
/// # Thread Safety
///
/// Shared maps sit behind `std::sync::Mutex` and are only locked for
/// synchronous sections, never across a dialog or I/O `.await`. Operations
/// that may replace a window's content hold that window's
/// [`InFlight`] guard for their whole duration, so
/// they are serialized per window while different windows interleave freely.
pub struct DocumentCoordinator {
    /// One session per registered window
    sessions: Mutex<HashMap<WindowId, DocumentSession>>,
    /// Decides content replacements and tracks in-flight decisions
    reconciler: ChangeReconciler,
    /// One filesystem watch per window
    watches: Mutex<FileWatchRegistry>,
    /// Process-wide recent documents
    recent: Mutex<RecentDocuments>,
    io: Arc<dyn DocumentIo>,
    dialogs: Arc<dyn DialogHost>,
    presenter: Arc<dyn PresentationSink>,
    shell: Arc<dyn ShellHost>,
    /// Watch callbacks forward here; see [`DocumentCoordinator::spawn_watch_loop`]
    notices: UnboundedSender<WatchNotice>,
    /// Latest notice per window that arrived while a decision was pending
    deferred: Mutex<HashMap<WindowId, WatchNotice>>,
    config: EditorConfig,
}

impl DocumentCoordinator {
    /// Creates a coordinator and the receiver its watches report to.
    ///
    /// The receiver should be handed to [`DocumentCoordinator::spawn_watch_loop`]
    /// (or drained by hand in tests).
    pub fn new(
        config: EditorConfig,
        io: Arc<dyn DocumentIo>,
        watch_backend: Arc<dyn WatchBackend>,
        dialogs: Arc<dyn DialogHost>,
        presenter: Arc<dyn PresentationSink>,
        shell: Arc<dyn ShellHost>,
    ) -> (Self, UnboundedReceiver<WatchNotice>) {
        let (notices, notice_rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            sessions: Mutex::new(HashMap::new()),
            reconciler: ChangeReconciler::new(config.confirm_default),
            watches: Mutex::new(FileWatchRegistry::new(watch_backend)),
            recent: Mutex::new(RecentDocuments::new(config.recent_limit)),
            io,
            dialogs,
            presenter,
            shell,
            notices,
            deferred: Mutex::new(HashMap::new()),
            config,
        };
        (coordinator, notice_rx)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ============================================================================
    // Window lifecycle
    // ============================================================================

    /// Registers `window` with an untitled document. Re-registering is a no-op.
    pub fn open_window(&self, window: WindowId) {
        let mut sessions = lock(&self.sessions);
        if sessions.contains_key(&window) {
            return;
        }
        tracing::info!("[Coordinator] Window registered: {}", window);
        sessions.insert(window, DocumentSession::untitled());
    }

    /// Releases the window's watch and document.
    ///
    /// Must be called while the host still considers the window alive; the
    /// watch is cancelled before the session is dropped so no callback can
    /// target a released window. Returns whether the window was registered.
    pub fn close_window(&self, window: &WindowId) -> bool {
        let mut watches = lock(&self.watches);
        watches.unwatch(window);
        let existed = lock(&self.sessions).remove(window).is_some();
        drop(watches);
        lock(&self.deferred).remove(window);
        if existed {
            tracing::info!("[Coordinator] Window released: {}", window);
        }
        existed
    }

    /// Asks for confirmation if closing would lose unsaved edits.
    ///
    /// Returns `Completed` when the host may close the window. The window
    /// stays registered either way; the host calls
    /// [`DocumentCoordinator::close_window`] once it is really gone.
    pub async fn request_close(&self, window: &WindowId) -> Result<Outcome<()>> {
        let _turn = self.begin(window)?;
        let prompt = self.with_session(window, |s| self.reconciler.close_prompt(s))?;

        let Some(prompt) = prompt else {
            return Ok(Outcome::Completed(()));
        };

        if self.dialogs.confirm(window, &prompt).await? {
            tracing::info!("[Coordinator] Closing {} with unsaved changes", window);
            Ok(Outcome::Completed(()))
        } else {
            Ok(Outcome::Cancelled)
        }
    }

    pub fn window_count(&self) -> usize {
        lock(&self.sessions).len()
    }

    // ============================================================================
    // Session queries
    // ============================================================================

    /// Returns a copy of the window's document state.
    pub fn session(&self, window: &WindowId) -> Result<DocumentSession> {
        self.with_session(window, DocumentSession::clone)
    }

    pub fn is_edited(&self, window: &WindowId) -> Result<bool> {
        self.with_session(window, DocumentSession::is_edited)
    }

    pub fn watched_path(&self, window: &WindowId) -> Option<PathBuf> {
        lock(&self.watches)
            .watched_path(window)
            .map(Path::to_path_buf)
    }

    pub fn watch_count(&self) -> usize {
        lock(&self.watches).len()
    }

    pub fn recent_documents(&self) -> Vec<RecentDocument> {
        lock(&self.recent).entries().to_vec()
    }

    // ============================================================================
    // Editing
    // ============================================================================

    /// Records the window's live buffer and returns whether it is now edited.
    ///
    /// Emits `EditedChanged` when the state flips.
    pub fn record_edit(&self, window: &WindowId, content: String) -> Result<bool> {
        let (changed, edited, path) = self.with_session_mut(window, |s| {
            let changed = s.record_edit(content);
            (changed, s.is_edited(), s.path().map(Path::to_path_buf))
        })?;

        if changed {
            self.publish(window, DocumentEvent::EditedChanged { edited, path });
        }
        Ok(edited)
    }

    // ============================================================================
    // Opening
    // ============================================================================

    /// Shows the open dialog and loads the chosen file.
    pub async fn open_file_request(&self, window: &WindowId) -> Result<Outcome<PathBuf>> {
        self.ensure_window(window)?;
        // Held across the dialog: a change arriving meanwhile is deferred.
        let _turn = self.begin(window)?;

        let Some(path) = self.dialogs.pick_open_path(window, OPEN_FILTERS).await? else {
            tracing::debug!("[Coordinator] Open dialog dismissed for {}", window);
            return Ok(Outcome::Cancelled);
        };

        self.open_guarded(window, path, ChangeSource::OpenRequest).await
    }

    /// Loads `path` into `window`, asking first if unsaved edits would be lost.
    pub async fn open_from_path(
        &self,
        window: &WindowId,
        path: PathBuf,
        source: ChangeSource,
    ) -> Result<Outcome<PathBuf>> {
        self.ensure_window(window)?;
        let _turn = self.begin(window)?;
        self.open_guarded(window, path, source).await
    }

    /// Opens a file dragged onto the window.
    pub async fn drop_file(&self, window: &WindowId, path: PathBuf) -> Result<Outcome<PathBuf>> {
        self.ensure_window(window)?;
        if !is_openable(&path) {
            let err = MarkpadError::UnsupportedFileType(path);
            self.report(window, UNSUPPORTED_FILE, &err).await;
            return Err(err);
        }
        self.open_from_path(window, path, ChangeSource::Drop).await
    }

    /// Reloads the window's file from disk, discarding edits after confirmation.
    pub async fn revert(&self, window: &WindowId) -> Result<Outcome<PathBuf>> {
        let _turn = self.begin(window)?;
        let path = self.require_path(window)?;
        self.open_guarded(window, path, ChangeSource::Revert).await
    }

    async fn open_guarded(
        &self,
        window: &WindowId,
        path: PathBuf,
        source: ChangeSource,
    ) -> Result<Outcome<PathBuf>> {
        let content = match self.io.read_text(&path).await {
            Ok(content) => content,
            Err(e) => {
                self.report(window, OPEN_FAILED, &e).await;
                return Err(e);
            }
        };

        let change = PendingChange::new(path.clone(), content, source);
        match self.decide(window, &change).await? {
            Outcome::Completed(()) => {
                self.commit_open(window, change)?;
                Ok(Outcome::Completed(path))
            }
            Outcome::Cancelled => {
                tracing::info!("[Coordinator] Kept unsaved changes in {} ({:?})", window, source);
                Ok(Outcome::Cancelled)
            }
            Outcome::Ignored => Ok(Outcome::Ignored),
        }
    }

    // ============================================================================
    // External changes
    // ============================================================================

    /// Applies a change reported by the window's watch.
    ///
    /// Notices from a replaced watch, a closed window or a different path are
    /// ignored. A notice arriving while another decision is pending for the
    /// window is parked (newest wins) and re-queued once that decision ends.
    pub async fn handle_file_changed(&self, notice: WatchNotice) -> Result<Outcome<PathBuf>> {
        let window = notice.window.clone();
        if !lock(&self.watches).is_current(&window, notice.watch_id) {
            tracing::trace!("[Coordinator] Stale {} for {}", notice.watch_id, window);
            return Ok(Outcome::Ignored);
        }

        let _turn = {
            // Held while claiming the window so a turn ending concurrently
            // sees the deferred notice.
            let mut deferred = lock(&self.deferred);
            match self.begin(&window) {
                Ok(turn) => turn,
                Err(MarkpadError::ReconciliationInProgress(_)) => {
                    tracing::info!(
                        "[Coordinator] Deferring change to {:?} until {} is free",
                        notice.path,
                        window
                    );
                    deferred.insert(window, notice);
                    return Ok(Outcome::Ignored);
                }
                Err(e) => return Err(e),
            }
        };

        let same_path = self.with_session(&window, |s| s.path() == Some(notice.path.as_path()))?;
        if !same_path {
            return Ok(Outcome::Ignored);
        }

        let change = PendingChange::new(notice.path, notice.content, ChangeSource::ExternalChange);
        match self.decide(&window, &change).await? {
            Outcome::Completed(()) => {
                let path = change.incoming_path.clone();
                let content = change.incoming_content.clone();
                self.with_session_mut(&window, |s| {
                    ChangeReconciler::apply(s, change, Decision::Proceed)
                })?;
                tracing::info!("[Coordinator] Reloaded {:?} in {} after external change", path, window);
                self.publish(
                    &window,
                    DocumentEvent::FileChanged {
                        path: path.clone(),
                        content,
                    },
                );
                Ok(Outcome::Completed(path))
            }
            Outcome::Cancelled => {
                tracing::info!("[Coordinator] External change to {:?} declined in {}", change.incoming_path, window);
                Ok(Outcome::Cancelled)
            }
            Outcome::Ignored => {
                tracing::trace!("[Coordinator] Spurious change to {:?}", change.incoming_path);
                Ok(Outcome::Ignored)
            }
        }
    }

    // ============================================================================
    // Saving
    // ============================================================================

    /// Saves `content` as the window's document.
    ///
    /// Untitled documents ask for a destination first; dismissing that dialog
    /// cancels the save. After writing, the file is read back so that the
    /// saved snapshot matches the disk, and the watch and recent list move to
    /// the written path. The live buffer is never replaced by a save.
    pub async fn save_markdown(&self, window: &WindowId, content: String) -> Result<Outcome<PathBuf>> {
        let _turn = self.begin(window)?;

        let path = match self.with_session(window, |s| s.path().map(Path::to_path_buf))? {
            Some(path) => path,
            None => match self.pick_save_path(window, SaveTarget::Markdown).await? {
                Some(path) => path,
                None => return Ok(Outcome::Cancelled),
            },
        };

        self.persist_markdown(window, path, content).await
    }

    /// Saves `content` to a newly chosen destination.
    pub async fn save_markdown_as(
        &self,
        window: &WindowId,
        content: String,
    ) -> Result<Outcome<PathBuf>> {
        let _turn = self.begin(window)?;

        match self.pick_save_path(window, SaveTarget::Markdown).await? {
            Some(path) => self.persist_markdown(window, path, content).await,
            None => Ok(Outcome::Cancelled),
        }
    }

    async fn persist_markdown(
        &self,
        window: &WindowId,
        path: PathBuf,
        content: String,
    ) -> Result<Outcome<PathBuf>> {
        if let Err(e) = self.io.write_text(&path, &content).await {
            self.report(window, SAVE_FAILED, &e).await;
            return Err(e);
        }
        tracing::info!("[Coordinator] Saved {} to {:?}", window, path);

        let saved = match self.io.read_text(&path).await {
            Ok(on_disk) => on_disk,
            Err(e) => {
                // The write went through; fall back to what was written.
                tracing::error!("[Coordinator] Saved {:?} but could not read it back: {}", path, e);
                let message = format!("The document was saved, but reading it back failed: {}", e);
                if let Err(e) = self.dialogs.alert(window, SAVE_FAILED, &message).await {
                    tracing::warn!("[Coordinator] Failed to show alert: {}", e);
                }
                content
            }
        };

        self.commit_save(window, &path, saved)?;
        Ok(Outcome::Completed(path))
    }

    /// Exports rendered HTML. The window's document and watch are untouched.
    pub async fn save_html(&self, window: &WindowId, html: String) -> Result<Outcome<PathBuf>> {
        self.ensure_window(window)?;

        let Some(path) = self.pick_save_path(window, SaveTarget::Html).await? else {
            return Ok(Outcome::Cancelled);
        };

        if let Err(e) = self.io.write_text(&path, &html).await {
            self.report(window, EXPORT_FAILED, &e).await;
            return Err(e);
        }
        tracing::info!("[Coordinator] Exported HTML from {} to {:?}", window, path);
        Ok(Outcome::Completed(path))
    }

    // ============================================================================
    // Shell
    // ============================================================================

    pub async fn show_in_folder(&self, window: &WindowId) -> Result<PathBuf> {
        let path = self.require_shown_path(window).await?;
        self.shell.reveal_in_folder(&path)?;
        Ok(path)
    }

    pub async fn open_externally(&self, window: &WindowId) -> Result<PathBuf> {
        let path = self.require_shown_path(window).await?;
        self.shell.open_externally(&path)?;
        Ok(path)
    }

    async fn require_shown_path(&self, window: &WindowId) -> Result<PathBuf> {
        match self.require_path(window) {
            Ok(path) => Ok(path),
            Err(MarkpadError::NoActiveDocument) => {
                if let Err(e) = self
                    .dialogs
                    .alert(
                        window,
                        SHOW_FAILED,
                        "There is currently no active document to show.",
                    )
                    .await
                {
                    tracing::warn!("[Coordinator] Failed to show alert: {}", e);
                }
                Err(MarkpadError::NoActiveDocument)
            }
            Err(e) => Err(e),
        }
    }

    // ============================================================================
    // Internals
    // ============================================================================

    fn begin(&self, window: &WindowId) -> Result<WindowTurn<'_>> {
        let in_flight = self.reconciler.begin(window)?;
        Ok(WindowTurn {
            in_flight: Some(in_flight),
            coordinator: self,
            window: window.clone(),
        })
    }

    /// Asks the reconciler, prompting through the dialog host when needed.
    async fn decide(&self, window: &WindowId, change: &PendingChange) -> Result<Outcome<()>> {
        let assessment = self.with_session(window, |s| self.reconciler.assess(s, change))?;
        match assessment {
            Assessment::Proceed => Ok(Outcome::Completed(())),
            Assessment::Ignore => Ok(Outcome::Ignored),
            Assessment::Confirm(prompt) => {
                if self.dialogs.confirm(window, &prompt).await? {
                    Ok(Outcome::Completed(()))
                } else {
                    Ok(Outcome::Cancelled)
                }
            }
        }
    }

    /// Loads authorized content and performs the open side effects.
    fn commit_open(&self, window: &WindowId, change: PendingChange) -> Result<()> {
        let path = change.incoming_path.clone();
        let content = change.incoming_content.clone();

        self.with_session_mut(window, |s| {
            ChangeReconciler::apply(s, change, Decision::Proceed)
        })?;
        self.arm_watch(window, &path);
        lock(&self.recent).add(&path);

        if let Err(e) = self.presenter.set_represented_file(window, Some(&path)) {
            tracing::warn!("[Coordinator] Failed to set represented file for {}: {}", window, e);
        }
        self.publish(window, DocumentEvent::FileOpened { path, content });
        Ok(())
    }

    /// Adopts `saved` as the window's baseline after a write.
    ///
    /// The live buffer is left alone: edits typed while the save was in
    /// flight stay in the editor and keep the document edited.
    fn commit_save(&self, window: &WindowId, path: &Path, saved: String) -> Result<()> {
        let edited = self.with_session_mut(window, |s| {
            s.mark_saved(path, saved);
            s.is_edited()
        })?;
        self.arm_watch(window, path);
        lock(&self.recent).add(path);

        if let Err(e) = self.presenter.set_represented_file(window, Some(path)) {
            tracing::warn!("[Coordinator] Failed to set represented file for {}: {}", window, e);
        }
        if edited {
            tracing::info!("[Coordinator] {} was edited during the save; keeping the newer text", window);
        }
        self.publish(
            window,
            DocumentEvent::EditedChanged {
                edited,
                path: Some(path.to_path_buf()),
            },
        );
        Ok(())
    }

    fn arm_watch(&self, window: &WindowId, path: &Path) {
        if !self.config.watch_files {
            return;
        }

        let mut watches = lock(&self.watches);
        // Registry before sessions, as in close_window, so a window released
        // concurrently cannot be handed a fresh watch.
        if !lock(&self.sessions).contains_key(window) {
            tracing::debug!("[Coordinator] Not watching {:?}: {} is gone", path, window);
            return;
        }

        let notices = self.notices.clone();
        let result = watches.watch(window, path, move |notice| {
            if notices.send(notice).is_err() {
                tracing::trace!("[Coordinator] Watch notice dropped after shutdown");
            }
        });

        if let Err(e) = result {
            // The document is open; it just will not follow external edits.
            tracing::warn!("[Coordinator] Failed to watch {:?} for {}: {}", path, window, e);
        }
    }

    async fn pick_save_path(&self, window: &WindowId, target: SaveTarget) -> Result<Option<PathBuf>> {
        let current_dir = self.with_session(window, |s| {
            s.path().and_then(Path::parent).map(Path::to_path_buf)
        })?;
        let default_dir = current_dir.or_else(|| self.config.default_save_dir.clone());

        let picked = self
            .dialogs
            .pick_save_path(window, target, default_dir.as_deref())
            .await?;
        if picked.is_none() {
            tracing::debug!("[Coordinator] {} dialog dismissed for {}", target.title(), window);
        }
        Ok(picked)
    }

    fn require_path(&self, window: &WindowId) -> Result<PathBuf> {
        self.with_session(window, |s| s.path().map(Path::to_path_buf))?
            .ok_or(MarkpadError::NoActiveDocument)
    }

    fn publish(&self, window: &WindowId, event: DocumentEvent) {
        let name = event.name();
        if let Err(e) = self.presenter.emit(window, event) {
            tracing::warn!("[Coordinator] Failed to emit {} to {}: {}", name, window, e);
        }
    }

    async fn report(&self, window: &WindowId, title: &str, err: &MarkpadError) {
        tracing::error!("[Coordinator] {} ({}): {}", title, window, err);
        if let Err(e) = self.dialogs.alert(window, title, &err.to_string()).await {
            tracing::warn!("[Coordinator] Failed to show alert: {}", e);
        }
    }

    fn ensure_window(&self, window: &WindowId) -> Result<()> {
        self.with_session(window, |_| ())
    }

    fn with_session<R>(&self, window: &WindowId, f: impl FnOnce(&DocumentSession) -> R) -> Result<R> {
        let sessions = lock(&self.sessions);
        sessions
            .get(window)
            .map(f)
            .ok_or_else(|| MarkpadError::WindowNotFound(window.clone()))
    }

    fn with_session_mut<R>(
        &self,
        window: &WindowId,
        f: impl FnOnce(&mut DocumentSession) -> R,
    ) -> Result<R> {
        let mut sessions = lock(&self.sessions);
        sessions
            .get_mut(window)
            .map(f)
            .ok_or_else(|| MarkpadError::WindowNotFound(window.clone()))
    }
}

impl std::fmt::Debug for DocumentCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCoordinator")
            .field("windows", &self.window_count())
            .field("watches", &self.watch_count())
            .field("config", &self.config)
            .finish()
    }
}

/// A window's exclusive slot for one operation.
///
/// Releases the reconciler slot first, then re-queues any notice deferred
/// while the operation ran.
struct WindowTurn<'a> {
    in_flight: Option<InFlight<'a>>,
    coordinator: &'a DocumentCoordinator,
    window: WindowId,
}

impl Drop for WindowTurn<'_> {
    fn drop(&mut self) {
        drop(self.in_flight.take());
        let deferred = lock(&self.coordinator.deferred).remove(&self.window);
        if let Some(notice) = deferred {
            tracing::debug!("[Coordinator] Replaying deferred change for {}", self.window);
            if self.coordinator.notices.send(notice).is_err() {
                tracing::trace!("[Coordinator] Deferred notice dropped after shutdown");
            }
        }
    }
}

/// Shared handle used by hosts.
pub type SharedCoordinator = Arc<DocumentCoordinator>;
