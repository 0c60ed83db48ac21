//! Domain layer for Markpad.
//!
//! This crate holds the per-window document state machine and the pieces
//! that keep it consistent with the filesystem: the dirty-tracking
//! [`DocumentSession`], the [`ChangeReconciler`] that guards every content
//! replacement, and the [`FileWatchRegistry`] that owns one watch per window.
//! Nothing here performs I/O; see the `host` traits for the seams.

pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod host;
pub mod recent;
pub mod reconcile;
pub mod sync;
pub mod watch;
pub mod window;

pub use config::EditorConfig;
pub use document::{ChangeSource, DocumentSession, PendingChange, SaveTarget};
pub use error::{MarkpadError, Result};
pub use event::{DocumentCommand, DocumentEvent, Outcome, Reply};
pub use recent::{RecentDocument, RecentDocuments};
pub use reconcile::{Assessment, ChangeReconciler, ConfirmationPrompt, Decision, InFlight};
pub use watch::{FileWatchRegistry, WatchBackend, WatchId, WatchNotice};
pub use window::WindowId;
