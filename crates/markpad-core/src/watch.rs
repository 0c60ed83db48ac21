//! Per-window filesystem watches.
//!
//! [`FileWatchRegistry`] keeps at most one live watch per window. Watching a
//! new path replaces (and cancels) the previous one, so repeated opens in the
//! same window never accumulate watchers. The actual OS subscription is made
//! by a [`WatchBackend`]; the registry only owns the handles.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::window::WindowId;

/// Called by a backend with the file's new content.
pub type ChangeCallback = Box<dyn Fn(String) + Send + Sync + 'static>;

/// Keeps a backend subscription alive; dropping it cancels the watch.
pub type WatchHandle = Box<dyn Send + 'static>;

/// Installs filesystem subscriptions.
pub trait WatchBackend: Send + Sync {
    /// Starts watching `path`. `on_change` receives the file's content each
    /// time it really changes; events without a content or stat change must
    /// not reach it.
    fn start(&self, path: &Path, on_change: ChangeCallback) -> Result<WatchHandle>;
}

/// Identifies one installation of a watch. Never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WatchId(u64);

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch#{}", self.0)
    }
}

/// A change observed by a live watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchNotice {
    pub window: WindowId,
    pub watch_id: WatchId,
    pub path: PathBuf,
    pub content: String,
}

struct ActiveWatch {
    id: WatchId,
    path: PathBuf,
    active: Arc<AtomicBool>,
    _handle: WatchHandle,
}

impl ActiveWatch {
    fn cancel(self) {
        // Flip first so a callback racing the drop is discarded.
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Maps each window to its single active watch.
pub struct FileWatchRegistry {
    backend: Arc<dyn WatchBackend>,
    watches: HashMap<WindowId, ActiveWatch>,
    next_id: u64,
}

impl FileWatchRegistry {
    pub fn new(backend: Arc<dyn WatchBackend>) -> Self {
        Self {
            backend,
            watches: HashMap::new(),
            next_id: 1,
        }
    }

    /// Watches `path` for `window`, replacing any watch the window had.
    ///
    /// The previous watch is cancelled before the new one is installed, so
    /// if installation fails the window is left without a watch rather than
    /// with a stale one.
    pub fn watch<F>(&mut self, window: &WindowId, path: &Path, on_change: F) -> Result<WatchId>
    where
        F: Fn(WatchNotice) + Send + Sync + 'static,
    {
        self.unwatch(window);

        let id = WatchId(self.next_id);
        self.next_id += 1;

        let active = Arc::new(AtomicBool::new(true));
        let callback: ChangeCallback = {
            let active = active.clone();
            let window = window.clone();
            let path = path.to_path_buf();
            Box::new(move |content| {
                if !active.load(Ordering::SeqCst) {
                    return;
                }
                on_change(WatchNotice {
                    window: window.clone(),
                    watch_id: id,
                    path: path.clone(),
                    content,
                });
            })
        };

        let handle = self.backend.start(path, callback)?;
        tracing::debug!("[Watch] {} installed for window {}: {:?}", id, window, path);

        self.watches.insert(
            window.clone(),
            ActiveWatch {
                id,
                path: path.to_path_buf(),
                active,
                _handle: handle,
            },
        );
        Ok(id)
    }

    /// Cancels the window's watch. Does nothing if it has none.
    pub fn unwatch(&mut self, window: &WindowId) {
        if let Some(watch) = self.watches.remove(window) {
            tracing::debug!(
                "[Watch] {} cancelled for window {}: {:?}",
                watch.id,
                window,
                watch.path
            );
            watch.cancel();
        }
    }

    /// Whether `watch_id` is still the window's live watch.
    pub fn is_current(&self, window: &WindowId, watch_id: WatchId) -> bool {
        self.watches
            .get(window)
            .is_some_and(|watch| watch.id == watch_id)
    }

    pub fn watched_path(&self, window: &WindowId) -> Option<&Path> {
        self.watches.get(window).map(|watch| watch.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Cancels every watch.
    pub fn clear(&mut self) {
        for (_, watch) in self.watches.drain() {
            watch.cancel();
        }
    }
}

impl Drop for FileWatchRegistry {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for FileWatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileWatchRegistry")
            .field("watches", &self.watches.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
