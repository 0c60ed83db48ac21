//! `notify`-backed watch backend.
//!
//! Each watch subscribes to the document's parent directory non-recursively
//! and filters events down to the document itself. Watching the directory
//! rather than the file keeps the subscription alive when other editors save
//! by writing a temporary file and renaming it over the original.
//!
//! Watchers fire for plenty of things that are not content changes (access,
//! metadata touches, duplicate events for a single write). An event only
//! reaches the callback when the file's stamp (length + modification time)
//! differs from the last one seen.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use markpad_core::error::{MarkpadError, Result};
use markpad_core::watch::{ChangeCallback, WatchBackend, WatchHandle};
use notify::{Event, EventKind, RecursiveMode, Watcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    len: u64,
    modified: Option<SystemTime>,
}

impl FileStamp {
    fn read(path: &Path) -> Option<Self> {
        let metadata = std::fs::metadata(path).ok()?;
        Some(Self {
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

/// Tracks one watched file and turns raw events into content.
#[derive(Debug)]
struct FileProbe {
    target: PathBuf,
    canonical: Option<PathBuf>,
    last: Option<FileStamp>,
}

impl FileProbe {
    fn new(target: PathBuf) -> Self {
        let canonical = std::fs::canonicalize(&target)
            .ok()
            .filter(|c| *c != target);
        let last = FileStamp::read(&target);
        Self {
            target,
            canonical,
            last,
        }
    }

    fn concerns(&self, event: &Event) -> bool {
        if matches!(event.kind, EventKind::Access(_)) {
            return false;
        }
        event
            .paths
            .iter()
            .any(|p| *p == self.target || self.canonical.as_ref() == Some(p))
    }

    /// Returns the new content when `event` reflects a real change.
    fn observe(&mut self, event: &Event) -> Option<String> {
        if !self.concerns(event) {
            return None;
        }

        // Missing mid-rename or deleted; a later event will report the new file.
        let stamp = FileStamp::read(&self.target)?;
        if self.last == Some(stamp) {
            tracing::trace!("[Watch] Ignoring event without stat change: {:?}", self.target);
            return None;
        }

        match std::fs::read(&self.target).map(String::from_utf8) {
            Ok(Ok(content)) => {
                self.last = Some(stamp);
                Some(content)
            }
            Ok(Err(_)) => {
                tracing::warn!("[Watch] Changed file is not valid UTF-8: {:?}", self.target);
                self.last = Some(stamp);
                None
            }
            Err(e) => {
                tracing::warn!("[Watch] Failed to read changed file {:?}: {}", self.target, e);
                None
            }
        }
    }
}

/// Watch backend using the platform's recommended `notify` watcher.
#[derive(Debug, Clone, Default)]
pub struct NotifyWatchBackend;

impl NotifyWatchBackend {
    pub fn new() -> Self {
        Self
    }
}

impl WatchBackend for NotifyWatchBackend {
    fn start(&self, path: &Path, on_change: ChangeCallback) -> Result<WatchHandle> {
        let target = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| MarkpadError::watch(format!("Cannot resolve {:?}: {}", path, e)))?
                .join(path)
        };
        let directory = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .ok_or_else(|| MarkpadError::watch(format!("No parent directory for {:?}", target)))?;

        let mut probe = FileProbe::new(target);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Some(content) = probe.observe(&event) {
                    on_change(content);
                }
            }
            Err(e) => tracing::warn!("[Watch] Watcher error: {}", e),
        })
        .map_err(|e| MarkpadError::watch(format!("Failed to create watcher: {}", e)))?;

        watcher
            .watch(&directory, RecursiveMode::NonRecursive)
            .map_err(|e| MarkpadError::watch(format!("Failed to watch {:?}: {}", directory, e)))?;

        tracing::debug!("[Watch] Subscribed to {:?}", directory);
        Ok(Box::new(watcher))
    }
}
