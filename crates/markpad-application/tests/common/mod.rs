#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use markpad_application::DocumentCoordinator;
use markpad_core::config::EditorConfig;
use markpad_core::document::{FileFilter, SaveTarget};
use markpad_core::error::{MarkpadError, Result};
use markpad_core::event::DocumentEvent;
use markpad_core::host::{DialogHost, DocumentIo, PresentationSink, ShellHost};
use markpad_core::reconcile::ConfirmationPrompt;
use markpad_core::watch::{ChangeCallback, WatchBackend, WatchHandle, WatchNotice};
use markpad_core::window::WindowId;
use markpad_infrastructure::TokioDocumentIo;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;

// Mock DialogHost answering from queues
#[derive(Default)]
pub struct ScriptedDialogs {
    open_paths: Mutex<VecDeque<Option<PathBuf>>>,
    save_paths: Mutex<VecDeque<Option<PathBuf>>>,
    confirms: Mutex<VecDeque<bool>>,
    gate: Mutex<Option<oneshot::Receiver<bool>>>,
    pub prompts: Mutex<Vec<ConfirmationPrompt>>,
    pub alerts: Mutex<Vec<(String, String)>>,
    pub save_requests: Mutex<Vec<(SaveTarget, Option<PathBuf>)>>,
}

impl ScriptedDialogs {
    pub fn answer_open(&self, path: Option<PathBuf>) {
        self.open_paths.lock().unwrap().push_back(path);
    }

    pub fn answer_save(&self, path: Option<PathBuf>) {
        self.save_paths.lock().unwrap().push_back(path);
    }

    pub fn answer_confirm(&self, answer: bool) {
        self.confirms.lock().unwrap().push_back(answer);
    }

    /// Makes the next confirmation wait until the returned sender answers.
    pub fn hold_next_confirm(&self) -> oneshot::Sender<bool> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn alert_titles(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap()
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }
}

#[async_trait]
impl DialogHost for ScriptedDialogs {
    async fn pick_open_path(
        &self,
        _window: &WindowId,
        _filters: &[FileFilter],
    ) -> Result<Option<PathBuf>> {
        Ok(self.open_paths.lock().unwrap().pop_front().flatten())
    }

    async fn pick_save_path(
        &self,
        _window: &WindowId,
        target: SaveTarget,
        default_dir: Option<&Path>,
    ) -> Result<Option<PathBuf>> {
        self.save_requests
            .lock()
            .unwrap()
            .push((target, default_dir.map(Path::to_path_buf)));
        Ok(self.save_paths.lock().unwrap().pop_front().flatten())
    }

    async fn confirm(&self, _window: &WindowId, prompt: &ConfirmationPrompt) -> Result<bool> {
        self.prompts.lock().unwrap().push(prompt.clone());
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            return Ok(gate.await.unwrap_or(false));
        }
        Ok(self.confirms.lock().unwrap().pop_front().unwrap_or(false))
    }

    async fn alert(&self, _window: &WindowId, title: &str, message: &str) -> Result<()> {
        self.alerts
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        Ok(())
    }
}

// Real file I/O that can be paused before writes or made to fail reads
#[derive(Default)]
pub struct SwitchableIo {
    inner: TokioDocumentIo,
    fail_reads: AtomicBool,
    write_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub writes_started: AtomicU64,
}

impl SwitchableIo {
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes the next write wait until the returned sender fires.
    pub fn hold_next_write(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.write_gate.lock().unwrap() = Some(rx);
        tx
    }
}

#[async_trait]
impl DocumentIo for SwitchableIo {
    async fn read_text(&self, path: &Path) -> Result<String> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(MarkpadError::io(path, "read refused"));
        }
        self.inner.read_text(path).await
    }

    async fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        self.writes_started.fetch_add(1, Ordering::SeqCst);
        let gate = self.write_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.inner.write_text(path, content).await
    }
}

// Mock PresentationSink recording everything sent to windows
#[derive(Default)]
pub struct RecordingPresenter {
    pub events: Mutex<Vec<(WindowId, DocumentEvent)>>,
    pub represented: Mutex<HashMap<WindowId, Option<PathBuf>>>,
}

impl RecordingPresenter {
    pub fn events_for(&self, window: &WindowId) -> Vec<DocumentEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(w, _)| w == window)
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn last_event(&self, window: &WindowId) -> Option<DocumentEvent> {
        self.events_for(window).pop()
    }
}

impl PresentationSink for RecordingPresenter {
    fn emit(&self, window: &WindowId, event: DocumentEvent) -> Result<()> {
        self.events.lock().unwrap().push((window.clone(), event));
        Ok(())
    }

    fn set_represented_file(&self, window: &WindowId, path: Option<&Path>) -> Result<()> {
        self.represented
            .lock()
            .unwrap()
            .insert(window.clone(), path.map(Path::to_path_buf));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingShell {
    pub revealed: Mutex<Vec<PathBuf>>,
    pub opened: Mutex<Vec<PathBuf>>,
}

impl ShellHost for RecordingShell {
    fn reveal_in_folder(&self, path: &Path) -> Result<()> {
        self.revealed.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn open_externally(&self, path: &Path) -> Result<()> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

// Watch backend fired by hand instead of by the OS
#[derive(Default)]
pub struct ManualWatchBackend {
    next: AtomicU64,
    live: Arc<Mutex<HashMap<u64, (PathBuf, Arc<ChangeCallback>)>>>,
}

struct ManualHandle {
    id: u64,
    live: Arc<Mutex<HashMap<u64, (PathBuf, Arc<ChangeCallback>)>>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.live.lock().unwrap().remove(&self.id);
    }
}

impl ManualWatchBackend {
    /// Simulates the OS reporting new content for `path`.
    pub fn fire(&self, path: &Path, content: &str) {
        let callbacks: Vec<Arc<ChangeCallback>> = self
            .live
            .lock()
            .unwrap()
            .values()
            .filter(|(watched, _)| watched == path)
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            (callback.as_ref())(content.to_string());
        }
    }

    pub fn live_paths(&self) -> Vec<PathBuf> {
        self.live
            .lock()
            .unwrap()
            .values()
            .map(|(path, _)| path.clone())
            .collect()
    }
}

impl WatchBackend for ManualWatchBackend {
    fn start(&self, path: &Path, on_change: ChangeCallback) -> Result<WatchHandle> {
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        self.live
            .lock()
            .unwrap()
            .insert(id, (path.to_path_buf(), Arc::new(on_change)));
        Ok(Box::new(ManualHandle {
            id,
            live: self.live.clone(),
        }))
    }
}

pub struct Harness {
    pub coordinator: Arc<DocumentCoordinator>,
    pub notices: UnboundedReceiver<WatchNotice>,
    pub dialogs: Arc<ScriptedDialogs>,
    pub presenter: Arc<RecordingPresenter>,
    pub shell: Arc<RecordingShell>,
    pub watcher: Arc<ManualWatchBackend>,
    pub io: Arc<SwitchableIo>,
    pub dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = EditorConfig {
            default_save_dir: Some(dir.path().to_path_buf()),
            ..EditorConfig::default()
        };
        Self::with_config(config, dir)
    }

    pub fn with_config(config: EditorConfig, dir: TempDir) -> Self {
        let dialogs = Arc::new(ScriptedDialogs::default());
        let presenter = Arc::new(RecordingPresenter::default());
        let shell = Arc::new(RecordingShell::default());
        let watcher = Arc::new(ManualWatchBackend::default());
        let io = Arc::new(SwitchableIo::default());

        let (coordinator, notices) = DocumentCoordinator::new(
            config,
            io.clone(),
            watcher.clone(),
            dialogs.clone(),
            presenter.clone(),
            shell.clone(),
        );

        Self {
            coordinator: Arc::new(coordinator),
            notices,
            dialogs,
            presenter,
            shell,
            watcher,
            io,
            dir,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn window(&self, label: &str) -> WindowId {
        let window = WindowId::new(label);
        self.coordinator.open_window(window.clone());
        window
    }

    /// Writes `content` to `path` as another application would, and returns
    /// the notice the watch produced.
    pub fn external_write(&mut self, path: &Path, content: &str) -> WatchNotice {
        std::fs::write(path, content).unwrap();
        self.watcher.fire(path, content);
        self.notices
            .try_recv()
            .expect("watch did not report the change")
    }
}
