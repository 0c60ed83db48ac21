//! Tauri implementations of the engine's host traits.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use markpad_core::document::{FileFilter, SaveTarget};
use markpad_core::error::{MarkpadError, Result};
use markpad_core::event::DocumentEvent;
use markpad_core::host::{DialogHost, PresentationSink, ShellHost};
use markpad_core::reconcile::{ConfirmationPrompt, Decision};
use markpad_core::window::WindowId;
use tauri::{AppHandle, Emitter, Manager};
use tauri_plugin_dialog::{DialogExt, FilePath, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_opener::OpenerExt;
use tokio::sync::oneshot;

const APP_NAME: &str = "Markpad";

/// Native dialogs from `tauri-plugin-dialog`, bridged to async with oneshot channels.
pub struct TauriDialogs {
    app: AppHandle,
}

impl TauriDialogs {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn file_dialog(&self, window: &WindowId) -> tauri_plugin_dialog::FileDialogBuilder<tauri::Wry> {
        let builder = self.app.dialog().file();
        match self.app.get_webview_window(window.as_str()) {
            Some(parent) => builder.set_parent(&parent),
            None => builder,
        }
    }
}

fn into_path(picked: Option<FilePath>) -> Result<Option<PathBuf>> {
    picked
        .map(|file| {
            file.into_path()
                .map_err(|e| MarkpadError::dialog(format!("Unsupported dialog path: {}", e)))
        })
        .transpose()
}

async fn answer<T>(rx: oneshot::Receiver<T>) -> Result<T> {
    rx.await
        .map_err(|_| MarkpadError::dialog("Dialog closed without an answer"))
}

#[async_trait]
impl DialogHost for TauriDialogs {
    async fn pick_open_path(
        &self,
        window: &WindowId,
        filters: &[FileFilter],
    ) -> Result<Option<PathBuf>> {
        let (tx, rx) = oneshot::channel();
        let builder = filters
            .iter()
            .fold(self.file_dialog(window), |builder, filter| {
                builder.add_filter(filter.name, filter.extensions)
            });
        builder.pick_file(move |picked| {
            let _ = tx.send(picked);
        });
        into_path(answer(rx).await?)
    }

    async fn pick_save_path(
        &self,
        window: &WindowId,
        target: SaveTarget,
        default_dir: Option<&Path>,
    ) -> Result<Option<PathBuf>> {
        let (tx, rx) = oneshot::channel();
        let mut builder = target
            .filters()
            .iter()
            .fold(self.file_dialog(window), |builder, filter| {
                builder.add_filter(filter.name, filter.extensions)
            })
            .set_title(target.title());
        if let Some(dir) = default_dir {
            builder = builder.set_directory(dir);
        }
        builder.save_file(move |picked| {
            let _ = tx.send(picked);
        });
        into_path(answer(rx).await?)
    }

    async fn confirm(&self, window: &WindowId, prompt: &ConfirmationPrompt) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        let mut builder = self
            .app
            .dialog()
            .message(prompt.message.clone())
            .title(prompt.title.clone())
            .kind(MessageDialogKind::Warning)
            .buttons(MessageDialogButtons::OkCancelCustom(
                prompt.confirm_label.clone(),
                prompt.cancel_label.clone(),
            ));
        if let Some(parent) = self.app.get_webview_window(window.as_str()) {
            builder = builder.parent(&parent);
        }
        builder.show(move |confirmed| {
            let _ = tx.send(confirmed);
        });

        match rx.await {
            Ok(confirmed) => Ok(confirmed),
            Err(_) => {
                tracing::warn!(
                    "[Dialogs] Confirmation for {} dropped; using {:?}",
                    window,
                    prompt.default_decision
                );
                Ok(prompt.default_decision == Decision::Proceed)
            }
        }
    }

    async fn alert(&self, window: &WindowId, title: &str, message: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let mut builder = self
            .app
            .dialog()
            .message(message)
            .title(title)
            .kind(MessageDialogKind::Error)
            .buttons(MessageDialogButtons::Ok);
        if let Some(parent) = self.app.get_webview_window(window.as_str()) {
            builder = builder.parent(&parent);
        }
        builder.show(move |_| {
            let _ = tx.send(());
        });
        answer(rx).await
    }
}

/// Sends document events to a single webview and keeps its title current.
pub struct TauriPresenter {
    app: AppHandle,
}

impl TauriPresenter {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn set_title(&self, window: &WindowId, title: &str) -> Result<()> {
        let Some(webview) = self.app.get_webview_window(window.as_str()) else {
            return Err(MarkpadError::WindowNotFound(window.clone()));
        };
        webview
            .set_title(title)
            .map_err(|e| MarkpadError::internal(format!("Failed to set title: {}", e)))
    }
}

pub fn window_title(path: Option<&Path>, edited: bool) -> String {
    let name = path
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| markpad_core::document::UNTITLED.to_string());
    if edited {
        format!("{} (Edited) - {}", name, APP_NAME)
    } else {
        format!("{} - {}", name, APP_NAME)
    }
}

/// Delivers an event whether or not its title update succeeded.
fn deliver_after_title(
    window: &WindowId,
    retitled: Result<()>,
    deliver: impl FnOnce() -> Result<()>,
) -> Result<()> {
    if let Err(e) = retitled {
        tracing::warn!("[Presenter] Failed to retitle {}: {}", window, e);
    }
    deliver()
}

impl PresentationSink for TauriPresenter {
    fn emit(&self, window: &WindowId, event: DocumentEvent) -> Result<()> {
        let retitled = match &event {
            DocumentEvent::EditedChanged { edited, path } => {
                self.set_title(window, &window_title(path.as_deref(), *edited))
            }
            _ => Ok(()),
        };
        deliver_after_title(window, retitled, || {
            self.app
                .emit_to(window.as_str(), event.name(), &event)
                .map_err(|e| MarkpadError::internal(format!("Failed to emit {}: {}", event.name(), e)))
        })
    }

    fn set_represented_file(&self, window: &WindowId, path: Option<&Path>) -> Result<()> {
        self.set_title(window, &window_title(path, false))
    }
}

/// Finder/Explorer integration through `tauri-plugin-opener`.
pub struct TauriShell {
    app: AppHandle,
}

impl TauriShell {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl ShellHost for TauriShell {
    fn reveal_in_folder(&self, path: &Path) -> Result<()> {
        self.app
            .opener()
            .reveal_item_in_dir(path)
            .map_err(|e| MarkpadError::io(path, e.to_string()))
    }

    fn open_externally(&self, path: &Path) -> Result<()> {
        self.app
            .opener()
            .open_path(path.to_string_lossy(), None::<&str>)
            .map_err(|e| MarkpadError::io(path, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_title() {
        assert_eq!(window_title(None, false), "Untitled - Markpad");
        assert_eq!(
            window_title(Some(Path::new("/notes/a.md")), true),
            "a.md (Edited) - Markpad"
        );
    }

    #[test]
    fn test_event_delivered_when_title_fails() {
        let window = WindowId::new("doc-1");
        let mut delivered = false;
        let result = deliver_after_title(
            &window,
            Err(MarkpadError::WindowNotFound(window.clone())),
            || {
                delivered = true;
                Ok(())
            },
        );
        assert!(result.is_ok());
        assert!(delivered);
    }

    #[test]
    fn test_delivery_error_still_reported() {
        let window = WindowId::new("doc-1");
        let result = deliver_after_title(&window, Ok(()), || {
            Err(MarkpadError::internal("webview gone"))
        });
        assert!(matches!(result, Err(MarkpadError::Internal(_))));
    }
}
