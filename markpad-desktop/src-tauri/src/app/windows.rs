//! Document window lifecycle on the Tauri side.

use std::path::PathBuf;

use markpad_core::document::ChangeSource;
use markpad_core::event::Outcome;
use tauri::{
    AppHandle, DragDropEvent, LogicalPosition, Manager, WebviewUrl, WebviewWindow,
    WebviewWindowBuilder, Window, WindowEvent,
};

use crate::app::{AppState, window_id};
use crate::app::host::window_title;

const LABEL_PREFIX: &str = "doc-";
const CASCADE_OFFSET: f64 = 22.0;

/// Creates a window with an untitled document, cascaded from the focused one.
pub fn create_document_window(app: &AppHandle) -> tauri::Result<WebviewWindow> {
    let label = format!("{}{}", LABEL_PREFIX, uuid::Uuid::new_v4().simple());
    let state = app.state::<AppState>();
    state.coordinator.open_window(window_id(&label));

    let mut builder = WebviewWindowBuilder::new(app, &label, WebviewUrl::App("index.html".into()))
        .title(window_title(None, false))
        .inner_size(960.0, 720.0)
        .min_inner_size(480.0, 320.0);

    if let Some(position) = cascade_position(app) {
        builder = builder.position(position.x, position.y);
    }

    match builder.build() {
        Ok(window) => {
            tracing::info!("[Windows] Created {}", label);
            Ok(window)
        }
        Err(e) => {
            state.coordinator.close_window(&window_id(&label));
            Err(e)
        }
    }
}

fn cascade_position(app: &AppHandle) -> Option<LogicalPosition<f64>> {
    let focused = app
        .webview_windows()
        .into_values()
        .find(|window| window.is_focused().unwrap_or(false))?;
    let scale = focused.scale_factor().ok()?;
    let position = focused.outer_position().ok()?.to_logical::<f64>(scale);
    Some(LogicalPosition::new(
        position.x + CASCADE_OFFSET,
        position.y + CASCADE_OFFSET,
    ))
}

/// Opens each path in a window of its own.
pub fn open_in_new_windows(app: &AppHandle, paths: Vec<PathBuf>) {
    for path in paths {
        let window = match create_document_window(app) {
            Ok(window) => window,
            Err(e) => {
                tracing::error!("[Windows] Failed to create window for {:?}: {}", path, e);
                continue;
            }
        };
        let coordinator = app.state::<AppState>().coordinator.clone();
        let id = window_id(window.label());
        tauri::async_runtime::spawn(async move {
            if let Err(e) = coordinator
                .open_from_path(&id, path.clone(), ChangeSource::OpenRequest)
                .await
            {
                tracing::warn!("[Windows] Failed to open {:?} in {}: {}", path, id, e);
            }
        });
    }
}

/// Routes native window events to the coordinator.
pub fn handle_window_event(window: &Window, event: &WindowEvent) {
    let Some(state) = window.try_state::<AppState>() else {
        return;
    };
    let coordinator = state.coordinator.clone();
    let id = window_id(window.label());

    match event {
        WindowEvent::CloseRequested { api, .. } => {
            // The coordinator decides; the window is destroyed once it agrees.
            api.prevent_close();
            let window = window.clone();
            tauri::async_runtime::spawn(async move {
                match coordinator.request_close(&id).await {
                    Ok(Outcome::Completed(())) => {
                        if let Err(e) = window.destroy() {
                            tracing::error!("[Windows] Failed to destroy {}: {}", id, e);
                        }
                    }
                    Ok(_) => tracing::debug!("[Windows] Close of {} cancelled", id),
                    Err(e) => tracing::warn!("[Windows] Close of {} refused: {}", id, e),
                }
            });
        }
        WindowEvent::Destroyed => {
            coordinator.close_window(&id);
        }
        WindowEvent::DragDrop(DragDropEvent::Drop { paths, .. }) => {
            let Some(path) = paths.first().cloned() else {
                return;
            };
            tauri::async_runtime::spawn(async move {
                if let Err(e) = coordinator.drop_file(&id, path).await {
                    tracing::warn!("[Windows] Drop on {} failed: {}", id, e);
                }
            });
        }
        _ => {}
    }
}

/// Files named on the command line.
pub fn paths_from_args<I>(args: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = std::ffi::OsString>,
{
    args.into_iter()
        .skip(1)
        .map(PathBuf::from)
        .filter(|path| path.is_file())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_from_args_skips_binary_and_missing() {
        let dir = std::env::temp_dir();
        let existing = dir.join(format!("markpad-args-{}.md", std::process::id()));
        std::fs::write(&existing, "# x").unwrap();

        let paths = paths_from_args(vec![
            "markpad".into(),
            existing.clone().into_os_string(),
            dir.join("definitely-missing.md").into_os_string(),
        ]);

        assert_eq!(paths, vec![existing.clone()]);
        std::fs::remove_file(existing).unwrap();
    }
}
