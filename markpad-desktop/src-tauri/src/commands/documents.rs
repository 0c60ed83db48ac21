use std::path::PathBuf;

use markpad_core::document::ChangeSource;
use markpad_core::event::Outcome;
use markpad_core::recent::RecentDocument;
use tauri::{AppHandle, State, WebviewWindow};

use crate::app::windows::create_document_window;
use crate::app::{AppState, window_id};

/// Opens a new window with an untitled document and returns its label.
#[tauri::command]
pub async fn new_window(app: AppHandle) -> Result<String, String> {
    let window = create_document_window(&app).map_err(|e| e.to_string())?;
    Ok(window.label().to_string())
}

/// Shows the open dialog for the calling window.
#[tauri::command]
pub async fn open_file_request(
    window: WebviewWindow,
    state: State<'_, AppState>,
) -> Result<Outcome<PathBuf>, String> {
    state
        .coordinator
        .open_file_request(&window_id(window.label()))
        .await
        .map_err(|e| e.to_string())
}

/// Opens an entry from the recent documents list.
#[tauri::command]
pub async fn open_recent(
    window: WebviewWindow,
    path: PathBuf,
    state: State<'_, AppState>,
) -> Result<Outcome<PathBuf>, String> {
    state
        .coordinator
        .open_from_path(&window_id(window.label()), path, ChangeSource::OpenRequest)
        .await
        .map_err(|e| e.to_string())
}

/// Opens a file dropped on the page (for webviews with native drag-and-drop disabled).
#[tauri::command]
pub async fn drop_file(
    window: WebviewWindow,
    path: PathBuf,
    state: State<'_, AppState>,
) -> Result<Outcome<PathBuf>, String> {
    state
        .coordinator
        .drop_file(&window_id(window.label()), path)
        .await
        .map_err(|e| e.to_string())
}

/// Records the editor buffer. Returns whether the document is now edited.
#[tauri::command]
pub fn record_edit(
    window: WebviewWindow,
    content: String,
    state: State<'_, AppState>,
) -> Result<bool, String> {
    state
        .coordinator
        .record_edit(&window_id(window.label()), content)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn save_markdown(
    window: WebviewWindow,
    content: String,
    state: State<'_, AppState>,
) -> Result<Outcome<PathBuf>, String> {
    state
        .coordinator
        .save_markdown(&window_id(window.label()), content)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn save_markdown_as(
    window: WebviewWindow,
    content: String,
    state: State<'_, AppState>,
) -> Result<Outcome<PathBuf>, String> {
    state
        .coordinator
        .save_markdown_as(&window_id(window.label()), content)
        .await
        .map_err(|e| e.to_string())
}

/// Exports the rendered preview.
#[tauri::command]
pub async fn save_html(
    window: WebviewWindow,
    html: String,
    state: State<'_, AppState>,
) -> Result<Outcome<PathBuf>, String> {
    state
        .coordinator
        .save_html(&window_id(window.label()), html)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn revert_document(
    window: WebviewWindow,
    state: State<'_, AppState>,
) -> Result<Outcome<PathBuf>, String> {
    state
        .coordinator
        .revert(&window_id(window.label()))
        .await
        .map_err(|e| e.to_string())
}

/// Most recently opened documents, newest first.
#[tauri::command]
pub fn recent_documents(state: State<'_, AppState>) -> Vec<RecentDocument> {
    state.coordinator.recent_documents()
}
