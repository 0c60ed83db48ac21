use std::path::PathBuf;

use tauri::{State, WebviewWindow};

use crate::app::{AppState, window_id};

/// Reveals the window's file in Finder/Explorer.
#[tauri::command]
pub async fn show_in_folder(
    window: WebviewWindow,
    state: State<'_, AppState>,
) -> Result<PathBuf, String> {
    state
        .coordinator
        .show_in_folder(&window_id(window.label()))
        .await
        .map_err(|e| e.to_string())
}

/// Opens the window's file with the system default application.
#[tauri::command]
pub async fn open_externally(
    window: WebviewWindow,
    state: State<'_, AppState>,
) -> Result<PathBuf, String> {
    state
        .coordinator
        .open_externally(&window_id(window.label()))
        .await
        .map_err(|e| e.to_string())
}
