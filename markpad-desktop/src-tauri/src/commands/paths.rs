use markpad_core::config::EditorConfig;
use markpad_infrastructure::MarkpadPaths;
use tauri::State;

use crate::app::AppState;

/// Gets the logs directory path
#[tauri::command]
pub async fn get_logs_directory() -> Result<String, String> {
    let logs_dir = MarkpadPaths::logs_dir().map_err(|e| e.to_string())?;

    let path_str = logs_dir
        .to_str()
        .ok_or("Logs directory path is not valid UTF-8")?;

    Ok(path_str.to_string())
}

/// Gets the effective editor configuration
#[tauri::command]
pub async fn get_editor_config(state: State<'_, AppState>) -> Result<EditorConfig, String> {
    Ok(state.config_service.get_config())
}
