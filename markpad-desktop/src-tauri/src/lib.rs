//! Markpad desktop host.
//!
//! Every window is a Tauri webview labelled `doc-<uuid>`; the label doubles as
//! the engine's `WindowId`.

mod app;
mod commands;

use std::sync::Arc;

use anyhow::Context;
use markpad_infrastructure::ConfigService;
use tauri::Manager;

use crate::app::AppState;
use crate::app::windows::{
    create_document_window, handle_window_event, open_in_new_windows, paths_from_args,
};

pub fn run() -> anyhow::Result<()> {
    let config_service = Arc::new(ConfigService::new());
    let _log_guard = app::logging::init_logging(&config_service.get_config());
    tracing::info!("[Startup] Markpad {}", env!("CARGO_PKG_VERSION"));

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .setup(move |app| {
            let handle = app.handle().clone();
            let boot = crate::app::bootstrap(&handle, config_service.clone());
            let coordinator = boot.app_state.coordinator.clone();
            app.manage(boot.app_state);

            // spawn_watch_loop needs a runtime context; setup runs outside one.
            let notices = boot.notices;
            tauri::async_runtime::block_on(async move {
                coordinator.spawn_watch_loop(notices);
            });

            let files = paths_from_args(std::env::args_os());
            if files.is_empty() {
                create_document_window(&handle)?;
            } else {
                open_in_new_windows(&handle, files);
            }
            Ok(())
        })
        .on_window_event(handle_window_event)
        .invoke_handler(commands::handlers())
        .build(tauri::generate_context!())
        .context("Failed to build Tauri application")?;

    app.run(|handle, event| {
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        if let tauri::RunEvent::Opened { urls } = &event {
            let files = urls
                .iter()
                .filter_map(|url| url.to_file_path().ok())
                .collect();
            open_in_new_windows(handle, files);
        }

        if let tauri::RunEvent::Exit = event {
            if let Some(state) = handle.try_state::<AppState>() {
                tracing::info!(
                    "[Shutdown] Exiting with {} window(s) registered",
                    state.coordinator.window_count()
                );
            }
        }
    });
    Ok(())
}
