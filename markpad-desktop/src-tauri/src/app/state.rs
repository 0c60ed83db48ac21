use std::sync::Arc;

use markpad_application::SharedCoordinator;
use markpad_core::window::WindowId;
use markpad_infrastructure::ConfigService;

/// Application state shared across Tauri commands.
pub struct AppState {
    pub coordinator: SharedCoordinator,
    pub config_service: Arc<ConfigService>,
}

/// Maps a Tauri window label to the engine's window handle.
pub fn window_id(label: &str) -> WindowId {
    WindowId::new(label)
}
