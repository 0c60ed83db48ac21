use std::sync::Arc;

use markpad_application::{HostServices, build_coordinator};
use markpad_core::watch::WatchNotice;
use markpad_infrastructure::ConfigService;
use tauri::AppHandle;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::AppState;
use crate::app::host::{TauriDialogs, TauriPresenter, TauriShell};

pub struct AppBootstrap {
    pub app_state: AppState,
    /// Hand to [`markpad_application::DocumentCoordinator::spawn_watch_loop`].
    pub notices: UnboundedReceiver<WatchNotice>,
}

/// Composition root: wires the coordinator to Tauri's dialogs, events and shell.
pub fn bootstrap(app: &AppHandle, config_service: Arc<ConfigService>) -> AppBootstrap {
    let config = config_service.get_config();
    tracing::info!(
        "[Bootstrap] watch_files={} confirm_default={:?} recent_limit={}",
        config.watch_files,
        config.confirm_default,
        config.recent_limit
    );

    let hosts = HostServices {
        dialogs: Arc::new(TauriDialogs::new(app.clone())),
        presenter: Arc::new(TauriPresenter::new(app.clone())),
        shell: Arc::new(TauriShell::new(app.clone())),
    };
    let (coordinator, notices) = build_coordinator(config, hosts);

    AppBootstrap {
        app_state: AppState {
            coordinator,
            config_service,
        },
        notices,
    }
}
