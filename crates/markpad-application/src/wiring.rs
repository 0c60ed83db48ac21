//! Default composition of the coordinator with filesystem adapters.

use std::sync::Arc;

use markpad_core::config::EditorConfig;
use markpad_core::host::{DialogHost, PresentationSink, ShellHost};
use markpad_core::watch::WatchNotice;
use markpad_infrastructure::{NotifyWatchBackend, TokioDocumentIo};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::coordinator::DocumentCoordinator;

/// Host-provided collaborators.
#[derive(Clone)]
pub struct HostServices {
    pub dialogs: Arc<dyn DialogHost>,
    pub presenter: Arc<dyn PresentationSink>,
    pub shell: Arc<dyn ShellHost>,
}

/// Builds a coordinator backed by `tokio::fs` and `notify`.
pub fn build_coordinator(
    config: EditorConfig,
    hosts: HostServices,
) -> (Arc<DocumentCoordinator>, UnboundedReceiver<WatchNotice>) {
    let (coordinator, notices) = DocumentCoordinator::new(
        config,
        Arc::new(TokioDocumentIo::new()),
        Arc::new(NotifyWatchBackend::new()),
        hosts.dialogs,
        hosts.presenter,
        hosts.shell,
    );
    (Arc::new(coordinator), notices)
}
