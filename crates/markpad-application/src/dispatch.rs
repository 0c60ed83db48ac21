//! Message-driven entry point for the coordinator.

use std::sync::Arc;

use markpad_core::document::ChangeSource;
use markpad_core::error::Result;
use markpad_core::event::{DocumentCommand, Outcome, Reply};
use markpad_core::watch::WatchNotice;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::coordinator::DocumentCoordinator;

impl DocumentCoordinator {
    /// Executes one command and reports what it did.
    pub async fn dispatch(&self, command: DocumentCommand) -> Result<Outcome<Reply>> {
        tracing::trace!("[Dispatch] {:?}", command);
        match command {
            DocumentCommand::WindowOpened { window } => {
                self.open_window(window);
                Ok(Outcome::Completed(Reply::WindowReady))
            }
            DocumentCommand::CloseRequest { window } => Ok(self
                .request_close(&window)
                .await?
                .map(|()| Reply::CloseAllowed)),
            DocumentCommand::WindowClosed { window } => {
                if self.close_window(&window) {
                    Ok(Outcome::Completed(Reply::WindowReleased))
                } else {
                    Ok(Outcome::Ignored)
                }
            }
            DocumentCommand::OpenFileRequest { window } => {
                Ok(self.open_file_request(&window).await?.map(Reply::Opened))
            }
            DocumentCommand::OpenPath { window, path } => Ok(self
                .open_from_path(&window, path, ChangeSource::OpenRequest)
                .await?
                .map(Reply::Opened)),
            DocumentCommand::DropFile { window, path } => {
                Ok(self.drop_file(&window, path).await?.map(Reply::Opened))
            }
            DocumentCommand::Edit { window, content } => {
                let edited = self.record_edit(&window, content)?;
                Ok(Outcome::Completed(Reply::Edited(edited)))
            }
            DocumentCommand::SaveMarkdown { window, content } => {
                Ok(self.save_markdown(&window, content).await?.map(Reply::Saved))
            }
            DocumentCommand::SaveMarkdownAs { window, content } => Ok(self
                .save_markdown_as(&window, content)
                .await?
                .map(Reply::Saved)),
            DocumentCommand::SaveHtml { window, html } => {
                Ok(self.save_html(&window, html).await?.map(Reply::Exported))
            }
            DocumentCommand::Revert { window } => {
                Ok(self.revert(&window).await?.map(Reply::Reloaded))
            }
            DocumentCommand::FileChanged(notice) => {
                Ok(self.handle_file_changed(notice).await?.map(Reply::Reloaded))
            }
            DocumentCommand::ShowInFolder { window } => {
                let path = self.show_in_folder(&window).await?;
                Ok(Outcome::Completed(Reply::Revealed(path)))
            }
            DocumentCommand::OpenExternally { window } => {
                let path = self.open_externally(&window).await?;
                Ok(Outcome::Completed(Reply::Revealed(path)))
            }
        }
    }

    /// Consumes watch notices for as long as the coordinator is alive.
    ///
    /// Each notice is handled on its own task so a confirmation pending in one
    /// window never delays another window. Notices for a window that is
    /// already deciding come back through this loop once it is free.
    pub fn spawn_watch_loop(
        self: &Arc<Self>,
        mut notices: UnboundedReceiver<WatchNotice>,
    ) -> JoinHandle<()> {
        // Weak: the coordinator owns the sending half, so a strong reference
        // here would keep the channel open forever.
        let coordinator = Arc::downgrade(self);
        tokio::spawn(async move {
            tracing::info!("[Dispatch] Watch loop started");
            while let Some(notice) = notices.recv().await {
                let Some(coordinator) = coordinator.upgrade() else {
                    break;
                };
                tokio::spawn(async move {
                    let window = notice.window.clone();
                    if let Err(e) = coordinator
                        .dispatch(DocumentCommand::FileChanged(notice))
                        .await
                    {
                        tracing::warn!("[Dispatch] External change for {} dropped: {}", window, e);
                    }
                });
            }
            tracing::info!("[Dispatch] Watch loop stopped");
        })
    }
}
