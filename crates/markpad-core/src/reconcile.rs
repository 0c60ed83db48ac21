//! Gatekeeping for every replacement of a window's document content.
//!
//! Content can arrive from the open dialog, a drag-and-drop, a revert, or an
//! external modification of the watched file. All of them pass through
//! [`ChangeReconciler`], which decides whether the user must confirm before
//! unsaved edits are thrown away, and which serializes decisions per window.

use std::collections::HashSet;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::document::{ChangeSource, DocumentSession, PendingChange};
use crate::error::{MarkpadError, Result};
use crate::sync::lock;
use crate::window::WindowId;

/// Outcome of a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Proceed,
    Cancel,
}

/// A yes/cancel question for the host to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationPrompt {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    /// Button focused when the dialog opens.
    pub default_decision: Decision,
}

/// What must happen before a pending change may be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assessment {
    /// Nothing unsaved is at risk.
    Proceed,
    /// External change carrying exactly the saved content; nothing to do.
    Ignore,
    /// Unsaved edits would be lost; ask first.
    Confirm(ConfirmationPrompt),
}

/// Decides whether incoming content may replace a window's content.
#[derive(Debug)]
pub struct ChangeReconciler {
    default_decision: Decision,
    in_flight: Mutex<HashSet<WindowId>>,
}

impl ChangeReconciler {
    /// Creates a reconciler whose prompts focus `default_decision`.
    pub fn new(default_decision: Decision) -> Self {
        Self {
            default_decision,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Marks a reconciliation in flight for `window`.
    ///
    /// Fails with [`MarkpadError::ReconciliationInProgress`] while another
    /// guard for the same window is alive. Other windows are unaffected.
    pub fn begin(&self, window: &WindowId) -> Result<InFlight<'_>> {
        let mut in_flight = lock(&self.in_flight);
        if !in_flight.insert(window.clone()) {
            return Err(MarkpadError::ReconciliationInProgress(window.clone()));
        }
        Ok(InFlight {
            reconciler: self,
            window: window.clone(),
        })
    }

    pub fn is_in_flight(&self, window: &WindowId) -> bool {
        lock(&self.in_flight).contains(window)
    }

    pub fn assess(&self, session: &DocumentSession, change: &PendingChange) -> Assessment {
        if change.source == ChangeSource::ExternalChange
            && session.path() == Some(change.incoming_path.as_path())
            && session.saved_content() == change.incoming_content
        {
            return Assessment::Ignore;
        }

        if !session.is_edited() {
            return Assessment::Proceed;
        }

        Assessment::Confirm(self.replace_prompt(change.source))
    }

    /// Synchronous reconciliation.
    ///
    /// `confirm` is only called when the session has unsaved edits; its
    /// answer (`true` to overwrite) becomes the decision. An ignorable
    /// change is reported as [`Decision::Cancel`] so callers leave state alone.
    pub fn reconcile<F>(
        &self,
        session: &DocumentSession,
        change: &PendingChange,
        confirm: F,
    ) -> Decision
    where
        F: FnOnce(&ConfirmationPrompt) -> bool,
    {
        match self.assess(session, change) {
            Assessment::Proceed => Decision::Proceed,
            Assessment::Ignore => Decision::Cancel,
            Assessment::Confirm(prompt) => {
                if confirm(&prompt) {
                    Decision::Proceed
                } else {
                    Decision::Cancel
                }
            }
        }
    }

    /// Applies `decision`. Returns whether the session was replaced.
    pub fn apply(session: &mut DocumentSession, change: PendingChange, decision: Decision) -> bool {
        match decision {
            Decision::Proceed => {
                session.load(change.incoming_path, change.incoming_content);
                true
            }
            Decision::Cancel => false,
        }
    }

    /// Prompt for closing a window, or `None` when nothing would be lost.
    pub fn close_prompt(&self, session: &DocumentSession) -> Option<ConfirmationPrompt> {
        session.is_edited().then(|| ConfirmationPrompt {
            title: "Quit with Unsaved Changes?".to_string(),
            message: format!(
                "{} has unsaved changes. Your changes will be lost if you close this window.",
                session.display_name()
            ),
            confirm_label: "Quit Anyway".to_string(),
            cancel_label: "Cancel".to_string(),
            default_decision: self.default_decision,
        })
    }

    fn replace_prompt(&self, source: ChangeSource) -> ConfirmationPrompt {
        let (title, message, confirm_label) = match source {
            ChangeSource::OpenRequest | ChangeSource::Drop => (
                "Overwrite Current Unsaved Changes?",
                "Opening a new file in this window will overwrite your unsaved changes. Open this file anyway?",
                "Open Anyway",
            ),
            ChangeSource::ExternalChange => (
                "Overwrite Current Unsaved Changes?",
                "Another application has changed this file. Load changes and discard your unsaved edits?",
                "Load Changes",
            ),
            ChangeSource::Revert => (
                "Discard Unsaved Changes?",
                "Reverting will discard your unsaved changes. Revert to the saved file?",
                "Revert",
            ),
        };

        ConfirmationPrompt {
            title: title.to_string(),
            message: message.to_string(),
            confirm_label: confirm_label.to_string(),
            cancel_label: "Cancel".to_string(),
            default_decision: self.default_decision,
        }
    }

    fn finish(&self, window: &WindowId) {
        lock(&self.in_flight).remove(window);
    }
}

impl Default for ChangeReconciler {
    fn default() -> Self {
        Self::new(Decision::Cancel)
    }
}

/// Guard for one in-flight reconciliation; releases the window on drop.
#[derive(Debug)]
pub struct InFlight<'a> {
    reconciler: &'a ChangeReconciler,
    window: WindowId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.reconciler.finish(&self.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn edited_session() -> DocumentSession {
        let mut session = DocumentSession::untitled();
        session.load("/docs/a.md", "# A");
        session.record_edit("# A!");
        session
    }

    #[test]
    fn test_clean_session_never_prompts() {
        let reconciler = ChangeReconciler::default();
        let mut session = DocumentSession::untitled();
        session.load("/docs/a.md", "# A");

        for source in [
            ChangeSource::OpenRequest,
            ChangeSource::Drop,
            ChangeSource::Revert,
            ChangeSource::ExternalChange,
        ] {
            let prompted = Cell::new(false);
            let change = PendingChange::new("/docs/b.md", "# B", source);
            let decision = reconciler.reconcile(&session, &change, |_| {
                prompted.set(true);
                false
            });
            assert_eq!(decision, Decision::Proceed);
            assert!(!prompted.get(), "clean session prompted for {:?}", source);
        }
    }

    #[test]
    fn test_edited_session_cancel_leaves_state_identical() {
        let reconciler = ChangeReconciler::default();
        let mut session = edited_session();
        let before = session.clone();

        let change = PendingChange::new("/docs/b.md", "# B", ChangeSource::OpenRequest);
        let decision = reconciler.reconcile(&session, &change, |_| false);
        let replaced = ChangeReconciler::apply(&mut session, change, decision);

        assert_eq!(decision, Decision::Cancel);
        assert!(!replaced);
        assert_eq!(session, before);
        assert!(session.is_edited());
    }

    #[test]
    fn test_edited_session_confirm_replaces() {
        let reconciler = ChangeReconciler::default();
        let mut session = edited_session();

        let change = PendingChange::new("/docs/a.md", "# A (v2)", ChangeSource::ExternalChange);
        let decision = reconciler.reconcile(&session, &change, |prompt| {
            assert!(prompt.message.contains("Another application"));
            true
        });
        assert!(ChangeReconciler::apply(&mut session, change, decision));

        assert!(!session.is_edited());
        assert_eq!(session.saved_content(), "# A (v2)");
        assert_eq!(session.live_content(), "# A (v2)");
    }

    #[test]
    fn test_external_change_with_saved_content_is_ignored() {
        let reconciler = ChangeReconciler::default();
        let session = edited_session();

        let change = PendingChange::new("/docs/a.md", "# A", ChangeSource::ExternalChange);
        assert_eq!(reconciler.assess(&session, &change), Assessment::Ignore);
    }

    #[test]
    fn test_prompt_wording_depends_on_source() {
        let reconciler = ChangeReconciler::default();
        let session = edited_session();

        let Assessment::Confirm(open) = reconciler.assess(
            &session,
            &PendingChange::new("/docs/b.md", "# B", ChangeSource::Drop),
        ) else {
            panic!("expected a prompt");
        };
        let Assessment::Confirm(revert) = reconciler.assess(
            &session,
            &PendingChange::new("/docs/a.md", "# A", ChangeSource::Revert),
        ) else {
            panic!("expected a prompt");
        };

        assert!(open.message.starts_with("Opening a new file"));
        assert!(revert.message.starts_with("Reverting"));
        assert_eq!(open.default_decision, Decision::Cancel);
    }

    #[test]
    fn test_begin_rejects_second_reconciliation_for_same_window() {
        let reconciler = ChangeReconciler::default();
        let w1 = WindowId::new("w1");
        let w2 = WindowId::new("w2");

        let guard = reconciler.begin(&w1).unwrap();
        assert!(matches!(
            reconciler.begin(&w1),
            Err(MarkpadError::ReconciliationInProgress(_))
        ));
        let other = reconciler.begin(&w2).unwrap();

        drop(guard);
        assert!(!reconciler.is_in_flight(&w1));
        assert!(reconciler.begin(&w1).is_ok());
        drop(other);
    }

    #[test]
    fn test_close_prompt_only_when_edited() {
        let reconciler = ChangeReconciler::new(Decision::Proceed);
        let mut session = DocumentSession::untitled();
        assert!(reconciler.close_prompt(&session).is_none());

        session.record_edit("draft");
        let prompt = reconciler.close_prompt(&session).unwrap();
        assert_eq!(prompt.confirm_label, "Quit Anyway");
        assert_eq!(prompt.default_decision, Decision::Proceed);
    }
}
