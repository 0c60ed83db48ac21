//! Document state for a single window.

pub mod change;
pub mod kind;
pub mod session;

pub use change::{ChangeSource, PendingChange};
pub use kind::{FileFilter, SaveTarget, is_openable};
pub use session::{DocumentSession, UNTITLED};
