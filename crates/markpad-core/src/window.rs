//! Window identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle for a host window.
///
/// The host chooses the value (the desktop shell uses its window label); the
/// engine only compares and hashes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for WindowId {
    fn from(label: String) -> Self {
        Self(label)
    }
}
