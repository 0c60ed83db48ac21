//! Editor configuration.
//!
//! Markpad keeps no configuration file; values come from built-in defaults
//! and, in the desktop host, environment overrides (see the infrastructure
//! `ConfigService`).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::reconcile::Decision;
use crate::recent::DEFAULT_RECENT_LIMIT;

pub const DEFAULT_LOG_FILTER: &str = "info,markpad=debug";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Install a filesystem watch on every opened document.
    pub watch_files: bool,
    /// Button focused by overwrite/close confirmations.
    pub confirm_default: Decision,
    /// Entries kept in the recent documents list.
    pub recent_limit: usize,
    /// Starting directory for save dialogs of untitled documents.
    pub default_save_dir: Option<PathBuf>,
    /// `tracing-subscriber` filter directive.
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            watch_files: true,
            confirm_default: Decision::Cancel,
            recent_limit: DEFAULT_RECENT_LIMIT,
            default_save_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_focus_the_safe_button() {
        let config = EditorConfig::default();
        assert!(config.watch_files);
        assert_eq!(config.confirm_default, Decision::Cancel);
        assert_eq!(config.recent_limit, 10);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "confirm_default": "proceed" }"#).unwrap();
        assert_eq!(config.confirm_default, Decision::Proceed);
        assert!(config.watch_files);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }
}
