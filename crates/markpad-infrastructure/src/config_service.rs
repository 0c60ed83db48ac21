//! Configuration service implementation.
//!
//! Builds [`EditorConfig`] from defaults plus `MARKPAD_*` environment
//! variables. Nothing is read from or written to disk.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use markpad_core::config::EditorConfig;
use markpad_core::reconcile::Decision;

use crate::paths::MarkpadPaths;

pub const ENV_WATCH_FILES: &str = "MARKPAD_WATCH_FILES";
pub const ENV_CONFIRM_DEFAULT: &str = "MARKPAD_CONFIRM_DEFAULT";
pub const ENV_RECENT_LIMIT: &str = "MARKPAD_RECENT_LIMIT";
pub const ENV_SAVE_DIR: &str = "MARKPAD_SAVE_DIR";
pub const ENV_LOG: &str = "MARKPAD_LOG";

/// Loads and caches the editor configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    config: Arc<RwLock<Option<EditorConfig>>>,
}

impl ConfigService {
    /// Creates a new ConfigService. Configuration is resolved on first access.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the configuration, resolving it from the process environment if not cached.
    pub fn get_config(&self) -> EditorConfig {
        {
            let cached = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref config) = *cached {
                return config.clone();
            }
        }

        let mut loaded = Self::from_lookup(|key| std::env::var(key).ok());
        if loaded.default_save_dir.is_none() {
            loaded.default_save_dir = MarkpadPaths::documents_dir().ok();
        }

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
        loaded
    }

    /// Applies overrides found through `lookup` on top of the defaults.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> EditorConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EditorConfig::default();

        if let Some(raw) = lookup(ENV_WATCH_FILES) {
            match parse_bool(&raw) {
                Some(value) => config.watch_files = value,
                None => tracing::warn!("[Config] Ignoring {}={:?}", ENV_WATCH_FILES, raw),
            }
        }

        if let Some(raw) = lookup(ENV_CONFIRM_DEFAULT) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "proceed" | "yes" => config.confirm_default = Decision::Proceed,
                "cancel" | "no" => config.confirm_default = Decision::Cancel,
                _ => tracing::warn!("[Config] Ignoring {}={:?}", ENV_CONFIRM_DEFAULT, raw),
            }
        }

        if let Some(raw) = lookup(ENV_RECENT_LIMIT) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => config.recent_limit = limit,
                Err(_) => tracing::warn!("[Config] Ignoring {}={:?}", ENV_RECENT_LIMIT, raw),
            }
        }

        if let Some(raw) = lookup(ENV_SAVE_DIR).filter(|raw| !raw.trim().is_empty()) {
            config.default_save_dir = Some(PathBuf::from(raw));
        }

        if let Some(raw) = lookup(ENV_LOG).filter(|raw| !raw.trim().is_empty()) {
            config.log_filter = raw;
        }

        config
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_no_overrides_gives_defaults() {
        let config = ConfigService::from_lookup(lookup(&[]));
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = ConfigService::from_lookup(lookup(&[
            (ENV_WATCH_FILES, "off"),
            (ENV_CONFIRM_DEFAULT, "Proceed"),
            (ENV_RECENT_LIMIT, "3"),
            (ENV_SAVE_DIR, "/srv/notes"),
            (ENV_LOG, "debug"),
        ]));

        assert!(!config.watch_files);
        assert_eq!(config.confirm_default, Decision::Proceed);
        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.default_save_dir, Some(PathBuf::from("/srv/notes")));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ConfigService::from_lookup(lookup(&[
            (ENV_WATCH_FILES, "sometimes"),
            (ENV_RECENT_LIMIT, "many"),
        ]));

        assert!(config.watch_files);
        assert_eq!(config.recent_limit, 10);
    }
}
