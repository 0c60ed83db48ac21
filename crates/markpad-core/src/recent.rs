//! Process-wide list of recently opened documents.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentDocument {
    pub path: PathBuf,
    pub opened_at: DateTime<Utc>,
}

/// Most-recent-first, duplicate-free, bounded.
#[derive(Debug, Clone)]
pub struct RecentDocuments {
    entries: Vec<RecentDocument>,
    limit: usize,
}

impl RecentDocuments {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    /// Moves `path` to the front, dropping the oldest entry past the limit.
    pub fn add(&mut self, path: &Path) {
        self.entries.retain(|entry| entry.path != path);
        self.entries.insert(
            0,
            RecentDocument {
                path: path.to_path_buf(),
                opened_at: Utc::now(),
            },
        );
        self.entries.truncate(self.limit);
    }

    pub fn entries(&self) -> &[RecentDocument] {
        &self.entries
    }
}

impl Default for RecentDocuments {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(recent: &RecentDocuments) -> Vec<&Path> {
        recent.entries().iter().map(|e| e.path.as_path()).collect()
    }

    #[test]
    fn test_reopening_moves_to_front_without_duplicates() {
        let mut recent = RecentDocuments::default();
        recent.add(Path::new("/a.md"));
        recent.add(Path::new("/b.md"));
        recent.add(Path::new("/a.md"));

        assert_eq!(paths(&recent), vec![Path::new("/a.md"), Path::new("/b.md")]);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut recent = RecentDocuments::new(2);
        recent.add(Path::new("/a.md"));
        recent.add(Path::new("/b.md"));
        recent.add(Path::new("/c.md"));

        assert_eq!(paths(&recent), vec![Path::new("/c.md"), Path::new("/b.md")]);
    }
}
