use std::path::Path;

use serde::Serialize;

/// A named group of extensions for host file dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

pub const TEXT_FILES: FileFilter = FileFilter {
    name: "Text Files",
    extensions: &["txt"],
};

pub const MARKDOWN_FILES: FileFilter = FileFilter {
    name: "Markdown Files",
    extensions: &["md", "markdown"],
};

pub const HTML_FILES: FileFilter = FileFilter {
    name: "HTML Files",
    extensions: &["html", "htm"],
};

/// Filters offered by the open dialog.
pub const OPEN_FILTERS: &[FileFilter] = &[TEXT_FILES, MARKDOWN_FILES];

/// What a save dialog is being shown for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveTarget {
    Markdown,
    Html,
}

impl SaveTarget {
    pub fn title(self) -> &'static str {
        match self {
            SaveTarget::Markdown => "Save Markdown",
            SaveTarget::Html => "Save HTML",
        }
    }

    pub fn filters(self) -> &'static [FileFilter] {
        match self {
            SaveTarget::Markdown => std::slice::from_ref(&MARKDOWN_FILES),
            SaveTarget::Html => std::slice::from_ref(&HTML_FILES),
        }
    }
}

fn has_extension_in(path: &Path, filters: &[FileFilter]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    filters
        .iter()
        .flat_map(|filter| filter.extensions.iter())
        .any(|candidate| candidate.eq_ignore_ascii_case(ext))
}

/// Whether `path` can be opened as a document (`.txt`, `.md`, `.markdown`).
pub fn is_openable(path: &Path) -> bool {
    has_extension_in(path, OPEN_FILTERS)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openable_extensions() {
        assert!(is_openable(Path::new("/notes/todo.txt")));
        assert!(is_openable(Path::new("/notes/README.md")));
        assert!(is_openable(Path::new("/notes/post.Markdown")));
        assert!(!is_openable(Path::new("/notes/page.html")));
        assert!(!is_openable(Path::new("/notes/Makefile")));
    }

    #[test]
    fn test_save_target_filters() {
        assert!(has_extension_in(Path::new("out.htm"), SaveTarget::Html.filters()));
        assert!(!has_extension_in(Path::new("out.md"), SaveTarget::Html.filters()));
        assert!(has_extension_in(Path::new("out.MD"), SaveTarget::Markdown.filters()));
        assert_eq!(SaveTarget::Html.title(), "Save HTML");
    }
}
