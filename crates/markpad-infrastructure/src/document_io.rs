//! Filesystem-backed document I/O.

use std::path::Path;

use async_trait::async_trait;
use markpad_core::error::{MarkpadError, Result};
use markpad_core::host::DocumentIo;
use tokio::fs;

/// Reads and writes documents with `tokio::fs`.
///
/// Writes go straight to the target path; a failed write may leave a
/// partially written file, exactly as the OS write primitive does.
#[derive(Debug, Clone, Default)]
pub struct TokioDocumentIo;

impl TokioDocumentIo {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentIo for TokioDocumentIo {
    async fn read_text(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path)
            .await
            .map_err(|e| MarkpadError::from_io(path, &e))?;

        String::from_utf8(bytes)
            .map_err(|e| MarkpadError::io(path, format!("File is not valid UTF-8 text: {}", e)))
    }

    async fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| MarkpadError::from_io(parent, &e))?;
        }

        fs::write(path, content)
            .await
            .map_err(|e| MarkpadError::from_io(path, &e))?;

        tracing::debug!("[DocumentIo] Wrote {} bytes to {:?}", content.len(), path);
        Ok(())
    }
}
