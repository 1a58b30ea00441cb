//! Write documents under the output root.
//!
//! Files are pretty-printed JSON with two-space indentation and no trailing
//! newline, and always fully overwritten.

use std::path::{Path, PathBuf};

use crate::error::{WriteError, WriteResult};
use crate::models::{Document, RegionLevel};

/// Create `root/<collection>` for every level, villages included.
pub async fn prepare_tree(root: &Path) -> WriteResult<()> {
    for level in RegionLevel::ALL {
        let dir = root.join(level.collection());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| WriteError::new(&dir, e))?;
    }
    Ok(())
}

/// Serialize one document body.
pub fn render(document: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&document.body)
}

/// Write one document, creating missing parent directories.
/// Returns `root` joined with the document path.
pub async fn write_document(root: &Path, document: &Document) -> WriteResult<PathBuf> {
    let target = root.join(&document.path);
    let content = render(document).map_err(|e| WriteError::new(&target, e))?;

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| WriteError::new(parent, e))?;
    }
    tokio::fs::write(&target, content)
        .await
        .map_err(|e| WriteError::new(&target, e))?;

    Ok(target)
}

/// Write documents one at a time, stopping at the first failure.
/// Files written before the failure stay on disk.
pub async fn write_all(root: &Path, documents: &[Document]) -> WriteResult<usize> {
    for document in documents {
        write_document(root, document).await?;
    }
    Ok(documents.len())
}
