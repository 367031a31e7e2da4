//! Loading project files from disk.
//!
//! Editors only send `didOpen` for files the user opens, but symbol lookups
//! need every script and definitions file in a project. On startup each
//! workspace folder is walked for `.yarn` and `.ysls.json` files, which are
//! read and analyzed like opened documents.
//!
//! All errors are logged by callers and the offending file is skipped.

use std::path::{Path, PathBuf};
use tower_lsp_server::ls_types::Uri;
use yarn_core::{Result, YarnError};

/// Maximum file size accepted from disk (10MB).
const MAX_FILE_SIZE: u64 = 10_000_000;

const YARN_EXTENSION: &str = "yarn";

/// Reads a document's content from disk.
///
/// # Errors
///
/// - `YarnError::InvalidUri` if `uri` is not a `file://` URI
/// - `YarnError::FileTooLarge` if the file exceeds the size limit
/// - `YarnError::Io` if the file cannot be read or is not UTF-8
pub async fn load_document_from_disk(uri: &Uri) -> Result<String> {
    let Some(path) = uri.to_file_path() else {
        tracing::debug!("cannot load non-file URI: {}", uri.as_str());
        return Err(YarnError::InvalidUri(uri.as_str().to_string()));
    };

    let size = tokio::fs::metadata(&path).await?.len();
    if size > MAX_FILE_SIZE {
        tracing::warn!("skipping {:?}: {} bytes", path, size);
        return Err(YarnError::FileTooLarge {
            size,
            limit: MAX_FILE_SIZE,
        });
    }

    let content = tokio::fs::read_to_string(&path).await?;
    tracing::trace!("loaded {:?} ({} bytes)", path, content.len());
    Ok(content)
}

/// Whether `path` is a file the project model analyzes.
pub fn is_project_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(yarn_core::definitions::DEFINITIONS_SUFFIX)
        || path.extension().is_some_and(|ext| ext == YARN_EXTENSION)
}

/// Lists project files under `root`, sorted by path.
///
/// Hidden directories are skipped. Unreadable directories are logged and
/// skipped.
pub async fn discover_project_files(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("cannot read directory {:?}: {}", dir, e);
                continue;
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let Ok(file_type) = entry.file_type().await else {
                continue;
            };

            if file_type.is_dir() {
                let hidden = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with('.'));
                if !hidden {
                    pending.push(path);
                }
            } else if file_type.is_file() && is_project_file(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    found
}
