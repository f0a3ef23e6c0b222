//! External Collaborators
//!
//! The core never touches the file system directly. Everything it reads or
//! persists goes through one of these async traits:
//!
//! - [`DocumentSource`] - raw canvas document text by identifier
//! - [`FileContentResolver`] - text of files referenced by file nodes
//! - [`FilterRuleStorage`] - durable storage for the link filter list
//!
//! Each trait ships with a file-system implementation for real hosts and an
//! in-memory one for tests and embedding.

mod document_source;
mod error;
mod file_resolver;
mod filter_storage;

pub use document_source::{DocumentSource, FsDocumentSource, InMemoryDocumentSource};
pub use error::StorageError;
pub use file_resolver::{FileContentResolver, InMemoryFileResolver, VaultFileResolver};
pub use filter_storage::{FilterRuleStorage, InMemoryFilterStorage, JsonFilterStorage};

use std::path::Path;

use tokio::fs;

/// Write `contents` to `path` without leaving a half-written file behind.
///
/// Writes to a sibling `.tmp` file first, then renames it into place.
pub(crate) async fn write_atomic(path: &Path, contents: &str) -> Result<(), StorageError> {
    let display = path.display().to_string();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StorageError::io(parent.display().to_string(), e))?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    fs::write(temp_path, contents)
        .await
        .map_err(|e| StorageError::io(display.clone(), e))?;

    fs::rename(temp_path, path)
        .await
        .map_err(|e| StorageError::io(display, e))?;

    Ok(())
}
