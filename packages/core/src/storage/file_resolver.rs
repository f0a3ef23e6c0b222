use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::storage::StorageError;

/// Resolves the path of a file node to the file's text.
#[async_trait]
pub trait FileContentResolver: Send + Sync {
    async fn read_to_string(&self, path: &str) -> Result<String, StorageError>;
}

/// Reads referenced files from a vault directory.
///
/// File nodes store vault-relative paths, so every path is joined onto `root`.
pub struct VaultFileResolver {
    root: PathBuf,
}

impl VaultFileResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl FileContentResolver for VaultFileResolver {
    async fn read_to_string(&self, path: &str) -> Result<String, StorageError> {
        let full_path = self.root.join(path);
        tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|e| StorageError::io(full_path.display().to_string(), e))
    }
}

/// In-memory file resolver for tests and embedding hosts
#[derive(Default)]
pub struct InMemoryFileResolver {
    files: RwLock<HashMap<String, String>>,
}

impl InMemoryFileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, K, V>(files: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            files: RwLock::new(
                files
                    .into_iter()
                    .map(|(path, text)| (path.into(), text.into()))
                    .collect(),
            ),
        }
    }

    pub async fn insert(&self, path: impl Into<String>, text: impl Into<String>) {
        self.files.write().await.insert(path.into(), text.into());
    }
}

#[async_trait]
impl FileContentResolver for InMemoryFileResolver {
    async fn read_to_string(&self, path: &str) -> Result<String, StorageError> {
        self.files
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path))
    }
}
