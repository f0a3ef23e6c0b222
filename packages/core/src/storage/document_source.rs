use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::storage::StorageError;

/// Supplies raw canvas document text by identifier.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn read_document(&self, id: &str) -> Result<String, StorageError>;
}

/// Reads documents from disk; identifiers are paths relative to `root`.
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn read_document(&self, id: &str) -> Result<String, StorageError> {
        let path = self.root.join(id);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StorageError::io(path.display().to_string(), e))
    }
}

/// In-memory document source for tests and embedding hosts
#[derive(Default)]
pub struct InMemoryDocumentSource {
    documents: RwLock<HashMap<String, String>>,
}

impl InMemoryDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents<I, K, V>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            documents: RwLock::new(
                documents
                    .into_iter()
                    .map(|(id, text)| (id.into(), text.into()))
                    .collect(),
            ),
        }
    }

    pub async fn insert(&self, id: impl Into<String>, text: impl Into<String>) {
        self.documents.write().await.insert(id.into(), text.into());
    }
}

#[async_trait]
impl DocumentSource for InMemoryDocumentSource {
    async fn read_document(&self, id: &str) -> Result<String, StorageError> {
        self.documents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fs_source_reads_relative_to_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("board.canvas"), r#"{"nodes":[]}"#).unwrap();

        let source = FsDocumentSource::new(temp_dir.path());
        let text = source.read_document("board.canvas").await.unwrap();
        assert_eq!(text, r#"{"nodes":[]}"#);

        let err = source.read_document("missing.canvas").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_in_memory_source() {
        let source = InMemoryDocumentSource::with_documents([("a.canvas", "{}")]);
        assert_eq!(source.read_document("a.canvas").await.unwrap(), "{}");
        assert!(source.read_document("b.canvas").await.is_err());

        source.insert("b.canvas", "[]").await;
        assert_eq!(source.read_document("b.canvas").await.unwrap(), "[]");
    }
}
