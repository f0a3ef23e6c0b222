//! Service Layer Error Types
//!
//! Most failures in OpenCanvas are contained and reported as diagnostics; these
//! are the ones that reach a caller, from document edits, filter edits and
//! explicit loads.

use crate::models::DocumentError;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanvasError {
    /// Document text is not a valid canvas
    #[error("Document parse failed: {0}")]
    DocumentParse(#[from] serde_json::Error),

    /// In-place document edit failed
    #[error("Document edit failed: {0}")]
    Document(#[from] DocumentError),

    /// Filter update/remove targeted a position outside the list
    #[error("Filter index {index} out of range (list has {len} rules)")]
    InvalidFilterIndex { index: usize, len: usize },

    /// A collaborator failed
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),
}

impl CanvasError {
    pub fn invalid_filter_index(index: usize, len: usize) -> Self {
        Self::InvalidFilterIndex { index, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CanvasError::invalid_filter_index(3, 2);
        assert_eq!(err.to_string(), "Filter index 3 out of range (list has 2 rules)");

        let err: CanvasError = DocumentError::NodeNotFound { id: "x".to_string() }.into();
        assert_eq!(err.to_string(), "Document edit failed: Node not found: x");

        let err: CanvasError = StorageError::not_found("a.canvas").into();
        assert_eq!(err.to_string(), "Storage operation failed: Not found: a.canvas");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json")
            .expect_err("Should fail to parse");
        let err: CanvasError = json_error.into();
        assert!(matches!(err, CanvasError::DocumentParse(_)));
    }
}
