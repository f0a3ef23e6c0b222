//! Diagnostics
//!
//! A one-way channel for non-fatal problems found while grouping or editing
//! filters. Emitting never fails and never blocks; a sink with nobody
//! listening simply drops the diagnostic.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Capacity of the broadcast channel behind [`BroadcastDiagnostics`]
const DIAGNOSTICS_CHANNEL_CAPACITY: usize = 128;

/// A non-fatal problem reported by the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// Document text was not a valid canvas; the pass produced an empty result
    #[serde(rename_all = "camelCase")]
    DocumentParseFailed { message: String },

    /// Node with an unrecognized type was dropped
    #[serde(rename_all = "camelCase")]
    UnknownNodeType { node_id: String, node_type: String },

    /// Referenced file could not be read; the node has no file content
    #[serde(rename_all = "camelCase")]
    FileReadFailed { node_id: String, path: String, message: String },

    /// Filter list could not be loaded; an empty list is used instead
    #[serde(rename_all = "camelCase")]
    FilterLoadFailed { message: String },

    /// Filter list could not be persisted; the in-memory list is kept
    #[serde(rename_all = "camelCase")]
    FilterPersistFailed { message: String },

    /// Filter update/remove with an out-of-range index was ignored
    #[serde(rename_all = "camelCase")]
    InvalidFilterIndex { index: usize, len: usize },
}

impl Diagnostic {
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::DocumentParseFailed { .. } => "document:parse-failed",
            Diagnostic::UnknownNodeType { .. } => "node:unknown-type",
            Diagnostic::FileReadFailed { .. } => "node:file-read-failed",
            Diagnostic::FilterLoadFailed { .. } => "filters:load-failed",
            Diagnostic::FilterPersistFailed { .. } => "filters:persist-failed",
            Diagnostic::InvalidFilterIndex { .. } => "filters:invalid-index",
        }
    }
}

/// Receiver of diagnostics
pub trait DiagnosticsSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Logs every diagnostic as a `tracing` warning
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::DocumentParseFailed { message } => {
                tracing::warn!("Error grouping canvas nodes: {}", message)
            }
            Diagnostic::UnknownNodeType { node_id, node_type } => {
                tracing::warn!("Unknown node type '{}' on node {}", node_type, node_id)
            }
            Diagnostic::FileReadFailed { node_id, path, message } => {
                tracing::warn!("Could not read {} for file node {}: {}", path, node_id, message)
            }
            Diagnostic::FilterLoadFailed { message } => {
                tracing::warn!("Error loading link filters: {}", message)
            }
            Diagnostic::FilterPersistFailed { message } => {
                tracing::warn!("Error saving link filters: {}", message)
            }
            Diagnostic::InvalidFilterIndex { index, len } => {
                tracing::warn!("Ignoring filter index {} (list has {} rules)", index, len)
            }
        }
    }
}

/// Forwards diagnostics to any number of subscribers over a tokio broadcast channel.
///
/// Every diagnostic is also logged through [`TracingDiagnostics`].
#[derive(Debug, Clone)]
pub struct BroadcastDiagnostics {
    sender: broadcast::Sender<Diagnostic>,
}

impl BroadcastDiagnostics {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DIAGNOSTICS_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Diagnostic> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticsSink for BroadcastDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        TracingDiagnostics.emit(diagnostic.clone());
        // No subscribers is fine
        let _ = self.sender.send(diagnostic);
    }
}

/// Default sink used when a component is built without one
pub fn default_sink() -> Arc<dyn DiagnosticsSink> {
    Arc::new(TracingDiagnostics)
}
