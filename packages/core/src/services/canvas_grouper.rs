//! Canvas Grouper
//!
//! Runs one grouping pass over a canvas document: every node is normalized,
//! then text, file and group nodes go to their type bucket and link nodes are
//! classified against the filter rules passed in.
//!
//! # Concurrency
//!
//! Nodes are normalized concurrently (file content reads are the only I/O), but
//! results are collected in document order before any bucket is touched, so
//! bucket order always equals input order. Each pass builds its own
//! [`GroupedNodes`]; nothing is shared between passes.
//!
//! # Failure policy
//!
//! A pass never fails. If the document can't be read or parsed the result is
//! [`GroupedNodes::empty`] plus a diagnostic. Unknown node types are dropped
//! with a diagnostic.

use std::sync::Arc;

use futures::future::join_all;

use crate::config::CanvasSettings;
use crate::models::{CanvasDocument, FilterRule, GroupedNodes, NodeKind};
use crate::services::diagnostics::{default_sink, Diagnostic, DiagnosticsSink};
use crate::services::link_classifier::categorize_link;
use crate::services::NodeNormalizer;
use crate::storage::{DocumentSource, FileContentResolver};

pub struct CanvasGrouper {
    normalizer: NodeNormalizer,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl CanvasGrouper {
    pub fn new(normalizer: NodeNormalizer) -> Self {
        Self {
            normalizer,
            diagnostics: default_sink(),
        }
    }

    /// Build a grouper configured from user settings
    pub fn from_settings(
        settings: &CanvasSettings,
        resolver: Option<Arc<dyn FileContentResolver>>,
    ) -> Self {
        let mut normalizer = NodeNormalizer::new(settings.normalizer_config());
        if let Some(resolver) = resolver {
            normalizer = normalizer.with_resolver(resolver);
        }
        Self::new(normalizer)
    }

    /// Route diagnostics from this grouper and its normalizer to `diagnostics`
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        self.normalizer = self.normalizer.with_diagnostics(Arc::clone(&diagnostics));
        self.diagnostics = diagnostics;
        self
    }

    pub fn normalizer(&self) -> &NodeNormalizer {
        &self.normalizer
    }

    /// Group raw document text.
    ///
    /// Text that is not a canvas document yields an empty result.
    pub async fn group(&self, document_text: &str, rules: &[FilterRule]) -> GroupedNodes {
        match CanvasDocument::parse(document_text) {
            Ok(document) => self.group_document(&document, rules).await,
            Err(e) => {
                self.diagnostics.emit(Diagnostic::DocumentParseFailed {
                    message: e.to_string(),
                });
                GroupedNodes::empty()
            }
        }
    }

    /// Read a document through `source` and group it.
    ///
    /// A read failure is handled like a parse failure.
    pub async fn group_from_source(
        &self,
        source: &dyn DocumentSource,
        document_id: &str,
        rules: &[FilterRule],
    ) -> GroupedNodes {
        match source.read_document(document_id).await {
            Ok(text) => self.group(&text, rules).await,
            Err(e) => {
                self.diagnostics.emit(Diagnostic::DocumentParseFailed {
                    message: format!("could not read {}: {}", document_id, e),
                });
                GroupedNodes::empty()
            }
        }
    }

    /// Group an already parsed document
    pub async fn group_document(
        &self,
        document: &CanvasDocument,
        rules: &[FilterRule],
    ) -> GroupedNodes {
        let normalized = join_all(
            document
                .nodes
                .iter()
                .map(|raw| self.normalizer.normalize(raw)),
        )
        .await;

        let mut grouped = GroupedNodes::empty();
        for (raw, node) in document.nodes.iter().zip(normalized) {
            match raw.kind() {
                NodeKind::Text => grouped.text.push(node),
                NodeKind::File => grouped.file.push(node),
                NodeKind::Group => grouped.group.push(node),
                NodeKind::Link => categorize_link(&mut grouped.link, rules, node),
                NodeKind::Unknown(node_type) => {
                    self.diagnostics.emit(Diagnostic::UnknownNodeType {
                        node_id: node.id,
                        node_type,
                    })
                }
            }
        }

        tracing::debug!(
            "Grouped {} of {} nodes into {} link buckets",
            grouped.len(),
            document.nodes.len(),
            grouped.link.titles().count()
        );
        grouped
    }
}

impl Default for CanvasGrouper {
    fn default() -> Self {
        Self::new(NodeNormalizer::default())
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "canvas_grouper_test.rs"]
mod canvas_grouper_test;
