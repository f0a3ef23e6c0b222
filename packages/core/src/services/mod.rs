//! Canvas Services
//!
//! This module contains the grouping pipeline and its supporting services:
//!
//! - `NodeNormalizer` - raw node records to `StructuredNode`
//! - `link_classifier` - first-match filter classification of link nodes
//! - `CanvasGrouper` - one full grouping pass over a document
//! - `GroupingSession` - last-writer-wins publishing of grouping passes
//! - `FilterRuleStore` / `FilterService` - link filter CRUD and persistence
//! - `diagnostics` - the non-fatal warning channel
//!
//! Nothing in here reads ambient state: documents, filter rules and
//! collaborators are always passed in explicitly.

pub mod canvas_grouper;
pub mod diagnostics;
pub mod error;
pub mod filter_service;
pub mod filter_store;
pub mod grouping_session;
pub mod link_classifier;
pub mod node_normalizer;

pub use canvas_grouper::CanvasGrouper;
pub use diagnostics::{BroadcastDiagnostics, Diagnostic, DiagnosticsSink, TracingDiagnostics};
pub use error::CanvasError;
pub use filter_service::FilterService;
pub use filter_store::FilterRuleStore;
pub use grouping_session::{GroupedSnapshot, GroupingSession};
pub use link_classifier::{categorize_link, classify};
pub use node_normalizer::{NodeNormalizer, NormalizeMode, NormalizerConfig};
