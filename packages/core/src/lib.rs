//! OpenCanvas Core
//!
//! Turns a canvas document (text, file, link and group nodes plus edges) into
//! a display-ready summary: nodes partitioned by type, with link nodes further
//! partitioned by user-configured URL filters.
//!
//! # Pipeline
//!
//! ```text
//! document text -> CanvasDocument -> NodeNormalizer (per node, concurrent)
//!               -> text / file / group buckets
//!               -> link_classifier (first matching FilterRule) -> link buckets
//! ```
//!
//! # Modules
//!
//! - [`models`] - canvas document, structured nodes, grouped result, filter rules
//! - [`services`] - normalizer, classifier, grouper, session, filter services
//! - [`storage`] - async collaborator traits with fs and in-memory implementations
//! - [`config`] - persisted user settings
//!
//! # Example
//!
//! ```rust
//! use opencanvas_core::{CanvasGrouper, FilterRule};
//!
//! #[tokio::main]
//! async fn main() {
//!     let text = r#"{"nodes":[{"id":"b","type":"link","url":"https://github.com/x","x":0,"y":0,"width":10,"height":10}]}"#;
//!     let grouped = CanvasGrouper::default()
//!         .group(text, &[FilterRule::new("GitHub", "github.com")])
//!         .await;
//!     assert_eq!(grouped.link.get("GitHub").unwrap()[0].id, "b");
//! }
//! ```

pub mod config;
pub mod models;
pub mod services;
pub mod storage;

// Re-export commonly used types
pub use config::CanvasSettings;
pub use models::{
    translate_color, CanvasDocument, FilterRule, GroupedNodes, LinkGroups, NodeContent, NodeKind,
    RawEdge, RawNode, StructuredNode,
};
pub use services::{
    CanvasError, CanvasGrouper, Diagnostic, DiagnosticsSink, FilterRuleStore, FilterService,
    GroupingSession, NodeNormalizer, NormalizeMode,
};
pub use storage::{DocumentSource, FileContentResolver, FilterRuleStorage, StorageError};
