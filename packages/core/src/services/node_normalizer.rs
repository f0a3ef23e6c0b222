//! Node Normalizer
//!
//! Turns a loosely-typed [`RawNode`] into a [`StructuredNode`].
//!
//! # Modes
//!
//! - **Schema** (default): dispatches on the four known node types. Text, file
//!   and link nodes get `content`; group nodes get their `label`,
//!   `background` and `backgroundStyle` as `customData`.
//! - **Open**: for producers that attach arbitrary extension fields. Content
//!   is extracted the same way, and every key outside the fixed standard set
//!   goes into `customData` untouched.
//!
//! In both modes, absent or empty fields are left out of the result instead of
//! being written as empty placeholders.
//!
//! # File content
//!
//! File nodes whose path has an allow-listed extension (`txt` and `ts` by
//! default) get the referenced file's text in `file_content`. A failed read
//! only costs that node its `file_content`; it is reported as a diagnostic and
//! never surfaces to the caller.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::DEFAULT_FILE_CONTENT_EXTENSIONS;
use crate::models::{NodeContent, NodeKind, RawNode, StructuredNode};
use crate::services::diagnostics::{default_sink, Diagnostic, DiagnosticsSink};
use crate::storage::FileContentResolver;

/// Keys that never go into `customData` in open mode
pub const STANDARD_FIELDS: [&str; 10] = [
    "id", "type", "x", "y", "width", "height", "text", "file", "url", "color",
];

/// Group node keys carried into `customData` in schema mode
pub const GROUP_FIELDS: [&str; 3] = ["label", "background", "backgroundStyle"];

/// How unknown fields on raw nodes are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeMode {
    /// Closed per-type schema; only group extras are kept
    #[default]
    Schema,
    /// Keep every non-standard key as `customData`
    Open,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerConfig {
    pub mode: NormalizeMode,

    /// Extensions (compared case-insensitively) whose content is read
    pub file_content_extensions: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            mode: NormalizeMode::default(),
            file_content_extensions: DEFAULT_FILE_CONTENT_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// Extension of `path`: everything after the final `.`, if there is one
pub fn file_extension(path: &str) -> Option<&str> {
    path.rsplit_once('.').map(|(_, ext)| ext)
}

pub struct NodeNormalizer {
    config: NormalizerConfig,
    resolver: Option<Arc<dyn FileContentResolver>>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl NodeNormalizer {
    /// Normalizer without file access; file nodes never get `file_content`
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            resolver: None,
            diagnostics: default_sink(),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn FileContentResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Whether a file node at `path` should have its content read
    pub fn wants_file_content(&self, path: &str) -> bool {
        file_extension(path).is_some_and(|ext| {
            self.config
                .file_content_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
    }

    /// Normalize a node, reading referenced file content where allowed
    pub async fn normalize(&self, raw: &RawNode) -> StructuredNode {
        let mut node = self.normalize_shape(raw);

        let Some(resolver) = self.resolver.as_ref() else {
            return node;
        };

        let path = match node.content.as_ref().and_then(NodeContent::file_path) {
            Some(path) if self.wants_file_content(path) => path.to_string(),
            _ => return node,
        };

        match resolver.read_to_string(&path).await {
            Ok(text) => node.file_content = Some(text),
            Err(e) => self.diagnostics.emit(Diagnostic::FileReadFailed {
                node_id: node.id.clone(),
                path,
                message: e.to_string(),
            }),
        }
        node
    }

    /// Normalize a node without any I/O
    pub fn normalize_shape(&self, raw: &RawNode) -> StructuredNode {
        let kind = raw.kind();
        let mut node = StructuredNode {
            id: raw.id().to_string(),
            node_type: raw.node_type().unwrap_or_default().to_string(),
            position: raw.position(),
            size: raw.size(),
            color: raw.color().map(str::to_string),
            content: None,
            custom_data: None,
            file_content: None,
        };

        match self.config.mode {
            NormalizeMode::Schema => {
                node.content = schema_content(raw, &kind);
                if kind == NodeKind::Group {
                    node.custom_data = pick_fields(raw, |key| GROUP_FIELDS.contains(&key));
                }
            }
            NormalizeMode::Open => {
                node.content = open_content(raw, &kind);
                node.custom_data = pick_fields(raw, |key| !STANDARD_FIELDS.contains(&key));
            }
        }

        tracing::debug!(
            "Normalized {} node {} (content: {}, custom fields: {})",
            node.node_type,
            node.id,
            node.content.is_some(),
            node.custom_data.as_ref().map_or(0, Map::len)
        );
        node
    }
}

impl Default for NodeNormalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

/// Non-empty string value of `key`
fn non_empty<'a>(raw: &'a RawNode, key: &str) -> Option<&'a str> {
    raw.str_field(key).filter(|value| !value.is_empty())
}

fn schema_content(raw: &RawNode, kind: &NodeKind) -> Option<NodeContent> {
    match kind {
        NodeKind::Text => non_empty(raw, "text").map(|text| NodeContent::Text(text.to_string())),
        NodeKind::File => non_empty(raw, "file").map(|file| NodeContent::File {
            file: file.to_string(),
            subpath: non_empty(raw, "subpath").map(str::to_string),
        }),
        NodeKind::Link => non_empty(raw, "url").map(|url| NodeContent::Link {
            url: url.to_string(),
        }),
        NodeKind::Group | NodeKind::Unknown(_) => None,
    }
}

/// Open mode leaves `subpath` in `customData`, since it is not a standard field
fn open_content(raw: &RawNode, kind: &NodeKind) -> Option<NodeContent> {
    match kind {
        NodeKind::File => non_empty(raw, "file").map(|file| NodeContent::File {
            file: file.to_string(),
            subpath: None,
        }),
        _ => schema_content(raw, kind),
    }
}

/// Copy the fields selected by `keep`, skipping nulls. `None` if nothing was kept.
fn pick_fields(raw: &RawNode, keep: impl Fn(&str) -> bool) -> Option<Map<String, Value>> {
    let picked: Map<String, Value> = raw
        .fields()
        .into_iter()
        .flatten()
        .filter(|(key, value)| keep(key.as_str()) && !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if picked.is_empty() {
        None
    } else {
        Some(picked)
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "node_normalizer_test.rs"]
mod node_normalizer_test;
