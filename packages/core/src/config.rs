//! OpenCanvas settings
//!
//! Persisted user settings, stored as JSON in the host's plugin data file.
//! Every field uses `#[serde(default)]` so files written by older versions
//! (or hand-edited files missing keys) still load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{translate_color, FilterRule, StoredFilterRules, StructuredNode};
use crate::services::{NormalizeMode, NormalizerConfig};
use crate::storage::{write_atomic, StorageError};

/// Extensions whose file content is inlined into file nodes by default
pub const DEFAULT_FILE_CONTENT_EXTENSIONS: [&str; 2] = ["txt", "ts"];

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSettings {
    /// Color code used for nodes without their own color
    #[serde(default = "default_color")]
    pub default_node_color: String,

    /// Color code used for link nodes without their own color
    #[serde(default = "default_color")]
    pub default_edge_color: String,

    /// Whether the host regroups automatically when the canvas changes
    #[serde(default = "default_true")]
    pub enable_auto_grouping: bool,

    /// Location of an external link filter file, relative to the vault
    #[serde(default = "default_link_filters_path")]
    pub link_filters_path: String,

    #[serde(default, deserialize_with = "deserialize_link_filters")]
    pub link_filters: Vec<FilterRule>,

    /// Extensions (case-insensitive) whose file content is read into file nodes
    #[serde(default = "default_file_content_extensions")]
    pub file_content_extensions: Vec<String>,

    #[serde(default)]
    pub normalize_mode: NormalizeMode,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            default_node_color: default_color(),
            default_edge_color: default_color(),
            enable_auto_grouping: true,
            link_filters_path: default_link_filters_path(),
            link_filters: Vec::new(),
            file_content_extensions: default_file_content_extensions(),
            normalize_mode: NormalizeMode::default(),
        }
    }
}

fn default_color() -> String {
    "1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_link_filters_path() -> String {
    "data/link-filters.json".to_string()
}

fn default_file_content_extensions() -> Vec<String> {
    DEFAULT_FILE_CONTENT_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn deserialize_link_filters<'de, D>(deserializer: D) -> Result<Vec<FilterRule>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    StoredFilterRules::deserialize(deserializer).map(Into::into)
}

impl CanvasSettings {
    /// Load settings from `path`.
    ///
    /// A missing file yields defaults. A file that exists but cannot be read or
    /// parsed also yields defaults, with a warning; the host keeps running.
    pub async fn load(path: &Path) -> Self {
        match Self::try_load(path).await {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Failed to load settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings, distinguishing "absent" (`Ok(None)`) from failures
    pub async fn try_load(path: &Path) -> Result<Option<Self>, StorageError> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(path.display().to_string(), e)),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Save settings with an atomic write
    pub async fn save(&self, path: &Path) -> Result<(), StorageError> {
        let serialized = serde_json::to_string_pretty(self)?;
        write_atomic(path, &serialized).await
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), String> {
        if self.default_node_color.is_empty() {
            return Err("defaultNodeColor cannot be empty".to_string());
        }

        if self.default_edge_color.is_empty() {
            return Err("defaultEdgeColor cannot be empty".to_string());
        }

        if let Some(ext) = self
            .file_content_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains('.'))
        {
            return Err(format!(
                "fileContentExtensions entries must be bare extensions, got '{}'",
                ext
            ));
        }

        if let Some(rule) = self.link_filters.iter().find(|rule| rule.url_substring.is_empty()) {
            return Err(format!(
                "link filter '{}' has an empty URL substring and would match every link",
                rule.title
            ));
        }

        Ok(())
    }

    /// Normalizer configuration derived from these settings
    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            mode: self.normalize_mode,
            file_content_extensions: self.file_content_extensions.clone(),
        }
    }

    /// Display color name for a node, falling back to the default node color
    pub fn node_color<'a>(&'a self, node: &'a StructuredNode) -> &'a str {
        translate_color(node.color.as_deref().unwrap_or(&self.default_node_color))
    }

    /// Display color name for a link node, falling back to the default edge color
    pub fn link_color<'a>(&'a self, node: &'a StructuredNode) -> &'a str {
        translate_color(node.color.as_deref().unwrap_or(&self.default_edge_color))
    }
}
