//! Structured Node
//!
//! The uniform shape every canvas node is normalized into before it is grouped
//! and handed to the presentation layer. Optional fields are omitted from the
//! serialized form rather than written as `null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-left corner of a node on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Type-specific content of a node.
///
/// Serialized untagged, so text content is a bare string and the other shapes
/// are `{"file": .., "subpath": ..}` and `{"url": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeContent {
    Text(String),
    File {
        file: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subpath: Option<String>,
    },
    Link {
        url: String,
    },
}

impl NodeContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn file_path(&self) -> Option<&str> {
        match self {
            NodeContent::File { file, .. } => Some(file),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            NodeContent::Link { url } => Some(url),
            _ => None,
        }
    }
}

/// A canvas node in normalized form.
///
/// `node_type` is the raw type string, kept even for types the grouper does not
/// recognize. `custom_data` carries fields outside the node's known schema,
/// such as a group's label and background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredNode {
    pub id: String,

    #[serde(rename = "type")]
    pub node_type: String,

    pub position: Position,

    pub size: Size,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<NodeContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Map<String, Value>>,

    /// Text of the referenced file, only for file nodes with an allow-listed extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_content: Option<String>,
}

impl StructuredNode {
    /// URL of a link node, `None` for every other content shape
    pub fn url(&self) -> Option<&str> {
        self.content.as_ref().and_then(NodeContent::url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(content: Option<NodeContent>) -> StructuredNode {
        StructuredNode {
            id: "n1".to_string(),
            node_type: "text".to_string(),
            position: Position { x: 1.0, y: 2.0 },
            size: Size { width: 10.0, height: 20.0 },
            color: None,
            content,
            custom_data: None,
            file_content: None,
        }
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let value = serde_json::to_value(node(None)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "n1",
                "type": "text",
                "position": {"x": 1.0, "y": 2.0},
                "size": {"width": 10.0, "height": 20.0}
            })
        );
    }

    #[test]
    fn test_content_shapes_serialize_untagged() {
        let text = serde_json::to_value(NodeContent::Text("hi".to_string())).unwrap();
        assert_eq!(text, json!("hi"));

        let file = serde_json::to_value(NodeContent::File {
            file: "notes.md".to_string(),
            subpath: None,
        })
        .unwrap();
        assert_eq!(file, json!({"file": "notes.md"}));

        let link = serde_json::to_value(NodeContent::Link {
            url: "https://example.com".to_string(),
        })
        .unwrap();
        assert_eq!(link, json!({"url": "https://example.com"}));
    }

    #[test]
    fn test_content_shapes_deserialize() {
        let file: NodeContent =
            serde_json::from_value(json!({"file": "a.md", "subpath": "#h"})).unwrap();
        assert_eq!(file.file_path(), Some("a.md"));

        let link: NodeContent = serde_json::from_value(json!({"url": "https://x"})).unwrap();
        assert_eq!(link.url(), Some("https://x"));
        assert_eq!(link.as_text(), None);
    }

    #[test]
    fn test_url_only_for_link_content() {
        assert_eq!(node(Some(NodeContent::Text("https://x".to_string()))).url(), None);
        assert_eq!(
            node(Some(NodeContent::Link { url: "https://x".to_string() })).url(),
            Some("https://x")
        );
    }
}
