//! Canvas Document Model
//!
//! The `.canvas` format is defined by the host application, so this module reads
//! it as loosely as possible: nodes and edges are kept as order-preserving JSON
//! objects and only inspected through accessors. A document that is parsed and
//! written back keeps every key the core does not understand, in its original
//! order, with numbers in their original integer/float form.
//!
//! # Examples
//!
//! ```rust
//! use opencanvas_core::models::{CanvasDocument, NodeKind};
//!
//! let doc = CanvasDocument::parse(
//!     r#"{"nodes":[{"id":"a","type":"text","text":"hi","x":0,"y":0,"width":10,"height":10}],"edges":[]}"#,
//! ).unwrap();
//! assert_eq!(doc.nodes[0].kind(), NodeKind::Text);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Position, Size};

/// Width used for nodes created through [`CanvasDocument::create_node`]
pub const DEFAULT_NODE_WIDTH: u64 = 200;

/// Height used for nodes created through [`CanvasDocument::create_node`]
pub const DEFAULT_NODE_HEIGHT: u64 = 100;

/// Errors raised when editing a canvas document in place
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    #[error("Node {id} is a '{actual}' node, expected '{expected}'")]
    WrongNodeType {
        id: String,
        expected: NodeKind,
        actual: NodeKind,
    },
}

/// The four node variants a canvas may contain, plus a fallback for anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    File,
    Link,
    Group,
    /// Any other `type` value, or a node without a string `type`
    Unknown(String),
}

impl NodeKind {
    pub fn from_type(node_type: &str) -> Self {
        match node_type {
            "text" => NodeKind::Text,
            "file" => NodeKind::File,
            "link" => NodeKind::Link,
            "group" => NodeKind::Group,
            other => NodeKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Text => "text",
            NodeKind::File => "file",
            NodeKind::Link => "link",
            NodeKind::Group => "group",
            NodeKind::Unknown(other) => other,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, NodeKind::Unknown(_))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node record exactly as it appears in the document.
///
/// Normally a JSON object. Any other JSON value is kept as-is so it survives a
/// rewrite; it has no fields and its kind is `Unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawNode(Value);

impl RawNode {
    /// Build a node record with the common fields set
    pub fn new(id: impl Into<String>, kind: &NodeKind, position: Position, size: Size) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::String(id.into()));
        fields.insert("type".to_string(), Value::String(kind.as_str().to_string()));
        fields.insert("x".to_string(), number_value(position.x));
        fields.insert("y".to_string(), number_value(position.y));
        fields.insert("width".to_string(), number_value(size.width));
        fields.insert("height".to_string(), number_value(size.height));
        Self(Value::Object(fields))
    }

    /// Node id, or an empty string when the record has none
    pub fn id(&self) -> &str {
        self.str_field("id").unwrap_or_default()
    }

    /// Raw `type` value, if it is a string
    pub fn node_type(&self) -> Option<&str> {
        self.str_field("type")
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::from_type(self.node_type().unwrap_or_default())
    }

    pub fn position(&self) -> Position {
        Position {
            x: self.number("x"),
            y: self.number("y"),
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.number("width"),
            height: self.number("height"),
        }
    }

    pub fn color(&self) -> Option<&str> {
        self.str_field("color")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`; non-string values count as absent
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Numeric value of `key`, `0.0` when missing or not a number
    pub fn number(&self, key: &str) -> f64 {
        self.0.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// The record's fields; `None` for an entry that is not a JSON object
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    /// Set `key`, returning the previous value. No-op on a non-object entry.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.as_object_mut()?.insert(key.into(), value)
    }
}

impl From<Map<String, Value>> for RawNode {
    fn from(fields: Map<String, Value>) -> Self {
        Self(Value::Object(fields))
    }
}

impl From<Value> for RawNode {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// An edge record exactly as it appears in the document.
///
/// Like [`RawNode`], a non-object entry is kept verbatim and has no fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEdge(Value);

impl RawEdge {
    pub fn id(&self) -> &str {
        self.str_field("id").unwrap_or_default()
    }

    pub fn from_node(&self) -> Option<&str> {
        self.str_field("fromNode")
    }

    pub fn to_node(&self) -> Option<&str> {
        self.str_field("toNode")
    }

    pub fn label(&self) -> Option<&str> {
        self.str_field("label")
    }

    pub fn color(&self) -> Option<&str> {
        self.str_field("color")
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Whether either end of the edge is attached to `node_id`
    pub fn touches(&self, node_id: &str) -> bool {
        self.from_node() == Some(node_id) || self.to_node() == Some(node_id)
    }
}

impl From<Map<String, Value>> for RawEdge {
    fn from(fields: Map<String, Value>) -> Self {
        Self(Value::Object(fields))
    }
}

impl From<Value> for RawEdge {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A whole canvas document.
///
/// `nodes` is required; a document without it is not a canvas. Any top-level
/// key other than `nodes` and `edges` is carried in `extra` and written back
/// untouched.
///
/// `edges` distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`) so both are written back the way they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    pub nodes: Vec<RawNode>,

    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub edges: Option<Option<Vec<RawEdge>>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanvasDocument {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize with two-space indentation, the layout the host writes
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn edges(&self) -> &[RawEdge] {
        self.edges
            .as_ref()
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }

    pub fn find_node(&self, id: &str) -> Option<&RawNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    fn find_node_mut(&mut self, id: &str) -> Option<&mut RawNode> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    /// Append an empty node of `kind` at `position` and return its new id
    pub fn create_node(&mut self, kind: &NodeKind, position: Position) -> String {
        let id = generate_node_id();
        let size = Size {
            width: DEFAULT_NODE_WIDTH as f64,
            height: DEFAULT_NODE_HEIGHT as f64,
        };
        self.nodes.push(RawNode::new(id.clone(), kind, position, size));
        tracing::debug!("Created {} node {} at ({}, {})", kind, id, position.x, position.y);
        id
    }

    /// Append a link node pointing at `url` and return its new id
    pub fn create_link(&mut self, url: impl Into<String>, position: Position) -> String {
        let id = self.create_node(&NodeKind::Link, position);
        if let Some(node) = self.find_node_mut(&id) {
            node.insert("url", Value::String(url.into()));
        }
        id
    }

    pub fn update_node_text(
        &mut self,
        id: &str,
        text: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let node = self.node_of_kind_mut(id, NodeKind::Text)?;
        node.insert("text", Value::String(text.into()));
        Ok(())
    }

    pub fn update_link_url(
        &mut self,
        id: &str,
        url: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let node = self.node_of_kind_mut(id, NodeKind::Link)?;
        node.insert("url", Value::String(url.into()));
        Ok(())
    }

    /// Remove a node and every edge attached to it.
    ///
    /// Returns `false` if no node had that id.
    pub fn delete_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.id() != id);
        if self.nodes.len() == before {
            return false;
        }

        if let Some(Some(edges)) = self.edges.as_mut() {
            edges.retain(|edge| !edge.touches(id));
        }
        true
    }

    fn node_of_kind_mut(
        &mut self,
        id: &str,
        expected: NodeKind,
    ) -> Result<&mut RawNode, DocumentError> {
        let node = self
            .find_node_mut(id)
            .ok_or_else(|| DocumentError::NodeNotFound { id: id.to_string() })?;

        let actual = node.kind();
        if actual != expected {
            return Err(DocumentError::WrongNodeType {
                id: id.to_string(),
                expected,
                actual,
            });
        }
        Ok(node)
    }
}

/// A key that is present deserializes to `Some`, even when its value is `null`
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 16 lowercase hex digits, the id shape the host itself generates
pub fn generate_node_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(16);
    id
}

/// Integral coordinates are stored as JSON integers so rewritten documents
/// don't gain a trailing `.0`.
fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
