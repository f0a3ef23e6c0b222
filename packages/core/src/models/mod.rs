//! Data Models
//!
//! This module contains the data structures shared by every OpenCanvas component:
//!
//! - `CanvasDocument` / `RawNode` / `RawEdge` - the host's `.canvas` format, read as-is
//! - `StructuredNode` - the uniform normalized node form
//! - `GroupedNodes` - the partitioned result handed to the presentation layer
//! - `FilterRule` - user-configured link filters
//! - color code translation

mod canvas;
mod color;
mod filter_rule;
mod grouped;
mod structured_node;

pub use canvas::{
    generate_node_id, CanvasDocument, DocumentError, NodeKind, RawEdge, RawNode,
    DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH,
};
pub use color::{is_preset_color, translate_color, PRESET_COLORS};
pub use filter_rule::{FilterRule, StoredFilterRules};
pub use grouped::{GroupedNodes, LinkGroups, OTHER_BUCKET};
pub use structured_node::{NodeContent, Position, Size, StructuredNode};
