//! Grouped Nodes
//!
//! The result of one grouping pass: nodes partitioned by type, with link nodes
//! further partitioned into filter buckets. Buckets keep input order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::StructuredNode;

/// Name of the catch-all link bucket
pub const OTHER_BUCKET: &str = "other";

/// Link buckets keyed by filter title.
///
/// The `other` bucket always exists and comes first; filter buckets follow in
/// the order they were first used. Serializes as a plain JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, Vec<StructuredNode>>",
    into = "IndexMap<String, Vec<StructuredNode>>"
)]
pub struct LinkGroups {
    buckets: IndexMap<String, Vec<StructuredNode>>,
}

impl LinkGroups {
    pub fn new() -> Self {
        let mut buckets = IndexMap::new();
        buckets.insert(OTHER_BUCKET.to_string(), Vec::new());
        Self { buckets }
    }

    /// Append `node` to the bucket `title`, creating the bucket on first use
    pub fn push(&mut self, title: &str, node: StructuredNode) {
        match self.buckets.get_mut(title) {
            Some(bucket) => bucket.push(node),
            None => {
                self.buckets.insert(title.to_string(), vec![node]);
            }
        }
    }

    pub fn get(&self, title: &str) -> Option<&[StructuredNode]> {
        self.buckets.get(title).map(Vec::as_slice)
    }

    pub fn other(&self) -> &[StructuredNode] {
        self.get(OTHER_BUCKET).unwrap_or_default()
    }

    /// Bucket titles in display order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[StructuredNode])> {
        self.buckets
            .iter()
            .map(|(title, nodes)| (title.as_str(), nodes.as_slice()))
    }

    /// Total number of link nodes across all buckets
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LinkGroups {
    fn default() -> Self {
        Self::new()
    }
}

impl From<IndexMap<String, Vec<StructuredNode>>> for LinkGroups {
    fn from(buckets: IndexMap<String, Vec<StructuredNode>>) -> Self {
        let mut groups = Self::new();
        for (title, nodes) in buckets {
            groups.buckets.entry(title).or_default().extend(nodes);
        }
        groups
    }
}

impl From<LinkGroups> for IndexMap<String, Vec<StructuredNode>> {
    fn from(groups: LinkGroups) -> Self {
        groups.buckets
    }
}

/// Nodes of one canvas, partitioned for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedNodes {
    pub text: Vec<StructuredNode>,
    pub file: Vec<StructuredNode>,
    pub group: Vec<StructuredNode>,
    pub link: LinkGroups,
}

impl GroupedNodes {
    /// All buckets present and empty; also the degraded result of a failed pass
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.text.len() + self.file.len() + self.group.len() + self.link.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(label, count)` per bucket, in the order the view lists them.
    ///
    /// Link buckets are labelled `link/<title>`.
    pub fn bucket_counts(&self) -> Vec<(String, usize)> {
        let mut counts = vec![
            ("text".to_string(), self.text.len()),
            ("file".to_string(), self.file.len()),
            ("group".to_string(), self.group.len()),
        ];
        counts.extend(
            self.link
                .iter()
                .map(|(title, nodes)| (format!("link/{}", title), nodes.len())),
        );
        counts
    }
}
