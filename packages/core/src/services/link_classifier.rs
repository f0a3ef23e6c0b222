//! Link Classifier
//!
//! Assigns link nodes to filter buckets. Rules are scanned in list order and
//! the first rule whose URL substring occurs in the node's URL wins; a node
//! matching nothing, or carrying no URL at all, goes to `other`.
//!
//! Scanning is linear in the number of rules. Filter lists are short and
//! hand-written, so there is no index.

use crate::models::{FilterRule, LinkGroups, StructuredNode, OTHER_BUCKET};

/// Bucket title for `node` under `rules`
pub fn classify<'r>(rules: &'r [FilterRule], node: &StructuredNode) -> &'r str {
    let Some(url) = node.url() else {
        tracing::debug!("Link node {} has no URL, routing to '{}'", node.id, OTHER_BUCKET);
        return OTHER_BUCKET;
    };

    rules
        .iter()
        .find(|rule| rule.matches(url))
        .map_or(OTHER_BUCKET, |rule| rule.title.as_str())
}

/// Classify `node` and append it to its bucket in `link_groups`
pub fn categorize_link(link_groups: &mut LinkGroups, rules: &[FilterRule], node: StructuredNode) {
    let title = classify(rules, &node);
    tracing::debug!("Link node {} -> '{}'", node.id, title);
    link_groups.push(title, node);
}
