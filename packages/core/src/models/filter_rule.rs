//! Link filter rules
//!
//! A rule routes every link node whose URL contains `url_substring` into the
//! bucket named `title`. Rules are ordered; the first match wins.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One user-defined link filter.
///
/// Persisted as `{"title": .., "url": ..}`, the shape the settings file has
/// always used; `urlSubstring` is accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    pub title: String,

    #[serde(rename = "url", alias = "urlSubstring")]
    pub url_substring: String,
}

impl FilterRule {
    pub fn new(title: impl Into<String>, url_substring: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url_substring: url_substring.into(),
        }
    }

    /// Plain case-sensitive substring containment
    pub fn matches(&self, url: &str) -> bool {
        url.contains(self.url_substring.as_str())
    }
}

/// Every stored shape the filter list has had.
///
/// Older settings kept a `title -> substring` object; it converts to a list in
/// key order.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredFilterRules {
    List(Vec<FilterRule>),
    Map(IndexMap<String, String>),
}

impl From<StoredFilterRules> for Vec<FilterRule> {
    fn from(stored: StoredFilterRules) -> Self {
        match stored {
            StoredFilterRules::List(rules) => rules,
            StoredFilterRules::Map(map) => map
                .into_iter()
                .map(|(title, url_substring)| FilterRule::new(title, url_substring))
                .collect(),
        }
    }
}
