//! Filter Rule Store
//!
//! In-memory, ordered list of link filter rules. Positions are plain indices:
//! `remove` shifts every later rule down by one, so an index obtained before a
//! removal must not be reused afterwards.
//!
//! The store itself does no I/O. Every applied mutation marks it dirty, which
//! is the owner's cue to persist (see [`FilterService`](crate::services::FilterService)).

use crate::models::FilterRule;
use crate::services::CanvasError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterRuleStore {
    rules: Vec<FilterRule>,
    dirty: bool,
}

impl FilterRuleStore {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self {
            rules,
            dirty: false,
        }
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append a rule
    pub fn add(
        &mut self,
        title: impl Into<String>,
        url_substring: impl Into<String>,
    ) -> &[FilterRule] {
        self.rules.push(FilterRule::new(title, url_substring));
        self.dirty = true;
        &self.rules
    }

    /// Replace the rule at `index` in place.
    ///
    /// # Errors
    ///
    /// `CanvasError::InvalidFilterIndex` if `index` is out of range; the list is
    /// left untouched.
    pub fn update(
        &mut self,
        index: usize,
        title: impl Into<String>,
        url_substring: impl Into<String>,
    ) -> Result<&[FilterRule], CanvasError> {
        let len = self.rules.len();
        let rule = self
            .rules
            .get_mut(index)
            .ok_or_else(|| CanvasError::invalid_filter_index(index, len))?;

        *rule = FilterRule::new(title, url_substring);
        self.dirty = true;
        Ok(&self.rules)
    }

    /// Remove the rule at `index`, shifting later rules down.
    ///
    /// # Errors
    ///
    /// `CanvasError::InvalidFilterIndex` if `index` is out of range; the list is
    /// left untouched.
    pub fn remove(&mut self, index: usize) -> Result<FilterRule, CanvasError> {
        if index >= self.rules.len() {
            return Err(CanvasError::invalid_filter_index(index, self.rules.len()));
        }

        let removed = self.rules.remove(index);
        self.dirty = true;
        Ok(removed)
    }

    /// Replace the whole list, e.g. after loading from storage. Not a mutation.
    pub fn reset(&mut self, rules: Vec<FilterRule>) {
        self.rules = rules;
        self.dirty = false;
    }

    /// Whether a mutation happened since the last call; clears the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
