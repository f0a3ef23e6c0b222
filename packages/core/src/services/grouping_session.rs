//! Grouping Session
//!
//! The contract between the host and the core: whenever a canvas changes, the
//! host calls [`GroupingSession::refresh`] and the presentation layer watches
//! [`GroupingSession::subscribe`] for the latest result.
//!
//! Passes may overlap. Each pass is numbered when it starts and its result is
//! only published if no later-started pass has published already, so a slow
//! stale pass can never overwrite a fresher view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::config::CanvasSettings;
use crate::models::{FilterRule, GroupedNodes};
use crate::services::CanvasGrouper;
use crate::storage::DocumentSource;

/// The most recently published grouping result
#[derive(Debug, Clone, Default)]
pub struct GroupedSnapshot {
    /// Pass number, 0 before the first publish
    pub generation: u64,
    pub grouped: Arc<GroupedNodes>,
}

pub struct GroupingSession {
    grouper: Arc<CanvasGrouper>,
    next_generation: AtomicU64,
    published: watch::Sender<GroupedSnapshot>,
    auto_grouping: bool,
}

impl GroupingSession {
    pub fn new(grouper: Arc<CanvasGrouper>) -> Self {
        let (published, _) = watch::channel(GroupedSnapshot::default());
        Self {
            grouper,
            next_generation: AtomicU64::new(0),
            published,
            auto_grouping: true,
        }
    }

    pub fn with_settings(mut self, settings: &CanvasSettings) -> Self {
        self.auto_grouping = settings.enable_auto_grouping;
        self
    }

    /// Whether the host should refresh on document change events.
    ///
    /// Explicit refreshes are always allowed.
    pub fn should_auto_refresh(&self) -> bool {
        self.auto_grouping
    }

    pub fn subscribe(&self) -> watch::Receiver<GroupedSnapshot> {
        self.published.subscribe()
    }

    pub fn latest(&self) -> GroupedSnapshot {
        self.published.borrow().clone()
    }

    /// Run a pass over `document_text`.
    ///
    /// Returns the result if it was published, `None` if a newer pass got there
    /// first and this one was discarded.
    pub async fn refresh(
        &self,
        document_text: &str,
        rules: &[FilterRule],
    ) -> Option<Arc<GroupedNodes>> {
        let generation = self.start_pass();
        let grouped = self.grouper.group(document_text, rules).await;
        self.publish(generation, grouped)
    }

    /// Run a pass over a document read through `source`
    pub async fn refresh_from_source(
        &self,
        source: &dyn DocumentSource,
        document_id: &str,
        rules: &[FilterRule],
    ) -> Option<Arc<GroupedNodes>> {
        let generation = self.start_pass();
        let grouped = self
            .grouper
            .group_from_source(source, document_id, rules)
            .await;
        self.publish(generation, grouped)
    }

    fn start_pass(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn publish(&self, generation: u64, grouped: GroupedNodes) -> Option<Arc<GroupedNodes>> {
        let grouped = Arc::new(grouped);
        let published = self.published.send_if_modified(|current| {
            if generation <= current.generation {
                return false;
            }
            *current = GroupedSnapshot {
                generation,
                grouped: Arc::clone(&grouped),
            };
            true
        });

        if published {
            tracing::debug!("Published grouping pass {}", generation);
            Some(grouped)
        } else {
            tracing::debug!("Discarded stale grouping pass {}", generation);
            None
        }
    }
}
