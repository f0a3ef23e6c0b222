//! Filter Service
//!
//! Owns the live [`FilterRuleStore`] and keeps durable storage in step with it.
//! Every applied mutation is persisted right away; a failed save is reported as
//! a diagnostic and the in-memory list stays authoritative. Out-of-range
//! updates and removals are ignored with a diagnostic.
//!
//! All operations return the current list so the caller can re-render.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::FilterRule;
use crate::services::diagnostics::{default_sink, Diagnostic, DiagnosticsSink};
use crate::services::{CanvasError, FilterRuleStore};
use crate::storage::FilterRuleStorage;

pub struct FilterService {
    store: Mutex<FilterRuleStore>,
    storage: Arc<dyn FilterRuleStorage>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl FilterService {
    /// Create a service with an empty list; call [`load`](Self::load) to fill it
    pub fn new(storage: Arc<dyn FilterRuleStorage>) -> Self {
        Self {
            store: Mutex::new(FilterRuleStore::default()),
            storage,
            diagnostics: default_sink(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Replace the in-memory list with what storage holds.
    ///
    /// Absent or unreadable storage leaves an empty list.
    pub async fn load(&self) -> Vec<FilterRule> {
        let rules = match self.storage.load().await {
            Ok(rules) => rules,
            Err(e) => {
                self.diagnostics.emit(Diagnostic::FilterLoadFailed {
                    message: e.to_string(),
                });
                Vec::new()
            }
        };

        tracing::info!("Loaded {} link filters", rules.len());
        let mut store = self.store.lock().await;
        store.reset(rules);
        store.rules().to_vec()
    }

    pub async fn rules(&self) -> Vec<FilterRule> {
        self.store.lock().await.rules().to_vec()
    }

    pub async fn add(
        &self,
        title: impl Into<String>,
        url_substring: impl Into<String>,
    ) -> Vec<FilterRule> {
        let mut store = self.store.lock().await;
        store.add(title, url_substring);
        self.persist_if_dirty(&mut store).await
    }

    pub async fn update(
        &self,
        index: usize,
        title: impl Into<String>,
        url_substring: impl Into<String>,
    ) -> Vec<FilterRule> {
        let mut store = self.store.lock().await;
        if let Err(e) = store.update(index, title, url_substring) {
            self.report(e);
        }
        self.persist_if_dirty(&mut store).await
    }

    pub async fn remove(&self, index: usize) -> Vec<FilterRule> {
        let mut store = self.store.lock().await;
        if let Err(e) = store.remove(index) {
            self.report(e);
        }
        self.persist_if_dirty(&mut store).await
    }

    fn report(&self, error: CanvasError) {
        match error {
            CanvasError::InvalidFilterIndex { index, len } => {
                self.diagnostics.emit(Diagnostic::InvalidFilterIndex { index, len })
            }
            other => tracing::warn!("Filter edit failed: {}", other),
        }
    }

    /// Save while still holding the lock so saves land in mutation order
    async fn persist_if_dirty(&self, store: &mut FilterRuleStore) -> Vec<FilterRule> {
        let rules = store.rules().to_vec();
        if store.take_dirty() {
            if let Err(e) = self.storage.save(&rules).await {
                self.diagnostics.emit(Diagnostic::FilterPersistFailed {
                    message: e.to_string(),
                });
            }
        }
        rules
    }
}
