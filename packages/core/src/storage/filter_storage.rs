use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::models::{FilterRule, StoredFilterRules};
use crate::storage::{write_atomic, StorageError};

/// Key the filter list lives under inside a settings file
pub const LINK_FILTERS_KEY: &str = "linkFilters";

/// Durable storage for the ordered link filter list.
#[async_trait]
pub trait FilterRuleStorage: Send + Sync {
    /// Load the stored list; an absent store yields an empty list
    async fn load(&self) -> Result<Vec<FilterRule>, StorageError>;

    async fn save(&self, rules: &[FilterRule]) -> Result<(), StorageError>;
}

/// Filter rules kept in a JSON file.
///
/// Reads every shape the list has been stored in: a bare list of
/// `{title, url}` records, a bare `title -> substring` object, or either of
/// those under a `linkFilters` key of a larger settings object. Writes always
/// use the list shape under `linkFilters` and keep every other key of the file.
pub struct JsonFilterStorage {
    path: PathBuf,
}

impl JsonFilterStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn read_value(&self) -> Result<Option<Value>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(self.path.display().to_string(), e)),
        }
    }
}

/// Settings keys that mark an object as a settings file, never a filter map
const SETTINGS_KEYS: [&str; 6] = [
    "defaultNodeColor",
    "defaultEdgeColor",
    "enableAutoGrouping",
    "linkFiltersPath",
    "fileContentExtensions",
    "normalizeMode",
];

/// A `title -> substring` object stored without a `linkFilters` wrapper
fn is_legacy_map(map: &Map<String, Value>) -> bool {
    !map.contains_key(LINK_FILTERS_KEY)
        && !SETTINGS_KEYS.iter().any(|key| map.contains_key(*key))
        && map.values().all(Value::is_string)
}

/// Pull the filter list out of any supported file shape
fn rules_from_value(value: Value) -> Result<Vec<FilterRule>, StorageError> {
    let stored = match value {
        Value::Object(mut map) => match map.remove(LINK_FILTERS_KEY) {
            Some(filters) => filters,
            // A settings object without filters, or a legacy bare map
            None if is_legacy_map(&map) => Value::Object(map),
            None => return Ok(Vec::new()),
        },
        other => other,
    };

    let stored: StoredFilterRules = serde_json::from_value(stored)?;
    Ok(stored.into())
}

#[async_trait]
impl FilterRuleStorage for JsonFilterStorage {
    async fn load(&self) -> Result<Vec<FilterRule>, StorageError> {
        match self.read_value().await? {
            Some(value) => rules_from_value(value),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, rules: &[FilterRule]) -> Result<(), StorageError> {
        // Corrupt, non-object and legacy bare-map files are replaced rather than merged
        let mut root = match self.read_value().await {
            Ok(Some(Value::Object(map))) if !is_legacy_map(&map) => map,
            _ => Map::new(),
        };
        root.insert(LINK_FILTERS_KEY.to_string(), serde_json::to_value(rules)?);

        let serialized = serde_json::to_string_pretty(&Value::Object(root))?;
        write_atomic(&self.path, &serialized).await?;

        tracing::info!("Saved {} link filters to {}", rules.len(), self.path.display());
        Ok(())
    }
}

/// In-memory filter storage for tests and embedding hosts
#[derive(Default)]
pub struct InMemoryFilterStorage {
    rules: RwLock<Vec<FilterRule>>,
    saves: RwLock<usize>,
}

impl InMemoryFilterStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<FilterRule>) -> Self {
        Self {
            rules: RwLock::new(rules),
            saves: RwLock::new(0),
        }
    }

    /// Number of completed `save` calls
    pub async fn save_count(&self) -> usize {
        *self.saves.read().await
    }
}

#[async_trait]
impl FilterRuleStorage for InMemoryFilterStorage {
    async fn load(&self) -> Result<Vec<FilterRule>, StorageError> {
        Ok(self.rules.read().await.clone())
    }

    async fn save(&self, rules: &[FilterRule]) -> Result<(), StorageError> {
        *self.rules.write().await = rules.to_vec();
        *self.saves.write().await += 1;
        Ok(())
    }
}
