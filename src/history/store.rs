//! Session history store.
//!
//! [`HistoryStore`] keeps past correction results most-recent-first, capped
//! at [`DEFAULT_CAPACITY`] entries, plus the id of the item currently on
//! display.  Every mutation is written through to [`KeyValueStorage`] before
//! the call returns; write failures are logged and the in-memory state stays
//! authoritative.
//!
//! Invariants held by every method:
//! * ids are unique;
//! * `len() <= capacity()`;
//! * `active()` is either `None` or an item currently in the store.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::config::HistoryConfig;
use crate::history::item::HistoryItem;
use crate::history::storage::{KeyValueStorage, StorageError};

/// Maximum number of retained history items.
pub const DEFAULT_CAPACITY: usize = 50;

/// Storage key the history is persisted under.
pub const HISTORY_KEY: &str = "lingofix_history";

// ---------------------------------------------------------------------------
// StorageLoadError
// ---------------------------------------------------------------------------

/// Stored history could not be restored at startup.  Never shown to the
/// user; the store starts empty instead.
#[derive(Debug, Error)]
pub enum StorageLoadError {
    #[error(transparent)]
    Read(#[from] StorageError),

    #[error("stored history is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// HistoryStore
// ---------------------------------------------------------------------------

/// Ordered, capped, persisted collection of [`HistoryItem`]s.
pub struct HistoryStore {
    items: Vec<HistoryItem>,
    active: Option<String>,
    capacity: usize,
    key: String,
    storage: Arc<dyn KeyValueStorage>,
}

impl HistoryStore {
    /// Empty store with the default capacity and key.  Nothing is read from
    /// `storage`; use [`load_on_startup`](Self::load_on_startup) for that.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_config(storage, &HistoryConfig::default())
    }

    /// Empty store using `config` for capacity and key.
    ///
    /// The capacity is clamped to `1..=DEFAULT_CAPACITY`; a config may shrink
    /// the history but never grow it past the cap.
    pub fn with_config(storage: Arc<dyn KeyValueStorage>, config: &HistoryConfig) -> Self {
        if config.max_items > DEFAULT_CAPACITY {
            log::warn!(
                "history: max_items = {} exceeds the cap, using {DEFAULT_CAPACITY}",
                config.max_items
            );
        }
        Self {
            items: Vec::new(),
            active: None,
            capacity: config.max_items.clamp(1, DEFAULT_CAPACITY),
            key: config.storage_key.clone(),
            storage,
        }
    }

    /// Restore the store from `storage`.
    ///
    /// Missing data yields an empty store.  Unreadable or malformed data is
    /// logged and also yields an empty store.  Loaded items are deduplicated
    /// by id and truncated to the capacity; the most recent one becomes
    /// active.
    pub fn load_on_startup(storage: Arc<dyn KeyValueStorage>, config: &HistoryConfig) -> Self {
        let mut store = Self::with_config(storage, config);

        match store.read_items() {
            Ok(items) => {
                let mut seen = HashSet::new();
                store.items = items
                    .into_iter()
                    .filter(|item| seen.insert(item.id.clone()))
                    .take(store.capacity)
                    .collect();
                store.active = store.items.first().map(|item| item.id.clone());
                log::info!("history: loaded {} item(s)", store.items.len());
            }
            Err(e) => {
                log::warn!("history: starting empty, could not load stored history: {e}");
            }
        }

        store
    }

    fn read_items(&self) -> Result<Vec<HistoryItem>, StorageLoadError> {
        match self.storage.get(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Insert `item` at the front, evict beyond the capacity, persist, and
    /// make `item` active.
    ///
    /// An existing item with the same id is replaced.
    pub fn append(&mut self, item: HistoryItem) {
        self.items.retain(|existing| existing.id != item.id);
        self.active = Some(item.id.clone());
        self.items.insert(0, item);

        if self.items.len() > self.capacity {
            let evicted = self.items.len() - self.capacity;
            self.items.truncate(self.capacity);
            log::debug!("history: evicted {evicted} oldest item(s)");
        }

        self.persist();
    }

    /// Make the item with `id` active.  Returns `false` and leaves the
    /// selection unchanged when no item matches.
    pub fn select_active(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.active = Some(id.to_string());
        true
    }

    /// Remove every item, drop the selection, persist.
    pub fn clear(&mut self) {
        self.items.clear();
        self.active = None;
        self.persist();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Items, most recent first.
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The item currently on display.
    pub fn active(&self) -> Option<&HistoryItem> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn persist(&self) {
        let data = match serde_json::to_string(&self.items) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("history: failed to serialise history: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &data) {
            log::warn!("history: failed to persist history: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
