//! Session history: past correction results, persisted across restarts.
//!
//! * [`HistoryItem`]: one correction session.
//! * [`HistoryStore`]: most-recent-first, capped, with an active selection.
//! * [`KeyValueStorage`]: durable string storage ([`FileStorage`],
//!   [`MemoryStorage`]).

pub mod item;
pub mod storage;
pub mod store;

pub use item::HistoryItem;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{HistoryStore, StorageLoadError, DEFAULT_CAPACITY, HISTORY_KEY};
