//! Persisted user state (history, watchlist, genre preferences).
//!
//! Records are kept as arrays of JSON strings behind the [`ArrayStore`] key-value
//! collaborator. The fetch/cache layer never touches this module.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, AppResult};

pub mod genres;
pub mod history;
pub mod memory;
pub mod watchlist;

pub use genres::GenresStore;
pub use history::HistoryStore;
pub use memory::MemoryStore;
pub use watchlist::WatchlistStore;

/// Key-value storage of string arrays
pub trait ArrayStore: Send + Sync {
    fn load_raw(&self, key: &str) -> AppResult<Option<Vec<String>>>;

    fn save_raw(&self, key: &str, items: Vec<String>) -> AppResult<()>;
}

/// Loads the array under `key`, decoding every element as `T`
pub fn load_array<T: DeserializeOwned>(
    store: &dyn ArrayStore,
    key: &str,
) -> AppResult<Option<Vec<T>>> {
    let Some(raw) = store.load_raw(key)? else {
        return Ok(None);
    };

    raw.iter()
        .map(|item| {
            serde_json::from_str(item)
                .map_err(|e| AppError::Decode(format!("Stored {} entry is invalid: {}", key, e)))
        })
        .collect::<AppResult<Vec<T>>>()
        .map(Some)
}

/// Encodes every element of `items` and stores the array under `key`
pub fn save_array<T: Serialize>(store: &dyn ArrayStore, key: &str, items: &[T]) -> AppResult<()> {
    let raw = items
        .iter()
        .map(|item| {
            serde_json::to_string(item)
                .map_err(|e| AppError::Internal(format!("Store serialization error: {}", e)))
        })
        .collect::<AppResult<Vec<String>>>()?;

    store.save_raw(key, raw)
}
