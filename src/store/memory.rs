use std::collections::HashMap;
use std::sync::Mutex;

use crate::{error::AppResult, store::ArrayStore};

/// In-process [`ArrayStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    arrays: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArrayStore for MemoryStore {
    fn load_raw(&self, key: &str) -> AppResult<Option<Vec<String>>> {
        let arrays = self
            .arrays
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(arrays.get(key).cloned())
    }

    fn save_raw(&self, key: &str, items: Vec<String>) -> AppResult<()> {
        self.arrays
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), items);
        Ok(())
    }
}
