//! In-memory key-value store with an optional size quota

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use super::KeyValueStore;
use crate::error::{Error, Result};

/// Ordered in-memory store.
///
/// With a quota set, a save that would push the total size of keys and
/// values past the limit fails with [`Error::StorageUnavailable`], the same
/// way a browser store reports an exceeded quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    quota: Cell<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        let store = Self::default();
        store.quota.set(Some(bytes));
        store
    }

    pub fn set_quota(&self, bytes: Option<usize>) {
        self.quota.set(bytes);
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        if let Some(limit) = self.quota.get() {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(Error::StorageUnavailable(format!(
                    "quota exceeded: {} of {} bytes",
                    needed, limit
                )));
            }
        }

        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .borrow()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
