//! Key-value persistence for courses, settings and backups

mod db;
pub mod keys;
mod memory;

pub use db::Database;
pub use memory::MemoryStore;

use crate::error::Result;

/// Durable string store keyed by well-known names (see [`keys`]).
///
/// Values are JSON documents; the store itself never looks inside them.
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>>;

    fn save(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Keys starting with `prefix`, in ascending order.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}
