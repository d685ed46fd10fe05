//! Storage module
//!
//! Durable key-value stores holding the user's notification settings.
//! Every store is scoped to one namespace so the companion
//! notification surface can read the same values.

pub mod json_store;
pub mod memory_store;

pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;

use crate::error::Result;
use async_trait::async_trait;

/// Namespaced string key-value store. Last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Namespace this store is scoped to
    fn namespace(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
