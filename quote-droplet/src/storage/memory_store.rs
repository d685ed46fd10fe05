//! In-memory key-value store
//!
//! Used in tests and whenever no durable location is available.

use super::KeyValueStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MemoryStore {
    namespace: String,
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            values: Arc::default(),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
