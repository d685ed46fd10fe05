//! JSON file key-value store
//!
//! Each namespace is one JSON object on disk, e.g.
//! `<data_dir>/group.selectedSettings.json`. Writes go to a temp file
//! first and are renamed into place.

use super::KeyValueStore;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// File-backed store for one namespace
#[derive(Clone)]
pub struct JsonFileStore {
    namespace: String,
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(dir: &Path, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let path = dir.join(format!("{}.json", namespace));

        Self {
            namespace,
            path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        serde_json::from_str(&content).map_err(|e| {
            AppError::Settings(format!("Failed to parse {:?}: {}", self.path, e))
        })
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(values)?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;

        fs::rename(temp_path, &self.path).await?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.read_all().await?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        // A corrupt file is replaced rather than blocking every future save
        let mut values = match self.read_all().await {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("Discarding unreadable settings file: {}", e);
                BTreeMap::new()
            }
        };
        values.insert(key.to_string(), value.to_string());

        self.write_all(&values).await?;
        tracing::debug!("Set {}/{} = {}", self.namespace, key, value);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (JsonFileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path(), "group.test");
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let (store, _temp) = create_test_store();

        assert_eq!(store.get("anything").await.unwrap(), None);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_set_preserves_other_keys() {
        let (store, _temp) = create_test_store();

        store.set("notificationTime", "08:30").await.unwrap();
        store.set("quoteCategory", "wisdom").await.unwrap();
        store.set("notificationTime", "09:00").await.unwrap();

        assert_eq!(
            store.get("notificationTime").await.unwrap(),
            Some("09:00".to_string())
        );
        assert_eq!(
            store.get("quoteCategory").await.unwrap(),
            Some("wisdom".to_string())
        );
    }

    #[tokio::test]
    async fn test_values_persist_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = JsonFileStore::new(temp_dir.path(), "group.test");
            store.set("quoteCategory", "love").await.unwrap();
        }

        let store = JsonFileStore::new(temp_dir.path(), "group.test");
        assert_eq!(
            store.get("quoteCategory").await.unwrap(),
            Some("love".to_string())
        );
    }

    #[tokio::test]
    async fn test_namespaces_are_separate_files() {
        let temp_dir = TempDir::new().unwrap();
        let first = JsonFileStore::new(temp_dir.path(), "first");
        let second = JsonFileStore::new(temp_dir.path(), "second");

        first.set("key", "one").await.unwrap();

        assert_eq!(second.get("key").await.unwrap(), None);
        assert_eq!(first.namespace(), "first");
    }

    #[tokio::test]
    async fn test_corrupt_file_reports_error_and_is_replaced_on_write() {
        let (store, _temp) = create_test_store();
        std::fs::write(store.path(), "not json").unwrap();

        assert!(store.get("key").await.is_err());

        store.set("key", "value").await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some("value".to_string()));
    }
}
