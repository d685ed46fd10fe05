//! SQLite key-value store
//!
//! Rows of the `settings` table, scoped by namespace.

use crate::error::Result;
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

/// Settings store over a shared SQLite pool
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    namespace: String,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool, namespace: impl Into<String>) -> Self {
        Self {
            pool,
            namespace: namespace.into(),
        }
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE namespace = ? AND key = ?")
                .bind(&self.namespace)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (namespace, key, value, updated_at) VALUES (?, ?, ?, ?)
            ON CONFLICT(namespace, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!("Set setting: {}/{} = {}", self.namespace, key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_pool, initialize_database};
    use sqlx::sqlite::SqlitePoolOptions;
    use tempfile::TempDir;

    async fn create_test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_settings() {
        let store = SqliteStore::new(create_test_pool().await, "group.test");

        store.set("quoteCategory", "wisdom").await.unwrap();
        assert_eq!(
            store.get("quoteCategory").await.unwrap(),
            Some("wisdom".to_string())
        );

        // Update existing
        store.set("quoteCategory", "love").await.unwrap();
        assert_eq!(
            store.get("quoteCategory").await.unwrap(),
            Some("love".to_string())
        );
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let pool = create_test_pool().await;
        let app = SqliteStore::new(pool.clone(), "app");
        let widget = SqliteStore::new(pool, "widget");

        app.set("notificationTime", "08:00").await.unwrap();

        assert_eq!(widget.get("notificationTime").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_persist_across_pools() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("settings.db");

        {
            let pool = create_pool(&db_path).await.unwrap();
            let store = SqliteStore::new(pool.clone(), "group.test");
            store.set("notificationTime", "06:45").await.unwrap();
            pool.close().await;
        }

        let pool = create_pool(&db_path).await.unwrap();
        let store = SqliteStore::new(pool, "group.test");
        assert_eq!(
            store.get("notificationTime").await.unwrap(),
            Some("06:45".to_string())
        );
    }
}
