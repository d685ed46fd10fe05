//! Settings table schema
//!
//! The schema version is kept in SQLite's `user_version` pragma, so an
//! existing settings database is left alone once it is current.

use crate::error::Result;
use sqlx::sqlite::SqlitePool;

/// Version written to `user_version` after the table is created
pub const SCHEMA_VERSION: i32 = 1;

const SETTINGS_SCHEMA: &str = include_str!("settings.sql");

/// Create the `settings` table unless the database is already current
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    let version: i32 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;

    if version >= SCHEMA_VERSION {
        tracing::debug!("Settings schema is at version {}", version);
        return Ok(());
    }

    tracing::info!(
        "Upgrading settings schema from version {} to {}",
        version,
        SCHEMA_VERSION
    );

    let mut tx = pool.begin().await?;

    for statement in SETTINGS_SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    let set_version = format!("PRAGMA user_version = {}", SCHEMA_VERSION);
    sqlx::query(&set_version).execute(&mut *tx).await?;

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_creates_settings_table() {
        let pool = memory_pool().await;

        initialize_database(&pool).await.unwrap();

        let version: i32 = sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);

        let settings: i32 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(settings, 0);
    }

    #[tokio::test]
    async fn test_initialize_keeps_existing_rows() {
        let pool = memory_pool().await;
        initialize_database(&pool).await.unwrap();

        sqlx::query(
            "INSERT INTO settings (namespace, key, value, updated_at) VALUES ('ns', 'k', 'v', 'now')",
        )
        .execute(&pool)
        .await
        .unwrap();

        initialize_database(&pool).await.unwrap();

        let value: String = sqlx::query_scalar("SELECT value FROM settings WHERE key = 'k'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(value, "v");
    }
}
