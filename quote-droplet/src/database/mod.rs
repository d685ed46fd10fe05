//! Database module
//!
//! SQLite-backed settings storage:
//! - The `settings` table schema
//! - A namespaced key-value store over that table

pub mod schema;
pub mod settings_store;

pub use schema::initialize_database;
pub use settings_store::SqliteStore;

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

/// Open the settings database, creating the file and table when missing.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal);

    // Settings traffic is two keys per pass
    let pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await?;

    initialize_database(&pool).await?;

    tracing::info!("Settings database ready at {:?}", db_path);
    Ok(pool)
}
