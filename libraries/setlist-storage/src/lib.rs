//! Setlist Storage
//!
//! `SQLite` document store for tracks, playlists and playback records.
//!
//! # Architecture
//!
//! - **Documents**: each resource is one row; playlist entries are embedded in
//!   their playlist as JSON
//! - **Vertical Slicing**: each resource owns its own queries
//! - **Optimistic Concurrency**: playlist writes are compare-and-swap on a
//!   `revision` column, retried from a fresh read when stale
//! - **Referential cleanup**: deleting a track removes it from playlists in
//!   the same transaction
//!
//! # Example
//!
//! ```rust,no_run
//! use setlist_storage::{LocalStorageContext, create_pool, run_migrations};
//! use setlist_core::storage::StorageContext;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://setlist.db", 5).await?;
//! run_migrations(&pool).await?;
//!
//! let storage = LocalStorageContext::new(pool);
//! let tracks = storage.get_all_tracks().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod timestamps;

// Vertical slices
pub mod playback;
pub mod playlist_tracks;
pub mod playlists;
pub mod tracks;

pub use context::{LocalStorageContext, DEFAULT_MAX_WRITE_RETRIES};
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://setlist.db>`)
/// * `max_connections` - upper bound on pooled connections
///
/// # Errors
///
/// Returns an error if the URL is invalid or the connection fails
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    // create_if_missing makes the file, not the directories above it
    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tracing::debug!("Creating database directory: {}", parent.display());
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::Connection(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    tracing::debug!("Pool created");

    Ok(pool)
}
