/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored document couldn't be decoded
    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a corrupt document error
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptDocument(msg.into())
    }
}

impl From<StorageError> for setlist_core::SetlistError {
    fn from(err: StorageError) -> Self {
        setlist_core::SetlistError::storage(err.to_string())
    }
}
