//! Core error types for Setlist

use crate::types::{PlaylistId, TrackId};
use thiserror::Error;

/// Result type alias using `SetlistError`
pub type Result<T> = std::result::Result<T, SetlistError>;

/// Core error type for Setlist
#[derive(Error, Debug)]
pub enum SetlistError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up
        entity: String,
        /// Identifier that didn't resolve
        id: String,
    },

    /// The playlist exists but has no entry for the track
    #[error("Track {track_id} is not in playlist {playlist_id}")]
    TrackNotInPlaylist {
        /// Playlist that was searched
        playlist_id: PlaylistId,
        /// Track without an entry
        track_id: TrackId,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// A revision-checked write kept losing to concurrent writers
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl SetlistError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a duplicate entry error
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    /// Whether this error reports a missing entity or entry
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::TrackNotInPlaylist { .. })
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for SetlistError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
