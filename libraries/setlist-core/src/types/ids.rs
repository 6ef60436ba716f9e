//! ID types for Setlist documents

use crate::error::{Result, SetlistError};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Declares a UUID-backed document identifier.
///
/// Identifiers are stored and serialized as their canonical string form.
/// `new` wraps any string (used when loading rows), `parse` accepts only
/// well-formed UUIDs (used for caller-supplied references).
macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier without validation
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Parse a caller-supplied identifier
            ///
            /// # Errors
            ///
            /// Returns `InvalidInput` if `raw` is not a UUID.
            pub fn parse(raw: &str) -> Result<Self> {
                let trimmed = raw.trim();
                Uuid::parse_str(trimmed)
                    .map(|uuid| Self(uuid.to_string()))
                    .map_err(|_| {
                        SetlistError::invalid_input(format!(
                            "'{}' is not a valid {} id",
                            raw, $entity
                        ))
                    })
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <String as sqlx::Type<sqlx::Sqlite>>::type_info()
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                args: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> std::result::Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as sqlx::Encode<sqlx::Sqlite>>::encode_by_ref(&self.0, args)
            }
        }

        #[cfg(feature = "sqlx-support")]
        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $name {
            fn decode(
                value: sqlx::sqlite::SqliteValueRef<'r>,
            ) -> std::result::Result<Self, sqlx::error::BoxDynError> {
                let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
                Ok(Self(s))
            }
        }
    };
}

document_id!(
    /// Track identifier
    TrackId,
    "track"
);

document_id!(
    /// Playlist identifier
    PlaylistId,
    "playlist"
);

document_id!(
    /// Playback record identifier
    PlaybackId,
    "playback"
);

/// Owner reference for playlists and playback records
///
/// Owners live outside this system, so the reference is an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create an owner reference
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the reference is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_parse_back() {
        let id = TrackId::generate();
        assert_eq!(TrackId::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        let err = PlaylistId::parse("not-an-id").unwrap_err();
        assert!(matches!(err, SetlistError::InvalidInput(_)));
        assert!(err.to_string().contains("playlist"));
    }

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let parsed = TrackId::parse(" 67E55044-10B1-426F-9247-BB680E5FE0C8 ").unwrap();
        assert_eq!(parsed.as_str(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn blank_owner_detection() {
        assert!(OwnerId::new("  ").is_blank());
        assert!(!OwnerId::new("user-1").is_blank());
    }
}
