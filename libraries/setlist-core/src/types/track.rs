//! Track domain types

use crate::error::{Result, SetlistError};
use crate::types::{now, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form key/value metadata attached to a track
pub type TrackMetadata = Map<String, Value>;

/// Track record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Performing artist
    pub artist: Option<String>,

    /// Album the track appears on
    pub album: Option<String>,

    /// Duration in seconds
    pub duration: Option<i64>,

    /// Free-form metadata
    pub metadata: Option<TrackMetadata>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Track {
    /// Build a new track from validated creation data
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `data` fails validation.
    pub fn create(data: CreateTrack) -> Result<Self> {
        data.validate()?;
        let created_at = now();
        Ok(Self {
            id: TrackId::generate(),
            title: data.title.trim().to_string(),
            artist: data.artist,
            album: data.album,
            duration: data.duration,
            metadata: data.metadata,
            created_at,
            updated_at: created_at,
        })
    }

    /// Apply a partial update in place
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if any supplied field is invalid; the track is
    /// left untouched in that case.
    pub fn apply(&mut self, update: UpdateTrack) -> Result<()> {
        update.validate()?;

        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(artist) = update.artist {
            self.artist = Some(artist);
        }
        if let Some(album) = update.album {
            self.album = Some(album);
        }
        if let Some(duration) = update.duration {
            self.duration = Some(duration);
        }
        if let Some(metadata) = update.metadata {
            self.metadata = Some(metadata);
        }
        self.updated_at = now();

        Ok(())
    }
}

/// Data for creating a new track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrack {
    /// Track title
    #[serde(default)]
    pub title: String,
    /// Performing artist
    #[serde(default)]
    pub artist: Option<String>,
    /// Album the track appears on
    #[serde(default)]
    pub album: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<i64>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: Option<TrackMetadata>,
}

impl CreateTrack {
    /// Convenience constructor for a track with only a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Check the creation data
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the title is blank or the duration negative.
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_duration(self.duration)
    }
}

/// Partial update for a track; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrack {
    /// Track title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Performing artist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Album the track appears on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Free-form metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TrackMetadata>,
}

impl UpdateTrack {
    /// Check the supplied fields
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a supplied title is blank or a supplied
    /// duration negative.
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_duration(self.duration)
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(SetlistError::invalid_input("Track title is required"));
    }
    Ok(())
}

fn validate_duration(duration: Option<i64>) -> Result<()> {
    match duration {
        Some(seconds) if seconds < 0 => Err(SetlistError::invalid_input(
            "Track duration must be a non-negative number of seconds",
        )),
        _ => Ok(()),
    }
}
