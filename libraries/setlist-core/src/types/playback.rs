//! Playback session types

use crate::error::{Result, SetlistError};
use crate::types::{now, OwnerId, PlaybackId, Track, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A playback session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackRecord {
    /// Unique record identifier
    pub id: PlaybackId,

    /// Track being played
    pub track_id: TrackId,

    /// Position in seconds
    pub position: i64,

    /// Whether playback is running
    pub is_playing: bool,

    /// Owner reference
    pub owner_id: Option<OwnerId>,

    /// When the session started
    pub started_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl PlaybackRecord {
    /// Start a new session from a validated request
    pub fn start(track_id: TrackId, data: &CreatePlayback) -> Self {
        let started_at = now();
        Self {
            id: PlaybackId::generate(),
            track_id,
            position: data.position.unwrap_or(0),
            is_playing: data.is_playing.unwrap_or(true),
            owner_id: data.owner_id.clone(),
            started_at,
            updated_at: started_at,
        }
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the update is empty or the position negative.
    pub fn apply(&mut self, update: UpdatePlayback) -> Result<()> {
        update.validate()?;

        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(is_playing) = update.is_playing {
            self.is_playing = is_playing;
        }
        if let Some(owner_id) = update.owner_id {
            self.owner_id = Some(owner_id);
        }
        self.updated_at = now();

        Ok(())
    }

    /// Attach the referenced track, if it still exists
    pub fn resolve(self, track: Option<Track>) -> PlaybackView {
        PlaybackView {
            record: self,
            track,
        }
    }
}

/// Request to start a playback session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayback {
    /// Referenced track
    #[serde(default, alias = "track_id")]
    pub track_id: Option<String>,
    /// Position in seconds
    #[serde(default)]
    pub position: Option<i64>,
    /// Whether playback is running
    #[serde(default)]
    pub is_playing: Option<bool>,
    /// Owner reference
    #[serde(default)]
    pub owner_id: Option<OwnerId>,
}

impl CreatePlayback {
    /// Request for playing `track_id` from the start
    pub fn for_track(track_id: &TrackId) -> Self {
        Self {
            track_id: Some(track_id.to_string()),
            ..Default::default()
        }
    }

    /// Validate the request and return the parsed track reference
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the track id is missing or malformed, or the
    /// position is negative.
    pub fn validate(&self) -> Result<TrackId> {
        let raw = self
            .track_id
            .as_deref()
            .ok_or_else(|| SetlistError::invalid_input("trackId is required"))?;
        let track_id = TrackId::parse(raw)?;
        validate_position(self.position)?;
        Ok(track_id)
    }
}

/// Partial update of a playback session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayback {
    /// Position in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    /// Whether playback is running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_playing: Option<bool>,
    /// Owner reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<OwnerId>,
}

impl UpdatePlayback {
    /// Check the supplied fields
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if no field is supplied or the position is
    /// negative.
    pub fn validate(&self) -> Result<()> {
        if self.position.is_none() && self.is_playing.is_none() && self.owner_id.is_none() {
            return Err(SetlistError::invalid_input(
                "Nothing to update: supply position, isPlaying or ownerId",
            ));
        }
        validate_position(self.position)
    }
}

fn validate_position(position: Option<i64>) -> Result<()> {
    match position {
        Some(p) if p < 0 => Err(SetlistError::invalid_input(
            "Playback position must be a non-negative number of seconds",
        )),
        _ => Ok(()),
    }
}

/// A playback record with its track populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackView {
    /// The stored record
    #[serde(flatten)]
    pub record: PlaybackRecord,
    /// The referenced track, if it still exists
    pub track: Option<Track>,
}
