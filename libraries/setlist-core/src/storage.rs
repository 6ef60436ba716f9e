//! Storage trait for the track, playlist and playback stores

use crate::error::Result;
use crate::types::{
    AddPlaylistTrack, AddedTrack, CreatePlayback, CreatePlaylist, CreateTrack, OwnerId,
    PlaybackId, PlaybackRecord, PlaybackView, Playlist, PlaylistEntry, PlaylistId,
    PlaylistTrackView, PlaylistView, Track, TrackId, UpdatePlayback, UpdatePlaylist,
    UpdatePlaylistEntry, UpdateTrack,
};
use async_trait::async_trait;

/// Storage context providing access to the document stores
///
/// Lookups by id return `Ok(None)` for absent documents; mutations of an
/// absent document fail with `SetlistError::NotFound`.
#[async_trait]
pub trait StorageContext: Send + Sync {
    // ========================================================================
    // Tracks
    // ========================================================================

    /// Get all tracks, oldest first
    async fn get_all_tracks(&self) -> Result<Vec<Track>>;

    /// Get track by ID
    async fn get_track(&self, id: &TrackId) -> Result<Option<Track>>;

    /// Create a new track
    async fn create_track(&self, track: CreateTrack) -> Result<Track>;

    /// Partially update a track
    async fn update_track(&self, id: &TrackId, update: UpdateTrack) -> Result<Track>;

    /// Delete a track and remove it from every playlist that references it
    async fn delete_track(&self, id: &TrackId) -> Result<()>;

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Get playlists, optionally only those of one owner
    async fn get_playlists(&self, owner: Option<&OwnerId>) -> Result<Vec<PlaylistView>>;

    /// Get the stored playlist document
    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>>;

    /// Get a playlist with its tracks populated
    async fn get_playlist_view(&self, id: &PlaylistId) -> Result<Option<PlaylistView>>;

    /// Create an empty playlist
    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist>;

    /// Update a playlist's top-level fields
    async fn update_playlist(&self, id: &PlaylistId, update: UpdatePlaylist) -> Result<Playlist>;

    /// Delete a playlist together with its entries
    async fn delete_playlist(&self, id: &PlaylistId) -> Result<()>;

    // ========================================================================
    // Playlist entries
    // ========================================================================

    /// Get a playlist's entries with tracks populated
    async fn get_playlist_tracks(&self, id: &PlaylistId) -> Result<Vec<PlaylistTrackView>>;

    /// Link an existing track, or create and link a new one
    async fn add_track_to_playlist(
        &self,
        id: &PlaylistId,
        request: AddPlaylistTrack,
    ) -> Result<AddedTrack>;

    /// Move an entry and/or override its added timestamp
    async fn update_playlist_entry(
        &self,
        id: &PlaylistId,
        track_id: &TrackId,
        update: UpdatePlaylistEntry,
    ) -> Result<PlaylistEntry>;

    /// Remove a track's entry; the remaining entries are renumbered
    async fn remove_track_from_playlist(&self, id: &PlaylistId, track_id: &TrackId)
        -> Result<()>;

    // ========================================================================
    // Playback
    // ========================================================================

    /// The most recently updated record, as a collection of zero or one
    async fn get_latest_playback(&self) -> Result<Vec<PlaybackView>>;

    /// Start a playback session
    async fn create_playback(&self, playback: CreatePlayback) -> Result<PlaybackRecord>;

    /// Update a playback session
    async fn update_playback(&self, id: &PlaybackId, update: UpdatePlayback)
        -> Result<PlaybackRecord>;

    /// Delete a playback session
    async fn delete_playback(&self, id: &PlaybackId) -> Result<()>;
}
