use crate::{playback, playlist_tracks, playlists, tracks};
use async_trait::async_trait;
use setlist_core::{error::Result, storage::StorageContext, types::*};
use sqlx::SqlitePool;

/// Default number of retries for revision-checked playlist writes
pub const DEFAULT_MAX_WRITE_RETRIES: u32 = 5;

/// Local storage context using `SQLite`
#[derive(Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
    max_write_retries: u32,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            max_write_retries: DEFAULT_MAX_WRITE_RETRIES,
        }
    }

    /// Override how often a stale playlist write is retried
    pub fn with_max_write_retries(mut self, max_write_retries: u32) -> Self {
        self.max_write_retries = max_write_retries;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl StorageContext for LocalStorageContext {
    // Tracks
    async fn get_all_tracks(&self) -> Result<Vec<Track>> {
        tracks::get_all(&self.pool).await
    }

    async fn get_track(&self, id: &TrackId) -> Result<Option<Track>> {
        tracks::get_by_id(&self.pool, id).await
    }

    async fn create_track(&self, track: CreateTrack) -> Result<Track> {
        tracks::create(&self.pool, track).await
    }

    async fn update_track(&self, id: &TrackId, update: UpdateTrack) -> Result<Track> {
        tracks::update(&self.pool, id, update).await
    }

    async fn delete_track(&self, id: &TrackId) -> Result<()> {
        tracks::delete(&self.pool, id).await
    }

    // Playlists
    async fn get_playlists(&self, owner: Option<&OwnerId>) -> Result<Vec<PlaylistView>> {
        let playlists = playlists::get_all(&self.pool, owner).await?;
        playlist_tracks::resolve_all(&self.pool, &playlists).await
    }

    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        playlists::get_by_id(&self.pool, id).await
    }

    async fn get_playlist_view(&self, id: &PlaylistId) -> Result<Option<PlaylistView>> {
        match playlists::get_by_id(&self.pool, id).await? {
            Some(playlist) => playlist_tracks::resolve(&self.pool, &playlist).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist> {
        playlists::create(&self.pool, playlist).await
    }

    async fn update_playlist(&self, id: &PlaylistId, update: UpdatePlaylist) -> Result<Playlist> {
        playlists::update(&self.pool, id, update, self.max_write_retries).await
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> Result<()> {
        playlists::delete(&self.pool, id).await
    }

    // Playlist entries
    async fn get_playlist_tracks(&self, id: &PlaylistId) -> Result<Vec<PlaylistTrackView>> {
        playlist_tracks::get_tracks(&self.pool, id).await
    }

    async fn add_track_to_playlist(
        &self,
        id: &PlaylistId,
        request: AddPlaylistTrack,
    ) -> Result<AddedTrack> {
        playlist_tracks::add_track(&self.pool, id, request, self.max_write_retries).await
    }

    async fn update_playlist_entry(
        &self,
        id: &PlaylistId,
        track_id: &TrackId,
        update: UpdatePlaylistEntry,
    ) -> Result<PlaylistEntry> {
        playlist_tracks::update_entry(&self.pool, id, track_id, update, self.max_write_retries)
            .await
    }

    async fn remove_track_from_playlist(
        &self,
        id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<()> {
        playlist_tracks::remove_track(&self.pool, id, track_id, self.max_write_retries).await
    }

    // Playback
    async fn get_latest_playback(&self) -> Result<Vec<PlaybackView>> {
        let Some(record) = playback::get_latest(&self.pool).await? else {
            return Ok(Vec::new());
        };
        let track = tracks::get_by_id(&self.pool, &record.track_id).await?;
        Ok(vec![record.resolve(track)])
    }

    async fn create_playback(&self, playback: CreatePlayback) -> Result<PlaybackRecord> {
        playback::create(&self.pool, playback).await
    }

    async fn update_playback(
        &self,
        id: &PlaybackId,
        update: UpdatePlayback,
    ) -> Result<PlaybackRecord> {
        playback::update(&self.pool, id, update).await
    }

    async fn delete_playback(&self, id: &PlaybackId) -> Result<()> {
        playback::delete(&self.pool, id).await
    }
}
