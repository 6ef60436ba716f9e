//! Linking tracks into playlists
//!
//! Entries live inside the playlist document, so every operation here is a
//! revision-checked rewrite of that document. Adding a new track inserts the
//! track in the same transaction as the playlist write, so a failed link never
//! leaves an orphaned track behind.

use crate::{playlists, tracks};
use setlist_core::{error::Result, types::*, SetlistError};
use sqlx::SqlitePool;

/// Get a playlist's entries with their tracks, in order
pub async fn get_tracks(pool: &SqlitePool, id: &PlaylistId) -> Result<Vec<PlaylistTrackView>> {
    let playlist = playlists::get_by_id(pool, id)
        .await?
        .ok_or_else(|| SetlistError::not_found("Playlist", id))?;

    let tracks = tracks::get_many(pool, &playlist.entries.track_ids()).await?;
    Ok(resolve_entries(&playlist.entries, &tracks))
}

/// Populate a single playlist
pub async fn resolve(pool: &SqlitePool, playlist: &Playlist) -> Result<PlaylistView> {
    let tracks = tracks::get_many(pool, &playlist.entries.track_ids()).await?;
    Ok(playlist.resolve(&tracks))
}

/// Populate several playlists with one track lookup
pub async fn resolve_all(pool: &SqlitePool, playlists: &[Playlist]) -> Result<Vec<PlaylistView>> {
    let mut ids: Vec<TrackId> = playlists
        .iter()
        .flat_map(|playlist| playlist.entries.track_ids())
        .collect();
    ids.sort();
    ids.dedup();

    let tracks = tracks::get_many(pool, &ids).await?;
    Ok(playlists
        .iter()
        .map(|playlist| playlist.resolve(&tracks))
        .collect())
}

/// Add a track to a playlist, creating the track first if requested
pub async fn add_track(
    pool: &SqlitePool,
    id: &PlaylistId,
    request: AddPlaylistTrack,
    max_retries: u32,
) -> Result<AddedTrack> {
    let source = request.into_source()?;

    let (mut track, created) = match source {
        TrackSource::Existing(track_id) => {
            let track = tracks::get_by_id(pool, &track_id)
                .await?
                .ok_or_else(|| SetlistError::not_found("Track", &track_id))?;
            (track, false)
        }
        TrackSource::New(data) => (Track::create(data)?, true),
    };

    for attempt in 0..=max_retries {
        let mut playlist = playlists::get_by_id(pool, id)
            .await?
            .ok_or_else(|| SetlistError::not_found("Playlist", id))?;

        let entry = playlist.add_track(track.id.clone())?;

        let mut tx = pool.begin().await?;

        // Write first: takes the lock before the track is read or inserted
        if !playlists::save_if_current(&mut *tx, &mut playlist).await? {
            tx.rollback().await?;
            tracing::debug!(playlist_id = %id, attempt, "Stale playlist revision, retrying");
            continue;
        }

        if created {
            tracks::insert(&mut *tx, &track).await?;
        } else {
            // The track may have been deleted since it was looked up
            track = tracks::get_by_id(&mut *tx, &track.id)
                .await?
                .ok_or_else(|| SetlistError::not_found("Track", &track.id))?;
        }

        tx.commit().await?;

        tracing::info!(
            playlist_id = %id,
            track_id = %track.id,
            order = entry.order,
            created,
            "Added track to playlist"
        );

        return Ok(AddedTrack {
            track,
            entry,
            created,
        });
    }

    Err(playlists::stale(id, max_retries))
}

/// Move an entry and/or override its added timestamp
pub async fn update_entry(
    pool: &SqlitePool,
    id: &PlaylistId,
    track_id: &TrackId,
    update: UpdatePlaylistEntry,
    max_retries: u32,
) -> Result<PlaylistEntry> {
    let (_, entry) = playlists::modify(pool, id, max_retries, |playlist| {
        playlist.update_entry(track_id, update.clone())
    })
    .await?;
    Ok(entry)
}

/// Remove a track's entry from a playlist
pub async fn remove_track(
    pool: &SqlitePool,
    id: &PlaylistId,
    track_id: &TrackId,
    max_retries: u32,
) -> Result<()> {
    let (playlist, _) = playlists::modify(pool, id, max_retries, |playlist| {
        playlist.remove_track(track_id)
    })
    .await?;

    tracing::info!(
        playlist_id = %id,
        track_id = %track_id,
        remaining = playlist.entries.len(),
        "Removed track from playlist"
    );

    Ok(())
}
