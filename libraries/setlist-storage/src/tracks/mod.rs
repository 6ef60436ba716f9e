use crate::playlists;
use crate::timestamps::{from_millis, to_millis};
use setlist_core::{error::Result, types::*, SetlistError};
use sqlx::{sqlite::SqliteRow, Executor, Row, Sqlite, SqlitePool};
use std::collections::HashMap;

const TRACK_COLUMNS: &str =
    "id, title, artist, album, duration, metadata_json, created_at, updated_at";

/// Get all tracks, oldest first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Track>> {
    let rows = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks ORDER BY created_at, rowid"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}

/// Get track by ID
pub async fn get_by_id<'e, E>(executor: E, id: &TrackId) -> Result<Option<Track>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(&format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(from_row).transpose()
}

/// Load the tracks with the given IDs, keyed by ID
///
/// IDs that don't resolve are simply absent from the map.
pub async fn get_many(pool: &SqlitePool, ids: &[TrackId]) -> Result<HashMap<TrackId, Track>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE id IN ({placeholders})");
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }

    let rows = query.fetch_all(pool).await?;
    rows.iter()
        .map(|row| from_row(row).map(|track| (track.id.clone(), track)))
        .collect()
}

/// Create new track
pub async fn create(pool: &SqlitePool, data: CreateTrack) -> Result<Track> {
    let track = Track::create(data)?;
    insert(pool, &track).await?;
    Ok(track)
}

/// Insert an already-built track document
pub(crate) async fn insert<'e, E>(executor: E, track: &Track) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let metadata_json = encode_metadata(track.metadata.as_ref())?;

    sqlx::query(
        r#"
        INSERT INTO tracks (id, title, artist, album, duration, metadata_json, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&track.id)
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.album)
    .bind(track.duration)
    .bind(metadata_json)
    .bind(to_millis(track.created_at))
    .bind(to_millis(track.updated_at))
    .execute(executor)
    .await?;

    Ok(())
}

/// Partially update a track (last write wins)
pub async fn update(pool: &SqlitePool, id: &TrackId, update: UpdateTrack) -> Result<Track> {
    let mut track = get_by_id(pool, id)
        .await?
        .ok_or_else(|| SetlistError::not_found("Track", id))?;

    track.apply(update)?;
    let metadata_json = encode_metadata(track.metadata.as_ref())?;

    let result = sqlx::query(
        r#"
        UPDATE tracks
        SET title = ?, artist = ?, album = ?, duration = ?, metadata_json = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.album)
    .bind(track.duration)
    .bind(metadata_json)
    .bind(to_millis(track.updated_at))
    .bind(id)
    .execute(pool)
    .await?;

    // Deleted between the read and the write
    if result.rows_affected() == 0 {
        return Err(SetlistError::not_found("Track", id));
    }

    Ok(track)
}

/// Delete track and remove it from every playlist that references it
///
/// Both happen in one transaction. The delete runs first so the write lock
/// is held while referencing playlists are rewritten.
pub async fn delete(pool: &SqlitePool, id: &TrackId) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(SetlistError::not_found("Track", id));
    }

    let referencing = playlists::referencing_track(&mut *tx, id).await?;
    let cleaned = referencing.len();

    for mut playlist in referencing {
        playlist.remove_track(id)?;
        if !playlists::save_if_current(&mut *tx, &mut playlist).await? {
            return Err(SetlistError::ConcurrentModification(format!(
                "Playlist {} changed while removing track {}",
                playlist.id, id
            )));
        }
    }

    tx.commit().await?;

    if cleaned > 0 {
        tracing::info!(track_id = %id, playlists = cleaned, "Removed deleted track from playlists");
    }

    Ok(())
}

fn encode_metadata(metadata: Option<&TrackMetadata>) -> Result<Option<String>> {
    metadata
        .map(serde_json::to_string)
        .transpose()
        .map_err(Into::into)
}

fn from_row(row: &SqliteRow) -> Result<Track> {
    let metadata_json: Option<String> = row.try_get("metadata_json")?;
    let metadata = metadata_json
        .as_deref()
        .map(serde_json::from_str::<TrackMetadata>)
        .transpose()?;

    Ok(Track {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        album: row.try_get("album")?,
        duration: row.try_get("duration")?,
        metadata,
        created_at: from_millis(row.try_get("created_at")?)?,
        updated_at: from_millis(row.try_get("updated_at")?)?,
    })
}
