//! Playback session records

use crate::timestamps::{from_millis, to_millis};
use crate::tracks;
use setlist_core::{error::Result, types::*, SetlistError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const PLAYBACK_COLUMNS: &str =
    "id, track_id, position, is_playing, owner_id, started_at, updated_at";

/// Get the most recently updated record
///
/// Ties on `updated_at` go to the record inserted last.
pub async fn get_latest(pool: &SqlitePool) -> Result<Option<PlaybackRecord>> {
    let row = sqlx::query(&format!(
        "SELECT {PLAYBACK_COLUMNS} FROM playback_records ORDER BY updated_at DESC, rowid DESC LIMIT 1"
    ))
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Get record by ID
pub async fn get_by_id(pool: &SqlitePool, id: &PlaybackId) -> Result<Option<PlaybackRecord>> {
    let row = sqlx::query(&format!(
        "SELECT {PLAYBACK_COLUMNS} FROM playback_records WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Start a playback session for an existing track
pub async fn create(pool: &SqlitePool, data: CreatePlayback) -> Result<PlaybackRecord> {
    let track_id = data.validate()?;

    if tracks::get_by_id(pool, &track_id).await?.is_none() {
        return Err(SetlistError::invalid_input(format!(
            "Track {} does not exist",
            track_id
        )));
    }

    let record = PlaybackRecord::start(track_id, &data);

    sqlx::query(
        r#"
        INSERT INTO playback_records (id, track_id, position, is_playing, owner_id, started_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.track_id)
    .bind(record.position)
    .bind(record.is_playing)
    .bind(record.owner_id.as_ref().map(OwnerId::as_str))
    .bind(to_millis(record.started_at))
    .bind(to_millis(record.updated_at))
    .execute(pool)
    .await?;

    Ok(record)
}

/// Update position, playing flag or owner
pub async fn update(
    pool: &SqlitePool,
    id: &PlaybackId,
    update: UpdatePlayback,
) -> Result<PlaybackRecord> {
    let mut record = get_by_id(pool, id)
        .await?
        .ok_or_else(|| SetlistError::not_found("Playback record", id))?;

    record.apply(update)?;

    let result = sqlx::query(
        r#"
        UPDATE playback_records
        SET position = ?, is_playing = ?, owner_id = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(record.position)
    .bind(record.is_playing)
    .bind(record.owner_id.as_ref().map(OwnerId::as_str))
    .bind(to_millis(record.updated_at))
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(SetlistError::not_found("Playback record", id));
    }

    Ok(record)
}

/// Delete record
pub async fn delete(pool: &SqlitePool, id: &PlaybackId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playback_records WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(SetlistError::not_found("Playback record", id));
    }

    Ok(())
}

fn from_row(row: &SqliteRow) -> Result<PlaybackRecord> {
    let owner_id: Option<String> = row.try_get("owner_id")?;

    Ok(PlaybackRecord {
        id: row.try_get("id")?,
        track_id: row.try_get("track_id")?,
        position: row.try_get("position")?,
        is_playing: row.try_get("is_playing")?,
        owner_id: owner_id.map(OwnerId::new),
        started_at: from_millis(row.try_get("started_at")?)?,
        updated_at: from_millis(row.try_get("updated_at")?)?,
    })
}
