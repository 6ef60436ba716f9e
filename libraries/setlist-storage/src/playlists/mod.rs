//! Playlist documents
//!
//! Every write goes through [`save_if_current`], a compare-and-swap on the
//! playlist's `revision`. Read-modify-write operations retry from a fresh read
//! when another writer got there first.

use crate::timestamps::{from_millis, to_millis};
use setlist_core::{error::Result, types::*, SetlistError};
use sqlx::{sqlite::SqliteRow, Executor, Row, Sqlite, SqlitePool};

const PLAYLIST_COLUMNS: &str = "p.id AS id, p.name AS name, p.description AS description, \
     p.owner_id AS owner_id, p.entries_json AS entries_json, p.revision AS revision, \
     p.created_at AS created_at, p.updated_at AS updated_at";

/// Get playlists, most recently updated first, optionally filtered by owner
pub async fn get_all(pool: &SqlitePool, owner: Option<&OwnerId>) -> Result<Vec<Playlist>> {
    let rows = match owner {
        Some(owner) => {
            sqlx::query(&format!(
                "SELECT {PLAYLIST_COLUMNS} FROM playlists p WHERE p.owner_id = ? \
                 ORDER BY p.updated_at DESC, p.rowid DESC"
            ))
            .bind(owner.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(&format!(
                "SELECT {PLAYLIST_COLUMNS} FROM playlists p ORDER BY p.updated_at DESC, p.rowid DESC"
            ))
            .fetch_all(pool)
            .await?
        }
    };

    rows.iter().map(from_row).collect()
}

/// Get playlist by ID
pub async fn get_by_id<'e, E>(executor: E, id: &PlaylistId) -> Result<Option<Playlist>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists p WHERE p.id = ?"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Create new playlist
pub async fn create(pool: &SqlitePool, data: CreatePlaylist) -> Result<Playlist> {
    let playlist = Playlist::create(data)?;
    let entries_json = serde_json::to_string(&playlist.entries)?;

    sqlx::query(
        r#"
        INSERT INTO playlists (id, name, description, owner_id, entries_json, revision, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&playlist.id)
    .bind(&playlist.name)
    .bind(&playlist.description)
    .bind(playlist.owner_id.as_ref().map(OwnerId::as_str))
    .bind(entries_json)
    .bind(playlist.revision)
    .bind(to_millis(playlist.created_at))
    .bind(to_millis(playlist.updated_at))
    .execute(pool)
    .await?;

    Ok(playlist)
}

/// Update top-level playlist fields
pub async fn update(
    pool: &SqlitePool,
    id: &PlaylistId,
    update: UpdatePlaylist,
    max_retries: u32,
) -> Result<Playlist> {
    let (playlist, ()) = modify(pool, id, max_retries, |playlist| {
        playlist.apply(update.clone())
    })
    .await?;
    Ok(playlist)
}

/// Delete playlist; its entries are part of the document
pub async fn delete(pool: &SqlitePool, id: &PlaylistId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(SetlistError::not_found("Playlist", id));
    }

    Ok(())
}

/// Read-modify-write a playlist with optimistic concurrency
///
/// `change` may run several times, once per attempt, each time on a fresh copy
/// of the stored document. Errors from `change` abort without writing.
pub(crate) async fn modify<T, F>(
    pool: &SqlitePool,
    id: &PlaylistId,
    max_retries: u32,
    mut change: F,
) -> Result<(Playlist, T)>
where
    F: FnMut(&mut Playlist) -> Result<T>,
{
    for attempt in 0..=max_retries {
        let mut playlist = get_by_id(pool, id)
            .await?
            .ok_or_else(|| SetlistError::not_found("Playlist", id))?;

        let outcome = change(&mut playlist)?;

        if save_if_current(pool, &mut playlist).await? {
            return Ok((playlist, outcome));
        }

        tracing::debug!(playlist_id = %id, attempt, "Stale playlist revision, retrying");
    }

    Err(stale(id, max_retries))
}

/// Write the playlist if its stored revision still matches
///
/// On success the in-memory revision is advanced to the stored one. Returns
/// `false` if the document changed (or vanished) since it was read.
pub(crate) async fn save_if_current<'e, E>(executor: E, playlist: &mut Playlist) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let entries_json = serde_json::to_string(&playlist.entries)?;

    let result = sqlx::query(
        r#"
        UPDATE playlists
        SET name = ?, description = ?, owner_id = ?, entries_json = ?, updated_at = ?,
            revision = revision + 1
        WHERE id = ? AND revision = ?
        "#,
    )
    .bind(&playlist.name)
    .bind(&playlist.description)
    .bind(playlist.owner_id.as_ref().map(OwnerId::as_str))
    .bind(entries_json)
    .bind(to_millis(playlist.updated_at))
    .bind(&playlist.id)
    .bind(playlist.revision)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    playlist.revision += 1;
    Ok(true)
}

/// Playlists with an entry for the given track
pub(crate) async fn referencing_track<'e, E>(executor: E, track_id: &TrackId) -> Result<Vec<Playlist>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(&format!(
        r#"
        SELECT {PLAYLIST_COLUMNS} FROM playlists p
        WHERE EXISTS (
            SELECT 1 FROM json_each(p.entries_json) e
            WHERE json_extract(e.value, '$.trackId') = ?
        )
        "#
    ))
    .bind(track_id)
    .fetch_all(executor)
    .await?;

    rows.iter().map(from_row).collect()
}

pub(crate) fn stale(id: &PlaylistId, max_retries: u32) -> SetlistError {
    SetlistError::ConcurrentModification(format!(
        "Playlist {} was modified concurrently; gave up after {} attempts",
        id,
        max_retries + 1
    ))
}

fn from_row(row: &SqliteRow) -> Result<Playlist> {
    let entries_json: String = row.try_get("entries_json")?;
    let entries: PlaylistEntries = serde_json::from_str(&entries_json)?;
    let owner_id: Option<String> = row.try_get("owner_id")?;

    Ok(Playlist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        owner_id: owner_id.map(OwnerId::new),
        entries,
        created_at: from_millis(row.try_get("created_at")?)?,
        updated_at: from_millis(row.try_get("updated_at")?)?,
        revision: row.try_get("revision")?,
    })
}
