/// Playlists API routes
use crate::{
    api::{path_id, MessageResponse},
    error::Result,
    extract::ApiJson,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use setlist_core::{
    types::{
        AddPlaylistTrack, CreatePlaylist, OwnerId, PlaylistEntry, PlaylistId, PlaylistTrackView,
        PlaylistView, Track, TrackId, UpdatePlaylist, UpdatePlaylistEntry,
    },
    SetlistError,
};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct PlaylistQuery {
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackResponse {
    pub message: String,
    pub track: Track,
    pub entry: PlaylistEntry,
}

fn playlist_id(raw: &str) -> Result<PlaylistId> {
    path_id(raw, "Playlist", PlaylistId::parse)
}

/// GET /playlists?owner=
pub async fn list_playlists(
    State(app_state): State<AppState>,
    Query(query): Query<PlaylistQuery>,
) -> Result<Json<Vec<PlaylistView>>> {
    let owner = query
        .owner
        .filter(|owner| !owner.trim().is_empty())
        .map(OwnerId::new);

    let playlists = app_state.storage.get_playlists(owner.as_ref()).await?;
    Ok(Json(playlists))
}

/// GET /playlists/:id
pub async fn get_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<PlaylistView>> {
    let playlist_id = playlist_id(&id)?;
    let playlist = app_state
        .storage
        .get_playlist_view(&playlist_id)
        .await?
        .ok_or_else(|| SetlistError::not_found("Playlist", &playlist_id))?;
    Ok(Json(playlist))
}

/// POST /playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<CreatePlaylist>,
) -> Result<(StatusCode, Json<PlaylistView>)> {
    app_state.owner_policy.check(request.owner_id.as_ref())?;

    let playlist = app_state.storage.create_playlist(request).await?;
    tracing::info!(playlist_id = %playlist.id, name = %playlist.name, "Created playlist");

    // A new playlist has no entries to resolve
    Ok((StatusCode::CREATED, Json(playlist.resolve(&HashMap::new()))))
}

/// PUT /playlists/:id
pub async fn update_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<UpdatePlaylist>,
) -> Result<Json<PlaylistView>> {
    let playlist_id = playlist_id(&id)?;
    if request.owner_id.is_some() {
        app_state.owner_policy.check(request.owner_id.as_ref())?;
    }

    app_state
        .storage
        .update_playlist(&playlist_id, request)
        .await?;

    let playlist = app_state
        .storage
        .get_playlist_view(&playlist_id)
        .await?
        .ok_or_else(|| SetlistError::not_found("Playlist", &playlist_id))?;
    Ok(Json(playlist))
}

/// DELETE /playlists/:id
pub async fn delete_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<MessageResponse>> {
    let playlist_id = playlist_id(&id)?;
    app_state.storage.delete_playlist(&playlist_id).await?;
    tracing::info!(playlist_id = %playlist_id, "Deleted playlist");
    Ok(Json(MessageResponse::new("Playlist deleted successfully")))
}

/// GET /playlists/:id/tracks
pub async fn list_playlist_tracks(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<PlaylistTrackView>>> {
    let playlist_id = playlist_id(&id)?;
    let tracks = app_state.storage.get_playlist_tracks(&playlist_id).await?;
    Ok(Json(tracks))
}

/// POST /playlists/:id/tracks
///
/// Body is either `{"trackId": ...}` to link an existing track or new track
/// fields (at least `title`) to create and link one.
pub async fn add_track_to_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<AddPlaylistTrack>,
) -> Result<(StatusCode, Json<AddTrackResponse>)> {
    let playlist_id = playlist_id(&id)?;
    let added = app_state
        .storage
        .add_track_to_playlist(&playlist_id, request)
        .await?;

    let message = if added.created {
        "Track created and added to playlist"
    } else {
        "Track added to playlist"
    };

    Ok((
        StatusCode::CREATED,
        Json(AddTrackResponse {
            message: message.to_string(),
            track: added.track,
            entry: added.entry,
        }),
    ))
}

/// PUT /playlists/:id/tracks/:track_id
pub async fn update_playlist_entry(
    Path((id, track_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<UpdatePlaylistEntry>,
) -> Result<Json<PlaylistEntry>> {
    let playlist_id = playlist_id(&id)?;
    let track_id = path_id(&track_id, "Track", TrackId::parse)?;

    let entry = app_state
        .storage
        .update_playlist_entry(&playlist_id, &track_id, request)
        .await?;
    Ok(Json(entry))
}

/// DELETE /playlists/:id/tracks/:track_id
pub async fn remove_track_from_playlist(
    Path((id, track_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
) -> Result<Json<MessageResponse>> {
    let playlist_id = playlist_id(&id)?;
    let track_id = path_id(&track_id, "Track", TrackId::parse)?;

    app_state
        .storage
        .remove_track_from_playlist(&playlist_id, &track_id)
        .await?;
    Ok(Json(MessageResponse::new("Track removed from playlist")))
}
