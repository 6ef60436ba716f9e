/// Tracks API routes
use crate::{
    api::{path_id, MessageResponse},
    error::Result,
    extract::ApiJson,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use setlist_core::{
    types::{CreateTrack, Track, TrackId, UpdateTrack},
    SetlistError,
};

/// GET /tracks
pub async fn list_tracks(State(app_state): State<AppState>) -> Result<Json<Vec<Track>>> {
    let tracks = app_state.storage.get_all_tracks().await?;
    Ok(Json(tracks))
}

/// GET /tracks/:id
pub async fn get_track(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Track>> {
    let track_id = path_id(&id, "Track", TrackId::parse)?;
    let track = app_state
        .storage
        .get_track(&track_id)
        .await?
        .ok_or_else(|| SetlistError::not_found("Track", &track_id))?;
    Ok(Json(track))
}

/// POST /tracks
pub async fn create_track(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<CreateTrack>,
) -> Result<(StatusCode, Json<Track>)> {
    let track = app_state.storage.create_track(request).await?;
    tracing::info!(track_id = %track.id, title = %track.title, "Created track");
    Ok((StatusCode::CREATED, Json(track)))
}

/// PUT /tracks/:id
pub async fn update_track(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<UpdateTrack>,
) -> Result<Json<Track>> {
    let track_id = path_id(&id, "Track", TrackId::parse)?;
    let track = app_state.storage.update_track(&track_id, request).await?;
    Ok(Json(track))
}

/// DELETE /tracks/:id
///
/// Also removes the track from every playlist that contains it.
pub async fn delete_track(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<MessageResponse>> {
    let track_id = path_id(&id, "Track", TrackId::parse)?;
    app_state.storage.delete_track(&track_id).await?;
    tracing::info!(track_id = %track_id, "Deleted track");
    Ok(Json(MessageResponse::new("Track deleted successfully")))
}
