/// Playback API routes
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
use setlist_core::types::{
    CreatePlayback, PlaybackId, PlaybackRecord, PlaybackView, UpdatePlayback,
};

/// GET /playback
///
/// The most recently updated record as a list of zero or one.
pub async fn get_playback(State(app_state): State<AppState>) -> Result<Json<Vec<PlaybackView>>> {
    let latest = app_state.storage.get_latest_playback().await?;
    Ok(Json(latest))
}

/// POST /playback
pub async fn create_playback(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<CreatePlayback>,
) -> Result<(StatusCode, Json<PlaybackRecord>)> {
    app_state.owner_policy.check(request.owner_id.as_ref())?;

    let record = app_state.storage.create_playback(request).await?;
    tracing::debug!(playback_id = %record.id, track_id = %record.track_id, "Started playback");
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /playback/:id
pub async fn update_playback(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<UpdatePlayback>,
) -> Result<Json<PlaybackRecord>> {
    let playback_id = path_id(&id, "Playback record", PlaybackId::parse)?;
    if request.owner_id.is_some() {
        app_state.owner_policy.check(request.owner_id.as_ref())?;
    }

    let record = app_state
        .storage
        .update_playback(&playback_id, request)
        .await?;
    Ok(Json(record))
}

/// DELETE /playback/:id
pub async fn delete_playback(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<MessageResponse>> {
    let playback_id = path_id(&id, "Playback record", PlaybackId::parse)?;
    app_state.storage.delete_playback(&playback_id).await?;
    Ok(Json(MessageResponse::new("Playback record deleted successfully")))
}
