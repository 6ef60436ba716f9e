/// API route modules
pub mod health;
pub mod playback;
pub mod playlists;
pub mod tracks;

use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use setlist_core::SetlistError;
use tower_http::{
    cors::CorsLayer,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Confirmation body for operations without a resource to return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parse an id taken from the URL path
///
/// A path segment that isn't a valid id can't name a stored document, so it
/// is reported as not found rather than as a bad request.
pub(crate) fn path_id<T>(
    raw: &str,
    entity: &str,
    parse: fn(&str) -> setlist_core::Result<T>,
) -> Result<T> {
    parse(raw).map_err(|_| ServerError::Domain(SetlistError::not_found(entity, raw)))
}

/// Build the application router
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // Tracks
        .route(
            "/tracks",
            get(tracks::list_tracks).post(tracks::create_track),
        )
        .route(
            "/tracks/:id",
            get(tracks::get_track)
                .put(tracks::update_track)
                .delete(tracks::delete_track),
        )
        // Playlists
        .route(
            "/playlists",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route(
            "/playlists/:id",
            get(playlists::get_playlist)
                .put(playlists::update_playlist)
                .delete(playlists::delete_playlist),
        )
        .route(
            "/playlists/:id/tracks",
            get(playlists::list_playlist_tracks).post(playlists::add_track_to_playlist),
        )
        .route(
            "/playlists/:id/tracks/:track_id",
            axum::routing::put(playlists::update_playlist_entry)
                .delete(playlists::remove_track_from_playlist),
        )
        // Playback
        .route(
            "/playback",
            get(playback::get_playback).post(playback::create_playback),
        )
        .route(
            "/playback/:id",
            axum::routing::put(playback::update_playback).delete(playback::delete_playback),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
