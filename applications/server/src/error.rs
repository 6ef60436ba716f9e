/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use setlist_core::SetlistError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Domain error: {0}")]
    Domain(#[from] SetlistError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<setlist_storage::StorageError> for ServerError {
    fn from(err: setlist_storage::StorageError) -> Self {
        // Convert StorageError -> SetlistError -> ServerError
        ServerError::Domain(err.into())
    }
}

impl ServerError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServerError::Domain(err) => match err {
                SetlistError::NotFound { .. } | SetlistError::TrackNotInPlaylist { .. } => {
                    (StatusCode::NOT_FOUND, err.to_string())
                }
                SetlistError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
                // Duplicates are reported as a bad request, not 409
                SetlistError::Duplicate(msg) => (StatusCode::BAD_REQUEST, msg),
                SetlistError::ConcurrentModification(msg) => (StatusCode::CONFLICT, msg),
                SetlistError::Storage(_)
                | SetlistError::Database(_)
                | SetlistError::Serialization(_) => {
                    tracing::error!("Storage error: {:?}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}
