/// Liveness and storage readiness
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` when storage answers, `degraded` otherwise
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub require_owner: bool,
}

/// GET /health - Report whether the document store is reachable
///
/// Answers 503 with the same body shape when storage fails.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, storage) = match state.storage.get_latest_playback().await {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!("Health check failed to reach storage: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let body = HealthResponse {
        status: if status == StatusCode::OK { "ok" } else { "degraded" },
        service: "setlist",
        version: env!("CARGO_PKG_VERSION"),
        storage,
        require_owner: state.owner_policy.require_owner,
    };

    (status, Json(body))
}
