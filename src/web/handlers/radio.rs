use crate::web::error::AppResult;
use crate::web::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;

/// GET /api/radio — the artist's top tracks for the embedded player.
pub async fn top_tracks(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    match state.catalog.artist_top_tracks().await {
        Ok(tracks) => Ok(Json(serde_json::json!({"tracks": tracks})).into_response()),
        Err(e) => {
            tracing::error!("Radio listing failed: {:#}", e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"tracks": []})),
            )
                .into_response())
        }
    }
}
