use crate::services::tracks;
use crate::web::error::AppResult;
use crate::web::extractors::Staff;
use crate::web::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct TracksQuery {
    pub album_id: Option<String>,
}

/// GET /api/tracks?album_id= — track listing for one album.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TracksQuery>,
) -> AppResult<Response> {
    let Some(album_id) = query.album_id else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Missing album_id"})),
        )
            .into_response());
    };

    match tracks::list_album_tracks(&state.db, &state.catalog, &album_id).await {
        Ok(tracks) => Ok(Json(serde_json::json!({"tracks": tracks})).into_response()),
        Err(e) => {
            tracing::error!("Track listing failed: {:#}", e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"tracks": []})),
            )
                .into_response())
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateTrackRequest {
    pub catalog_id: String,
    #[serde(default)]
    pub video_url: String,
}

/// PATCH /api/tracks — set the custom video link for one track.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Staff(_user): Staff,
    Json(body): Json<UpdateTrackRequest>,
) -> AppResult<Response> {
    tracks::update_track(&state.db, &body.catalog_id, &body.video_url)?;
    Ok(Json(serde_json::json!({"success": true})).into_response())
}
