use crate::services::albums;
use crate::web::error::AppResult;
use crate::web::extractors::Staff;
use crate::web::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::sync::Arc;

/// GET /api/albums — catalog listing merged with local overlays. An
/// unreachable catalog degrades to an empty list with a 500 status.
pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    match albums::list_albums(&state.db, &state.catalog).await {
        Ok(albums) => Ok(Json(serde_json::json!({"albums": albums})).into_response()),
        Err(e) => {
            tracing::error!("Album listing failed: {:#}", e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"albums": []})),
            )
                .into_response())
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateAlbumRequest {
    pub catalog_id: String,
    pub description: Option<String>,
    pub featured: Option<bool>,
    pub sort_order: Option<i64>,
}

/// PATCH /api/albums — upsert the editable overlay for one album.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Staff(_user): Staff,
    Json(body): Json<UpdateAlbumRequest>,
) -> AppResult<Response> {
    albums::update_album(
        &state.db,
        &body.catalog_id,
        body.description.as_deref(),
        body.featured,
        body.sort_order,
    )?;
    Ok(Json(serde_json::json!({"success": true})).into_response())
}
