use crate::services::about;
use crate::web::error::AppResult;
use crate::web::extractors::Staff;
use crate::web::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::sync::Arc;

/// GET /api/about — the band bio; the row is created on first read.
pub async fn get(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let about = about::get_about(&state.db)?;
    Ok(Json(serde_json::json!({"about": about})).into_response())
}

#[derive(Deserialize, Default)]
pub struct UpdateAboutRequest {
    pub description: Option<String>,
    pub image: Option<String>,
}

/// PATCH /api/about — merge update.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Staff(_user): Staff,
    Json(body): Json<UpdateAboutRequest>,
) -> AppResult<Response> {
    let about = about::update_about(&state.db, body.description.as_deref(), body.image.as_deref())?;
    Ok(Json(serde_json::json!({"about": about})).into_response())
}
