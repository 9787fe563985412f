use crate::services::events::{self, NewEvent, UpdateEvent};
use crate::web::error::AppResult;
use crate::web::extractors::Staff;
use crate::web::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::sync::Arc;

/// GET /api/events — newest date first, approved galleries attached.
pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let events = events::list_events(&state.db)?;
    Ok(Json(serde_json::json!({"events": events})).into_response())
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub image: String,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Staff(_user): Staff,
    Json(body): Json<CreateEventRequest>,
) -> AppResult<Response> {
    if body.title.is_empty() || body.date.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Missing required fields"})),
        )
            .into_response());
    }

    let event = events::create_event(
        &state.db,
        NewEvent {
            title: body.title,
            description: body.description,
            location: body.location,
            date: body.date,
            link: body.link,
            image: body.image,
        },
    )?;

    Ok(Json(serde_json::json!({"event": event})).into_response())
}

#[derive(Deserialize, Default)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Staff(_user): Staff,
    Path(id): Path<i64>,
    Json(body): Json<UpdateEventRequest>,
) -> AppResult<Response> {
    let found = events::update_event(
        &state.db,
        id,
        UpdateEvent {
            title: body.title,
            description: body.description,
            location: body.location,
            date: body.date,
            link: body.link,
            image: body.image,
        },
    )?;

    if !found {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Event not found"})),
        )
            .into_response());
    }

    Ok(Json(serde_json::json!({"success": true})).into_response())
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Staff(_user): Staff,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    events::delete_event(&state.db, id)?;
    Ok(Json(serde_json::json!({"success": true})).into_response())
}
