use crate::models::UserRole;
use crate::services::users::{self, NewUser, UpdateUser};
use crate::web::error::AppResult;
use crate::web::extractors::{require_admin, Staff};
use crate::web::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::sync::Arc;

/// GET /api/users — admin only. Password hashes never serialize.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Staff(user): Staff,
) -> AppResult<Response> {
    if let Err(status) = require_admin(&user) {
        return Ok(status.into_response());
    }

    let users = users::list_users(&state.db)?;
    Ok(Json(serde_json::json!({"users": users})).into_response())
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
    pub role: Option<UserRole>,
    #[serde(default)]
    pub is_band_member: bool,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: String,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Staff(user): Staff,
    Json(body): Json<CreateUserRequest>,
) -> AppResult<Response> {
    if let Err(status) = require_admin(&user) {
        return Ok(status.into_response());
    }

    if body.email.is_empty() || body.password.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Missing required fields"})),
        )
            .into_response());
    }

    match users::create_user(
        &state.db,
        NewUser {
            email: body.email,
            name: body.name,
            password: body.password,
            role: body.role,
            is_band_member: body.is_band_member,
            display_name: body.display_name,
            bio: body.bio,
            image: body.image,
        },
    ) {
        Ok(created) => Ok(Json(serde_json::json!({"user": created})).into_response()),
        Err(e) => Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response()),
    }
}

#[derive(Deserialize, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub password: Option<String>,
    pub is_band_member: Option<bool>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Staff(user): Staff,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> AppResult<Response> {
    if let Err(status) = require_admin(&user) {
        return Ok(status.into_response());
    }

    let found = users::update_user(
        &state.db,
        id,
        UpdateUser {
            name: body.name,
            role: body.role,
            password: body.password,
            is_band_member: body.is_band_member,
            display_name: body.display_name,
            bio: body.bio,
            image: body.image,
        },
    )?;

    if !found {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "User not found"})),
        )
            .into_response());
    }

    Ok(Json(serde_json::json!({"success": true})).into_response())
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Staff(user): Staff,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    if let Err(status) = require_admin(&user) {
        return Ok(status.into_response());
    }

    users::delete_user(&state.db, id)?;
    Ok(Json(serde_json::json!({"success": true})).into_response())
}
