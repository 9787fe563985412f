use crate::services::auth;
use crate::web::error::AppResult;
use crate::web::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> AppResult<Response> {
    let Some(user) = auth::authenticate(&state.db, &body.email, &body.password)? else {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "Invalid credentials"})),
        )
            .into_response());
    };

    let lifetime_days = state.config.auth.session_lifetime_days;
    let token = auth::create_session(&state.db, user.id, lifetime_days)?;

    let cookie = Cookie::build(("session", token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(i64::from(lifetime_days)))
        .build();

    Ok((
        jar.add(cookie),
        Json(serde_json::json!({"success": true, "user": user})),
    )
        .into_response())
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> AppResult<Response> {
    if let Some(cookie) = jar.get("session") {
        auth::delete_session(&state.db, cookie.value())?;
    }

    let jar = jar.remove(Cookie::build(("session", "")).path("/").build());
    Ok((jar, Json(serde_json::json!({"success": true}))).into_response())
}
