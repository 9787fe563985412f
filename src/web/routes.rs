use super::handlers;
use super::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use std::sync::Arc;

pub fn api_routes(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/media", get(handlers::media::list_pending))
        .route(
            "/api/media/upload",
            post(handlers::media::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/media/:id", post(handlers::media::update_status))
        .route("/api/media/:id", delete(handlers::media::delete))
        .route("/api/events", get(handlers::events::list))
        .route("/api/events", post(handlers::events::create))
        .route("/api/events/:id", patch(handlers::events::update))
        .route("/api/events/:id", delete(handlers::events::delete))
        .route("/api/events/:id/media", get(handlers::media::event_gallery))
        .route("/api/albums", get(handlers::albums::list))
        .route("/api/albums", patch(handlers::albums::update))
        .route("/api/tracks", get(handlers::tracks::list))
        .route("/api/tracks", patch(handlers::tracks::update))
        .route("/api/radio", get(handlers::radio::top_tracks))
        .route("/api/about", get(handlers::about::get))
        .route("/api/about", patch(handlers::about::update))
        .route("/api/users", get(handlers::users::list))
        .route("/api/users", post(handlers::users::create))
        .route("/api/users/:id", patch(handlers::users::update))
        .route("/api/users/:id", delete(handlers::users::delete))
}
