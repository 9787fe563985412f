use crate::services::media::{self, MediaError};
use crate::web::error::AppResult;
use crate::web::extractors::Staff;
use crate::web::state::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::sync::Arc;

/// GET /api/media — the moderation queue, newest first.
pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    Staff(_user): Staff,
) -> AppResult<Response> {
    let media = media::list_pending(&state.db)?;
    Ok(Json(serde_json::json!({"media": media})).into_response())
}

/// GET /api/events/:id/media — the public gallery for one event.
pub async fn event_gallery(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> AppResult<Response> {
    let images = media::list_approved(&state.db, event_id)?;
    Ok(Json(serde_json::json!({"images": images})).into_response())
}

/// POST /api/media/upload — multipart submission from the event page.
/// Open to the public; everything lands unapproved.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut event_id: Option<i64> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("file") => {
                let name = field.file_name().unwrap_or("unknown").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?;
                file = Some((name, mime_type, data.to_vec()));
            }
            Some("event_id") => {
                event_id = field.text().await?.trim().parse().ok();
            }
            _ => {}
        }
    }

    let (Some((name, mime_type, data)), Some(event_id)) = (file, event_id) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Missing data"})),
        )
            .into_response());
    };

    match media::submit_media(
        &state.db,
        state.blobs.as_ref(),
        &state.upload_rules,
        event_id,
        &name,
        &mime_type,
        &data,
    )
    .await
    {
        Ok(item) => Ok(Json(serde_json::json!({"url": item.blob_url})).into_response()),
        Err(MediaError::Validation(reason)) => Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": reason})),
        )
            .into_response()),
        Err(e) => {
            tracing::error!("Media upload failed: {:#}", anyhow::Error::from(e));
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Upload failed"})),
            )
                .into_response())
        }
    }
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub action: String,
}

/// POST /api/media/:id — moderator decision. Approving a missing id
/// reports not-found without failing the session; rejecting twice is
/// harmless.
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Staff(_user): Staff,
    Path(id): Path<i64>,
    Json(body): Json<StatusRequest>,
) -> AppResult<Response> {
    match body.action.as_str() {
        "approve" => {
            if media::approve(&state.db, id)? {
                Ok(Json(serde_json::json!({"success": true})).into_response())
            } else {
                Ok((
                    StatusCode::NOT_FOUND,
                    Json(serde_json::json!({"error": "Media not found"})),
                )
                    .into_response())
            }
        }
        "reject" => {
            if !media::reject(&state.db, id)? {
                tracing::warn!("Reject of unknown media id {}", id);
            }
            Ok(Json(serde_json::json!({"success": true})).into_response())
        }
        _ => Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Unknown action"})),
        )
            .into_response()),
    }
}

/// DELETE /api/media/:id — same effect as a rejection.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Staff(_user): Staff,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    media::reject(&state.db, id)?;
    Ok(Json(serde_json::json!({"success": true})).into_response())
}
