use serde::Serialize;

/// Locally editable overlay for a catalog track (custom video link).
#[derive(Debug, Clone, Serialize)]
pub struct TrackMeta {
    pub catalog_id: String,
    pub video_url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Catalog track merged with its local overlay.
#[derive(Debug, Clone, Serialize)]
pub struct TrackView {
    pub id: String,
    pub name: String,
    pub duration_ms: i64,
    pub track_number: i64,
    pub url: String,
    pub video_url: String,
}
