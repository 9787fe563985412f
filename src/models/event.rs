use serde::Serialize;

use super::MediaItem;

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    /// ISO date string; events are listed newest-first by this field.
    pub date: String,
    pub link: String,
    pub image: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventWithMedia {
    #[serde(flatten)]
    pub event: Event,
    /// Approved submissions only.
    pub media: Vec<MediaItem>,
}
