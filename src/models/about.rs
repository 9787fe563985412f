use serde::Serialize;

/// Single-row band bio; created with empty fields on first read.
#[derive(Debug, Clone, Serialize)]
pub struct About {
    pub description: String,
    pub image: String,
}
