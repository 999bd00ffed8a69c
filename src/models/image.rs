use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// Image metadata without the blob.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}
