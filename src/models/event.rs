use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::double_option;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub is_archived: bool,
    pub program: Option<String>,
    pub instructor: Option<String>,
    pub dates: Option<String>,
    pub event_date: NaiveDate,
    pub location: String,
    /// Counted from `event_registrations` on every read.
    pub registration_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEventRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    pub program: Option<String>,
    pub instructor: Option<String>,
    pub dates: Option<String>,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    pub is_archived: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub program: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub instructor: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub dates: Option<Option<String>>,
    pub event_date: Option<NaiveDate>,
    pub location: Option<String>,
}

impl UpdateEventRequest {
    pub fn archived(is_archived: bool) -> Self {
        Self {
            is_archived: Some(is_archived),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventStatistics {
    pub total: i64,
    pub active: i64,
    pub archived: i64,
    pub upcoming: i64,
}
