use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::double_option;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    /// HTML produced by the admin rich-text editor.
    pub description: String,
    pub image_url: Option<String>,
    pub is_archived: bool,
    pub program: Option<String>,
    pub instructor: Option<String>,
    pub dates: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseRequest {
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
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
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
}

impl UpdateCourseRequest {
    pub fn archived(is_archived: bool) -> Self {
        Self {
            is_archived: Some(is_archived),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CourseStatistics {
    pub total: i64,
    pub active: i64,
    pub archived: i64,
}
