use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::ids;
use crate::models::{Image, ImageInfo};

/// Path prefix under which stored images are served. An `image_url` starting
/// with it refers to a blob in this store; anything else is external.
pub const IMAGE_URL_PREFIX: &str = "/api/images/";

pub fn image_url(id: &str) -> String {
    format!("{IMAGE_URL_PREFIX}{id}")
}

/// Extracts the image id from an internal image reference.
pub fn internal_image_id(url: &str) -> Option<String> {
    let rest = url.strip_prefix(IMAGE_URL_PREFIX)?;
    let raw = rest.split(['?', '#', '/']).next().unwrap_or_default();
    ids::normalize(raw)
}

/// Blob storage for uploaded images. Knows nothing about which course or
/// event refers to an image.
#[derive(Clone)]
pub struct ImageStore {
    db: SqlitePool,
}

impl ImageStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn store(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<String, sqlx::Error> {
        let id = ids::new_id();

        sqlx::query(
            "INSERT INTO images (id, filename, content_type, data, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(filename)
        .bind(content_type)
        .bind(data)
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        Ok(id)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Image>, sqlx::Error> {
        let Some(id) = ids::normalize(id) else {
            return Ok(None);
        };

        sqlx::query_as::<_, Image>(
            "SELECT id, filename, content_type, data, created_at FROM images WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn list(&self) -> Result<Vec<ImageInfo>, sqlx::Error> {
        sqlx::query_as::<_, ImageInfo>(
            "SELECT id, filename, content_type, length(data) AS size, created_at FROM images ORDER BY created_at DESC",
        )
        .fetch_all(&self.db)
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let Some(id) = ids::normalize(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM images WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();

        Ok(result > 0)
    }
}
