use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::extract::AppQuery;
use super::no_content_or_not_found;
use crate::db::image_store::image_url;
use crate::error::AppError;
use crate::models::ImageInfo;
use crate::state::AppState;

#[derive(Deserialize)]
pub(super) struct UploadQueryParams {
    filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct UploadResponse {
    id: String,
    url: String,
}

pub(super) async fn list_images(
    State(state): State<AppState>,
) -> Result<Json<Vec<ImageInfo>>, AppError> {
    Ok(Json(state.images.list().await?))
}

/// The request body is the raw image; its MIME type comes from `Content-Type`.
pub(super) async fn upload_image(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UploadQueryParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest(format!(
            "expected an image content type, got {:?}",
            content_type
        )));
    }
    if body.is_empty() {
        return Err(AppError::BadRequest("image body is empty".to_string()));
    }

    let filename = params.filename.unwrap_or_else(|| "upload".to_string());
    let id = state.images.store(&filename, &content_type, &body).await?;
    info!("stored image {} ({} bytes)", id, body.len());

    let url = image_url(&id);
    Ok((StatusCode::CREATED, Json(UploadResponse { id, url })))
}

pub(super) async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let image = state
        .images
        .get_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(([(header::CONTENT_TYPE, image.content_type)], image.data).into_response())
}

pub(super) async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.images.delete(&id).await?)
}
