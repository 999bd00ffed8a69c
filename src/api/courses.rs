use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use super::extract::{AppJson, AppQuery};
use super::{ArchivedQueryParams, no_content_or_not_found};
use crate::error::AppError;
use crate::models::{Course, CourseStatistics, NewCourseRequest, UpdateCourseRequest};
use crate::state::AppState;

pub(super) async fn list_courses(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ArchivedQueryParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.courses.list_all(params.include_archived).await?;
    Ok(Json(courses))
}

pub(super) async fn create_course(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    req.validate()?;
    let course = state.courses.create(req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub(super) async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = state
        .courses
        .get_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course))
}

pub(super) async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    req.validate()?;
    if !state.courses.update(&id, req).await? {
        return Err(AppError::NotFound);
    }
    let course = state
        .courses
        .get_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course))
}

pub(super) async fn archive_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.courses.archive(&id).await?)
}

pub(super) async fn unarchive_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.courses.unarchive(&id).await?)
}

pub(super) async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.courses.delete(&id).await?)
}

pub(super) async fn course_statistics(
    State(state): State<AppState>,
) -> Result<Json<CourseStatistics>, AppError> {
    Ok(Json(state.courses.statistics().await?))
}
