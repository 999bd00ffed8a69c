use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use super::extract::{AppJson, AppQuery};
use super::{ArchivedQueryParams, no_content_or_not_found};
use crate::error::AppError;
use crate::models::{Event, EventRegistration, EventStatistics, NewEventRequest, UpdateEventRequest};
use crate::state::AppState;

pub(super) async fn list_events(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ArchivedQueryParams>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = state.events.list_all(params.include_archived).await?;
    Ok(Json(events))
}

pub(super) async fn create_event(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewEventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    req.validate()?;
    let event = state.events.create(req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub(super) async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    let event = state
        .events
        .get_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(event))
}

pub(super) async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateEventRequest>,
) -> Result<Json<Event>, AppError> {
    req.validate()?;
    if !state.events.update(&id, req).await? {
        return Err(AppError::NotFound);
    }
    let event = state
        .events
        .get_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(event))
}

pub(super) async fn archive_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.events.archive(&id).await?)
}

pub(super) async fn unarchive_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.events.unarchive(&id).await?)
}

pub(super) async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.events.delete(&id).await?)
}

pub(super) async fn event_statistics(
    State(state): State<AppState>,
) -> Result<Json<EventStatistics>, AppError> {
    Ok(Json(state.events.statistics().await?))
}

pub(super) async fn list_event_registrations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EventRegistration>>, AppError> {
    let event = state
        .events
        .get_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    let registrations = state.registrations.list_for_event(&event.id).await?;
    Ok(Json(registrations))
}
