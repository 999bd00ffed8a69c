//! Public form submissions and their admin status changes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::info;
use validator::Validate;

use super::extract::{AppJson, AppQuery};
use super::{StatusQueryParams, no_content_or_not_found};
use crate::error::AppError;
use crate::models::{
    BookingStatus, DemoBooking, EventRegistration, Inquiry, InquiryStatus, NewDemoBookingRequest,
    NewInquiryRequest, NewRegistrationRequest, RegistrationStatus, StatusCounts,
    StatusUpdateRequest,
};
use crate::state::AppState;

// -----------------------------------------------------------------------------
// Inquiries
// -----------------------------------------------------------------------------

pub(super) async fn create_inquiry(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewInquiryRequest>,
) -> Result<(StatusCode, Json<Inquiry>), AppError> {
    req.validate()?;
    let inquiry = state.inquiries.create(req).await?;
    info!("new inquiry {}", inquiry.id);
    Ok((StatusCode::CREATED, Json(inquiry)))
}

pub(super) async fn list_inquiries(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<StatusQueryParams<InquiryStatus>>,
) -> Result<Json<Vec<Inquiry>>, AppError> {
    Ok(Json(state.inquiries.list_all(params.status).await?))
}

pub(super) async fn get_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Inquiry>, AppError> {
    let inquiry = state
        .inquiries
        .get_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(inquiry))
}

pub(super) async fn update_inquiry_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<StatusUpdateRequest<InquiryStatus>>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.inquiries.update_status(&id, req.status).await?)
}

pub(super) async fn delete_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.inquiries.delete(&id).await?)
}

pub(super) async fn inquiry_counts(
    State(state): State<AppState>,
) -> Result<Json<StatusCounts<InquiryStatus>>, AppError> {
    Ok(Json(state.inquiries.count_by_status().await?))
}

// -----------------------------------------------------------------------------
// Demo bookings
// -----------------------------------------------------------------------------

pub(super) async fn create_demo_booking(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewDemoBookingRequest>,
) -> Result<(StatusCode, Json<DemoBooking>), AppError> {
    req.validate()?;
    let booking = state.demo_bookings.create(req).await?;
    info!("new demo booking {}", booking.id);
    Ok((StatusCode::CREATED, Json(booking)))
}

pub(super) async fn list_demo_bookings(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<StatusQueryParams<BookingStatus>>,
) -> Result<Json<Vec<DemoBooking>>, AppError> {
    Ok(Json(state.demo_bookings.list_all(params.status).await?))
}

pub(super) async fn get_demo_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DemoBooking>, AppError> {
    let booking = state
        .demo_bookings
        .get_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(booking))
}

pub(super) async fn update_demo_booking_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<StatusUpdateRequest<BookingStatus>>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.demo_bookings.update_status(&id, req.status).await?)
}

pub(super) async fn delete_demo_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.demo_bookings.delete(&id).await?)
}

pub(super) async fn demo_booking_counts(
    State(state): State<AppState>,
) -> Result<Json<StatusCounts<BookingStatus>>, AppError> {
    Ok(Json(state.demo_bookings.count_by_status().await?))
}

// -----------------------------------------------------------------------------
// Event registrations
// -----------------------------------------------------------------------------

pub(super) async fn create_registration(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewRegistrationRequest>,
) -> Result<(StatusCode, Json<EventRegistration>), AppError> {
    req.validate()?;
    if state.events.get_by_id(&req.event_id).await?.is_none() {
        return Err(AppError::BadRequest(format!(
            "event {} does not exist",
            req.event_id
        )));
    }
    let registration = state.registrations.create(req).await?;
    info!(
        "new registration {} for event {}",
        registration.id, registration.event_id
    );
    Ok((StatusCode::CREATED, Json(registration)))
}

pub(super) async fn list_registrations(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<StatusQueryParams<RegistrationStatus>>,
) -> Result<Json<Vec<EventRegistration>>, AppError> {
    Ok(Json(state.registrations.list_all(params.status).await?))
}

pub(super) async fn get_registration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventRegistration>, AppError> {
    let registration = state
        .registrations
        .get_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(registration))
}

pub(super) async fn update_registration_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<StatusUpdateRequest<RegistrationStatus>>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.registrations.update_status(&id, req.status).await?)
}

pub(super) async fn delete_registration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    no_content_or_not_found(state.registrations.delete(&id).await?)
}

pub(super) async fn registration_counts(
    State(state): State<AppState>,
) -> Result<Json<StatusCounts<RegistrationStatus>>, AppError> {
    Ok(Json(state.registrations.count_by_status().await?))
}
