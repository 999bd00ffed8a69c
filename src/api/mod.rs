mod courses;
mod events;
mod extract;
mod images;
mod submissions;

use axum::routing::{get, patch};
use axum::{Router, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
struct ArchivedQueryParams {
    #[serde(default)]
    include_archived: bool,
}

#[derive(Deserialize)]
struct StatusQueryParams<S> {
    status: Option<S>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route("/api/courses/stats", get(courses::course_statistics))
        .route(
            "/api/courses/{id}",
            get(courses::get_course)
                .patch(courses::update_course)
                .delete(courses::delete_course),
        )
        .route("/api/courses/{id}/archive", patch(courses::archive_course))
        .route("/api/courses/{id}/unarchive", patch(courses::unarchive_course))
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/api/events/stats", get(events::event_statistics))
        .route(
            "/api/events/{id}",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/api/events/{id}/archive", patch(events::archive_event))
        .route("/api/events/{id}/unarchive", patch(events::unarchive_event))
        .route(
            "/api/events/{id}/registrations",
            get(events::list_event_registrations),
        )
        .route(
            "/api/images",
            get(images::list_images).post(images::upload_image),
        )
        .route(
            "/api/images/{id}",
            get(images::get_image).delete(images::delete_image),
        )
        .route(
            "/api/inquiries",
            get(submissions::list_inquiries).post(submissions::create_inquiry),
        )
        .route("/api/inquiries/counts", get(submissions::inquiry_counts))
        .route(
            "/api/inquiries/{id}",
            get(submissions::get_inquiry).delete(submissions::delete_inquiry),
        )
        .route(
            "/api/inquiries/{id}/status",
            patch(submissions::update_inquiry_status),
        )
        .route(
            "/api/demo-bookings",
            get(submissions::list_demo_bookings).post(submissions::create_demo_booking),
        )
        .route("/api/demo-bookings/counts", get(submissions::demo_booking_counts))
        .route(
            "/api/demo-bookings/{id}",
            get(submissions::get_demo_booking).delete(submissions::delete_demo_booking),
        )
        .route(
            "/api/demo-bookings/{id}/status",
            patch(submissions::update_demo_booking_status),
        )
        .route(
            "/api/registrations",
            get(submissions::list_registrations).post(submissions::create_registration),
        )
        .route("/api/registrations/counts", get(submissions::registration_counts))
        .route(
            "/api/registrations/{id}",
            get(submissions::get_registration).delete(submissions::delete_registration),
        )
        .route(
            "/api/registrations/{id}/status",
            patch(submissions::update_registration_status),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

/// Maps a store's "did anything match" answer onto 204 / 404.
fn no_content_or_not_found(found: bool) -> Result<StatusCode, AppError> {
    if found {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
