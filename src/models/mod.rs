pub mod course;
pub mod demo_booking;
pub mod event;
pub mod image;
pub mod inquiry;
pub mod registration;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

pub use course::{Course, CourseStatistics, NewCourseRequest, UpdateCourseRequest};
pub use demo_booking::{BookingStatus, DemoBooking, NewDemoBookingRequest};
pub use event::{Event, EventStatistics, NewEventRequest, UpdateEventRequest};
pub use image::{Image, ImageInfo};
pub use inquiry::{Inquiry, InquiryStatus, NewInquiryRequest};
pub use registration::{EventRegistration, NewRegistrationRequest, RegistrationStatus};

/// Per-status counts for one submission table.
///
/// Every known status is present in `by_status`, zero when no row has it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts<S: Ord> {
    pub total: i64,
    pub by_status: BTreeMap<S, i64>,
}

impl<S: Ord + Copy> StatusCounts<S> {
    pub fn from_rows(known: &[S], rows: Vec<(S, i64)>) -> Self {
        let mut by_status: BTreeMap<S, i64> = known.iter().map(|s| (*s, 0)).collect();
        let mut total = 0;
        for (status, count) in rows {
            *by_status.entry(status).or_insert(0) += count;
            total += count;
        }
        Self { total, by_status }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusUpdateRequest<S> {
    pub status: S,
}

/// Distinguishes a field that is absent from a patch (`None`) from one that is
/// explicitly set to `null` (`Some(None)`).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
