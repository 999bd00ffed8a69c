use std::sync::Arc;

use sqlx::SqlitePool;

use crate::db::{
    CourseStore, DemoBookingStore, EventStore, ImageCleanup, ImageStore, InquiryStore,
    RegistrationStore,
};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub courses: CourseStore,
    pub events: EventStore,
    pub images: ImageStore,
    pub inquiries: InquiryStore,
    pub demo_bookings: DemoBookingStore,
    pub registrations: RegistrationStore,
}

impl AppState {
    /// Builds every store over the same pool. Courses and events release
    /// replaced images through a shared [`ImageCleanup`].
    pub fn new(db: SqlitePool) -> Self {
        let images = ImageStore::new(db.clone());
        let cleanup = Arc::new(ImageCleanup::new(images.clone()));

        Self {
            courses: CourseStore::new(db.clone(), cleanup.clone()),
            events: EventStore::new(db.clone(), cleanup),
            images,
            inquiries: InquiryStore::new(db.clone()),
            demo_bookings: DemoBookingStore::new(db.clone()),
            registrations: RegistrationStore::new(db.clone()),
            db,
        }
    }
}
