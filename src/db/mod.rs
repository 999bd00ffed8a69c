pub mod cleanup;
pub mod course_store;
pub mod demo_booking_store;
mod entity_table;
pub mod event_store;
pub mod ids;
pub mod image_store;
pub mod inquiry_store;
pub mod registration_store;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePoolOptions;

pub use cleanup::{ImageCleanup, ImageOwnerCleanup};
pub use course_store::CourseStore;
pub use demo_booking_store::DemoBookingStore;
pub use event_store::EventStore;
pub use image_store::ImageStore;
pub use inquiry_store::InquiryStore;
pub use registration_store::RegistrationStore;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens a pool and brings the schema up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    MIGRATOR.run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn setup_test_db() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create test db")
}

/// Records every cleanup call instead of touching images.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingCleanup {
    pub calls: std::sync::Mutex<Vec<(Option<String>, Option<String>)>>,
}

#[cfg(test)]
#[async_trait::async_trait]
impl ImageOwnerCleanup for RecordingCleanup {
    async fn on_replaced(&self, old_ref: Option<&str>, new_ref: Option<&str>) {
        self.calls
            .lock()
            .unwrap()
            .push((old_ref.map(str::to_string), new_ref.map(str::to_string)));
    }
}
