use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::ids;
use crate::models::{BookingStatus, DemoBooking, NewDemoBookingRequest, StatusCounts};

#[derive(Clone)]
pub struct DemoBookingStore {
    db: SqlitePool,
}

impl DemoBookingStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: NewDemoBookingRequest) -> Result<DemoBooking, sqlx::Error> {
        let id = ids::new_id();
        let now = Utc::now();
        let status = BookingStatus::New;

        sqlx::query(
            r#"
            INSERT INTO demo_bookings
                (id, name, email, phone, company, message, course_id,
                preferred_date, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.company)
        .bind(&req.message)
        .bind(&req.course_id)
        .bind(req.preferred_date)
        .bind(status)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(DemoBooking {
            id,
            name: req.name,
            email: req.email,
            phone: req.phone,
            company: req.company,
            message: req.message,
            course_id: req.course_id,
            preferred_date: req.preferred_date,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn list_all(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<DemoBooking>, sqlx::Error> {
        sqlx::query_as::<_, DemoBooking>(
            r#"
            SELECT id, name, email, phone, company, message, course_id,
                preferred_date, status, created_at, updated_at
            FROM demo_bookings
            WHERE ?1 IS NULL OR status = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.db)
        .await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<DemoBooking>, sqlx::Error> {
        let Some(id) = ids::normalize(id) else {
            return Ok(None);
        };

        sqlx::query_as::<_, DemoBooking>(
            r#"
            SELECT id, name, email, phone, company, message, course_id,
                preferred_date, status, created_at, updated_at
            FROM demo_bookings
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn update_status(&self, id: &str, status: BookingStatus) -> Result<bool, sqlx::Error> {
        let Some(id) = ids::normalize(id) else {
            return Ok(false);
        };

        let result =
            sqlx::query("UPDATE demo_bookings SET status = ?1, updated_at = ?2 WHERE id = ?3")
                .bind(status)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.db)
                .await?
                .rows_affected();

        Ok(result > 0)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let Some(id) = ids::normalize(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM demo_bookings WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();

        Ok(result > 0)
    }

    pub async fn count_by_status(&self) -> Result<StatusCounts<BookingStatus>, sqlx::Error> {
        let rows: Vec<(BookingStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM demo_bookings GROUP BY status")
                .fetch_all(&self.db)
                .await?;

        Ok(StatusCounts::from_rows(&BookingStatus::ALL, rows))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::setup_test_db;

    fn booking_request() -> NewDemoBookingRequest {
        NewDemoBookingRequest {
            name: "Sam Rivera".to_string(),
            email: "sam@example.com".to_string(),
            phone: None,
            company: Some("Harbor Clinic".to_string()),
            message: None,
            course_id: Some(ids::new_id()),
            preferred_date: NaiveDate::from_ymd_opt(2026, 11, 3),
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_booking() {
        let pool = setup_test_db().await;
        let bookings = DemoBookingStore::new(pool);

        let booking = bookings
            .create(booking_request())
            .await
            .expect("Failed to create booking");
        assert_eq!(booking.status, BookingStatus::New);

        let fetched = bookings.get_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(fetched, booking);
        assert!(bookings.get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_booking_can_be_reopened() {
        let pool = setup_test_db().await;
        let bookings = DemoBookingStore::new(pool);
        let booking = bookings.create(booking_request()).await.unwrap();

        assert!(
            bookings
                .update_status(&booking.id, BookingStatus::Cancelled)
                .await
                .unwrap()
        );
        assert!(
            bookings
                .update_status(&booking.id, BookingStatus::New)
                .await
                .unwrap()
        );
        let fetched = bookings.get_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, BookingStatus::New);
        assert!(fetched.updated_at >= fetched.created_at);
    }

    #[tokio::test]
    async fn test_counts_by_status() {
        let pool = setup_test_db().await;
        let bookings = DemoBookingStore::new(pool);
        let a = bookings.create(booking_request()).await.unwrap();
        bookings.create(booking_request()).await.unwrap();
        bookings
            .update_status(&a.id, BookingStatus::Confirmed)
            .await
            .unwrap();

        let counts = bookings.count_by_status().await.unwrap();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.by_status[&BookingStatus::New], 1);
        assert_eq!(counts.by_status[&BookingStatus::Confirmed], 1);
        assert_eq!(counts.by_status.len(), BookingStatus::ALL.len());

        let confirmed = bookings
            .list_all(Some(BookingStatus::Confirmed))
            .await
            .unwrap();
        assert_eq!(confirmed.len(), 1);

        assert!(bookings.delete(&a.id).await.unwrap());
        assert_eq!(bookings.list_all(None).await.unwrap().len(), 1);
    }
}
