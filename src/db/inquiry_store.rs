use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::ids;
use crate::models::{Inquiry, InquiryStatus, NewInquiryRequest, StatusCounts};

/// Contact-form inquiries. Status moves only by admin action, and any status
/// may follow any other.
#[derive(Clone)]
pub struct InquiryStore {
    db: SqlitePool,
}

impl InquiryStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: NewInquiryRequest) -> Result<Inquiry, sqlx::Error> {
        let id = ids::new_id();
        let now = Utc::now();
        let status = InquiryStatus::New;

        sqlx::query(
            r#"
            INSERT INTO inquiries
                (id, name, email, phone, company, message, course_id,
                status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.company)
        .bind(&req.message)
        .bind(&req.course_id)
        .bind(status)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(Inquiry {
            id,
            name: req.name,
            email: req.email,
            phone: req.phone,
            company: req.company,
            message: req.message,
            course_id: req.course_id,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    /// Newest first, optionally only one status.
    pub async fn list_all(
        &self,
        status: Option<InquiryStatus>,
    ) -> Result<Vec<Inquiry>, sqlx::Error> {
        sqlx::query_as::<_, Inquiry>(
            r#"
            SELECT id, name, email, phone, company, message, course_id,
                status, created_at, updated_at
            FROM inquiries
            WHERE ?1 IS NULL OR status = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.db)
        .await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Inquiry>, sqlx::Error> {
        let Some(id) = ids::normalize(id) else {
            return Ok(None);
        };

        sqlx::query_as::<_, Inquiry>(
            r#"
            SELECT id, name, email, phone, company, message, course_id,
                status, created_at, updated_at
            FROM inquiries
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn update_status(&self, id: &str, status: InquiryStatus) -> Result<bool, sqlx::Error> {
        let Some(id) = ids::normalize(id) else {
            return Ok(false);
        };

        let result = sqlx::query("UPDATE inquiries SET status = ?1, updated_at = ?2 WHERE id = ?3")
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

        let result = sqlx::query("DELETE FROM inquiries WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();

        Ok(result > 0)
    }

    pub async fn count_by_status(&self) -> Result<StatusCounts<InquiryStatus>, sqlx::Error> {
        let rows: Vec<(InquiryStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM inquiries GROUP BY status")
                .fetch_all(&self.db)
                .await?;

        Ok(StatusCounts::from_rows(&InquiryStatus::ALL, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_test_db;

    fn inquiry_request(email: &str) -> NewInquiryRequest {
        NewInquiryRequest {
            name: "Jordan Lee".to_string(),
            email: email.to_string(),
            phone: Some("555-0100".to_string()),
            company: Some("Northside Family Services".to_string()),
            message: Some("Do you run on-site training?".to_string()),
            course_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_starts_as_new() {
        let pool = setup_test_db().await;
        let inquiries = InquiryStore::new(pool);

        let inquiry = inquiries
            .create(inquiry_request("jordan@example.com"))
            .await
            .expect("Failed to create inquiry");
        assert_eq!(inquiry.status, InquiryStatus::New);
        assert_eq!(inquiry.created_at, inquiry.updated_at);

        let fetched = inquiries.get_by_id(&inquiry.id).await.unwrap().unwrap();
        assert_eq!(fetched, inquiry);
    }

    #[tokio::test]
    async fn test_any_status_can_follow_any_other() {
        let pool = setup_test_db().await;
        let inquiries = InquiryStore::new(pool);
        let inquiry = inquiries
            .create(inquiry_request("jordan@example.com"))
            .await
            .unwrap();

        for status in [
            InquiryStatus::Archived,
            InquiryStatus::New,
            InquiryStatus::Completed,
            InquiryStatus::Contacted,
        ] {
            assert!(inquiries.update_status(&inquiry.id, status).await.unwrap());
            let fetched = inquiries.get_by_id(&inquiry.id).await.unwrap().unwrap();
            assert_eq!(fetched.status, status);
        }

        assert!(
            !inquiries
                .update_status("not-a-valid-id", InquiryStatus::New)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_list_filters_and_counts_by_status() {
        let pool = setup_test_db().await;
        let inquiries = InquiryStore::new(pool);
        let a = inquiries.create(inquiry_request("a@example.com")).await.unwrap();
        inquiries.create(inquiry_request("b@example.com")).await.unwrap();
        inquiries.create(inquiry_request("c@example.com")).await.unwrap();
        inquiries
            .update_status(&a.id, InquiryStatus::Contacted)
            .await
            .unwrap();

        assert_eq!(inquiries.list_all(None).await.unwrap().len(), 3);
        let contacted = inquiries
            .list_all(Some(InquiryStatus::Contacted))
            .await
            .unwrap();
        assert_eq!(contacted.len(), 1);
        assert_eq!(contacted[0].id, a.id);

        let counts = inquiries.count_by_status().await.unwrap();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.by_status[&InquiryStatus::New], 2);
        assert_eq!(counts.by_status[&InquiryStatus::Contacted], 1);
        assert_eq!(counts.by_status[&InquiryStatus::Archived], 0);
    }

    #[tokio::test]
    async fn test_delete_inquiry() {
        let pool = setup_test_db().await;
        let inquiries = InquiryStore::new(pool);
        let inquiry = inquiries
            .create(inquiry_request("jordan@example.com"))
            .await
            .unwrap();

        assert!(inquiries.delete(&inquiry.id).await.unwrap());
        assert!(!inquiries.delete(&inquiry.id).await.unwrap());
        assert!(inquiries.get_by_id(&inquiry.id).await.unwrap().is_none());
    }
}
