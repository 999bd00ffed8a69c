use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::ids;
use crate::models::{EventRegistration, NewRegistrationRequest, RegistrationStatus, StatusCounts};

#[derive(Clone)]
pub struct RegistrationStore {
    db: SqlitePool,
}

impl RegistrationStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Stores the registration as given. Whether the event exists is checked
    /// by the caller.
    pub async fn create(
        &self,
        req: NewRegistrationRequest,
    ) -> Result<EventRegistration, sqlx::Error> {
        let id = ids::new_id();
        let now = Utc::now();
        let status = RegistrationStatus::New;
        let event_id = ids::normalize(&req.event_id).unwrap_or(req.event_id);

        sqlx::query(
            r#"
            INSERT INTO event_registrations
                (id, event_id, name, email, phone, organization, message,
                status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
        )
        .bind(&id)
        .bind(&event_id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.organization)
        .bind(&req.message)
        .bind(status)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(EventRegistration {
            id,
            event_id,
            name: req.name,
            email: req.email,
            phone: req.phone,
            organization: req.organization,
            message: req.message,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn list_all(
        &self,
        status: Option<RegistrationStatus>,
    ) -> Result<Vec<EventRegistration>, sqlx::Error> {
        sqlx::query_as::<_, EventRegistration>(
            r#"
            SELECT id, event_id, name, email, phone, organization, message,
                status, created_at, updated_at
            FROM event_registrations
            WHERE ?1 IS NULL OR status = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.db)
        .await
    }

    /// Registrations for one event, oldest first (sign-up order).
    pub async fn list_for_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<EventRegistration>, sqlx::Error> {
        let Some(event_id) = ids::normalize(event_id) else {
            return Ok(Vec::new());
        };

        sqlx::query_as::<_, EventRegistration>(
            r#"
            SELECT id, event_id, name, email, phone, organization, message,
                status, created_at, updated_at
            FROM event_registrations
            WHERE event_id = ?1
            ORDER BY created_at ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.db)
        .await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<EventRegistration>, sqlx::Error> {
        let Some(id) = ids::normalize(id) else {
            return Ok(None);
        };

        sqlx::query_as::<_, EventRegistration>(
            r#"
            SELECT id, event_id, name, email, phone, organization, message,
                status, created_at, updated_at
            FROM event_registrations
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: RegistrationStatus,
    ) -> Result<bool, sqlx::Error> {
        let Some(id) = ids::normalize(id) else {
            return Ok(false);
        };

        let result = sqlx::query(
            "UPDATE event_registrations SET status = ?1, updated_at = ?2 WHERE id = ?3",
        )
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

        let result = sqlx::query("DELETE FROM event_registrations WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();

        Ok(result > 0)
    }

    pub async fn count_by_status(&self) -> Result<StatusCounts<RegistrationStatus>, sqlx::Error> {
        let rows: Vec<(RegistrationStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM event_registrations GROUP BY status")
                .fetch_all(&self.db)
                .await?;

        Ok(StatusCounts::from_rows(&RegistrationStatus::ALL, rows))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::db::setup_test_db;

    fn registration_request(event_id: &str, email: &str) -> NewRegistrationRequest {
        NewRegistrationRequest {
            event_id: event_id.to_string(),
            name: "Alex Chen".to_string(),
            email: email.to_string(),
            phone: None,
            organization: Some("Riverside School Board".to_string()),
            message: None,
        }
    }

    #[tokio::test]
    async fn test_list_for_event_in_signup_order() {
        let pool = setup_test_db().await;
        let registrations = RegistrationStore::new(pool);
        let event_id = ids::new_id();

        let first = registrations
            .create(registration_request(&event_id, "a@example.com"))
            .await
            .expect("Failed to create registration");
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = registrations
            .create(registration_request(&event_id.to_uppercase(), "b@example.com"))
            .await
            .unwrap();
        registrations
            .create(registration_request(&ids::new_id(), "c@example.com"))
            .await
            .unwrap();

        let listed = registrations.list_for_event(&event_id).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);
        assert!(
            registrations
                .list_for_event("not-a-valid-id")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_status_changes_and_counts() {
        let pool = setup_test_db().await;
        let registrations = RegistrationStore::new(pool);
        let event_id = ids::new_id();
        let a = registrations
            .create(registration_request(&event_id, "a@example.com"))
            .await
            .unwrap();
        let b = registrations
            .create(registration_request(&event_id, "b@example.com"))
            .await
            .unwrap();

        assert!(
            registrations
                .update_status(&a.id, RegistrationStatus::Attended)
                .await
                .unwrap()
        );
        assert!(
            registrations
                .update_status(&b.id, RegistrationStatus::Cancelled)
                .await
                .unwrap()
        );
        assert!(
            registrations
                .update_status(&b.id, RegistrationStatus::Confirmed)
                .await
                .unwrap()
        );

        let counts = registrations.count_by_status().await.unwrap();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.by_status[&RegistrationStatus::Attended], 1);
        assert_eq!(counts.by_status[&RegistrationStatus::Confirmed], 1);
        assert_eq!(counts.by_status[&RegistrationStatus::New], 0);

        let attended = registrations
            .list_all(Some(RegistrationStatus::Attended))
            .await
            .unwrap();
        assert_eq!(attended.len(), 1);
        assert_eq!(attended[0].id, a.id);

        assert!(registrations.delete(&a.id).await.unwrap());
        assert!(registrations.get_by_id(&a.id).await.unwrap().is_none());
    }
}
