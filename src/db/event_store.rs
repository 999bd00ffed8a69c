use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::cleanup::ImageOwnerCleanup;
use crate::db::entity_table::{Column, EntityTable};
use crate::db::ids;
use crate::models::{Event, EventStatistics, NewEventRequest, UpdateEventRequest};

#[derive(Clone)]
pub struct EventStore {
    db: SqlitePool,
    table: EntityTable,
}

impl EventStore {
    pub fn new(db: SqlitePool, cleanup: Arc<dyn ImageOwnerCleanup>) -> Self {
        let table = EntityTable::new(db.clone(), cleanup, "events");
        Self { db, table }
    }

    /// Soonest event first. Archived events are only included on request.
    pub async fn list_all(&self, include_archived: bool) -> Result<Vec<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT e.id, e.title, e.description, e.image_url, e.is_archived,
                e.program, e.instructor, e.dates, e.event_date, e.location,
                (SELECT COUNT(*) FROM event_registrations r WHERE r.event_id = e.id)
                    AS registration_count,
                e.created_at, e.updated_at
            FROM events e
            WHERE ?1 OR e.is_archived = 0
            ORDER BY e.event_date ASC, e.created_at ASC
            "#,
        )
        .bind(include_archived)
        .fetch_all(&self.db)
        .await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Event>, sqlx::Error> {
        match ids::normalize(id) {
            Some(id) => self.find(&id).await,
            None => Ok(None),
        }
    }

    async fn find(&self, id: &str) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT e.id, e.title, e.description, e.image_url, e.is_archived,
                e.program, e.instructor, e.dates, e.event_date, e.location,
                (SELECT COUNT(*) FROM event_registrations r WHERE r.event_id = e.id)
                    AS registration_count,
                e.created_at, e.updated_at
            FROM events e
            WHERE e.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn create(&self, req: NewEventRequest) -> Result<Event, sqlx::Error> {
        let id = ids::new_id();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO events
                (id, title, description, image_url, is_archived,
                program, instructor, dates, event_date, location,
                created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
            "#,
        )
        .bind(&id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.image_url)
        .bind(req.is_archived)
        .bind(&req.program)
        .bind(&req.instructor)
        .bind(&req.dates)
        .bind(req.event_date)
        .bind(&req.location)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(Event {
            id,
            title: req.title,
            description: req.description,
            image_url: req.image_url,
            is_archived: req.is_archived,
            program: req.program,
            instructor: req.instructor,
            dates: req.dates,
            event_date: req.event_date,
            location: req.location,
            registration_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Same contract as [`CourseStore::update`](crate::db::CourseStore::update).
    pub async fn update(&self, id: &str, req: UpdateEventRequest) -> Result<bool, sqlx::Error> {
        let mut columns = Vec::new();
        if let Some(title) = req.title {
            columns.push(Column::Text("title", title));
        }
        if let Some(description) = req.description {
            columns.push(Column::Text("description", description));
        }
        if let Some(is_archived) = req.is_archived {
            columns.push(Column::Flag("is_archived", is_archived));
        }
        if let Some(program) = req.program {
            columns.push(Column::NullableText("program", program));
        }
        if let Some(instructor) = req.instructor {
            columns.push(Column::NullableText("instructor", instructor));
        }
        if let Some(dates) = req.dates {
            columns.push(Column::NullableText("dates", dates));
        }
        if let Some(event_date) = req.event_date {
            columns.push(Column::Date("event_date", event_date));
        }
        if let Some(location) = req.location {
            columns.push(Column::Text("location", location));
        }

        self.table.update(id, &columns, req.image_url).await
    }

    pub async fn archive(&self, id: &str) -> Result<bool, sqlx::Error> {
        self.update(id, UpdateEventRequest::archived(true)).await
    }

    pub async fn unarchive(&self, id: &str) -> Result<bool, sqlx::Error> {
        self.update(id, UpdateEventRequest::archived(false)).await
    }

    /// Removes the event, then releases the image it held when removed.
    /// Registrations that point at the event are kept.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        self.table.delete(id).await
    }

    /// `upcoming` counts every event dated today (UTC) or later, archived or not.
    pub async fn statistics(&self) -> Result<EventStatistics, sqlx::Error> {
        let today = Utc::now().date_naive();

        let (total, active, archived) = self.table.archive_counts().await?;
        let upcoming: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE event_date >= ?1")
            .bind(today)
            .fetch_one(&self.db)
            .await?;

        Ok(EventStatistics {
            total,
            active,
            archived,
            upcoming,
        })
    }
}
