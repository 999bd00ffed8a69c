use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::cleanup::ImageOwnerCleanup;
use crate::db::entity_table::{Column, EntityTable};
use crate::db::ids;
use crate::models::{Course, CourseStatistics, NewCourseRequest, UpdateCourseRequest};

#[derive(Clone)]
pub struct CourseStore {
    db: SqlitePool,
    table: EntityTable,
}

impl CourseStore {
    pub fn new(db: SqlitePool, cleanup: Arc<dyn ImageOwnerCleanup>) -> Self {
        let table = EntityTable::new(db.clone(), cleanup, "courses");
        Self { db, table }
    }

    /// Newest first. Archived courses are only included on request.
    pub async fn list_all(&self, include_archived: bool) -> Result<Vec<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, title, description, image_url, is_archived,
                program, instructor, dates, created_at, updated_at
            FROM courses
            WHERE ?1 OR is_archived = 0
            ORDER BY created_at DESC
            "#,
        )
        .bind(include_archived)
        .fetch_all(&self.db)
        .await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Course>, sqlx::Error> {
        match ids::normalize(id) {
            Some(id) => self.find(&id).await,
            None => Ok(None),
        }
    }

    async fn find(&self, id: &str) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, title, description, image_url, is_archived,
                program, instructor, dates, created_at, updated_at
            FROM courses
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn create(&self, req: NewCourseRequest) -> Result<Course, sqlx::Error> {
        let id = ids::new_id();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO courses
                (id, title, description, image_url, is_archived,
                program, instructor, dates, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
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
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(Course {
            id,
            title: req.title,
            description: req.description,
            image_url: req.image_url,
            is_archived: req.is_archived,
            program: req.program,
            instructor: req.instructor,
            dates: req.dates,
            created_at: now,
            updated_at: now,
        })
    }

    /// Writes only the fields present in `req`. Returns `false` when no course
    /// has this id. A replaced `image_url` is handed to the image cleanup after
    /// the write; that cleanup cannot fail the update.
    pub async fn update(&self, id: &str, req: UpdateCourseRequest) -> Result<bool, sqlx::Error> {
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

        self.table.update(id, &columns, req.image_url).await
    }

    pub async fn archive(&self, id: &str) -> Result<bool, sqlx::Error> {
        self.update(id, UpdateCourseRequest::archived(true)).await
    }

    pub async fn unarchive(&self, id: &str) -> Result<bool, sqlx::Error> {
        self.update(id, UpdateCourseRequest::archived(false)).await
    }

    /// Removes the course, then releases the image it held when removed.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        self.table.delete(id).await
    }

    pub async fn statistics(&self) -> Result<CourseStatistics, sqlx::Error> {
        let (total, active, archived) = self.table.archive_counts().await?;

        Ok(CourseStatistics {
            total,
            active,
            archived,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::db::{RecordingCleanup, setup_test_db};

    fn course_request(title: &str) -> NewCourseRequest {
        NewCourseRequest {
            title: title.to_string(),
            description: "<p>Dyadic Developmental Practice</p>".to_string(),
            image_url: None,
            is_archived: false,
            program: Some("DDP".to_string()),
            instructor: Some("Kim Golding".to_string()),
            dates: Some("May 5-8".to_string()),
        }
    }

    async fn setup() -> (CourseStore, Arc<RecordingCleanup>) {
        let pool = setup_test_db().await;
        let cleanup = Arc::new(RecordingCleanup::default());
        (CourseStore::new(pool, cleanup.clone()), cleanup)
    }

    #[tokio::test]
    async fn test_create_and_fetch_course() {
        let (courses, _) = setup().await;

        let course = courses
            .create(course_request("DDP Level 1"))
            .await
            .expect("Failed to create course");
        assert_eq!(course.title, "DDP Level 1");
        assert!(!course.is_archived);
        assert_eq!(course.created_at, course.updated_at);

        let fetched = courses
            .get_by_id(&course.id)
            .await
            .expect("Failed to fetch course")
            .expect("Course not found");
        assert_eq!(fetched, course);
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let (courses, _) = setup().await;

        assert!(courses.get_by_id("not-a-valid-id").await.unwrap().is_none());
        assert!(!courses.archive("not-a-valid-id").await.unwrap());
        assert!(!courses.delete("not-a-valid-id").await.unwrap());
        assert!(
            !courses
                .update(&ids::new_id(), UpdateCourseRequest::default())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_list_newest_first_and_hides_archived() {
        let (courses, _) = setup().await;

        let first = courses.create(course_request("First")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = courses.create(course_request("Second")).await.unwrap();
        let mut hidden = course_request("Hidden");
        hidden.is_archived = true;
        let hidden = courses.create(hidden).await.unwrap();

        let listed = courses.list_all(false).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
        assert!(listed.iter().all(|c| !c.is_archived));

        let all = courses.list_all(true).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().any(|c| c.id == hidden.id && c.is_archived));
    }

    #[tokio::test]
    async fn test_archive_and_unarchive() {
        let (courses, _) = setup().await;
        let course = courses.create(course_request("DDP Level 1")).await.unwrap();

        assert!(courses.archive(&course.id).await.unwrap());
        let archived = courses.get_by_id(&course.id).await.unwrap().unwrap();
        assert!(archived.is_archived);

        assert!(courses.unarchive(&course.id).await.unwrap());
        let restored = courses.get_by_id(&course.id).await.unwrap().unwrap();
        assert!(!restored.is_archived);
    }

    #[tokio::test]
    async fn test_update_applies_patch_and_bumps_updated_at() {
        let (courses, cleanup) = setup().await;
        let course = courses.create(course_request("DDP Level 1")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let patch = UpdateCourseRequest {
            title: Some("DDP Level 2".to_string()),
            instructor: Some(None),
            ..UpdateCourseRequest::default()
        };
        assert!(courses.update(&course.id, patch).await.unwrap());

        let updated = courses.get_by_id(&course.id).await.unwrap().unwrap();
        assert_eq!(updated.title, "DDP Level 2");
        assert_eq!(updated.instructor, None);
        assert_eq!(updated.program, course.program);
        assert_eq!(updated.created_at, course.created_at);
        assert!(updated.updated_at > updated.created_at);
        assert!(cleanup.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_image_replacement_notifies_cleanup() {
        let (courses, cleanup) = setup().await;
        let mut req = course_request("DDP Level 1");
        req.image_url = Some("/api/images/old".to_string());
        let course = courses.create(req).await.unwrap();

        let patch = UpdateCourseRequest {
            image_url: Some(Some("/api/images/new".to_string())),
            ..UpdateCourseRequest::default()
        };
        assert!(courses.update(&course.id, patch).await.unwrap());

        // Same value again: nothing replaced.
        let patch = UpdateCourseRequest {
            image_url: Some(Some("/api/images/new".to_string())),
            ..UpdateCourseRequest::default()
        };
        assert!(courses.update(&course.id, patch).await.unwrap());

        let calls = cleanup.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![(
                Some("/api/images/old".to_string()),
                Some("/api/images/new".to_string())
            )]
        );
    }

    #[tokio::test]
    async fn test_delete_releases_image() {
        let (courses, cleanup) = setup().await;
        let mut req = course_request("DDP Level 1");
        req.image_url = Some("https://cdn.example.com/ddp.png".to_string());
        let course = courses.create(req).await.unwrap();
        let bare = courses.create(course_request("No image")).await.unwrap();

        assert!(courses.delete(&course.id).await.unwrap());
        assert!(courses.delete(&bare.id).await.unwrap());
        assert!(!courses.delete(&course.id).await.unwrap());
        assert!(courses.get_by_id(&course.id).await.unwrap().is_none());

        let calls = cleanup.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![(Some("https://cdn.example.com/ddp.png".to_string()), None)]
        );
    }

    #[tokio::test]
    async fn test_statistics() {
        let (courses, _) = setup().await;
        let a = courses.create(course_request("A")).await.unwrap();
        courses.create(course_request("B")).await.unwrap();
        courses.create(course_request("C")).await.unwrap();
        courses.archive(&a.id).await.unwrap();

        let stats = courses.statistics().await.unwrap();
        assert_eq!(
            stats,
            CourseStatistics {
                total: 3,
                active: 2,
                archived: 1
            }
        );
    }
}
