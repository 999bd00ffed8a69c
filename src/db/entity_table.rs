use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::db::cleanup::ImageOwnerCleanup;
use crate::db::ids;

/// One patched column and its new value.
#[derive(Debug, Clone)]
pub(crate) enum Column {
    Text(&'static str, String),
    NullableText(&'static str, Option<String>),
    Flag(&'static str, bool),
    Date(&'static str, NaiveDate),
}

impl Column {
    fn push_assignment(&self, query: &mut QueryBuilder<'static, Sqlite>) {
        match self {
            Column::Text(name, value) => {
                query.push(format!(", {name} = ")).push_bind(value.clone());
            }
            Column::NullableText(name, value) => {
                query.push(format!(", {name} = ")).push_bind(value.clone());
            }
            Column::Flag(name, value) => {
                query.push(format!(", {name} = ")).push_bind(*value);
            }
            Column::Date(name, value) => {
                query.push(format!(", {name} = ")).push_bind(*value);
            }
        }
    }
}

/// Writes shared by the course and event tables: partial updates and deletes
/// that hand a released `image_url` to the cleanup seam.
#[derive(Clone)]
pub(crate) struct EntityTable {
    db: SqlitePool,
    cleanup: Arc<dyn ImageOwnerCleanup>,
    table: &'static str,
}

impl EntityTable {
    pub(crate) fn new(
        db: SqlitePool,
        cleanup: Arc<dyn ImageOwnerCleanup>,
        table: &'static str,
    ) -> Self {
        Self { db, cleanup, table }
    }

    /// Writes only `columns` (plus `image_url` when present) and `updated_at`.
    ///
    /// An image change is guarded on the value read just before the write.
    /// If another writer replaced the image in between, the guard fails and
    /// the write is retried against the fresh value, so cleanup only ever
    /// sees the reference this write actually displaced.
    pub(crate) async fn update(
        &self,
        id: &str,
        columns: &[Column],
        image_url: Option<Option<String>>,
    ) -> Result<bool, sqlx::Error> {
        let Some(id) = ids::normalize(id) else {
            return Ok(false);
        };

        loop {
            let previous_image = match image_url {
                Some(_) => match self.current_image(&id).await? {
                    Some(previous) => Some(previous),
                    None => return Ok(false),
                },
                None => None,
            };

            let mut query = QueryBuilder::<Sqlite>::new(format!(
                "UPDATE {} SET updated_at = ",
                self.table
            ));
            query.push_bind(Utc::now());
            for column in columns {
                column.push_assignment(&mut query);
            }
            if let Some(new_image) = &image_url {
                query.push(", image_url = ").push_bind(new_image.clone());
            }
            query.push(" WHERE id = ").push_bind(id.clone());
            if let Some(previous) = &previous_image {
                query.push(" AND image_url IS ").push_bind(previous.clone());
            }

            let rows = query.build().execute(&self.db).await?.rows_affected();

            match (previous_image, &image_url) {
                (None, _) => return Ok(rows > 0),
                (Some(_), _) if rows == 0 => {
                    debug!("{} {} image changed during update, retrying", self.table, id);
                }
                (Some(previous), Some(new_image)) => {
                    if previous != *new_image {
                        debug!("{} {} image replaced", self.table, id);
                        self.cleanup
                            .on_replaced(previous.as_deref(), new_image.as_deref())
                            .await;
                    }
                    return Ok(true);
                }
                (Some(_), None) => return Ok(true),
            }
        }
    }

    /// Removes the row and releases the image it held at the moment of removal.
    pub(crate) async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let Some(id) = ids::normalize(id) else {
            return Ok(false);
        };

        let sql = format!("DELETE FROM {} WHERE id = ?1 RETURNING image_url", self.table);
        let removed: Vec<Option<String>> = sqlx::query_scalar(&sql)
            .bind(&id)
            .fetch_all(&self.db)
            .await?;

        let Some(image_url) = removed.into_iter().next() else {
            return Ok(false);
        };

        if image_url.is_some() {
            self.cleanup.on_replaced(image_url.as_deref(), None).await;
        }

        Ok(true)
    }

    /// `(total, active, archived)`.
    pub(crate) async fn archive_counts(&self) -> Result<(i64, i64, i64), sqlx::Error> {
        let total = self.count("").await?;
        let active = self.count("WHERE is_archived = 0").await?;
        let archived = self.count("WHERE is_archived = 1").await?;
        Ok((total, active, archived))
    }

    async fn count(&self, filter: &str) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM {} {}", self.table, filter);
        sqlx::query_scalar(&sql).fetch_one(&self.db).await
    }

    async fn current_image(&self, id: &str) -> Result<Option<Option<String>>, sqlx::Error> {
        let sql = format!("SELECT image_url FROM {} WHERE id = ?1", self.table);
        sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }
}
