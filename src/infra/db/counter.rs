use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{CounterRepo, RepoError},
    domain::entities::{VISITOR_COUNT_ID, VisitorCount},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct VisitorCountRow {
    id: i32,
    count: i64,
    updated_at: OffsetDateTime,
}

impl From<VisitorCountRow> for VisitorCount {
    fn from(row: VisitorCountRow) -> Self {
        Self {
            id: row.id,
            count: row.count,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CounterRepo for PostgresRepositories {
    async fn load_count(&self) -> Result<Option<VisitorCount>, RepoError> {
        let row = sqlx::query_as::<_, VisitorCountRow>(
            r#"
            SELECT id, count, updated_at
            FROM visitor_counts
            WHERE id = $1
            "#,
        )
        .bind(VISITOR_COUNT_ID)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(VisitorCount::from))
    }

    async fn increment_count(&self) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE visitor_counts
            SET count = count + 1,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(VISITOR_COUNT_ID)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn seed_count(&self) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO visitor_counts (id, count, updated_at)
            VALUES ($1, 0, now())
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(VISITOR_COUNT_ID)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
