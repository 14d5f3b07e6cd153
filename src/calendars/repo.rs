use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::calendars::{model::Calendar, repo_types::CalendarRow};
use crate::domain::Id;

#[async_trait]
pub trait CalendarRepository: Send + Sync {
    async fn save(&self, calendar: &Calendar) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: Id) -> anyhow::Result<Option<Calendar>>;
    async fn find_by_user(&self, user_id: Id) -> anyhow::Result<Vec<Calendar>>;
    async fn update(&self, calendar: &Calendar) -> anyhow::Result<()>;
    /// Cascades to the calendar's color settings and entries.
    async fn delete(&self, id: Id) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgCalendarRepository {
    db: PgPool,
}

impl PgCalendarRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CalendarRepository for PgCalendarRepository {
    async fn save(&self, calendar: &Calendar) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO calendars (id, user_id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(calendar.id().as_uuid())
        .bind(calendar.user_id().as_uuid())
        .bind(calendar.name())
        .bind(calendar.description())
        .bind(calendar.created_at())
        .bind(calendar.updated_at())
        .execute(&self.db)
        .await
        .context("insert calendar")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Id) -> anyhow::Result<Option<Calendar>> {
        let row = sqlx::query_as::<_, CalendarRow>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
              FROM calendars
             WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.db)
        .await
        .context("find calendar by id")?;
        Ok(row.map(Calendar::from))
    }

    async fn find_by_user(&self, user_id: Id) -> anyhow::Result<Vec<Calendar>> {
        let rows = sqlx::query_as::<_, CalendarRow>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
              FROM calendars
             WHERE user_id = $1
             ORDER BY created_at ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.db)
        .await
        .context("list calendars by user")?;
        Ok(rows.into_iter().map(Calendar::from).collect())
    }

    async fn update(&self, calendar: &Calendar) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE calendars
               SET name = $2, description = $3, updated_at = $4
             WHERE id = $1
            "#,
        )
        .bind(calendar.id().as_uuid())
        .bind(calendar.name())
        .bind(calendar.description())
        .bind(calendar.updated_at())
        .execute(&self.db)
        .await
        .context("update calendar")?;
        Ok(())
    }

    async fn delete(&self, id: Id) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM calendars WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.db)
            .await
            .context("delete calendar")?;
        Ok(())
    }
}
