use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{CalendarDate, Id};
use crate::entries::{model::CalendarEntry, repo_types::CalendarEntryRow};

/// Entries are scoped to a calendar; at most one per (calendar, date).
#[async_trait]
pub trait CalendarEntryRepository: Send + Sync {
    async fn save(&self, entry: &CalendarEntry) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: Id) -> anyhow::Result<Option<CalendarEntry>>;
    async fn find_by_calendar(&self, calendar_id: Id) -> anyhow::Result<Vec<CalendarEntry>>;
    async fn find_by_calendar_and_date(
        &self,
        calendar_id: Id,
        date: CalendarDate,
    ) -> anyhow::Result<Option<CalendarEntry>>;
    /// Both bounds inclusive.
    async fn find_by_calendar_and_date_range(
        &self,
        calendar_id: Id,
        start: CalendarDate,
        end: CalendarDate,
    ) -> anyhow::Result<Vec<CalendarEntry>>;
    async fn find_by_calendar_and_color_setting(
        &self,
        calendar_id: Id,
        color_setting_id: Id,
    ) -> anyhow::Result<Vec<CalendarEntry>>;
    /// Every calendar the user owns, both bounds inclusive.
    async fn find_by_user_and_date_range(
        &self,
        user_id: Id,
        start: CalendarDate,
        end: CalendarDate,
    ) -> anyhow::Result<Vec<CalendarEntry>>;
    async fn update(&self, entry: &CalendarEntry) -> anyhow::Result<()>;
    async fn delete(&self, id: Id) -> anyhow::Result<()>;
    async fn exists_by_calendar_and_date(
        &self,
        calendar_id: Id,
        date: CalendarDate,
    ) -> anyhow::Result<bool>;
}

const ENTRY_COLUMNS: &str =
    "id, calendar_id, user_id, entry_date, color_setting_id, notes, created_at, updated_at";

#[derive(Clone)]
pub struct PgCalendarEntryRepository {
    db: PgPool,
}

impl PgCalendarEntryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CalendarEntryRepository for PgCalendarEntryRepository {
    async fn save(&self, entry: &CalendarEntry) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO calendar_entries (id, calendar_id, user_id, entry_date, color_setting_id,
                                          notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id().as_uuid())
        .bind(entry.calendar_id().as_uuid())
        .bind(entry.user_id().as_uuid())
        .bind(entry.date().date())
        .bind(entry.color_setting_id().as_uuid())
        .bind(entry.notes())
        .bind(entry.created_at())
        .bind(entry.updated_at())
        .execute(&self.db)
        .await
        .context("insert calendar entry")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Id) -> anyhow::Result<Option<CalendarEntry>> {
        let row = sqlx::query_as::<_, CalendarEntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM calendar_entries WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.db)
        .await
        .context("find entry by id")?;
        Ok(row.map(CalendarEntry::from))
    }

    async fn find_by_calendar(&self, calendar_id: Id) -> anyhow::Result<Vec<CalendarEntry>> {
        let rows = sqlx::query_as::<_, CalendarEntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM calendar_entries \
              WHERE calendar_id = $1 ORDER BY entry_date ASC"
        ))
        .bind(calendar_id.as_uuid())
        .fetch_all(&self.db)
        .await
        .context("list entries by calendar")?;
        Ok(rows.into_iter().map(CalendarEntry::from).collect())
    }

    async fn find_by_calendar_and_date(
        &self,
        calendar_id: Id,
        date: CalendarDate,
    ) -> anyhow::Result<Option<CalendarEntry>> {
        let row = sqlx::query_as::<_, CalendarEntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM calendar_entries \
              WHERE calendar_id = $1 AND entry_date = $2"
        ))
        .bind(calendar_id.as_uuid())
        .bind(date.date())
        .fetch_optional(&self.db)
        .await
        .context("find entry by date")?;
        Ok(row.map(CalendarEntry::from))
    }

    async fn find_by_calendar_and_date_range(
        &self,
        calendar_id: Id,
        start: CalendarDate,
        end: CalendarDate,
    ) -> anyhow::Result<Vec<CalendarEntry>> {
        let rows = sqlx::query_as::<_, CalendarEntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM calendar_entries \
              WHERE calendar_id = $1 AND entry_date BETWEEN $2 AND $3 \
              ORDER BY entry_date ASC"
        ))
        .bind(calendar_id.as_uuid())
        .bind(start.date())
        .bind(end.date())
        .fetch_all(&self.db)
        .await
        .context("list entries by date range")?;
        Ok(rows.into_iter().map(CalendarEntry::from).collect())
    }

    async fn find_by_calendar_and_color_setting(
        &self,
        calendar_id: Id,
        color_setting_id: Id,
    ) -> anyhow::Result<Vec<CalendarEntry>> {
        let rows = sqlx::query_as::<_, CalendarEntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM calendar_entries \
              WHERE calendar_id = $1 AND color_setting_id = $2 \
              ORDER BY entry_date ASC"
        ))
        .bind(calendar_id.as_uuid())
        .bind(color_setting_id.as_uuid())
        .fetch_all(&self.db)
        .await
        .context("list entries by color setting")?;
        Ok(rows.into_iter().map(CalendarEntry::from).collect())
    }

    async fn find_by_user_and_date_range(
        &self,
        user_id: Id,
        start: CalendarDate,
        end: CalendarDate,
    ) -> anyhow::Result<Vec<CalendarEntry>> {
        let rows = sqlx::query_as::<_, CalendarEntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM calendar_entries \
              WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3 \
              ORDER BY entry_date ASC, calendar_id ASC"
        ))
        .bind(user_id.as_uuid())
        .bind(start.date())
        .bind(end.date())
        .fetch_all(&self.db)
        .await
        .context("list user entries by date range")?;
        Ok(rows.into_iter().map(CalendarEntry::from).collect())
    }

    async fn update(&self, entry: &CalendarEntry) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE calendar_entries
               SET color_setting_id = $2, notes = $3, updated_at = $4
             WHERE id = $1
            "#,
        )
        .bind(entry.id().as_uuid())
        .bind(entry.color_setting_id().as_uuid())
        .bind(entry.notes())
        .bind(entry.updated_at())
        .execute(&self.db)
        .await
        .context("update calendar entry")?;
        Ok(())
    }

    async fn delete(&self, id: Id) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM calendar_entries WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.db)
            .await
            .context("delete calendar entry")?;
        Ok(())
    }

    async fn exists_by_calendar_and_date(
        &self,
        calendar_id: Id,
        date: CalendarDate,
    ) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM calendar_entries WHERE calendar_id = $1 AND entry_date = $2)",
        )
        .bind(calendar_id.as_uuid())
        .bind(date.date())
        .fetch_one(&self.db)
        .await
        .context("entry exists by date")?;
        Ok(exists)
    }
}
