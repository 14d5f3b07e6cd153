use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::CalendarDate;
use crate::entries::model::CalendarEntry;

#[derive(Debug, Clone, FromRow)]
pub struct CalendarEntryRow {
    pub id: Uuid,
    pub calendar_id: Uuid,
    pub user_id: Uuid,
    pub entry_date: Date,
    pub color_setting_id: Uuid,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<CalendarEntryRow> for CalendarEntry {
    fn from(r: CalendarEntryRow) -> Self {
        CalendarEntry::load(
            r.id.into(),
            r.calendar_id.into(),
            r.user_id.into(),
            CalendarDate::from_date(r.entry_date),
            r.color_setting_id.into(),
            r.notes,
            r.created_at,
            r.updated_at,
        )
    }
}
