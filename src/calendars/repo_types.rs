use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::calendars::model::Calendar;

#[derive(Debug, Clone, FromRow)]
pub struct CalendarRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<CalendarRow> for Calendar {
    fn from(r: CalendarRow) -> Self {
        Calendar::load(
            r.id.into(),
            r.user_id.into(),
            r.name,
            r.description,
            r.created_at,
            r.updated_at,
        )
    }
}
