use time::OffsetDateTime;

use crate::domain::{CalendarDate, Id};
use crate::error::{AppError, AppResult};

/// One colored day in a calendar.
#[derive(Debug, Clone)]
pub struct CalendarEntry {
    id: Id,
    calendar_id: Id,
    user_id: Id,
    date: CalendarDate,
    color_setting_id: Id,
    notes: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

fn require(id: Id, what: &str) -> AppResult<Id> {
    if id.is_nil() {
        return Err(AppError::validation(format!("{what} is required")));
    }
    Ok(id)
}

impl CalendarEntry {
    pub fn new(calendar_id: Id, user_id: Id, date: CalendarDate, color_setting_id: Id) -> AppResult<Self> {
        let now = OffsetDateTime::now_utc();
        Ok(Self {
            id: Id::generate(),
            calendar_id: require(calendar_id, "calendar id")?,
            user_id: require(user_id, "user id")?,
            date,
            color_setting_id: require(color_setting_id, "color setting id")?,
            notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn load(
        id: Id,
        calendar_id: Id,
        user_id: Id,
        date: CalendarDate,
        color_setting_id: Id,
        notes: Option<String>,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            calendar_id,
            user_id,
            date,
            color_setting_id,
            notes,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn calendar_id(&self) -> Id {
        self.calendar_id
    }

    pub fn user_id(&self) -> Id {
        self.user_id
    }

    pub fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn color_setting_id(&self) -> Id {
        self.color_setting_id
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    pub fn update_color_setting(&mut self, color_setting_id: Id) -> AppResult<()> {
        self.color_setting_id = require(color_setting_id, "color setting id")?;
        self.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    /// Blank notes are stored as absent.
    pub fn update_notes(&mut self, notes: Option<String>) {
        self.notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self.updated_at = OffsetDateTime::now_utc();
    }

    pub fn belongs_to_user(&self, user_id: Id) -> bool {
        self.user_id == user_id
    }

    pub fn is_for_date(&self, date: CalendarDate) -> bool {
        self.date == date
    }
}
