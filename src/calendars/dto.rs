use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::calendars::model::Calendar;
use crate::domain::Id;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCalendarRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCalendarRequest {
    pub name: Option<String>,
    /// An empty string clears the description.
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub id: Id,
    pub user_id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&Calendar> for CalendarResponse {
    fn from(c: &Calendar) -> Self {
        Self {
            id: c.id(),
            user_id: c.user_id(),
            name: c.name().to_string(),
            description: c.description().map(str::to_string),
            created_at: c.created_at(),
            updated_at: c.updated_at(),
        }
    }
}
