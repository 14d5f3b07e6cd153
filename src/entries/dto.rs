use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::color_settings::{dto::ColorSettingResponse, model::ColorSetting};
use crate::domain::{CalendarDate, Id};
use crate::entries::model::CalendarEntry;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCalendarEntryRequest {
    /// `YYYY-MM-DD`
    pub date: String,
    pub color_setting_id: String,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCalendarEntryRequest {
    pub color_setting_id: Option<String>,
    pub notes: Option<String>,
}

/// Query string of the list endpoint. A date range wins over a color
/// filter; with neither, every entry of the calendar is returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_setting_id: Option<String>,
}

/// Query string of the cross-calendar endpoint. Both bounds are required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntryResponse {
    pub id: Id,
    pub calendar_id: Id,
    pub user_id: Id,
    pub date: CalendarDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_setting: Option<ColorSettingResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl CalendarEntryResponse {
    pub fn new(entry: &CalendarEntry, setting: Option<&ColorSetting>) -> Self {
        Self {
            id: entry.id(),
            calendar_id: entry.calendar_id(),
            user_id: entry.user_id(),
            date: entry.date(),
            color_setting: setting.map(ColorSettingResponse::from),
            notes: entry.notes().map(str::to_string),
            created_at: entry.created_at(),
            updated_at: entry.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntriesResponse {
    pub data: Vec<CalendarEntryResponse>,
    pub total: usize,
    pub filters: EntryFilters,
}
