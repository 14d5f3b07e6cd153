use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::color_settings::model::ColorSetting;
use crate::domain::Id;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColorSettingRequest {
    pub name: String,
    pub hex_color: String,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub is_default: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateColorSettingRequest {
    pub name: Option<String>,
    pub hex_color: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSettingResponse {
    pub id: Id,
    pub calendar_id: Id,
    pub user_id: Id,
    pub name: String,
    pub hex_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_default: bool,
    pub sort_order: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&ColorSetting> for ColorSettingResponse {
    fn from(s: &ColorSetting) -> Self {
        Self {
            id: s.id(),
            calendar_id: s.calendar_id(),
            user_id: s.user_id(),
            name: s.name().to_string(),
            hex_color: s.hex_color().to_string(),
            description: s.description().map(str::to_string),
            is_default: s.is_default(),
            sort_order: s.sort_order(),
            created_at: s.created_at(),
            updated_at: s.updated_at(),
        }
    }
}
