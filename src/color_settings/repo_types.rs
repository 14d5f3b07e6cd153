use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::color_settings::model::ColorSetting;
use crate::domain::HexColor;

#[derive(Debug, Clone, FromRow)]
pub struct ColorSettingRow {
    pub id: Uuid,
    pub calendar_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub hex_color: String, // always #RRGGBB
    pub description: Option<String>,
    pub is_default: bool,
    pub sort_order: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<ColorSettingRow> for ColorSetting {
    fn from(r: ColorSettingRow) -> Self {
        ColorSetting::load(
            r.id.into(),
            r.calendar_id.into(),
            r.user_id.into(),
            r.name,
            HexColor::from_trusted(r.hex_color),
            r.description,
            r.is_default,
            r.sort_order,
            r.created_at,
            r.updated_at,
        )
    }
}
