use time::OffsetDateTime;

use crate::domain::{HexColor, Id};
use crate::error::{AppError, AppResult};

const NAME_MAX: usize = 100;

/// Color-to-meaning mapping scoped to one calendar.
#[derive(Debug, Clone)]
pub struct ColorSetting {
    id: Id,
    calendar_id: Id,
    user_id: Id,
    name: String,
    hex_color: HexColor,
    description: Option<String>,
    is_default: bool,
    sort_order: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

/// Trims and checks a color setting name.
pub fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("color setting name cannot be empty"));
    }
    if name.chars().count() > NAME_MAX {
        return Err(AppError::validation(
            "color setting name cannot exceed 100 characters",
        ));
    }
    Ok(name.to_string())
}

impl ColorSetting {
    pub fn new(calendar_id: Id, user_id: Id, name: &str, hex_color: HexColor) -> AppResult<Self> {
        let name = validate_name(name)?;
        let now = OffsetDateTime::now_utc();
        Ok(Self {
            id: Id::generate(),
            calendar_id,
            user_id,
            name,
            hex_color,
            description: None,
            is_default: false,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn load(
        id: Id,
        calendar_id: Id,
        user_id: Id,
        name: String,
        hex_color: HexColor,
        description: Option<String>,
        is_default: bool,
        sort_order: i32,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            calendar_id,
            user_id,
            name,
            hex_color,
            description,
            is_default,
            sort_order,
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

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hex_color(&self) -> &HexColor {
        &self.hex_color
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    pub fn belongs_to_user(&self, user_id: Id) -> bool {
        self.user_id == user_id
    }

    pub fn belongs_to_calendar(&self, calendar_id: Id) -> bool {
        self.calendar_id == calendar_id
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
    }

    pub fn update_name(&mut self, name: &str) -> AppResult<()> {
        self.name = validate_name(name)?;
        self.touch();
        Ok(())
    }

    pub fn update_hex_color(&mut self, hex_color: HexColor) {
        self.hex_color = hex_color;
        self.touch();
    }

    pub fn update_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    pub fn update_sort_order(&mut self, sort_order: i32) {
        self.sort_order = sort_order;
        self.touch();
    }

    pub fn set_default(&mut self, is_default: bool) {
        self.is_default = is_default;
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> HexColor {
        HexColor::parse("#f00").unwrap()
    }

    #[test]
    fn new_setting_defaults() {
        let cs = ColorSetting::new(Id::generate(), Id::generate(), " Busy ", red()).unwrap();
        assert_eq!(cs.name(), "Busy");
        assert_eq!(cs.hex_color().as_str(), "#FF0000");
        assert_eq!(cs.sort_order(), 0);
        assert!(!cs.is_default());
    }

    #[test]
    fn name_bounds() {
        assert!(ColorSetting::new(Id::generate(), Id::generate(), "", red()).is_err());
        assert!(ColorSetting::new(Id::generate(), Id::generate(), &"c".repeat(101), red()).is_err());
    }

    #[test]
    fn ownership_predicates() {
        let cal = Id::generate();
        let user = Id::generate();
        let cs = ColorSetting::new(cal, user, "Busy", red()).unwrap();
        assert!(cs.belongs_to_calendar(cal));
        assert!(cs.belongs_to_user(user));
        assert!(!cs.belongs_to_user(Id::generate()));
        assert!(cs.has_name("busy"));
    }
}
