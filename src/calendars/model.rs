use time::OffsetDateTime;

use crate::domain::Id;
use crate::error::{AppError, AppResult};

const NAME_MAX: usize = 100;

#[derive(Debug, Clone)]
pub struct Calendar {
    id: Id,
    user_id: Id,
    name: String,
    description: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

/// Trims and checks a calendar name, returning the stored form.
pub fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("calendar name cannot be empty"));
    }
    if name.chars().count() > NAME_MAX {
        return Err(AppError::validation(
            "calendar name cannot exceed 100 characters",
        ));
    }
    Ok(name.to_string())
}

impl Calendar {
    pub fn new(user_id: Id, name: &str, description: Option<String>) -> AppResult<Self> {
        let name = validate_name(name)?;
        let now = OffsetDateTime::now_utc();
        Ok(Self {
            id: Id::generate(),
            user_id,
            name,
            description,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn load(
        id: Id,
        user_id: Id,
        name: String,
        description: Option<String>,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            description,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn user_id(&self) -> Id {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    pub fn belongs_to(&self, user_id: Id) -> bool {
        self.user_id == user_id
    }

    /// Case-insensitive name comparison used for per-user uniqueness.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    pub fn rename(&mut self, name: &str) -> AppResult<()> {
        self.name = validate_name(name)?;
        self.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    pub fn update_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = OffsetDateTime::now_utc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_bounded() {
        let c = Calendar::new(Id::generate(), "  Work  ", None).unwrap();
        assert_eq!(c.name(), "Work");
        assert!(Calendar::new(Id::generate(), "   ", None).is_err());
        assert!(Calendar::new(Id::generate(), &"n".repeat(101), None).is_err());
        assert!(Calendar::new(Id::generate(), &"n".repeat(100), None).is_ok());
    }

    #[test]
    fn name_match_ignores_case() {
        let c = Calendar::new(Id::generate(), "Work", None).unwrap();
        assert!(c.has_name("work"));
        assert!(c.has_name(" WORK "));
        assert!(!c.has_name("Home"));
    }

    #[test]
    fn rename_keeps_old_name_on_failure() {
        let mut c = Calendar::new(Id::generate(), "Work", None).unwrap();
        assert!(c.rename("").is_err());
        assert_eq!(c.name(), "Work");
        c.rename("Office").unwrap();
        assert_eq!(c.name(), "Office");
    }
}
