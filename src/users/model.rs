use time::OffsetDateTime;

use crate::domain::{Email, Id};
use crate::error::{AppError, AppResult};

pub const DEFAULT_TIMEZONE: &str = "UTC";
const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;

/// Registered account. `password_hash` is the `salt:hash` hex pair.
#[derive(Debug, Clone)]
pub struct User {
    id: Id,
    email: Email,
    username: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    timezone: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

/// Trims and length-checks a username.
pub fn validate_username(username: &str) -> AppResult<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::validation("username is required"));
    }
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&username.chars().count()) {
        return Err(AppError::validation(
            "username must be between 3 and 50 characters",
        ));
    }
    Ok(username.to_string())
}

impl User {
    pub fn new(email: Email, username: &str, password_hash: String) -> AppResult<Self> {
        let username = validate_username(username)?;
        if password_hash.is_empty() {
            return Err(AppError::validation("password is required"));
        }
        let now = OffsetDateTime::now_utc();
        Ok(Self {
            id: Id::generate(),
            email,
            username,
            password_hash,
            first_name: None,
            last_name: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a user from storage without re-validating.
    #[allow(clippy::too_many_arguments)]
    pub fn load(
        id: Id,
        email: Email,
        username: String,
        password_hash: String,
        first_name: Option<String>,
        last_name: Option<String>,
        timezone: String,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            email,
            username,
            password_hash,
            first_name,
            last_name,
            timezone,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
    }

    pub fn update_email(&mut self, email: Email) {
        self.email = email;
        self.touch();
    }

    pub fn update_username(&mut self, username: &str) -> AppResult<()> {
        self.username = validate_username(username)?;
        self.touch();
        Ok(())
    }

    pub fn update_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.touch();
    }

    pub fn update_first_name(&mut self, first_name: Option<String>) {
        self.first_name = first_name;
        self.touch();
    }

    pub fn update_last_name(&mut self, last_name: Option<String>) {
        self.last_name = last_name;
        self.touch();
    }

    /// Blank input falls back to UTC.
    pub fn update_timezone(&mut self, timezone: &str) {
        let tz = timezone.trim();
        self.timezone = if tz.is_empty() {
            DEFAULT_TIMEZONE.to_string()
        } else {
            tz.to_string()
        };
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> Email {
        Email::parse("a@test.com").unwrap()
    }

    #[test]
    fn new_user_defaults() {
        let u = User::new(email(), " alice ", "salt:hash".into()).unwrap();
        assert_eq!(u.username(), "alice");
        assert_eq!(u.timezone(), "UTC");
        assert_eq!(u.created_at(), u.updated_at());
        assert!(u.first_name().is_none());
    }

    #[test]
    fn username_length_is_enforced() {
        assert!(User::new(email(), "al", "h".into()).is_err());
        assert!(User::new(email(), &"x".repeat(51), "h".into()).is_err());
        assert!(User::new(email(), &"x".repeat(50), "h".into()).is_ok());
        assert!(User::new(email(), "   ", "h".into()).is_err());
    }

    #[test]
    fn mutators_bump_updated_at() {
        let mut u = User::new(email(), "alice", "h".into()).unwrap();
        let before = u.updated_at();
        std::thread::sleep(std::time::Duration::from_millis(2));
        u.update_timezone("  ");
        assert_eq!(u.timezone(), "UTC");
        assert!(u.updated_at() > before);

        assert!(u.update_username("yo").is_err());
        assert_eq!(u.username(), "alice");
        u.update_username("bob").unwrap();
        assert_eq!(u.username(), "bob");
    }
}
