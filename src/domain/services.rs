use std::sync::Arc;

use tracing::{instrument, warn};

use crate::calendars::{model::Calendar, repo::CalendarRepository};
use crate::color_settings::{model::ColorSetting, repo::ColorSettingRepository};
use crate::domain::{CalendarDate, Email, HexColor, Id};
use crate::entries::{model::CalendarEntry, repo::CalendarEntryRepository};
use crate::error::{AppError, AppResult};
use crate::users::{model::User, repo::UserRepository};

/// Cross-user rules: uniqueness of email and username, existence.
#[derive(Clone)]
pub struct UserDomainService {
    users: Arc<dyn UserRepository>,
}

impl UserDomainService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// `exclude` is the user being updated; matching it is not a conflict.
    #[instrument(skip(self, email, username))]
    pub async fn validate_unique_constraints(
        &self,
        email: &Email,
        username: &str,
        exclude: Option<Id>,
    ) -> AppResult<()> {
        match exclude {
            None => {
                if self.users.exists_by_email(email).await? {
                    warn!(%email, "email already taken");
                    return Err(AppError::conflict("email already exists"));
                }
                if self.users.exists_by_username(username).await? {
                    warn!(username, "username already taken");
                    return Err(AppError::conflict("username already exists"));
                }
            }
            Some(self_id) => {
                if let Some(other) = self.users.find_by_email(email).await? {
                    if other.id() != self_id {
                        warn!(%email, "email already taken");
                        return Err(AppError::conflict("email already exists"));
                    }
                }
                if let Some(other) = self.users.find_by_username(username).await? {
                    if other.id() != self_id {
                        warn!(username, "username already taken");
                        return Err(AppError::conflict("username already exists"));
                    }
                }
            }
        }
        Ok(())
    }

    pub async fn validate_user_exists(&self, id: Id) -> AppResult<User> {
        if id.is_nil() {
            return Err(AppError::not_found("user not found"));
        }
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))
    }
}

/// Ownership, uniqueness and collision rules for calendars and everything
/// hanging off them.
#[derive(Clone)]
pub struct CalendarDomainService {
    user_rules: UserDomainService,
    calendars: Arc<dyn CalendarRepository>,
    color_settings: Arc<dyn ColorSettingRepository>,
    entries: Arc<dyn CalendarEntryRepository>,
}

impl CalendarDomainService {
    pub fn new(
        user_rules: UserDomainService,
        calendars: Arc<dyn CalendarRepository>,
        color_settings: Arc<dyn ColorSettingRepository>,
        entries: Arc<dyn CalendarEntryRepository>,
    ) -> Self {
        Self {
            user_rules,
            calendars,
            color_settings,
            entries,
        }
    }

    pub async fn validate_calendar_ownership(
        &self,
        user_id: Id,
        calendar_id: Id,
    ) -> AppResult<Calendar> {
        let calendar = self
            .calendars
            .find_by_id(calendar_id)
            .await?
            .ok_or_else(|| AppError::not_found("calendar not found"))?;
        if !calendar.belongs_to(user_id) {
            warn!(%user_id, %calendar_id, "calendar owned by another user");
            return Err(AppError::forbidden("calendar does not belong to user"));
        }
        Ok(calendar)
    }

    pub async fn validate_calendar_name_unique(
        &self,
        user_id: Id,
        name: &str,
        exclude: Option<Id>,
    ) -> AppResult<()> {
        let taken = self
            .calendars
            .find_by_user(user_id)
            .await?
            .iter()
            .any(|c| c.has_name(name) && Some(c.id()) != exclude);
        if taken {
            return Err(AppError::conflict("calendar name already exists"));
        }
        Ok(())
    }

    pub async fn validate_color_setting_ownership(
        &self,
        user_id: Id,
        color_setting_id: Id,
    ) -> AppResult<ColorSetting> {
        let setting = self
            .color_settings
            .find_by_id(color_setting_id)
            .await?
            .ok_or_else(|| AppError::not_found("color setting not found"))?;
        if !setting.belongs_to_user(user_id) {
            warn!(%user_id, %color_setting_id, "color setting owned by another user");
            return Err(AppError::forbidden("color setting does not belong to user"));
        }
        Ok(setting)
    }

    /// Color and name are each unique inside one calendar.
    pub async fn validate_color_setting_unique(
        &self,
        calendar_id: Id,
        hex_color: &HexColor,
        name: &str,
        exclude: Option<Id>,
    ) -> AppResult<()> {
        let siblings = self.color_settings.find_by_calendar(calendar_id).await?;
        for other in siblings.iter().filter(|s| Some(s.id()) != exclude) {
            if other.hex_color() == hex_color {
                return Err(AppError::conflict("color already exists in this calendar"));
            }
            if other.has_name(name) {
                return Err(AppError::conflict("color name already exists in this calendar"));
            }
        }
        Ok(())
    }

    pub async fn validate_calendar_entry_ownership(
        &self,
        user_id: Id,
        entry_id: Id,
    ) -> AppResult<CalendarEntry> {
        let entry = self
            .entries
            .find_by_id(entry_id)
            .await?
            .ok_or_else(|| AppError::not_found("calendar entry not found"))?;
        if !entry.belongs_to_user(user_id) {
            warn!(%user_id, %entry_id, "entry owned by another user");
            return Err(AppError::forbidden("calendar entry does not belong to user"));
        }
        Ok(entry)
    }

    /// User exists, the color setting is the user's and lives in this
    /// calendar, and no other entry occupies `date`. Returns the resolved
    /// color setting.
    #[instrument(skip(self))]
    pub async fn validate_calendar_entry_constraints(
        &self,
        user_id: Id,
        calendar_id: Id,
        date: CalendarDate,
        color_setting_id: Id,
        exclude: Option<Id>,
    ) -> AppResult<ColorSetting> {
        self.user_rules.validate_user_exists(user_id).await?;

        let setting = self
            .validate_color_setting_ownership(user_id, color_setting_id)
            .await?;
        if !setting.belongs_to_calendar(calendar_id) {
            return Err(AppError::validation(
                "color setting does not belong to this calendar",
            ));
        }

        if let Some(existing) = self
            .entries
            .find_by_calendar_and_date(calendar_id, date)
            .await?
        {
            if Some(existing.id()) != exclude {
                warn!(%calendar_id, %date, "date already taken");
                return Err(AppError::conflict("calendar entry already exists for this date"));
            }
        }
        Ok(setting)
    }
}
