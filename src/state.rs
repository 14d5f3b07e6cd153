use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::auth::{jwt::JwtKeys, services::AuthService};
use crate::calendars::{
    repo::{CalendarRepository, PgCalendarRepository},
    services::CalendarService,
};
use crate::color_settings::{
    repo::{ColorSettingRepository, PgColorSettingRepository},
    services::ColorSettingService,
};
use crate::config::AppConfig;
use crate::db;
use crate::domain::{CalendarDomainService, UserDomainService};
use crate::entries::{
    repo::{CalendarEntryRepository, PgCalendarEntryRepository},
    services::CalendarEntryService,
};
use crate::users::{
    repo::{PgUserRepository, UserRepository},
    services::UserService,
};

/// The four persistence ports, injected into every service.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub calendars: Arc<dyn CalendarRepository>,
    pub color_settings: Arc<dyn ColorSettingRepository>,
    pub entries: Arc<dyn CalendarEntryRepository>,
}

impl Repositories {
    pub fn postgres(db: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            calendars: Arc::new(PgCalendarRepository::new(db.clone())),
            color_settings: Arc::new(PgColorSettingRepository::new(db.clone())),
            entries: Arc::new(PgCalendarEntryRepository::new(db)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: UserService,
    pub auth: AuthService,
    pub calendars: CalendarService,
    pub color_settings: ColorSettingService,
    pub entries: CalendarEntryService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let db = db::connect(&config).await?;
        Ok(Self::from_repositories(config, Repositories::postgres(db)))
    }

    pub fn from_repositories(config: AppConfig, repos: Repositories) -> Self {
        let config = Arc::new(config);
        let user_rules = UserDomainService::new(repos.users.clone());
        let calendar_rules = CalendarDomainService::new(
            user_rules.clone(),
            repos.calendars.clone(),
            repos.color_settings.clone(),
            repos.entries.clone(),
        );
        let keys = JwtKeys::new(
            &config.jwt.secret,
            Duration::from_secs(config.jwt.ttl_minutes * 60),
        );

        Self {
            users: UserService::new(repos.users.clone(), user_rules.clone(), config.password),
            auth: AuthService::new(repos.users.clone(), keys, config.password),
            calendars: CalendarService::new(
                repos.calendars.clone(),
                user_rules,
                calendar_rules.clone(),
            ),
            color_settings: ColorSettingService::new(
                repos.color_settings.clone(),
                calendar_rules.clone(),
            ),
            entries: CalendarEntryService::new(repos.entries, repos.color_settings, calendar_rules),
            config,
        }
    }
}
