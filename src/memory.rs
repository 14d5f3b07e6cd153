//! In-memory repositories backing the test suite. All four share one set of
//! tables so deletes cascade the same way the Postgres schema does.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::calendars::{model::Calendar, repo::CalendarRepository};
use crate::color_settings::{model::ColorSetting, repo::ColorSettingRepository};
use crate::domain::{CalendarDate, CalendarDomainService, Email, Id, UserDomainService};
use crate::entries::{model::CalendarEntry, repo::CalendarEntryRepository};
use crate::state::Repositories;
use crate::users::{model::User, repo::UserRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Id, User>,
    calendars: HashMap<Id, Calendar>,
    color_settings: HashMap<Id, ColorSetting>,
    entries: HashMap<Id, CalendarEntry>,
}

impl Tables {
    fn drop_calendar(&mut self, id: Id) {
        self.calendars.remove(&id);
        self.color_settings.retain(|_, s| s.calendar_id() != id);
        self.entries.retain(|_, e| e.calendar_id() != id);
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.clone())
    }

    pub fn calendars(&self) -> Arc<dyn CalendarRepository> {
        Arc::new(self.clone())
    }

    pub fn color_settings(&self) -> Arc<dyn ColorSettingRepository> {
        Arc::new(self.clone())
    }

    pub fn entries(&self) -> Arc<dyn CalendarEntryRepository> {
        Arc::new(self.clone())
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: self.users(),
            calendars: self.calendars(),
            color_settings: self.color_settings(),
            entries: self.entries(),
        }
    }

    pub fn user_rules(&self) -> UserDomainService {
        UserDomainService::new(self.users())
    }

    pub fn calendar_rules(&self) -> CalendarDomainService {
        CalendarDomainService::new(
            self.user_rules(),
            self.calendars(),
            self.color_settings(),
            self.entries(),
        )
    }
}

fn sorted_by_date(mut entries: Vec<CalendarEntry>) -> Vec<CalendarEntry> {
    entries.sort_by_key(|e| e.date());
    entries
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn save(&self, user: &User) -> anyhow::Result<()> {
        self.lock().users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Id) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> anyhow::Result<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email() == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.username() == username)
            .cloned())
    }

    async fn update(&self, user: &User) -> anyhow::Result<()> {
        self.lock().users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn delete(&self, id: Id) -> anyhow::Result<()> {
        let mut t = self.lock();
        t.users.remove(&id);
        let owned: Vec<Id> = t
            .calendars
            .values()
            .filter(|c| c.belongs_to(id))
            .map(|c| c.id())
            .collect();
        for calendar_id in owned {
            t.drop_calendar(calendar_id);
        }
        Ok(())
    }

    async fn exists_by_email(&self, email: &Email) -> anyhow::Result<bool> {
        Ok(self.lock().users.values().any(|u| u.email() == email))
    }

    async fn exists_by_username(&self, username: &str) -> anyhow::Result<bool> {
        Ok(self.lock().users.values().any(|u| u.username() == username))
    }
}

#[async_trait]
impl CalendarRepository for InMemoryStore {
    async fn save(&self, calendar: &Calendar) -> anyhow::Result<()> {
        self.lock().calendars.insert(calendar.id(), calendar.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Id) -> anyhow::Result<Option<Calendar>> {
        Ok(self.lock().calendars.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Id) -> anyhow::Result<Vec<Calendar>> {
        let mut found: Vec<Calendar> = self
            .lock()
            .calendars
            .values()
            .filter(|c| c.belongs_to(user_id))
            .cloned()
            .collect();
        found.sort_by_key(|c| c.created_at());
        Ok(found)
    }

    async fn update(&self, calendar: &Calendar) -> anyhow::Result<()> {
        self.lock().calendars.insert(calendar.id(), calendar.clone());
        Ok(())
    }

    async fn delete(&self, id: Id) -> anyhow::Result<()> {
        self.lock().drop_calendar(id);
        Ok(())
    }
}

#[async_trait]
impl ColorSettingRepository for InMemoryStore {
    async fn save(&self, setting: &ColorSetting) -> anyhow::Result<()> {
        self.lock()
            .color_settings
            .insert(setting.id(), setting.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Id) -> anyhow::Result<Option<ColorSetting>> {
        Ok(self.lock().color_settings.get(&id).cloned())
    }

    async fn find_by_calendar(&self, calendar_id: Id) -> anyhow::Result<Vec<ColorSetting>> {
        let mut found: Vec<ColorSetting> = self
            .lock()
            .color_settings
            .values()
            .filter(|s| s.belongs_to_calendar(calendar_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.sort_order()
                .cmp(&b.sort_order())
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(found)
    }

    async fn update(&self, setting: &ColorSetting) -> anyhow::Result<()> {
        self.lock()
            .color_settings
            .insert(setting.id(), setting.clone());
        Ok(())
    }

    async fn delete(&self, id: Id) -> anyhow::Result<()> {
        let mut t = self.lock();
        t.color_settings.remove(&id);
        t.entries.retain(|_, e| e.color_setting_id() != id);
        Ok(())
    }
}

#[async_trait]
impl CalendarEntryRepository for InMemoryStore {
    async fn save(&self, entry: &CalendarEntry) -> anyhow::Result<()> {
        self.lock().entries.insert(entry.id(), entry.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Id) -> anyhow::Result<Option<CalendarEntry>> {
        Ok(self.lock().entries.get(&id).cloned())
    }

    async fn find_by_calendar(&self, calendar_id: Id) -> anyhow::Result<Vec<CalendarEntry>> {
        let found = self
            .lock()
            .entries
            .values()
            .filter(|e| e.calendar_id() == calendar_id)
            .cloned()
            .collect();
        Ok(sorted_by_date(found))
    }

    async fn find_by_calendar_and_date(
        &self,
        calendar_id: Id,
        date: CalendarDate,
    ) -> anyhow::Result<Option<CalendarEntry>> {
        Ok(self
            .lock()
            .entries
            .values()
            .find(|e| e.calendar_id() == calendar_id && e.is_for_date(date))
            .cloned())
    }

    async fn find_by_calendar_and_date_range(
        &self,
        calendar_id: Id,
        start: CalendarDate,
        end: CalendarDate,
    ) -> anyhow::Result<Vec<CalendarEntry>> {
        let found = self
            .lock()
            .entries
            .values()
            .filter(|e| e.calendar_id() == calendar_id && e.date() >= start && e.date() <= end)
            .cloned()
            .collect();
        Ok(sorted_by_date(found))
    }

    async fn find_by_calendar_and_color_setting(
        &self,
        calendar_id: Id,
        color_setting_id: Id,
    ) -> anyhow::Result<Vec<CalendarEntry>> {
        let found = self
            .lock()
            .entries
            .values()
            .filter(|e| e.calendar_id() == calendar_id && e.color_setting_id() == color_setting_id)
            .cloned()
            .collect();
        Ok(sorted_by_date(found))
    }

    async fn find_by_user_and_date_range(
        &self,
        user_id: Id,
        start: CalendarDate,
        end: CalendarDate,
    ) -> anyhow::Result<Vec<CalendarEntry>> {
        let found = self
            .lock()
            .entries
            .values()
            .filter(|e| e.belongs_to_user(user_id) && e.date() >= start && e.date() <= end)
            .cloned()
            .collect();
        Ok(sorted_by_date(found))
    }

    async fn update(&self, entry: &CalendarEntry) -> anyhow::Result<()> {
        self.lock().entries.insert(entry.id(), entry.clone());
        Ok(())
    }

    async fn delete(&self, id: Id) -> anyhow::Result<()> {
        self.lock().entries.remove(&id);
        Ok(())
    }

    async fn exists_by_calendar_and_date(
        &self,
        calendar_id: Id,
        date: CalendarDate,
    ) -> anyhow::Result<bool> {
        Ok(self
            .lock()
            .entries
            .values()
            .any(|e| e.calendar_id() == calendar_id && e.is_for_date(date)))
    }
}
