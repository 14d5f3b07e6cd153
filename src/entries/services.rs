use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::color_settings::repo::ColorSettingRepository;
use crate::domain::{optional_text, CalendarDate, CalendarDomainService, Id};
use crate::entries::{
    dto::{
        CalendarEntriesResponse, CalendarEntryResponse, CreateCalendarEntryRequest,
        DateRangeQuery, EntryFilters, UpdateCalendarEntryRequest,
    },
    model::CalendarEntry,
    repo::CalendarEntryRepository,
};
use crate::error::{AppError, AppResult};

fn parse_range(start: &str, end: &str) -> AppResult<(CalendarDate, CalendarDate)> {
    let start = CalendarDate::parse(start)?;
    let end = CalendarDate::parse(end)?;
    if end.is_before(&start) {
        return Err(AppError::validation("endDate must not be before startDate"));
    }
    Ok((start, end))
}

#[derive(Clone)]
pub struct CalendarEntryService {
    entries: Arc<dyn CalendarEntryRepository>,
    color_settings: Arc<dyn ColorSettingRepository>,
    rules: CalendarDomainService,
}

impl CalendarEntryService {
    pub fn new(
        entries: Arc<dyn CalendarEntryRepository>,
        color_settings: Arc<dyn ColorSettingRepository>,
        rules: CalendarDomainService,
    ) -> Self {
        Self {
            entries,
            color_settings,
            rules,
        }
    }

    #[instrument(skip(self, req))]
    pub async fn create(
        &self,
        user_id: Id,
        calendar_id: Id,
        req: CreateCalendarEntryRequest,
    ) -> AppResult<CalendarEntryResponse> {
        let date = CalendarDate::parse(&req.date)?;
        let color_setting_id = Id::parse(&req.color_setting_id)?;

        self.rules
            .validate_calendar_ownership(user_id, calendar_id)
            .await?;
        let setting = self
            .rules
            .validate_calendar_entry_constraints(user_id, calendar_id, date, color_setting_id, None)
            .await?;

        let mut entry = CalendarEntry::new(calendar_id, user_id, date, color_setting_id)?;
        if req.notes.is_some() {
            entry.update_notes(optional_text(req.notes));
        }

        self.entries.save(&entry).await?;
        info!(entry_id = %entry.id(), %calendar_id, %date, "calendar entry created");
        Ok(CalendarEntryResponse::new(&entry, Some(&setting)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Id,
        calendar_id: Id,
        filters: EntryFilters,
    ) -> AppResult<CalendarEntriesResponse> {
        self.rules
            .validate_calendar_ownership(user_id, calendar_id)
            .await?;

        // A half-open range is ignored and the next filter applies.
        let entries = match (&filters.start_date, &filters.end_date, &filters.color_setting_id) {
            (Some(start), Some(end), _) => {
                let (start, end) = parse_range(start, end)?;
                self.entries
                    .find_by_calendar_and_date_range(calendar_id, start, end)
                    .await?
            }
            (_, _, Some(cs)) => {
                let cs = Id::parse(cs)?;
                self.entries
                    .find_by_calendar_and_color_setting(calendar_id, cs)
                    .await?
            }
            _ => self.entries.find_by_calendar(calendar_id).await?,
        };

        // One lookup for every color the calendar defines instead of one per entry.
        let settings: HashMap<Id, _> = self
            .color_settings
            .find_by_calendar(calendar_id)
            .await?
            .into_iter()
            .map(|s| (s.id(), s))
            .collect();

        let data: Vec<CalendarEntryResponse> = entries
            .iter()
            .map(|e| CalendarEntryResponse::new(e, settings.get(&e.color_setting_id())))
            .collect();
        Ok(CalendarEntriesResponse {
            total: data.len(),
            data,
            filters,
        })
    }

    /// Entries of every calendar the user owns within an inclusive range.
    #[instrument(skip(self))]
    pub async fn list_for_user(
        &self,
        user_id: Id,
        query: DateRangeQuery,
    ) -> AppResult<CalendarEntriesResponse> {
        let (Some(start), Some(end)) = (query.start_date, query.end_date) else {
            warn!(%user_id, "date range without both bounds");
            return Err(AppError::validation("startDate and endDate are required"));
        };
        let (from, to) = parse_range(&start, &end)?;
        let entries = self
            .entries
            .find_by_user_and_date_range(user_id, from, to)
            .await?;

        let calendars: HashSet<Id> = entries.iter().map(|e| e.calendar_id()).collect();
        let mut settings = HashMap::new();
        for calendar_id in calendars {
            for s in self.color_settings.find_by_calendar(calendar_id).await? {
                settings.insert(s.id(), s);
            }
        }

        let data: Vec<CalendarEntryResponse> = entries
            .iter()
            .map(|e| CalendarEntryResponse::new(e, settings.get(&e.color_setting_id())))
            .collect();
        Ok(CalendarEntriesResponse {
            total: data.len(),
            data,
            filters: EntryFilters {
                start_date: Some(start),
                end_date: Some(end),
                color_setting_id: None,
            },
        })
    }

    pub async fn get(
        &self,
        user_id: Id,
        calendar_id: Id,
        date: &str,
    ) -> AppResult<CalendarEntryResponse> {
        let entry = self.entry_on(user_id, calendar_id, date).await?;
        self.respond(&entry).await
    }

    /// Changing the color re-runs the entry constraints with the entry itself
    /// excluded from the date collision check.
    #[instrument(skip(self, req))]
    pub async fn update(
        &self,
        user_id: Id,
        calendar_id: Id,
        date: &str,
        req: UpdateCalendarEntryRequest,
    ) -> AppResult<CalendarEntryResponse> {
        let mut entry = self.entry_on(user_id, calendar_id, date).await?;

        if let Some(raw) = req.color_setting_id.as_deref() {
            let color_setting_id = Id::parse(raw)?;
            self.rules
                .validate_calendar_entry_constraints(
                    user_id,
                    calendar_id,
                    entry.date(),
                    color_setting_id,
                    Some(entry.id()),
                )
                .await?;
            entry.update_color_setting(color_setting_id)?;
        }
        if req.notes.is_some() {
            entry.update_notes(optional_text(req.notes));
        }

        self.entries.update(&entry).await?;
        info!(entry_id = %entry.id(), "calendar entry updated");
        self.respond(&entry).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Id, calendar_id: Id, date: &str) -> AppResult<()> {
        let entry = self.entry_on(user_id, calendar_id, date).await?;
        self.entries.delete(entry.id()).await?;
        info!(entry_id = %entry.id(), "calendar entry deleted");
        Ok(())
    }

    /// Resolves the caller's entry for `date` in an owned calendar.
    async fn entry_on(&self, user_id: Id, calendar_id: Id, date: &str) -> AppResult<CalendarEntry> {
        let date = CalendarDate::parse(date)?;
        self.rules
            .validate_calendar_ownership(user_id, calendar_id)
            .await?;
        let Some(found) = self
            .entries
            .find_by_calendar_and_date(calendar_id, date)
            .await?
        else {
            warn!(%calendar_id, %date, "no entry for date");
            return Err(AppError::not_found("calendar entry not found for this date"));
        };
        self.rules
            .validate_calendar_entry_ownership(user_id, found.id())
            .await
    }

    async fn respond(&self, entry: &CalendarEntry) -> AppResult<CalendarEntryResponse> {
        let setting = self
            .color_settings
            .find_by_id(entry.color_setting_id())
            .await?;
        Ok(CalendarEntryResponse::new(entry, setting.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::model::Calendar;
    use crate::color_settings::model::ColorSetting;
    use crate::domain::{Email, HexColor};
    use crate::memory::InMemoryStore;
    use crate::users::model::User;

    struct Fixture {
        svc: CalendarEntryService,
        user: Id,
        calendar: Id,
        red: Id,
        blue: Id,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryStore::default();
        let user = User::new(Email::parse("a@test.com").unwrap(), "alice", "aa:bb".into()).unwrap();
        store.users().save(&user).await.unwrap();
        let calendar = Calendar::new(user.id(), "Work", None).unwrap();
        store.calendars().save(&calendar).await.unwrap();
        let red = ColorSetting::new(calendar.id(), user.id(), "Busy", HexColor::parse("#FF0000").unwrap()).unwrap();
        let blue = ColorSetting::new(calendar.id(), user.id(), "Free", HexColor::parse("#0000FF").unwrap()).unwrap();
        store.color_settings().save(&red).await.unwrap();
        store.color_settings().save(&blue).await.unwrap();
        Fixture {
            svc: CalendarEntryService::new(store.entries(), store.color_settings(), store.calendar_rules()),
            user: user.id(),
            calendar: calendar.id(),
            red: red.id(),
            blue: blue.id(),
        }
    }

    fn on(date: &str, cs: Id) -> CreateCalendarEntryRequest {
        CreateCalendarEntryRequest {
            date: date.into(),
            color_setting_id: cs.to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_embeds_color_setting() {
        let f = fixture().await;
        let res = f.svc.create(f.user, f.calendar, on("2024-01-15", f.red)).await.unwrap();
        assert_eq!(res.date.to_string(), "2024-01-15");
        let cs = res.color_setting.expect("color setting embedded");
        assert_eq!(cs.id, f.red);
        assert_eq!(cs.hex_color, "#FF0000");
    }

    #[tokio::test]
    async fn one_entry_per_date() {
        let f = fixture().await;
        f.svc.create(f.user, f.calendar, on("2024-01-15", f.red)).await.unwrap();
        let err = f
            .svc
            .create(f.user, f.calendar, on("2024-01-15", f.blue))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_tolerates_own_date() {
        let f = fixture().await;
        f.svc.create(f.user, f.calendar, on("2024-01-15", f.red)).await.unwrap();

        let notes_only = UpdateCalendarEntryRequest {
            notes: Some("standup".into()),
            ..Default::default()
        };
        let res = f.svc.update(f.user, f.calendar, "2024-01-15", notes_only).await.unwrap();
        assert_eq!(res.notes.as_deref(), Some("standup"));
        assert_eq!(res.color_setting.unwrap().id, f.red);

        let recolor = UpdateCalendarEntryRequest {
            color_setting_id: Some(f.blue.to_string()),
            ..Default::default()
        };
        let res = f.svc.update(f.user, f.calendar, "2024-01-15", recolor).await.unwrap();
        assert_eq!(res.color_setting.unwrap().id, f.blue);
        assert_eq!(res.notes.as_deref(), Some("standup"));
    }

    #[tokio::test]
    async fn missing_entries_and_bad_dates() {
        let f = fixture().await;
        assert!(matches!(
            f.svc.get(f.user, f.calendar, "2024-01-15").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.svc.delete(f.user, f.calendar, "2024-01-15").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.svc.get(f.user, f.calendar, "2023-02-29").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            f.svc.create(f.user, f.calendar, on("15/01/2024", f.red)).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn list_filters_by_priority() {
        let f = fixture().await;
        for (day, cs) in [("2024-01-10", f.red), ("2024-01-15", f.blue), ("2024-01-20", f.red)] {
            f.svc.create(f.user, f.calendar, on(day, cs)).await.unwrap();
        }

        let all = f.svc.list(f.user, f.calendar, EntryFilters::default()).await.unwrap();
        assert_eq!(all.total, 3);

        let range = EntryFilters {
            start_date: Some("2024-01-12".into()),
            end_date: Some("2024-01-20".into()),
            color_setting_id: Some(f.blue.to_string()),
        };
        let res = f.svc.list(f.user, f.calendar, range).await.unwrap();
        let days: Vec<String> = res.data.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(days, ["2024-01-15", "2024-01-20"]);

        let by_color = EntryFilters {
            color_setting_id: Some(f.red.to_string()),
            ..Default::default()
        };
        assert_eq!(f.svc.list(f.user, f.calendar, by_color).await.unwrap().total, 2);

        let backwards = EntryFilters {
            start_date: Some("2024-01-20".into()),
            end_date: Some("2024-01-10".into()),
            ..Default::default()
        };
        assert!(matches!(
            f.svc.list(f.user, f.calendar, backwards).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn strangers_are_forbidden() {
        let f = fixture().await;
        f.svc.create(f.user, f.calendar, on("2024-01-15", f.red)).await.unwrap();
        let stranger = Id::generate();
        assert!(matches!(
            f.svc.get(stranger, f.calendar, "2024-01-15").await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            f.svc.list(stranger, f.calendar, EntryFilters::default()).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn delete_then_recreate() {
        let f = fixture().await;
        f.svc.create(f.user, f.calendar, on("2024-01-15", f.red)).await.unwrap();
        f.svc.delete(f.user, f.calendar, "2024-01-15").await.unwrap();
        f.svc.create(f.user, f.calendar, on("2024-01-15", f.blue)).await.unwrap();
    }

    #[tokio::test]
    async fn half_range_falls_through_to_next_filter() {
        let f = fixture().await;
        for (day, cs) in [("2024-01-10", f.red), ("2024-01-15", f.blue), ("2024-01-20", f.red)] {
            f.svc.create(f.user, f.calendar, on(day, cs)).await.unwrap();
        }

        let start_and_color = EntryFilters {
            start_date: Some("2024-01-12".into()),
            color_setting_id: Some(f.red.to_string()),
            ..Default::default()
        };
        let res = f.svc.list(f.user, f.calendar, start_and_color).await.unwrap();
        let days: Vec<String> = res.data.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(days, ["2024-01-10", "2024-01-20"]);

        let start_only = EntryFilters {
            start_date: Some("2024-01-12".into()),
            ..Default::default()
        };
        assert_eq!(f.svc.list(f.user, f.calendar, start_only).await.unwrap().total, 3);

        let end_only = EntryFilters {
            end_date: Some("2024-01-12".into()),
            ..Default::default()
        };
        assert_eq!(f.svc.list(f.user, f.calendar, end_only).await.unwrap().total, 3);
    }

    fn range(start: Option<&str>, end: Option<&str>) -> DateRangeQuery {
        DateRangeQuery {
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn user_range_spans_calendars_and_skips_other_users() {
        let store = InMemoryStore::default();
        let alice = User::new(Email::parse("a@test.com").unwrap(), "alice", "aa:bb".into()).unwrap();
        let bob = User::new(Email::parse("b@test.com").unwrap(), "bobby", "aa:bb".into()).unwrap();
        store.users().save(&alice).await.unwrap();
        store.users().save(&bob).await.unwrap();
        let svc = CalendarEntryService::new(store.entries(), store.color_settings(), store.calendar_rules());

        let mut seeded = Vec::new();
        for (owner, name) in [(&alice, "Work"), (&alice, "Gym"), (&bob, "Work")] {
            let calendar = Calendar::new(owner.id(), name, None).unwrap();
            store.calendars().save(&calendar).await.unwrap();
            let red = ColorSetting::new(calendar.id(), owner.id(), "Busy", HexColor::parse("#FF0000").unwrap()).unwrap();
            store.color_settings().save(&red).await.unwrap();
            svc.create(owner.id(), calendar.id(), on("2024-01-15", red.id())).await.unwrap();
            seeded.push(calendar.id());
        }

        let res = svc
            .list_for_user(alice.id(), range(Some("2024-01-01"), Some("2024-01-31")))
            .await
            .unwrap();
        assert_eq!(res.total, 2);
        let mut calendars: Vec<Id> = res.data.iter().map(|e| e.calendar_id).collect();
        calendars.retain(|id| *id != seeded[0] && *id != seeded[1]);
        assert!(calendars.is_empty());
        assert!(res.data.iter().all(|e| e.user_id == alice.id()));
        assert!(res.data.iter().all(|e| e.color_setting.is_some()));
        assert_eq!(res.filters.start_date.as_deref(), Some("2024-01-01"));

        let outside = svc
            .list_for_user(alice.id(), range(Some("2024-02-01"), Some("2024-02-29")))
            .await
            .unwrap();
        assert_eq!(outside.total, 0);

        assert!(matches!(
            svc.list_for_user(alice.id(), range(Some("2024-01-31"), Some("2024-01-01"))).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            svc.list_for_user(alice.id(), range(Some("2024-01-01"), None)).await,
            Err(AppError::Validation(_))
        ));
    }
}
