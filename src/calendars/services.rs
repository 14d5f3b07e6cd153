use std::sync::Arc;

use tracing::{info, instrument};

use crate::calendars::{
    dto::{CalendarResponse, CreateCalendarRequest, UpdateCalendarRequest},
    model::{validate_name, Calendar},
    repo::CalendarRepository,
};
use crate::domain::{optional_text, CalendarDomainService, Id, UserDomainService};
use crate::error::AppResult;

#[derive(Clone)]
pub struct CalendarService {
    calendars: Arc<dyn CalendarRepository>,
    user_rules: UserDomainService,
    rules: CalendarDomainService,
}

impl CalendarService {
    pub fn new(
        calendars: Arc<dyn CalendarRepository>,
        user_rules: UserDomainService,
        rules: CalendarDomainService,
    ) -> Self {
        Self {
            calendars,
            user_rules,
            rules,
        }
    }

    #[instrument(skip(self, req))]
    pub async fn create(&self, user_id: Id, req: CreateCalendarRequest) -> AppResult<CalendarResponse> {
        let name = validate_name(&req.name)?;
        self.user_rules.validate_user_exists(user_id).await?;
        self.rules
            .validate_calendar_name_unique(user_id, &name, None)
            .await?;

        let calendar = Calendar::new(user_id, &name, optional_text(req.description))?;
        self.calendars.save(&calendar).await?;
        info!(calendar_id = %calendar.id(), %user_id, "calendar created");
        Ok(CalendarResponse::from(&calendar))
    }

    pub async fn list(&self, user_id: Id) -> AppResult<Vec<CalendarResponse>> {
        let calendars = self.calendars.find_by_user(user_id).await?;
        Ok(calendars.iter().map(CalendarResponse::from).collect())
    }

    pub async fn get(&self, user_id: Id, id: Id) -> AppResult<CalendarResponse> {
        let calendar = self.rules.validate_calendar_ownership(user_id, id).await?;
        Ok(CalendarResponse::from(&calendar))
    }

    #[instrument(skip(self, req))]
    pub async fn update(
        &self,
        user_id: Id,
        id: Id,
        req: UpdateCalendarRequest,
    ) -> AppResult<CalendarResponse> {
        let mut calendar = self.rules.validate_calendar_ownership(user_id, id).await?;

        if let Some(raw) = req.name.as_deref() {
            let name = validate_name(raw)?;
            self.rules
                .validate_calendar_name_unique(user_id, &name, Some(id))
                .await?;
            calendar.rename(&name)?;
        }
        if req.description.is_some() {
            calendar.update_description(optional_text(req.description));
        }

        self.calendars.update(&calendar).await?;
        info!(calendar_id = %id, "calendar updated");
        Ok(CalendarResponse::from(&calendar))
    }

    /// Color settings and entries go with it.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Id, id: Id) -> AppResult<()> {
        self.rules.validate_calendar_ownership(user_id, id).await?;
        self.calendars.delete(id).await?;
        info!(calendar_id = %id, "calendar deleted");
        Ok(())
    }
}
