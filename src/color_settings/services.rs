use std::sync::Arc;

use tracing::{info, instrument};

use crate::color_settings::{
    dto::{ColorSettingResponse, CreateColorSettingRequest, UpdateColorSettingRequest},
    model::{validate_name, ColorSetting},
    repo::ColorSettingRepository,
};
use crate::domain::{optional_text, CalendarDomainService, HexColor, Id};
use crate::error::AppResult;

#[derive(Clone)]
pub struct ColorSettingService {
    color_settings: Arc<dyn ColorSettingRepository>,
    rules: CalendarDomainService,
}

impl ColorSettingService {
    pub fn new(color_settings: Arc<dyn ColorSettingRepository>, rules: CalendarDomainService) -> Self {
        Self {
            color_settings,
            rules,
        }
    }

    #[instrument(skip(self, req))]
    pub async fn create(
        &self,
        user_id: Id,
        calendar_id: Id,
        req: CreateColorSettingRequest,
    ) -> AppResult<ColorSettingResponse> {
        let name = validate_name(&req.name)?;
        let hex = HexColor::parse(&req.hex_color)?;
        self.rules
            .validate_calendar_ownership(user_id, calendar_id)
            .await?;
        self.rules
            .validate_color_setting_unique(calendar_id, &hex, &name, None)
            .await?;

        let mut setting = ColorSetting::new(calendar_id, user_id, &name, hex)?;
        if req.description.is_some() {
            setting.update_description(optional_text(req.description));
        }
        if let Some(order) = req.sort_order {
            setting.update_sort_order(order);
        }
        if let Some(is_default) = req.is_default {
            setting.set_default(is_default);
        }

        self.color_settings.save(&setting).await?;
        info!(color_setting_id = %setting.id(), %calendar_id, "color setting created");
        Ok(ColorSettingResponse::from(&setting))
    }

    /// Ordered by sort order, then name.
    pub async fn list(&self, user_id: Id, calendar_id: Id) -> AppResult<Vec<ColorSettingResponse>> {
        self.rules
            .validate_calendar_ownership(user_id, calendar_id)
            .await?;
        let settings = self.color_settings.find_by_calendar(calendar_id).await?;
        Ok(settings.iter().map(ColorSettingResponse::from).collect())
    }

    pub async fn get(&self, user_id: Id, id: Id) -> AppResult<ColorSettingResponse> {
        let setting = self.rules.validate_color_setting_ownership(user_id, id).await?;
        Ok(ColorSettingResponse::from(&setting))
    }

    #[instrument(skip(self, req))]
    pub async fn update(
        &self,
        user_id: Id,
        id: Id,
        req: UpdateColorSettingRequest,
    ) -> AppResult<ColorSettingResponse> {
        let mut setting = self.rules.validate_color_setting_ownership(user_id, id).await?;

        let name = match req.name.as_deref() {
            Some(raw) => validate_name(raw)?,
            None => setting.name().to_string(),
        };
        let hex = match req.hex_color.as_deref() {
            Some(raw) => HexColor::parse(raw)?,
            None => setting.hex_color().clone(),
        };
        if req.name.is_some() || req.hex_color.is_some() {
            self.rules
                .validate_color_setting_unique(setting.calendar_id(), &hex, &name, Some(id))
                .await?;
        }

        if req.name.is_some() {
            setting.update_name(&name)?;
        }
        if req.hex_color.is_some() {
            setting.update_hex_color(hex);
        }
        if req.description.is_some() {
            setting.update_description(optional_text(req.description));
        }
        if let Some(order) = req.sort_order {
            setting.update_sort_order(order);
        }
        if let Some(is_default) = req.is_default {
            setting.set_default(is_default);
        }

        self.color_settings.update(&setting).await?;
        info!(color_setting_id = %id, "color setting updated");
        Ok(ColorSettingResponse::from(&setting))
    }

    /// Entries colored with this setting are removed with it.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Id, id: Id) -> AppResult<()> {
        self.rules.validate_color_setting_ownership(user_id, id).await?;
        self.color_settings.delete(id).await?;
        info!(color_setting_id = %id, "color setting deleted");
        Ok(())
    }
}
