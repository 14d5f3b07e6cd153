use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::color_settings::{model::ColorSetting, repo_types::ColorSettingRow};
use crate::domain::Id;

#[async_trait]
pub trait ColorSettingRepository: Send + Sync {
    async fn save(&self, setting: &ColorSetting) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: Id) -> anyhow::Result<Option<ColorSetting>>;
    /// Ordered by sort order, then name.
    async fn find_by_calendar(&self, calendar_id: Id) -> anyhow::Result<Vec<ColorSetting>>;
    async fn update(&self, setting: &ColorSetting) -> anyhow::Result<()>;
    async fn delete(&self, id: Id) -> anyhow::Result<()>;
}

const COLOR_SETTING_COLUMNS: &str = "id, calendar_id, user_id, name, hex_color, description, \
                                     is_default, sort_order, created_at, updated_at";

#[derive(Clone)]
pub struct PgColorSettingRepository {
    db: PgPool,
}

impl PgColorSettingRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ColorSettingRepository for PgColorSettingRepository {
    async fn save(&self, setting: &ColorSetting) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO color_settings (id, calendar_id, user_id, name, hex_color, description,
                                        is_default, sort_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(setting.id().as_uuid())
        .bind(setting.calendar_id().as_uuid())
        .bind(setting.user_id().as_uuid())
        .bind(setting.name())
        .bind(setting.hex_color().as_str())
        .bind(setting.description())
        .bind(setting.is_default())
        .bind(setting.sort_order())
        .bind(setting.created_at())
        .bind(setting.updated_at())
        .execute(&self.db)
        .await
        .context("insert color setting")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Id) -> anyhow::Result<Option<ColorSetting>> {
        let row = sqlx::query_as::<_, ColorSettingRow>(&format!(
            "SELECT {COLOR_SETTING_COLUMNS} FROM color_settings WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.db)
        .await
        .context("find color setting by id")?;
        Ok(row.map(ColorSetting::from))
    }

    async fn find_by_calendar(&self, calendar_id: Id) -> anyhow::Result<Vec<ColorSetting>> {
        let rows = sqlx::query_as::<_, ColorSettingRow>(&format!(
            "SELECT {COLOR_SETTING_COLUMNS} FROM color_settings \
              WHERE calendar_id = $1 ORDER BY sort_order ASC, name ASC"
        ))
        .bind(calendar_id.as_uuid())
        .fetch_all(&self.db)
        .await
        .context("list color settings by calendar")?;
        Ok(rows.into_iter().map(ColorSetting::from).collect())
    }

    async fn update(&self, setting: &ColorSetting) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE color_settings
               SET name = $2, hex_color = $3, description = $4, is_default = $5,
                   sort_order = $6, updated_at = $7
             WHERE id = $1
            "#,
        )
        .bind(setting.id().as_uuid())
        .bind(setting.name())
        .bind(setting.hex_color().as_str())
        .bind(setting.description())
        .bind(setting.is_default())
        .bind(setting.sort_order())
        .bind(setting.updated_at())
        .execute(&self.db)
        .await
        .context("update color setting")?;
        Ok(())
    }

    async fn delete(&self, id: Id) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM color_settings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.db)
            .await
            .context("delete color setting")?;
        Ok(())
    }
}
