use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    color_settings::dto::{
        ColorSettingResponse, CreateColorSettingRequest, UpdateColorSettingRequest,
    },
    domain::Id,
    error::AppResult,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/calendars/:id/color-settings",
            get(list_color_settings).post(create_color_setting),
        )
        .route(
            "/color-settings/:id",
            get(get_color_setting)
                .put(update_color_setting)
                .delete(delete_color_setting),
        )
}

#[instrument(skip(state))]
pub async fn list_color_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(calendar_id): Path<String>,
) -> AppResult<Json<Vec<ColorSettingResponse>>> {
    let calendar_id = Id::parse(&calendar_id)?;
    Ok(Json(state.color_settings.list(user_id, calendar_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_color_setting(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(calendar_id): Path<String>,
    Json(payload): Json<CreateColorSettingRequest>,
) -> AppResult<(StatusCode, Json<ColorSettingResponse>)> {
    let calendar_id = Id::parse(&calendar_id)?;
    let setting = state
        .color_settings
        .create(user_id, calendar_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(setting)))
}

#[instrument(skip(state))]
pub async fn get_color_setting(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ColorSettingResponse>> {
    let id = Id::parse(&id)?;
    Ok(Json(state.color_settings.get(user_id, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_color_setting(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateColorSettingRequest>,
) -> AppResult<Json<ColorSettingResponse>> {
    let id = Id::parse(&id)?;
    Ok(Json(state.color_settings.update(user_id, id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_color_setting(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = Id::parse(&id)?;
    state.color_settings.delete(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
