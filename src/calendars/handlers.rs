use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    calendars::dto::{CalendarResponse, CreateCalendarRequest, UpdateCalendarRequest},
    domain::Id,
    error::AppResult,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calendars", get(list_calendars).post(create_calendar))
        .route(
            "/calendars/:id",
            get(get_calendar).put(update_calendar).delete(delete_calendar),
        )
}

#[instrument(skip(state))]
pub async fn list_calendars(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<CalendarResponse>>> {
    Ok(Json(state.calendars.list(user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_calendar(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateCalendarRequest>,
) -> AppResult<(StatusCode, Json<CalendarResponse>)> {
    let calendar = state.calendars.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(calendar)))
}

#[instrument(skip(state))]
pub async fn get_calendar(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<CalendarResponse>> {
    let id = Id::parse(&id)?;
    Ok(Json(state.calendars.get(user_id, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_calendar(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCalendarRequest>,
) -> AppResult<Json<CalendarResponse>> {
    let id = Id::parse(&id)?;
    Ok(Json(state.calendars.update(user_id, id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_calendar(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = Id::parse(&id)?;
    state.calendars.delete(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
