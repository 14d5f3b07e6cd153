use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    domain::Id,
    entries::dto::{
        CalendarEntriesResponse, CalendarEntryResponse, CreateCalendarEntryRequest, DateRangeQuery,
        EntryFilters, UpdateCalendarEntryRequest,
    },
    error::AppResult,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_user_entries))
        .route(
            "/calendars/:id/entries",
            get(list_entries).post(create_entry),
        )
        .route(
            "/calendars/:id/entries/:date",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(calendar_id): Path<String>,
    Query(filters): Query<EntryFilters>,
) -> AppResult<Json<CalendarEntriesResponse>> {
    let calendar_id = Id::parse(&calendar_id)?;
    Ok(Json(state.entries.list(user_id, calendar_id, filters).await?))
}

#[instrument(skip(state))]
pub async fn list_user_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<CalendarEntriesResponse>> {
    Ok(Json(state.entries.list_for_user(user_id, range).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(calendar_id): Path<String>,
    Json(payload): Json<CreateCalendarEntryRequest>,
) -> AppResult<(StatusCode, Json<CalendarEntryResponse>)> {
    let calendar_id = Id::parse(&calendar_id)?;
    let entry = state.entries.create(user_id, calendar_id, payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((calendar_id, date)): Path<(String, String)>,
) -> AppResult<Json<CalendarEntryResponse>> {
    let calendar_id = Id::parse(&calendar_id)?;
    Ok(Json(state.entries.get(user_id, calendar_id, &date).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((calendar_id, date)): Path<(String, String)>,
    Json(payload): Json<UpdateCalendarEntryRequest>,
) -> AppResult<Json<CalendarEntryResponse>> {
    let calendar_id = Id::parse(&calendar_id)?;
    Ok(Json(
        state
            .entries
            .update(user_id, calendar_id, &date, payload)
            .await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((calendar_id, date)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let calendar_id = Id::parse(&calendar_id)?;
    state.entries.delete(user_id, calendar_id, &date).await?;
    Ok(StatusCode::NO_CONTENT)
}
