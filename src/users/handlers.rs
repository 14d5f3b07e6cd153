use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    domain::Id,
    error::AppResult,
    state::AppState,
    users::dto::{CreateUserRequest, UpdateUserRequest, UserResponse},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.users.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let id = Id::parse(&id)?;
    Ok(Json(state.users.get_user(caller, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let id = Id::parse(&id)?;
    Ok(Json(state.users.update_user(caller, id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = Id::parse(&id)?;
    state.users.delete_user(caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
