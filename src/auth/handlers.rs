use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::dto::{LoginRequest, LoginResponse},
    error::AppResult,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    Ok(Json(state.auth.login(payload).await?))
}
