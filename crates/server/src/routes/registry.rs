use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;

use crate::{AppState, error::ApiError, response::ApiResponse};

#[derive(Debug, Serialize)]
pub struct RegistryCounts {
    pub users: usize,
    pub projects: usize,
}

pub async fn refresh_registry(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RegistryCounts>>, ApiError> {
    let snapshot = state.service().refresh_registry().await?;
    Ok(Json(ApiResponse::success(RegistryCounts {
        users: snapshot.user_count(),
        projects: snapshot.project_count(),
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/registry/refresh", post(refresh_registry))
}
