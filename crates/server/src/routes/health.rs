use axum::{Json, extract::State};
use serde::Serialize;

use crate::{AppState, response::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub users: usize,
    pub projects: usize,
}

pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let snapshot = state.service().registry().snapshot().await;
    Json(ApiResponse::success(HealthStatus {
        status: "ok",
        users: snapshot.user_count(),
        projects: snapshot.project_count(),
    }))
}
