use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use intake::IntakeResponse;
use serde_json::Value;

use crate::{AppState, error::ApiError};

/// Body is `{"message": "..."}`. The raw payload is kept in the chat log
/// before extraction.
pub async fn send_data(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IntakeResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::BadRequest("Missing string field 'message'".to_string()))?
        .to_string();

    state.service().record_chat_message(&payload).await;

    let response = state.service().handle_message(&message).await?;
    Ok(Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/send_data", post(send_data))
}
