use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use intake::{AnalyzerError, StoreError};
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Bad Request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Analyzer(_) => (StatusCode::SERVICE_UNAVAILABLE, "AnalyzerError"),
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "StoreError"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
        };

        let error_message = match &self {
            ApiError::BadRequest(msg) => msg.clone(),
            _ => format!("{}: {}", error_type, self),
        };
        if status_code.is_server_error() {
            tracing::error!("{}", error_message);
        }

        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
