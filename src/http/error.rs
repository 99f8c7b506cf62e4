use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::RecordError;

/// An error rendered as `{"error": "<message>"}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// v1 mapping: a missing record is a bad request.
    pub fn legacy(err: RecordError) -> Self {
        if matches!(err, RecordError::NotFound(_)) {
            return ApiError::new(StatusCode::BAD_REQUEST, err.public_message());
        }
        err.into()
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        if let RecordError::Storage(cause) = &err {
            tracing::error!(error = %cause, "storage failure");
        }
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ApiError::new(status, err.public_message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_client_error() {
            tracing::warn!(status = %self.status, message = %self.message, "request rejected");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
