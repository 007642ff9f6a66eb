//! Error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::control::ControlError;

impl ControlError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ControlError::NotConnected
            | ControlError::MissingCredentials
            | ControlError::MissingIndustry
            | ControlError::UnknownIndustry(_)
            | ControlError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ControlError::AlreadyRunning => StatusCode::CONFLICT,
            ControlError::ConnectionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ControlError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Control request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Control request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
