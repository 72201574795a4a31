//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use crate::control::ControlError;
use crate::widgets::WidgetError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Widget manager error that escaped the control's own handling
    #[error("Widget error: {0}")]
    Widget(#[from] WidgetError),

    /// Dashboard control error
    #[error("Control error: {0}")]
    Control(#[from] ControlError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

fn widget_error_status(e: &WidgetError) -> (StatusCode, &'static str) {
    match e {
        WidgetError::UnknownWidget(_) => (StatusCode::NOT_FOUND, "WIDGET_NOT_FOUND"),
        WidgetError::UnknownWidgetType(_) => (StatusCode::NOT_FOUND, "WIDGET_TYPE_NOT_FOUND"),
        WidgetError::UnknownSignal(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_SIGNAL"),
        WidgetError::MissingArgument(_) => (StatusCode::BAD_REQUEST, "MISSING_ARGUMENT"),
        WidgetError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Widget(e) => widget_error_status(e),
            ApiError::Control(ControlError::Widget(e)) => widget_error_status(e),
            ApiError::Control(ControlError::UnknownView(_)) => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_VIEW")
            }
            ApiError::Control(ControlError::Template(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "TEMPLATE_ERROR")
            }
            ApiError::Control(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONTROL_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        // Log the error
        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::WidgetId;

    #[test]
    fn unknown_widget_maps_to_not_found() {
        let err = ApiError::Widget(WidgetError::UnknownWidget(WidgetId::new("x")));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn control_widget_errors_keep_their_status() {
        let err = ApiError::Control(ControlError::Widget(WidgetError::MissingArgument(
            "text".to_string(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
