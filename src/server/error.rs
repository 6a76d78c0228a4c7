use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::core::interpretation::INTERPRETATION_UNAVAILABLE;
use crate::utils::error::{ErrorCategory, OracleError};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// 無法解析的請求內容，附上解析器的說明
    InvalidBody(String),
    Oracle(OracleError),
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ApiError) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::InvalidBody(detail) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("BAD_REQUEST", "request body must be JSON like {\"prompt\": \"...\"}")
                    .with_details(detail),
            ),
            AppError::Oracle(e @ OracleError::ValidationError { .. })
            | AppError::Oracle(e @ OracleError::CalendarError { .. }) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", e.to_string()))
            }
            AppError::Oracle(e) => match e.category() {
                ErrorCategory::Configuration => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("CONFIG_ERROR", e.user_friendly_message()),
                ),
                // 上游細節只寫日誌，不回給用戶端
                ErrorCategory::Network | ErrorCategory::Upstream => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new(
                        e.upstream_code().unwrap_or("INTERNAL_ERROR"),
                        INTERPRETATION_UNAVAILABLE,
                    ),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", e.user_friendly_message()),
                ),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_body();

        match &self {
            AppError::Oracle(e) if status.is_server_error() => tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            ),
            _ => tracing::warn!("Rejected request: {}", error.message),
        }

        (status, Json(error)).into_response()
    }
}

impl From<OracleError> for AppError {
    fn from(err: OracleError) -> Self {
        AppError::Oracle(err)
    }
}
