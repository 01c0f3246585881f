//! HTTP error handling and response types.
//!
//! Every failure leaves the server as `{ "status": "error", "message": ... }`
//! plus a tier-specific field: `errors` for validation, `path` for not-found,
//! optional `details` for server faults.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::validation::{FieldIssue, ValidationErrors};

pub const VALIDATION_MESSAGE: &str = "Validation error";
pub const INTERNAL_MESSAGE: &str = "Internal server error";
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Route not found";

/// API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Always `"error"`
    pub status: String,
    /// Human-readable error message
    pub message: String,
    /// Field-level problems (validation only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldIssue>>,
    /// Requested path (not-found only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Underlying fault message (development mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            errors: None,
            path: None,
            details: None,
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Input failed validation (400)
    Validation(ValidationErrors),
    /// Unknown route or record (404)
    NotFound { message: String, path: String },
    /// Unexpected server or datastore fault (500)
    Internal { details: Option<String> },
}

impl AppError {
    pub fn route_not_found(path: impl Into<String>) -> Self {
        AppError::NotFound {
            message: ROUTE_NOT_FOUND_MESSAGE.to_string(),
            path: path.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(self) -> ApiError {
        match self {
            AppError::Validation(errors) => ApiError {
                errors: Some(errors.issues),
                ..ApiError::new(VALIDATION_MESSAGE)
            },
            AppError::NotFound { message, path } => ApiError {
                path: Some(path),
                ..ApiError::new(message)
            },
            AppError::Internal { details } => ApiError {
                details,
                ..ApiError::new(INTERNAL_MESSAGE)
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.body())).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn body_json(err: AppError) -> Value {
        serde_json::to_value(err.body()).unwrap()
    }

    #[test]
    fn test_validation_body() {
        let err = AppError::from(ValidationErrors::single("text", "Required"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(err),
            json!({
                "status": "error",
                "message": "Validation error",
                "errors": [{ "path": "text", "message": "Required" }]
            })
        );
    }

    #[test]
    fn test_not_found_body() {
        let err = AppError::route_not_found("/nope");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(err),
            json!({ "status": "error", "message": "Route not found", "path": "/nope" })
        );
    }

    #[test]
    fn test_internal_body_hides_missing_details() {
        let body = body_json(AppError::Internal { details: None });
        assert_eq!(
            body,
            json!({ "status": "error", "message": "Internal server error" })
        );
    }

    #[test]
    fn test_internal_body_with_details() {
        let body = body_json(AppError::Internal {
            details: Some("pool timed out".to_string()),
        });
        assert_eq!(body["details"], "pool timed out");
    }
}
