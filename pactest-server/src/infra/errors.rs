use std::fmt;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pactest_core::PacError;
use serde_json::{Map, Value, json};

pub type AppResult<T> = Result<T, AppError>;

/// Error reply rendered as
/// `{"status": "failed", "status_code", "message", "detail"}`.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Map<String, Value>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: Map::new(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// A 400 carrying per-field messages under `detail.json`.
    pub fn validation(fields: Map<String, Value>) -> Self {
        let mut error = Self::bad_request("Validation error");
        error.detail.insert("json".to_string(), Value::Object(fields));
        error
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "failed",
            "status_code": self.status.as_u16(),
            "message": self.message,
            "detail": self.detail,
        }));

        (self.status, body).into_response()
    }
}

impl From<PacError> for AppError {
    fn from(err: PacError) -> Self {
        match err {
            PacError::NotFound(msg) => Self::not_found(msg),
            PacError::Validation(msg) => Self::bad_request(msg),
            PacError::InvalidEngine(msg) => Self::internal(msg),
            PacError::Http(err) => {
                tracing::error!(error = %err, "http client failure");
                Self::internal("HTTP client failure")
            }
        }
    }
}

// Malformed, mistyped or missing JSON bodies are all the caller's fault.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
