//! Error types and HTTP error response handling.
//!
//! This module defines the errors raised by the credential store, the
//! command dispatcher and the HTTP layer, and how HTTP errors are converted
//! into responses with appropriate status codes and JSON bodies.
//!
//! A denied authorization is not an error: it is reported through
//! [`crate::auth::Access::Denied`] and friends. Only faults live here.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Credential store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached or the query failed.
    ///
    /// This is fatal to the request. It must never be read as "not found".
    #[error("Credential store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    /// A record with the same unique key already exists.
    #[error("Duplicate credential: {0}")]
    Duplicate(String),
}

impl StoreError {
    /// Map an sqlx error, turning unique-constraint violations into
    /// [`StoreError::Duplicate`].
    pub(crate) fn from_insert(err: sqlx::Error, key: &str) -> Self {
        let unique_violation = err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());

        if unique_violation {
            StoreError::Duplicate(key.to_string())
        } else {
            StoreError::Unavailable(err)
        }
    }
}

/// Errors raised while dispatching a chat command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// The actor failed every authorization check for a privileged command.
    #[error("You are not allowed to use this command")]
    PermissionDenied,

    #[error("Command registration failed: {0}")]
    Registration(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// HTTP-facing error type.
///
/// # Error Categories
///
/// - **Authentication**: the shared secret is missing or wrong
/// - **Validation**: the request body is malformed
/// - **Store**: the credential store failed
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Shared secret missing or mismatched.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// Credential store failure.
    ///
    /// Returns HTTP 500 without detail.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// A body that is missing, not JSON, or of the wrong shape is a validation
/// failure like any other bad input.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidApiKey` → 403 Forbidden
/// - `InvalidRequest` → 400 Bad Request
/// - `Store` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::InvalidApiKey => (StatusCode::FORBIDDEN, "invalid_api_key", self.to_string()),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Store(ref err) => {
                tracing::error!("Credential store failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
