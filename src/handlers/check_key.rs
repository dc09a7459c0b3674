//! Remote premium-key validation.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;

use crate::{
    AppState,
    error::AppError,
    models::{CheckKeyRequest, CheckKeyResponse},
};

/// Validate a premium key.
///
/// # Endpoint
///
/// `POST /api/checkKey`
///
/// # Authentication
///
/// Requires the shared secret in `x-api-key` (checked by middleware).
///
/// # Response
///
/// - **200**: `{"isValid": false}` for unknown, inactive or expired keys
/// - **200**: `{"isValid": true, "isPremium": true, "expiry": ...}` on success
/// - **400**: `key` missing or empty, or the body is not a JSON object
///   of the expected shape
/// - **403**: shared secret missing or wrong
///
/// A successful check records the use against `userId`.
pub async fn check_key(
    State(state): State<AppState>,
    payload: Result<Json<CheckKeyRequest>, JsonRejection>,
) -> Result<Json<CheckKeyResponse>, AppError> {
    let Json(request) = payload?;

    let key = request
        .key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("Key is required".to_string()))?;

    let outcome = state
        .engine
        .validate_premium_key(key, request.consumer_id(), Utc::now())
        .await?;

    Ok(Json(outcome.into()))
}
