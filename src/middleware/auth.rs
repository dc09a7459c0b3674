//! Shared-secret authentication middleware.
//!
//! Guards `POST /api/checkKey`. The caller is a process (for example a
//! licensed client application), not a platform user, so the only credential
//! is the static secret in the `x-api-key` header.
//!
//! Runs before the body is read: a rejected request never reaches the
//! credential store.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{AppState, error::AppError};

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// # Flow
///
/// 1. Extract the `x-api-key` header
/// 2. Compare it against the process secret
/// 3. On match, call the next handler
/// 4. Otherwise return 403 Forbidden
///
/// The presented value is never logged.
pub async fn require_shared_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidApiKey)?;

    if !state.secret.matches(presented) {
        tracing::warn!("Rejected key check with invalid shared secret");
        return Err(AppError::InvalidApiKey);
    }

    Ok(next.run(request).await)
}
