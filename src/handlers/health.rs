//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{AppState, error::AppError};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,

    /// Credential store connection status
    pub store: String,

    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "store": "connected",
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// Returns the standard 500 error body when the store is unreachable.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.store.ping().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        store: "connected".to_string(),
        timestamp: Utc::now(),
    }))
}
