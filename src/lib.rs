//! Keygate - authorization service for a chat-platform bot.
//!
//! Decides who may run privileged bot commands (admin role, whitelist, or a
//! single-use redemption key) and lets licensed client applications validate
//! time-bounded premium keys over HTTP using a shared secret.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx, or an in-memory store
//! - **Remote authentication**: static shared secret in `x-api-key`
//! - **Format**: JSON requests/responses

pub mod auth;
pub mod commands;
pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::auth::{AuthEngine, AuthorizationSecret};
use crate::store::CredentialStore;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub engine: AuthEngine,
    pub secret: Arc<AuthorizationSecret>,
}

impl AppState {
    pub fn new(store: Arc<dyn CredentialStore>, secret: AuthorizationSecret) -> Self {
        Self {
            engine: AuthEngine::new(store.clone()),
            store,
            secret: Arc::new(secret),
        }
    }
}

/// Build the HTTP router.
///
/// - `GET /` and unmatched routes: plain-text liveness
/// - `GET /health`: store connectivity
/// - `POST /api/checkKey`: premium key validation, behind the shared secret
pub fn router(state: AppState) -> Router {
    let key_routes = Router::new()
        .route("/api/checkKey", post(handlers::check_key::check_key))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_shared_secret,
        ));

    Router::new()
        .route("/", get(handlers::root::index))
        .route("/health", get(handlers::health::health_check))
        .merge(key_routes)
        .fallback(handlers::root::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
