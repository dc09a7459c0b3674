//! HTTP middleware components.
//!
//! Middleware run before route handlers and can short-circuit requests.

/// Shared-secret check for the remote key endpoint
pub mod auth;
