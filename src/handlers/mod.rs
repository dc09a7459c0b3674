//! HTTP request handlers (route handlers).

/// Premium key validation for out-of-process clients
pub mod check_key;
/// Service health
pub mod health;
/// Liveness responses for `/` and unmatched routes
pub mod root;
