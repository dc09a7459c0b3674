//! Plain-text liveness responses.

pub async fn index() -> &'static str {
    "Server is running!"
}

/// Any unmatched route answers 200 so uptime pingers stay green.
pub async fn fallback() -> &'static str {
    "Server is alive!"
}
