//! Whitelist model.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A platform identity permanently exempted from the redemption-key requirement.
///
/// # Database Table
///
/// Maps to `whitelist_entries`. `identity` is unique, so there is at most
/// one entry per identity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WhitelistEntry {
    pub id: Uuid,

    /// Opaque platform-assigned user id
    pub identity: String,

    pub created_at: DateTime<Utc>,
}
