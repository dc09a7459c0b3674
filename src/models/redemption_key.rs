//! Redemption key model.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A single-use credential.
///
/// # Database Table
///
/// Maps to `redemption_keys` with columns:
/// - `id`: Unique identifier (UUID)
/// - `key`: Opaque token, unique
/// - `used`: Whether the key has been consumed
/// - `used_at`: When it was consumed
/// - `created_at`: When it was provisioned
///
/// # Lifecycle
///
/// `used` moves from `false` to `true` exactly once, through the
/// compare-and-set in [`crate::store::CredentialStore::mark_redemption_key_used`].
/// It never moves back.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RedemptionKey {
    pub id: Uuid,
    pub key: String,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
