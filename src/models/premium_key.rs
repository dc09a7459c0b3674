//! Premium key model.
//!
//! Premium keys are multi-use licences checked by out-of-process clients
//! through `POST /api/checkKey`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A multi-use, time-bounded credential.
///
/// # Database Table
///
/// Maps to `premium_keys`. `key` carries a unique index, so inserting a
/// duplicate fails.
///
/// # Usage Accounting
///
/// Every successful validation appends the consumer to `used_by` (set
/// semantics), increments `uses` and overwrites `last_used`. Concurrent
/// validations may interleave on these fields; `active` and `expiry_date`
/// are always read fresh.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PremiumKey {
    pub id: Uuid,

    pub key: String,

    /// Revoked keys have `active = false`
    pub active: bool,

    /// `None` means the key never expires
    pub expiry_date: Option<DateTime<Utc>>,

    /// Consumer ids that have validated this key, each listed once
    pub used_by: Vec<String>,

    /// Number of successful validations
    pub uses: i64,

    pub last_used: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl PremiumKey {
    /// A key is valid at `now` iff it is active and its expiry, if any, is
    /// strictly after `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expiry_date.is_none_or(|expiry| expiry > now)
    }
}

/// Provisioning input for a premium key.
#[derive(Debug, Clone)]
pub struct NewPremiumKey {
    pub key: String,
    pub active: bool,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl NewPremiumKey {
    /// An active key with no expiry.
    pub fn perpetual(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            active: true,
            expiry_date: None,
        }
    }

    /// An active key that stops validating at `expiry`.
    pub fn expiring(key: impl Into<String>, expiry: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            active: true,
            expiry_date: Some(expiry),
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
