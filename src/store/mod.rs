//! Credential store.
//!
//! Every operation is a point lookup or update by unique key. The store is
//! shared between HTTP handlers and chat commands as `Arc<dyn CredentialStore>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{NewPremiumKey, PremiumKey, RedemptionKey, WhitelistEntry};

pub mod memory;
pub mod postgres;
#[cfg(test)]
pub(crate) mod unavailable;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

/// Persistent records for whitelisted identities, redemption keys and premium keys.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_whitelist_entry(&self, identity: &str)
    -> Result<Option<WhitelistEntry>, StoreError>;

    async fn find_unused_redemption_key(&self, key: &str)
    -> Result<Option<RedemptionKey>, StoreError>;

    /// Flip `used` from `false` to `true`.
    ///
    /// Compare-and-set: returns `true` only for the single call that made the
    /// transition. Unknown and already-used keys both return `false`.
    async fn mark_redemption_key_used(&self, key: &str) -> Result<bool, StoreError>;

    async fn find_premium_key(&self, key: &str) -> Result<Option<PremiumKey>, StoreError>;

    /// Add `consumer_id` to `used_by` (no duplicates), increment `uses` and
    /// set `last_used = now`. Returns the updated record, or `None` if the key
    /// does not exist.
    async fn record_premium_key_usage(
        &self,
        key: &str,
        consumer_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PremiumKey>, StoreError>;

    async fn insert_whitelist_entry(&self, identity: &str) -> Result<WhitelistEntry, StoreError>;

    async fn insert_redemption_key(&self, key: &str) -> Result<RedemptionKey, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when `key` already exists.
    async fn insert_premium_key(&self, new_key: NewPremiumKey) -> Result<PremiumKey, StoreError>;

    /// Cheap connectivity check used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}
