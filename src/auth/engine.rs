//! Authorization engine.
//!
//! Decision logic over the credential store. Outcomes that would let an
//! untrusted caller tell keys apart are collapsed: an unknown key and a spent
//! key both yield [`Redemption::AlreadyUsedOrUnknown`], and a missing,
//! revoked or expired premium key all yield [`PremiumValidation::Invalid`].
//!
//! Store failures are returned as errors and never folded into a negative
//! outcome.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::store::CredentialStore;

/// Outcome of [`AuthEngine::redeem_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redemption {
    Redeemed,
    AlreadyUsedOrUnknown,
}

/// Outcome of [`AuthEngine::validate_premium_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PremiumValidation {
    /// `expiry` is the stored expiry; `None` for perpetual keys.
    Valid { expiry: Option<DateTime<Utc>> },
    Invalid,
}

/// True iff `admin_role_id` is one of the actor's roles.
pub fn has_admin_role(roles: &HashSet<String>, admin_role_id: &str) -> bool {
    roles.contains(admin_role_id)
}

#[derive(Clone)]
pub struct AuthEngine {
    store: Arc<dyn CredentialStore>,
}

impl AuthEngine {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub async fn is_whitelisted(&self, identity: &str) -> Result<bool, StoreError> {
        Ok(self.store.find_whitelist_entry(identity).await?.is_some())
    }

    /// Consume a single-use key.
    ///
    /// The lookup only filters obviously spent keys; the store's
    /// compare-and-set decides, so concurrent calls with the same key yield
    /// at most one `Redeemed`.
    pub async fn redeem_key(&self, key: &str) -> Result<Redemption, StoreError> {
        if self.store.find_unused_redemption_key(key).await?.is_none() {
            return Ok(Redemption::AlreadyUsedOrUnknown);
        }

        if self.store.mark_redemption_key_used(key).await? {
            tracing::info!("Redemption key consumed");
            Ok(Redemption::Redeemed)
        } else {
            // Lost the race to a concurrent redemption
            Ok(Redemption::AlreadyUsedOrUnknown)
        }
    }

    /// Validate a premium key and record the use.
    ///
    /// # Process
    ///
    /// 1. Look the key up
    /// 2. Reject if missing, inactive, or expired at `now`
    /// 3. Record usage by `consumer_id`, even if it has used the key before
    /// 4. Report the stored expiry
    pub async fn validate_premium_key(
        &self,
        key: &str,
        consumer_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PremiumValidation, StoreError> {
        let Some(record) = self.store.find_premium_key(key).await? else {
            return Ok(PremiumValidation::Invalid);
        };

        if !record.is_valid_at(now) {
            return Ok(PremiumValidation::Invalid);
        }

        match self
            .store
            .record_premium_key_usage(key, consumer_id, now)
            .await?
        {
            Some(updated) => {
                tracing::debug!(uses = updated.uses, "Premium key validated");
                Ok(PremiumValidation::Valid {
                    expiry: updated.expiry_date,
                })
            }
            // Removed between lookup and update
            None => Ok(PremiumValidation::Invalid),
        }
    }
}

impl std::fmt::Debug for AuthEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEngine").finish_non_exhaustive()
    }
}
