//! A store whose every call fails, for exercising StoreUnavailable paths.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{NewPremiumKey, PremiumKey, RedemptionKey, WhitelistEntry};
use crate::store::CredentialStore;

#[derive(Debug, Default)]
pub(crate) struct UnavailableStore;

fn down<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl CredentialStore for UnavailableStore {
    async fn find_whitelist_entry(&self, _: &str) -> Result<Option<WhitelistEntry>, StoreError> {
        down()
    }

    async fn find_unused_redemption_key(
        &self,
        _: &str,
    ) -> Result<Option<RedemptionKey>, StoreError> {
        down()
    }

    async fn mark_redemption_key_used(&self, _: &str) -> Result<bool, StoreError> {
        down()
    }

    async fn find_premium_key(&self, _: &str) -> Result<Option<PremiumKey>, StoreError> {
        down()
    }

    async fn record_premium_key_usage(
        &self,
        _: &str,
        _: &str,
        _: DateTime<Utc>,
    ) -> Result<Option<PremiumKey>, StoreError> {
        down()
    }

    async fn insert_whitelist_entry(&self, _: &str) -> Result<WhitelistEntry, StoreError> {
        down()
    }

    async fn insert_redemption_key(&self, _: &str) -> Result<RedemptionKey, StoreError> {
        down()
    }

    async fn insert_premium_key(&self, _: NewPremiumKey) -> Result<PremiumKey, StoreError> {
        down()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        down()
    }
}
