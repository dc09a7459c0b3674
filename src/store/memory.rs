//! In-memory credential store.
//!
//! Used when no database is configured, and by tests. All three collections
//! sit behind one `RwLock`; the redemption compare-and-set runs under the
//! write lock.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{NewPremiumKey, PremiumKey, RedemptionKey, WhitelistEntry};
use crate::store::CredentialStore;

#[derive(Debug, Default)]
struct Collections {
    whitelist: HashMap<String, WhitelistEntry>,
    redemption_keys: HashMap<String, RedemptionKey>,
    premium_keys: HashMap<String, PremiumKey>,
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Collections>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_whitelist_entry(
        &self,
        identity: &str,
    ) -> Result<Option<WhitelistEntry>, StoreError> {
        Ok(self.inner.read().await.whitelist.get(identity).cloned())
    }

    async fn find_unused_redemption_key(
        &self,
        key: &str,
    ) -> Result<Option<RedemptionKey>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.redemption_keys.get(key).filter(|k| !k.used).cloned())
    }

    async fn mark_redemption_key_used(&self, key: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;

        match inner.redemption_keys.get_mut(key) {
            Some(record) if !record.used => {
                record.used = true;
                record.used_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_premium_key(&self, key: &str) -> Result<Option<PremiumKey>, StoreError> {
        Ok(self.inner.read().await.premium_keys.get(key).cloned())
    }

    async fn record_premium_key_usage(
        &self,
        key: &str,
        consumer_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PremiumKey>, StoreError> {
        let mut inner = self.inner.write().await;

        let Some(record) = inner.premium_keys.get_mut(key) else {
            return Ok(None);
        };

        if !record.used_by.iter().any(|c| c == consumer_id) {
            record.used_by.push(consumer_id.to_string());
        }
        record.uses += 1;
        record.last_used = Some(now);

        Ok(Some(record.clone()))
    }

    async fn insert_whitelist_entry(&self, identity: &str) -> Result<WhitelistEntry, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.whitelist.contains_key(identity) {
            return Err(StoreError::Duplicate(identity.to_string()));
        }

        let entry = WhitelistEntry {
            id: Uuid::new_v4(),
            identity: identity.to_string(),
            created_at: Utc::now(),
        };
        inner.whitelist.insert(identity.to_string(), entry.clone());
        Ok(entry)
    }

    async fn insert_redemption_key(&self, key: &str) -> Result<RedemptionKey, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.redemption_keys.contains_key(key) {
            return Err(StoreError::Duplicate(key.to_string()));
        }

        let record = RedemptionKey {
            id: Uuid::new_v4(),
            key: key.to_string(),
            used: false,
            used_at: None,
            created_at: Utc::now(),
        };
        inner.redemption_keys.insert(key.to_string(), record.clone());
        Ok(record)
    }

    async fn insert_premium_key(&self, new_key: NewPremiumKey) -> Result<PremiumKey, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.premium_keys.contains_key(&new_key.key) {
            return Err(StoreError::Duplicate(new_key.key));
        }

        let record = PremiumKey {
            id: Uuid::new_v4(),
            key: new_key.key.clone(),
            active: new_key.active,
            expiry_date: new_key.expiry_date,
            used_by: Vec::new(),
            uses: 0,
            last_used: None,
            created_at: Utc::now(),
        };
        inner.premium_keys.insert(new_key.key, record.clone());
        Ok(record)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn redemption_key_can_only_be_marked_once() {
        let store = MemoryCredentialStore::new();
        store.insert_redemption_key("ABC").await.unwrap();

        assert!(store.find_unused_redemption_key("ABC").await.unwrap().is_some());
        assert!(store.mark_redemption_key_used("ABC").await.unwrap());
        assert!(!store.mark_redemption_key_used("ABC").await.unwrap());
        assert!(store.find_unused_redemption_key("ABC").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn marking_unknown_key_reports_not_found() {
        let store = MemoryCredentialStore::new();
        assert!(!store.mark_redemption_key_used("missing").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_premium_key_is_rejected() {
        let store = MemoryCredentialStore::new();
        store
            .insert_premium_key(NewPremiumKey::perpetual("PREM"))
            .await
            .unwrap();

        let err = store
            .insert_premium_key(NewPremiumKey::perpetual("PREM"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(k) if k == "PREM"));
    }

    #[tokio::test]
    async fn duplicate_whitelist_identity_is_rejected() {
        let store = MemoryCredentialStore::new();
        store.insert_whitelist_entry("u1").await.unwrap();
        assert!(store.insert_whitelist_entry("u1").await.is_err());
    }

    #[tokio::test]
    async fn usage_recording_keeps_consumers_unique() {
        let store = MemoryCredentialStore::new();
        store
            .insert_premium_key(NewPremiumKey::perpetual("PREM"))
            .await
            .unwrap();

        let now = Utc::now();
        store.record_premium_key_usage("PREM", "u1", now).await.unwrap();
        store.record_premium_key_usage("PREM", "u2", now).await.unwrap();
        let record = store
            .record_premium_key_usage("PREM", "u1", now)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.uses, 3);
        assert_eq!(record.used_by, vec!["u1".to_string(), "u2".to_string()]);
        assert_eq!(record.last_used, Some(now));
    }

    #[tokio::test]
    async fn usage_on_unknown_key_returns_none() {
        let store = MemoryCredentialStore::new();
        let updated = store
            .record_premium_key_usage("nope", "u1", Utc::now())
            .await
            .unwrap();
        assert!(updated.is_none());
    }
}
