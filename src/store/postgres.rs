//! PostgreSQL-backed credential store.
//!
//! # Atomicity Guarantees
//!
//! Redemption is a single conditional `UPDATE ... WHERE used = false`, so two
//! concurrent redemptions of the same key cannot both succeed. Premium usage
//! recording is one statement as well, but it is not serialized against
//! concurrent validations of the same key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::DbPool;
use crate::error::StoreError;
use crate::models::{NewPremiumKey, PremiumKey, RedemptionKey, WhitelistEntry};
use crate::store::CredentialStore;

const PREMIUM_KEY_COLUMNS: &str =
    "id, key, active, expiry_date, used_by, uses, last_used, created_at";

#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: DbPool,
}

impl PgCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_whitelist_entry(
        &self,
        identity: &str,
    ) -> Result<Option<WhitelistEntry>, StoreError> {
        let entry = sqlx::query_as::<_, WhitelistEntry>(
            "SELECT id, identity, created_at FROM whitelist_entries WHERE identity = $1",
        )
        .bind(identity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn find_unused_redemption_key(
        &self,
        key: &str,
    ) -> Result<Option<RedemptionKey>, StoreError> {
        let record = sqlx::query_as::<_, RedemptionKey>(
            r#"
            SELECT id, key, used, used_at, created_at
            FROM redemption_keys
            WHERE key = $1 AND used = false
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn mark_redemption_key_used(&self, key: &str) -> Result<bool, StoreError> {
        // The `used = false` condition makes this the compare-and-set:
        // only one concurrent caller can see rows_affected == 1
        let updated = sqlx::query(
            r#"
            UPDATE redemption_keys
            SET used = true,
                used_at = NOW()
            WHERE key = $1 AND used = false
            "#,
        )
        .bind(key)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }

    async fn find_premium_key(&self, key: &str) -> Result<Option<PremiumKey>, StoreError> {
        let record = sqlx::query_as::<_, PremiumKey>(&format!(
            "SELECT {PREMIUM_KEY_COLUMNS} FROM premium_keys WHERE key = $1"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn record_premium_key_usage(
        &self,
        key: &str,
        consumer_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PremiumKey>, StoreError> {
        let record = sqlx::query_as::<_, PremiumKey>(&format!(
            r#"
            UPDATE premium_keys
            SET used_by = CASE
                    WHEN $2 = ANY(used_by) THEN used_by
                    ELSE array_append(used_by, $2)
                END,
                uses = uses + 1,
                last_used = $3
            WHERE key = $1
            RETURNING {PREMIUM_KEY_COLUMNS}
            "#
        ))
        .bind(key)
        .bind(consumer_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert_whitelist_entry(&self, identity: &str) -> Result<WhitelistEntry, StoreError> {
        sqlx::query_as::<_, WhitelistEntry>(
            r#"
            INSERT INTO whitelist_entries (identity)
            VALUES ($1)
            RETURNING id, identity, created_at
            "#,
        )
        .bind(identity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, identity))
    }

    async fn insert_redemption_key(&self, key: &str) -> Result<RedemptionKey, StoreError> {
        sqlx::query_as::<_, RedemptionKey>(
            r#"
            INSERT INTO redemption_keys (key)
            VALUES ($1)
            RETURNING id, key, used, used_at, created_at
            "#,
        )
        .bind(key)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, key))
    }

    async fn insert_premium_key(&self, new_key: NewPremiumKey) -> Result<PremiumKey, StoreError> {
        sqlx::query_as::<_, PremiumKey>(&format!(
            r#"
            INSERT INTO premium_keys (key, active, expiry_date)
            VALUES ($1, $2, $3)
            RETURNING {PREMIUM_KEY_COLUMNS}
            "#
        ))
        .bind(&new_key.key)
        .bind(new_key.active)
        .bind(new_key.expiry_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, &new_key.key))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
