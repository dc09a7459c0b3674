//! In-process authorization for privileged chat commands.

use std::collections::HashSet;

use crate::auth::engine::{AuthEngine, Redemption, has_admin_role};
use crate::error::StoreError;

/// Who is attempting a privileged action.
#[derive(Debug, Clone, Default)]
pub struct Actor {
    /// Platform user id, checked against the whitelist
    pub id: String,

    /// Role ids the actor holds in the current guild
    pub roles: HashSet<String>,

    /// Redemption key supplied with the invocation, if any
    pub presented_key: Option<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.presented_key = Some(key.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

/// Grants access by admin role, whitelist membership, or a redeemed key.
///
/// The non-consuming checks run first so that an actor who already
/// qualifies keeps their key.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    engine: AuthEngine,
    admin_role_id: String,
}

impl AccessGuard {
    pub fn new(engine: AuthEngine, admin_role_id: impl Into<String>) -> Self {
        Self {
            engine,
            admin_role_id: admin_role_id.into(),
        }
    }

    pub fn engine(&self) -> &AuthEngine {
        &self.engine
    }

    pub async fn authorize(&self, actor: &Actor) -> Result<Access, StoreError> {
        if has_admin_role(&actor.roles, &self.admin_role_id) {
            tracing::debug!(actor = %actor.id, "Allowed by admin role");
            return Ok(Access::Allowed);
        }

        if self.engine.is_whitelisted(&actor.id).await? {
            tracing::debug!(actor = %actor.id, "Allowed by whitelist");
            return Ok(Access::Allowed);
        }

        let presented = actor.presented_key.as_deref().filter(|k| !k.is_empty());
        if let Some(key) = presented {
            if self.engine.redeem_key(key).await? == Redemption::Redeemed {
                tracing::info!(actor = %actor.id, "Allowed by redemption key");
                return Ok(Access::Allowed);
            }
        }

        tracing::info!(actor = %actor.id, "Access denied");
        Ok(Access::Denied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::unavailable::UnavailableStore;
    use crate::store::{CredentialStore, MemoryCredentialStore};
    use std::sync::Arc;

    const ADMIN: &str = "admin-role";

    fn guard() -> (Arc<MemoryCredentialStore>, AccessGuard) {
        let store = Arc::new(MemoryCredentialStore::new());
        let guard = AccessGuard::new(AuthEngine::new(store.clone()), ADMIN);
        (store, guard)
    }

    #[tokio::test]
    async fn redemption_key_grants_access_once() {
        let (store, guard) = guard();
        store.insert_redemption_key("ABC").await.unwrap();

        let actor = Actor::new("").with_key("ABC");
        assert_eq!(guard.authorize(&actor).await.unwrap(), Access::Allowed);
        assert_eq!(guard.authorize(&actor).await.unwrap(), Access::Denied);
    }

    #[tokio::test]
    async fn admin_does_not_burn_presented_key() {
        let (store, guard) = guard();
        store.insert_redemption_key("ABC").await.unwrap();

        let actor = Actor::new("u1").with_roles([ADMIN]).with_key("ABC");
        assert_eq!(guard.authorize(&actor).await.unwrap(), Access::Allowed);
        assert!(store.find_unused_redemption_key("ABC").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn whitelisted_actor_does_not_burn_presented_key() {
        let (store, guard) = guard();
        store.insert_whitelist_entry("u1").await.unwrap();
        store.insert_redemption_key("ABC").await.unwrap();

        let actor = Actor::new("u1").with_key("ABC");
        assert_eq!(guard.authorize(&actor).await.unwrap(), Access::Allowed);
        assert!(store.find_unused_redemption_key("ABC").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn actor_without_any_grant_is_denied() {
        let (_store, guard) = guard();

        let actor = Actor::new("u1").with_roles(["member"]);
        assert_eq!(guard.authorize(&actor).await.unwrap(), Access::Denied);

        let actor = Actor::new("u1").with_key("");
        assert_eq!(guard.authorize(&actor).await.unwrap(), Access::Denied);
    }

    #[tokio::test]
    async fn admin_role_needs_no_store() {
        let guard = AccessGuard::new(AuthEngine::new(Arc::new(UnavailableStore)), ADMIN);
        let actor = Actor::new("u1").with_roles([ADMIN]);
        assert_eq!(guard.authorize(&actor).await.unwrap(), Access::Allowed);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let guard = AccessGuard::new(AuthEngine::new(Arc::new(UnavailableStore)), ADMIN);
        let actor = Actor::new("u1").with_key("ABC");
        assert!(guard.authorize(&actor).await.is_err());
    }
}
