//! Chat command registry.
//!
//! Commands are registered from an explicit list at startup and receive their
//! dependencies through [`CommandContext`]. Privileged commands are gated by
//! [`AccessGuard`] before they execute; a denial becomes
//! [`CommandError::PermissionDenied`], which [`CommandRegistry::respond`]
//! turns into a refusal message for the user.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::auth::{Access, AccessGuard, Actor, AuthEngine};
use crate::error::CommandError;

mod help;
mod ping;
mod premium;

pub use help::HelpCommand;
pub use ping::PingCommand;
pub use premium::PremiumCommand;

/// A named chat command.
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Privileged commands require an admin role, a whitelist entry, or a
    /// redeemed key.
    fn privileged(&self) -> bool {
        false
    }

    /// Reject malformed arguments before any authorization check runs, so a
    /// usage error never consumes a presented redemption key.
    fn validate_args(&self, _args: &[String]) -> Result<(), CommandError> {
        Ok(())
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<String, CommandError>;
}

/// A command invocation as received from the platform.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
    pub actor: Actor,
}

impl Invocation {
    pub fn new(name: impl Into<String>, actor: Actor) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            actor,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// What a command sees while executing.
pub struct CommandContext<'a> {
    pub actor: &'a Actor,
    pub args: &'a [String],
    pub engine: &'a AuthEngine,
    pub registry: &'a CommandRegistry,
}

/// Summary used by `help`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
    pub privileged: bool,
}

pub struct CommandRegistry {
    commands: BTreeMap<String, Arc<dyn Command>>,
    guard: AccessGuard,
}

impl CommandRegistry {
    pub fn new(guard: AccessGuard) -> Self {
        Self {
            commands: BTreeMap::new(),
            guard,
        }
    }

    /// Registry with the built-in command set.
    pub fn builtin(guard: AccessGuard) -> Result<Self, CommandError> {
        let mut registry = Self::new(guard);
        registry.register(HelpCommand)?;
        registry.register(PingCommand)?;
        registry.register(PremiumCommand)?;
        Ok(registry)
    }

    pub fn register<C: Command + 'static>(&mut self, command: C) -> Result<(), CommandError> {
        let name = command.name().to_string();

        if self.commands.contains_key(&name) {
            return Err(CommandError::Registration(format!(
                "command '{}' already registered",
                name
            )));
        }

        info!("Loaded command: {}", name);
        self.commands.insert(name, Arc::new(command));
        Ok(())
    }

    /// Registered commands, ordered by name.
    pub fn list(&self) -> Vec<CommandInfo> {
        self.commands
            .values()
            .map(|c| CommandInfo {
                name: c.name().to_string(),
                description: c.description().to_string(),
                privileged: c.privileged(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Resolve and run a command.
    ///
    /// Arguments are validated first; privileged commands then authorize the
    /// actor before executing.
    pub async fn dispatch(&self, invocation: &Invocation) -> Result<String, CommandError> {
        let command = self
            .commands
            .get(&invocation.name)
            .ok_or_else(|| CommandError::NotFound(invocation.name.clone()))?;

        command.validate_args(&invocation.args)?;

        if command.privileged() && self.guard.authorize(&invocation.actor).await? == Access::Denied
        {
            return Err(CommandError::PermissionDenied);
        }

        let ctx = CommandContext {
            actor: &invocation.actor,
            args: &invocation.args,
            engine: self.guard.engine(),
            registry: self,
        };

        command.execute(&ctx).await
    }

    /// Like [`dispatch`](Self::dispatch), but always produces a reply for the
    /// user. Store failures are logged and reported without detail.
    pub async fn respond(&self, invocation: &Invocation) -> String {
        match self.dispatch(invocation).await {
            Ok(reply) => reply,
            Err(CommandError::Store(err)) => {
                error!("Command '{}' failed: {}", invocation.name, err);
                "Something went wrong, please try again later.".to_string()
            }
            Err(err) => err.to_string(),
        }
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPremiumKey;
    use crate::store::unavailable::UnavailableStore;
    use crate::store::{CredentialStore, MemoryCredentialStore};

    const ADMIN: &str = "admin-role";

    fn registry() -> (Arc<MemoryCredentialStore>, CommandRegistry) {
        let store = Arc::new(MemoryCredentialStore::new());
        let guard = AccessGuard::new(AuthEngine::new(store.clone()), ADMIN);
        (store, CommandRegistry::builtin(guard).unwrap())
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let (_store, mut registry) = registry();
        assert!(matches!(
            registry.register(PingCommand),
            Err(CommandError::Registration(_))
        ));
        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn unknown_command_is_reported() {
        let (_store, registry) = registry();
        let result = registry
            .dispatch(&Invocation::new("nope", Actor::new("u1")))
            .await;
        assert!(matches!(result, Err(CommandError::NotFound(name)) if name == "nope"));
    }

    #[tokio::test]
    async fn unprivileged_command_needs_no_grant() {
        let (_store, registry) = registry();
        let reply = registry
            .dispatch(&Invocation::new("ping", Actor::new("u1")))
            .await
            .unwrap();
        assert_eq!(reply, "Pong!");
    }

    #[tokio::test]
    async fn privileged_command_is_refused_without_grant() {
        let (store, registry) = registry();
        store
            .insert_premium_key(NewPremiumKey::perpetual("PREM"))
            .await
            .unwrap();

        let invocation = Invocation::new("premium", Actor::new("u1")).with_args(["PREM"]);
        assert!(matches!(
            registry.dispatch(&invocation).await,
            Err(CommandError::PermissionDenied)
        ));
        assert_eq!(
            registry.respond(&invocation).await,
            "You are not allowed to use this command"
        );

        // The refused command must not have touched the key
        let record = store.find_premium_key("PREM").await.unwrap().unwrap();
        assert_eq!(record.uses, 0);
    }

    #[tokio::test]
    async fn redemption_key_unlocks_privileged_command_once() {
        let (store, registry) = registry();
        store.insert_redemption_key("ABC").await.unwrap();
        store
            .insert_premium_key(NewPremiumKey::perpetual("PREM"))
            .await
            .unwrap();

        let actor = Actor::new("u1").with_key("ABC");
        let invocation = Invocation::new("premium", actor).with_args(["PREM"]);

        assert!(registry.dispatch(&invocation).await.is_ok());
        assert!(matches!(
            registry.dispatch(&invocation).await,
            Err(CommandError::PermissionDenied)
        ));
    }

    #[tokio::test]
    async fn usage_error_keeps_presented_key_unused() {
        let (store, registry) = registry();
        store.insert_redemption_key("ABC").await.unwrap();

        let invocation = Invocation::new("premium", Actor::new("u1").with_key("ABC"));
        assert_eq!(
            registry.respond(&invocation).await,
            "Invalid arguments: usage: /premium <key>"
        );
        assert!(store.find_unused_redemption_key("ABC").await.unwrap().is_some());

        // The key still works once the command is used correctly
        store
            .insert_premium_key(NewPremiumKey::perpetual("PREM"))
            .await
            .unwrap();
        let invocation = invocation.with_args(["PREM"]);
        assert!(registry.dispatch(&invocation).await.is_ok());
        assert!(store.find_unused_redemption_key("ABC").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn store_failure_is_hidden_from_user() {
        let guard = AccessGuard::new(AuthEngine::new(Arc::new(UnavailableStore)), ADMIN);
        let registry = CommandRegistry::builtin(guard).unwrap();

        let invocation = Invocation::new("premium", Actor::new("u1")).with_args(["PREM"]);
        assert!(matches!(
            registry.dispatch(&invocation).await,
            Err(CommandError::Store(_))
        ));
        assert_eq!(
            registry.respond(&invocation).await,
            "Something went wrong, please try again later."
        );
    }
}
