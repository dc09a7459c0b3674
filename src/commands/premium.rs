//! `premium <key>`: check a premium licence key from chat.
//!
//! The invoking user is recorded as the consumer, exactly as a remote
//! client's `userId` would be.

use async_trait::async_trait;
use chrono::Utc;

use crate::auth::PremiumValidation;
use crate::commands::{Command, CommandContext};
use crate::error::CommandError;

pub struct PremiumCommand;

#[async_trait]
impl Command for PremiumCommand {
    fn name(&self) -> &str {
        "premium"
    }

    fn description(&self) -> &str {
        "Check whether a premium key is valid"
    }

    fn privileged(&self) -> bool {
        true
    }

    fn validate_args(&self, args: &[String]) -> Result<(), CommandError> {
        key_arg(args).map(|_| ())
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<String, CommandError> {
        let key = key_arg(ctx.args)?;

        let outcome = ctx
            .engine
            .validate_premium_key(key, &ctx.actor.id, Utc::now())
            .await?;

        let reply = match outcome {
            PremiumValidation::Valid { expiry: None } => {
                "Premium key is valid and never expires.".to_string()
            }
            PremiumValidation::Valid {
                expiry: Some(expiry),
            } => format!(
                "Premium key is valid until {}.",
                expiry.format("%Y-%m-%d %H:%M UTC")
            ),
            PremiumValidation::Invalid => "Premium key is invalid or expired.".to_string(),
        };

        Ok(reply)
    }
}

fn key_arg(args: &[String]) -> Result<&str, CommandError> {
    args.first()
        .map(String::as_str)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| CommandError::InvalidArgs("usage: /premium <key>".to_string()))
}
