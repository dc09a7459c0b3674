//! Console adapter for local development.
//!
//! Reads `/command arg ...` lines from stdin and dispatches them as a fixed
//! console actor. `--key <value>` presents a redemption key with the command.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::auth::Actor;
use crate::commands::{CommandRegistry, Invocation};

/// Parse a console line into an invocation for `actor`.
///
/// Returns `None` for lines that are not commands.
pub fn parse_line(line: &str, actor: &Actor) -> Option<Invocation> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?.strip_prefix('/')?;
    if name.is_empty() {
        return None;
    }

    let mut actor = actor.clone();
    let mut args = Vec::new();
    while let Some(token) = tokens.next() {
        if token == "--key" {
            actor.presented_key = tokens.next().map(str::to_string);
        } else {
            args.push(token.to_string());
        }
    }

    Some(Invocation::new(name, actor).with_args(args))
}

/// Run until stdin closes.
pub async fn run(registry: Arc<CommandRegistry>, actor: Actor) {
    tracing::info!(actor = %actor.id, "Console adapter started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_line(line, &actor) {
                    Some(invocation) => println!("[BOT] {}", registry.respond(&invocation).await),
                    None => println!("[BOT] Commands start with '/', try /help"),
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Console read failed: {}", e);
                break;
            }
        }
    }

    tracing::info!("Console adapter stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_args_and_key() {
        let actor = Actor::new("console").with_roles(["r1"]);
        let invocation = parse_line("/premium PREM --key ABC", &actor).unwrap();

        assert_eq!(invocation.name, "premium");
        assert_eq!(invocation.args, vec!["PREM".to_string()]);
        assert_eq!(invocation.actor.id, "console");
        assert!(invocation.actor.roles.contains("r1"));
        assert_eq!(invocation.actor.presented_key.as_deref(), Some("ABC"));
    }

    #[test]
    fn key_is_not_carried_between_lines() {
        let actor = Actor::new("console");
        parse_line("/ping --key ABC", &actor).unwrap();

        let invocation = parse_line("/ping", &actor).unwrap();
        assert!(invocation.actor.presented_key.is_none());
    }

    #[test]
    fn non_commands_are_ignored() {
        let actor = Actor::new("console");
        assert!(parse_line("hello", &actor).is_none());
        assert!(parse_line("/", &actor).is_none());
        assert!(parse_line("   ", &actor).is_none());
    }
}
