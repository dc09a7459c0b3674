//! `help`: list the registered commands.

use async_trait::async_trait;

use crate::commands::{Command, CommandContext};
use crate::error::CommandError;

pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "List available commands"
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<String, CommandError> {
        let lines: Vec<String> = ctx
            .registry
            .list()
            .into_iter()
            .map(|info| {
                let marker = if info.privileged { " (restricted)" } else { "" };
                format!("/{} - {}{}", info.name, info.description, marker)
            })
            .collect();

        Ok(format!("Available commands:\n{}", lines.join("\n")))
    }
}
