use async_trait::async_trait;

use crate::commands::{Command, CommandContext};
use crate::error::CommandError;

pub struct PingCommand;

#[async_trait]
impl Command for PingCommand {
    fn name(&self) -> &str {
        "ping"
    }

    fn description(&self) -> &str {
        "Check that the bot is responding"
    }

    async fn execute(&self, _ctx: &CommandContext<'_>) -> Result<String, CommandError> {
        Ok("Pong!".to_string())
    }
}
