//! Slash command registration: `open` (optional ticket type) and `close`
//! (optional reason). Registered globally once the gateway reports ready.

use serenity::all::{Command, CommandOptionType, CreateCommand, CreateCommandOption};
use serenity::http::Http;
use tracing::info;

/// Name of the ticket-open command.
pub const OPEN_COMMAND: &str = "open";
/// Name of the ticket-close command.
pub const CLOSE_COMMAND: &str = "close";

/// Registers the global slash commands. Idempotent; Discord replaces
/// commands with the same name.
pub async fn register_commands(http: &Http) -> serenity::Result<()> {
    Command::create_global_command(
        http,
        CreateCommand::new(OPEN_COMMAND)
            .description("Open a support ticket")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "type",
                    "Ticket type to open",
                )
                .required(false),
            ),
    )
    .await?;

    Command::create_global_command(
        http,
        CreateCommand::new(CLOSE_COMMAND)
            .description("Close this ticket")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "reason",
                    "Why the ticket is being closed",
                )
                .required(false),
            ),
    )
    .await?;

    info!("Slash commands registered");
    Ok(())
}
