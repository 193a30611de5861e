//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "ticket-bot")]
#[command(about = "Discord ticket bot CLI", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; token can override DISCORD_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Reconstruct a ticket's transcript from its action log and print it.
    Transcript {
        /// Ticket id (UUID).
        #[arg(long)]
        ticket_id: String,
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<std::path::PathBuf>,
    },
    /// Publish a configured panel message to its channel.
    PublishPanel {
        /// Panel id (UUID).
        #[arg(long)]
        panel_id: String,
    },
}

/// Load BotConfig from environment. If `token` is provided it overrides DISCORD_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}

/// Database URL for offline subcommands that never touch Discord.
pub fn database_url_from_env() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "./ticket_bot.db".to_string())
}
