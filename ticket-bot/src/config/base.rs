//! Base config: Discord connection, logging, database. Loaded from env.

use anyhow::Result;
use std::env;

/// Base config: Discord-related, logging, database only.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// DISCORD_TOKEN
    pub discord_token: String,
    /// Log file path
    pub log_file: String,
    /// Ticket database URL (SQLite file path or `sqlite::memory:`)
    pub database_url: String,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides DISCORD_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let discord_token = match token {
            Some(t) => t,
            None => env::var("DISCORD_TOKEN")
                .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN not set"))?,
        };
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "./ticket_bot.db".to_string());
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/ticket-bot.log".to_string());

        Ok(Self {
            discord_token,
            log_file,
            database_url,
        })
    }

    /// Validate config. Fails fast on an empty token so the gateway is never
    /// started with a value that cannot authenticate.
    pub fn validate(&self) -> Result<()> {
        if self.discord_token.trim().is_empty() {
            anyhow::bail!("DISCORD_TOKEN is empty");
        }
        Ok(())
    }
}
