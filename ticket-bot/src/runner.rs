//! Main entry: validate config, init logging, build components, start the
//! gateway client.

use std::sync::Arc;

use anyhow::Result;
use serenity::all::GatewayIntents;
use serenity::http::Http;
use serenity::Client;
use tracing::{info, instrument};

use crate::components::{build_bot_components, build_handler_chain, BotComponents};
use crate::config::BotConfig;
use crate::core::init_tracing;
use crate::discord::{GatewayHandler, SerenityApi};

/// Builds components against the live Discord REST API. Shared by run_bot
/// and the panel-publishing CLI path.
pub async fn connect_components(config: &BotConfig) -> Result<(Arc<Http>, BotComponents)> {
    let http = Arc::new(Http::new(config.discord_token()));
    let api = Arc::new(SerenityApi::new(http.clone()).await?);
    let components = build_bot_components(config, api).await?;
    Ok((http, components))
}

/// Runs the bot: validate, init tracing, build components and chain, then
/// start the gateway and block until it exits.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(database_url = %config.database_url(), "Initializing bot");

    let (_http, components) = connect_components(&config).await?;
    let handler_chain = build_handler_chain(&components);

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_EMOJIS_AND_STICKERS;

    let mut client = Client::builder(config.discord_token(), intents)
        .event_handler(GatewayHandler::new(handler_chain))
        .await?;

    info!("Bot started successfully");

    client.start().await?;

    Ok(())
}
