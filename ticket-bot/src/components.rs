//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use std::sync::Arc;

use anyhow::Result;
use storage::Storage;
use tracing::{info, instrument};

use crate::chain::HandlerChain;
use crate::config::BotConfig;
use crate::core::DiscordApi;
use crate::handlers::{ActionLogHandler, InteractionHandler, SyncHandler};
use crate::services::{PanelService, SyncService, TicketService, TranscriptService};

/// Core dependencies for run_bot; produced by the component factory.
#[derive(Clone)]
pub struct BotComponents {
    pub storage: Storage,
    pub api: Arc<dyn DiscordApi>,
    pub ticket_service: TicketService,
    pub transcript_service: TranscriptService,
    pub sync_service: SyncService,
    pub panel_service: PanelService,
}

/// Connects storage and wires every service over the given platform API.
#[instrument(skip(config, api))]
pub async fn build_bot_components(
    config: &BotConfig,
    api: Arc<dyn DiscordApi>,
) -> Result<BotComponents> {
    let storage = Storage::connect(config.database_url()).await?;
    info!(database_url = %config.database_url(), "Storage connected");

    let ticket_service = TicketService::new(
        storage.servers.clone(),
        storage.tickets.clone(),
        storage.message_actions.clone(),
        api.clone(),
    );
    let transcript_service = TranscriptService::new(storage.message_actions.clone());
    let sync_service = SyncService::new(storage.servers.clone(), storage.sync.clone());
    let panel_service = PanelService::new(
        storage.panels.clone(),
        storage.ticket_options.clone(),
        api.clone(),
    );

    Ok(BotComponents {
        storage,
        api,
        ticket_service,
        transcript_service,
        sync_service,
        panel_service,
    })
}

/// The production chain: sync bookkeeping, the action log, then interaction
/// dispatch.
pub fn build_handler_chain(components: &BotComponents) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(SyncHandler::new(components.sync_service.clone())))
        .add_handler(Arc::new(ActionLogHandler::new(
            components.storage.tickets.clone(),
            components.storage.message_actions.clone(),
            components.storage.participants.clone(),
        )))
        .add_handler(Arc::new(InteractionHandler::new(
            components.storage.servers.clone(),
            components.storage.ticket_options.clone(),
            components.ticket_service.clone(),
            components.api.clone(),
        )))
}
