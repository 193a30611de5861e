//! Handler that applies guild snapshots and live entity events through the
//! sync service.

use async_trait::async_trait;
use tracing::{error, instrument};

use crate::core::{Event, Handler, HandlerResponse, Result};
use crate::services::SyncService;

/// Keeps the stored guild mirror current; always continues.
#[derive(Clone)]
pub struct SyncHandler {
    sync: SyncService,
}

impl SyncHandler {
    pub fn new(sync: SyncService) -> Self {
        Self { sync }
    }
}

#[async_trait]
impl Handler for SyncHandler {
    #[instrument(skip(self, event))]
    async fn handle(&self, event: &Event) -> Result<HandlerResponse> {
        let result = match event {
            Event::GuildAvailable(snapshot) => self.sync.sync_guild(snapshot).await,
            Event::ChannelCreated(channel) => self.sync.apply_channel(channel).await,
            Event::ChannelDeleted {
                guild_id,
                channel_id,
            } => self.sync.remove_channel(*guild_id, *channel_id).await,
            Event::RoleCreated(role) => self.sync.apply_role(role).await,
            Event::RoleDeleted { guild_id, role_id } => {
                self.sync.remove_role(*guild_id, *role_id).await
            }
            Event::MemberJoined(member) => self.sync.apply_member(member).await,
            Event::MemberLeft { guild_id, user_id } => {
                self.sync.remove_member(*guild_id, *user_id).await
            }
            Event::EmojisUpdated { guild_id, emojis } => {
                self.sync.apply_emojis(*guild_id, emojis).await
            }
            _ => return Ok(HandlerResponse::Continue),
        };

        // Sync is best-effort bookkeeping; a failure must not stop the chain.
        if let Err(e) = result {
            error!(error = %e, event = event.kind(), "Guild sync failed");
        }
        Ok(HandlerResponse::Continue)
    }
}
