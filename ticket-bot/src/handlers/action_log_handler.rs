//! Handler that appends message events inside open ticket channels to the
//! action log in before().
//!
//! The bot's own sends are recorded by the ticket service at send time, so
//! bot-authored creates/edits are skipped here. Messages outside ticket
//! channels are ignored entirely.

use async_trait::async_trait;
use storage::{MessageActionRepository, ParticipantRepository, TicketRepository};
use tracing::{error, info, instrument};

use crate::core::{BotError, Event, Handler, Result};
use crate::services::payload;

/// Persists send/edit/delete actions for ticket channels; always continues.
#[derive(Clone)]
pub struct ActionLogHandler {
    tickets: TicketRepository,
    actions: MessageActionRepository,
    participants: ParticipantRepository,
}

impl ActionLogHandler {
    pub fn new(
        tickets: TicketRepository,
        actions: MessageActionRepository,
        participants: ParticipantRepository,
    ) -> Self {
        Self {
            tickets,
            actions,
            participants,
        }
    }

    /// The open ticket the channel belongs to, if any.
    async fn ticket_for_channel(&self, channel_id: i64) -> Result<Option<String>> {
        let ticket = self.tickets.find_open_by_channel(channel_id).await?;
        Ok(ticket.map(|t| t.id))
    }
}

#[async_trait]
impl Handler for ActionLogHandler {
    #[instrument(skip(self, event))]
    async fn before(&self, event: &Event) -> Result<bool> {
        match event {
            Event::MessageCreated(payload) => {
                if payload.author.is_bot {
                    return Ok(true);
                }
                let Some(ticket_id) = self.ticket_for_channel(payload.channel_id).await?
                else {
                    return Ok(true);
                };

                let record = payload::send_action(&ticket_id, payload);
                self.actions.append(&record).await.map_err(|e| {
                    error!(error = %e, ticket_id = %ticket_id, "Failed to append send action");
                    BotError::Database(e.to_string())
                })?;
                self.participants
                    .record_message(
                        &ticket_id,
                        payload.author.id,
                        &payload.author.username,
                        payload.created_at,
                    )
                    .await?;

                info!(
                    ticket_id = %ticket_id,
                    message_id = payload.message_id,
                    "step: send action recorded"
                );
            }
            Event::MessageUpdated(payload) => {
                if payload.author.as_ref().is_some_and(|a| a.is_bot) {
                    return Ok(true);
                }
                let Some(ticket_id) = self.ticket_for_channel(payload.channel_id).await?
                else {
                    return Ok(true);
                };

                let record = payload::edit_action(&ticket_id, payload);
                self.actions.append(&record).await?;

                info!(
                    ticket_id = %ticket_id,
                    message_id = payload.message_id,
                    "step: edit action recorded"
                );
            }
            Event::MessageDeleted(payload) => {
                let Some(ticket_id) = self.ticket_for_channel(payload.channel_id).await?
                else {
                    return Ok(true);
                };

                let record = payload::delete_action(&ticket_id, payload);
                self.actions.append(&record).await?;

                info!(
                    ticket_id = %ticket_id,
                    message_id = payload.message_id,
                    "step: delete action recorded"
                );
            }
            _ => {}
        }

        Ok(true)
    }
}
