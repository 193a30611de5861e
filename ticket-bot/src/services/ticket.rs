//! Ticket lifecycle: eligibility checks and the open/close/claim flows.
//!
//! Opening a ticket is a sequential chain: counter, channel name, channel
//! creation (with the category-full fallback), ticket row, initial message,
//! send action. Failures abort the chain and are surfaced to the caller;
//! earlier steps are not rolled back, so a created channel can be left
//! behind (logged with its id).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use storage::{
    ActionKind, MessageActionRecord, MessageActionRepository, ServerRecord,
    ServerRepository, TicketOptionRecord, TicketRecord, TicketRepository,
};
use tracing::{error, info, instrument, warn};

use crate::core::{
    ApiError, BotError, ButtonKind, ButtonSpec, ChannelRef, CreateChannelRequest,
    DiscordApi, EmbedSpec, OutgoingMessage, Result, User,
};
use crate::services::placeholder::{
    replace_channel_name_placeholders, replace_placeholders, PlaceholderContext,
};

/// Custom id of the close button under initial messages.
pub const CLOSE_BUTTON_ID: &str = "ticket_close";
/// Custom id of the claim button under initial messages.
pub const CLAIM_BUTTON_ID: &str = "ticket_claim";

/// Username recorded on system send actions written by the bot itself.
const SYSTEM_AUTHOR: &str = "Ticket Bot";

const DEFAULT_EMBED_COLOR: i64 = 0x5865F2;

/// Outcome of an eligibility check; a denial is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Allowed,
    Denied { reason: String },
}

impl Eligibility {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Eligibility::Allowed)
    }
}

/// Input to [`TicketService::open_ticket`].
#[derive(Debug, Clone)]
pub struct OpenTicketRequest {
    pub guild_id: i64,
    pub user: User,
    /// Ticket option chosen via panel/command; None opens a plain ticket.
    pub option: Option<TicketOptionRecord>,
    /// Modal answers keyed by field id, for `modal:<fieldId>` placeholders.
    pub modal_answers: HashMap<String, String>,
}

/// A successfully opened ticket.
#[derive(Debug, Clone)]
pub struct OpenedTicket {
    pub ticket: TicketRecord,
    pub channel: ChannelRef,
}

/// Eligibility checks and open/close/claim orchestration.
#[derive(Clone)]
pub struct TicketService {
    servers: ServerRepository,
    tickets: TicketRepository,
    actions: MessageActionRepository,
    api: Arc<dyn DiscordApi>,
}

impl TicketService {
    pub fn new(
        servers: ServerRepository,
        tickets: TicketRepository,
        actions: MessageActionRepository,
        api: Arc<dyn DiscordApi>,
    ) -> Self {
        Self {
            servers,
            tickets,
            actions,
            api,
        }
    }

    /// Whether the user may open a ticket right now. Blacklist always wins,
    /// then the open-ticket limit (at exactly the max the user is denied),
    /// then the cooldown.
    #[instrument(skip(self, server), fields(guild_id = server.guild_id))]
    pub async fn check_eligibility(
        &self,
        server: &ServerRecord,
        user_id: i64,
    ) -> Result<Eligibility> {
        if self.servers.is_blacklisted(server.guild_id, user_id).await? {
            return Ok(Eligibility::Denied {
                reason: "You are blacklisted from opening tickets in this server."
                    .to_string(),
            });
        }

        let open = self
            .tickets
            .count_open_by_user(server.guild_id, user_id)
            .await?;
        if open >= server.max_open_tickets_per_user {
            return Ok(Eligibility::Denied {
                reason: format!(
                    "You already have {} open ticket(s); close one before opening another.",
                    open
                ),
            });
        }

        if server.ticket_cooldown_secs > 0 {
            if let Some(last) = self
                .tickets
                .most_recent_opened_at(server.guild_id, user_id)
                .await?
            {
                let elapsed = (Utc::now() - last).num_seconds();
                if elapsed < server.ticket_cooldown_secs {
                    let wait = server.ticket_cooldown_secs - elapsed;
                    return Ok(Eligibility::Denied {
                        reason: format!(
                            "Please wait {} more second(s) before opening another ticket.",
                            wait
                        ),
                    });
                }
            }
        }

        Ok(Eligibility::Allowed)
    }

    /// Opens a ticket: counter, channel name, private channel (with the
    /// category-full fallback), ticket row, initial message, send action.
    #[instrument(skip(self, request), fields(guild_id = request.guild_id, user_id = request.user.id))]
    pub async fn open_ticket(&self, request: &OpenTicketRequest) -> Result<OpenedTicket> {
        let server = match self.servers.get(request.guild_id).await? {
            Some(server) => server,
            None => {
                return Err(BotError::Config(format!(
                    "guild {} is not set up",
                    request.guild_id
                )))
            }
        };
        let option = request.option.as_ref();

        let number = self.servers.next_ticket_number(request.guild_id).await?;
        info!(number, "step: ticket number assigned");

        let mut ctx = PlaceholderContext {
            user_id: request.user.id,
            username: request.user.username.clone(),
            user_mention: request.user.mention(),
            ticket_number: Some(number),
            ticket_channel_mention: None,
            option_name: option.map(|o| o.name.clone()),
            server_name: Some(server.name.clone()),
            modal_answers: request.modal_answers.clone(),
        };

        let template = option
            .and_then(|o| o.channel_name_template.as_deref())
            .unwrap_or(&server.channel_name_template);
        let mut channel_name = replace_channel_name_placeholders(template, &ctx);
        if channel_name.is_empty() {
            channel_name = format!("ticket-{:04}", number);
        }

        let channel = self
            .create_channel_with_fallback(&server, option, &channel_name, &request.user)
            .await?;
        info!(channel_id = channel.channel_id, "step: ticket channel created");
        ctx.ticket_channel_mention = Some(channel.mention());

        let ticket = TicketRecord::new(
            request.guild_id,
            number,
            channel.channel_id,
            request.user.id,
            request.user.username.clone(),
            option.map(|o| o.id.clone()),
        );
        if let Err(e) = self.tickets.insert(&ticket).await {
            error!(
                error = %e,
                channel_id = channel.channel_id,
                "Failed to insert ticket; created channel is orphaned"
            );
            return Err(e.into());
        }

        let message = self.initial_message(&server, option, &ctx, number);
        let message_id = match self.api.send_message(channel.channel_id, &message).await {
            Ok(id) => id,
            Err(e) => {
                error!(
                    error = %e,
                    channel_id = channel.channel_id,
                    ticket_id = %ticket.id,
                    "Failed to send initial message"
                );
                return Err(e.into());
            }
        };

        let content = message
            .content
            .clone()
            .or_else(|| message.embed.as_ref().map(|e| e.description.clone()));
        self.record_system_send(&ticket.id, message_id, content).await?;

        info!(
            ticket_id = %ticket.id,
            number,
            channel_id = channel.channel_id,
            "Ticket opened"
        );
        Ok(OpenedTicket { ticket, channel })
    }

    /// Channel creation with the one retry policy: on a category-full
    /// failure try the fallback category, then no category at all.
    async fn create_channel_with_fallback(
        &self,
        server: &ServerRecord,
        option: Option<&TicketOptionRecord>,
        channel_name: &str,
        opener: &User,
    ) -> Result<ChannelRef> {
        let allow_role_ids = match option {
            Some(option) => option.role_ids()?,
            None => Vec::new(),
        };
        let mut req = CreateChannelRequest {
            guild_id: server.guild_id,
            name: channel_name.to_string(),
            category_id: server.ticket_category_id,
            topic: option.and_then(|o| o.description.clone()),
            allow_user_ids: vec![opener.id],
            allow_role_ids,
        };

        match self.api.create_ticket_channel(&req).await {
            Ok(channel) => Ok(channel),
            Err(ApiError::CategoryFull) => {
                warn!(
                    guild_id = server.guild_id,
                    category_id = ?req.category_id,
                    "Ticket category full, retrying against fallback"
                );
                req.category_id = server.fallback_category_id;
                match self.api.create_ticket_channel(&req).await {
                    Ok(channel) => Ok(channel),
                    Err(ApiError::CategoryFull) => {
                        warn!(
                            guild_id = server.guild_id,
                            "Fallback category full, retrying with no category"
                        );
                        req.category_id = None;
                        Ok(self.api.create_ticket_channel(&req).await?)
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The first message in a fresh ticket channel: the configured template
    /// through the placeholder engine, or the default embed.
    fn initial_message(
        &self,
        server: &ServerRecord,
        option: Option<&TicketOptionRecord>,
        ctx: &PlaceholderContext,
        number: i64,
    ) -> OutgoingMessage {
        let buttons = vec![
            ButtonSpec {
                custom_id: CLOSE_BUTTON_ID.to_string(),
                label: "Close".to_string(),
                kind: ButtonKind::Danger,
                emoji: Some("🔒".to_string()),
            },
            ButtonSpec {
                custom_id: CLAIM_BUTTON_ID.to_string(),
                label: "Claim".to_string(),
                kind: ButtonKind::Success,
                emoji: Some("🙋".to_string()),
            },
        ];

        let template = option
            .and_then(|o| o.initial_message.as_deref())
            .or(server.welcome_message.as_deref());

        match template {
            Some(template) => {
                OutgoingMessage::text(replace_placeholders(template, ctx))
                    .with_buttons(buttons)
            }
            None => OutgoingMessage::embed(EmbedSpec {
                title: Some(format!("Ticket #{:04}", number)),
                description: format!(
                    "{}, thanks for reaching out. Support will be with you shortly.",
                    ctx.user_mention
                ),
                color: Some(DEFAULT_EMBED_COLOR),
            })
            .with_buttons(buttons),
        }
    }

    /// Closes the open ticket bound to `channel_id`. Returns the closed
    /// ticket, or None when the channel has no open ticket (a user-facing
    /// condition, not an error).
    #[instrument(skip(self, closed_by))]
    pub async fn close_ticket(
        &self,
        channel_id: i64,
        closed_by: &User,
        reason: Option<&str>,
    ) -> Result<Option<TicketRecord>> {
        let ticket = match self.tickets.find_open_by_channel(channel_id).await? {
            Some(ticket) => ticket,
            None => return Ok(None),
        };

        self.tickets
            .set_closed(&ticket.id, Utc::now(), reason)
            .await?;
        info!(ticket_id = %ticket.id, closed_by = closed_by.id, "Ticket closed");

        // Best-effort farewell; the ticket is already closed if this fails.
        let farewell = match reason {
            Some(reason) => format!(
                "Ticket closed by {} — {}",
                closed_by.mention(),
                reason
            ),
            None => format!("Ticket closed by {}", closed_by.mention()),
        };
        match self
            .api
            .send_message(channel_id, &OutgoingMessage::text(&farewell))
            .await
        {
            Ok(message_id) => {
                self.record_system_send(&ticket.id, message_id, Some(farewell))
                    .await?;
            }
            Err(e) => {
                warn!(error = %e, channel_id, "Failed to send close message");
            }
        }

        Ok(self.tickets.get(&ticket.id).await?.or(Some(ticket)))
    }

    /// Claims the open ticket bound to `channel_id` for `claimed_by`.
    /// Returns None when the channel has no open ticket.
    #[instrument(skip(self, claimed_by))]
    pub async fn claim_ticket(
        &self,
        channel_id: i64,
        claimed_by: &User,
    ) -> Result<Option<TicketRecord>> {
        let ticket = match self.tickets.find_open_by_channel(channel_id).await? {
            Some(ticket) => ticket,
            None => return Ok(None),
        };

        self.tickets.set_claimed(&ticket.id, claimed_by.id).await?;
        info!(ticket_id = %ticket.id, claimed_by = claimed_by.id, "Ticket claimed");

        let notice = format!("{} will handle this ticket.", claimed_by.mention());
        match self
            .api
            .send_message(channel_id, &OutgoingMessage::text(&notice))
            .await
        {
            Ok(message_id) => {
                self.record_system_send(&ticket.id, message_id, Some(notice))
                    .await?;
            }
            Err(e) => {
                warn!(error = %e, channel_id, "Failed to send claim message");
            }
        }

        Ok(self.tickets.get(&ticket.id).await?.or(Some(ticket)))
    }

    /// Appends the send action for a message the bot itself wrote.
    async fn record_system_send(
        &self,
        ticket_id: &str,
        message_id: i64,
        content: Option<String>,
    ) -> Result<()> {
        let action = MessageActionRecord::new(
            ticket_id,
            message_id,
            ActionKind::Send,
            0,
            SYSTEM_AUTHOR,
            content,
            true,
            Utc::now(),
        );
        self.actions.append(&action).await?;
        Ok(())
    }
}
