//! Handler that dispatches interactions: panel buttons and dropdowns, the
//! `open`/`close` commands, intake modals, and the close/claim buttons.
//!
//! "Not configured" and "not found" conditions are ephemeral replies to the
//! user, never errors; denials come back as [`Eligibility::Denied`] values.
//! Failures inside the open flow are logged and answered with a generic
//! failure message.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use storage::{Repository, ServerRepository, TicketOptionRecord, TicketOptionRepository};
use tracing::{error, info, instrument, warn};

use crate::core::{
    DiscordApi, Event, Handler, HandlerResponse, Interaction, InteractionContext,
    InteractionData, ModalFieldSpec, ModalRequest, Result,
};
use crate::discord::commands::{CLOSE_COMMAND, OPEN_COMMAND};
use crate::discord::custom_id;
use crate::services::{
    Eligibility, OpenTicketRequest, TicketService, CLAIM_BUTTON_ID, CLOSE_BUTTON_ID,
};

const NOT_IN_GUILD: &str = "Tickets can only be opened in a server.";
const NOT_CONFIGURED: &str = "This server is not set up for tickets yet.";
const NO_OPEN_TICKET: &str = "There is no open ticket in this channel.";
const OPEN_FAILED: &str = "Something went wrong while opening your ticket.";

/// Routes interaction events to the ticket service.
#[derive(Clone)]
pub struct InteractionHandler {
    servers: ServerRepository,
    ticket_options: TicketOptionRepository,
    tickets: TicketService,
    api: Arc<dyn DiscordApi>,
}

impl InteractionHandler {
    pub fn new(
        servers: ServerRepository,
        ticket_options: TicketOptionRepository,
        tickets: TicketService,
        api: Arc<dyn DiscordApi>,
    ) -> Self {
        Self {
            servers,
            ticket_options,
            tickets,
            api,
        }
    }

    /// Ephemeral reply; a failed reply is logged and dropped.
    async fn reply(&self, ctx: &InteractionContext, text: &str) {
        if let Err(e) = self.api.respond_ephemeral(ctx, text).await {
            warn!(error = %e, user_id = ctx.user.id, "Failed to send interaction reply");
        }
    }

    /// Entry for every open request. When the option defines intake fields
    /// and no answers were collected yet, presents the modal instead.
    async fn start_open(
        &self,
        ctx: &InteractionContext,
        option: Option<TicketOptionRecord>,
        modal_answers: Option<HashMap<String, String>>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id else {
            self.reply(ctx, NOT_IN_GUILD).await;
            return Ok(());
        };

        if modal_answers.is_none() {
            if let Some(option) = &option {
                let fields = option.modal_field_list()?;
                if !fields.is_empty() {
                    let request = ModalRequest {
                        custom_id: custom_id::modal(&option.id),
                        title: option.name.clone(),
                        fields: fields
                            .into_iter()
                            .map(|f| ModalFieldSpec {
                                id: f.id,
                                label: f.label,
                                placeholder: f.placeholder,
                                required: f.required,
                            })
                            .collect(),
                    };
                    if let Err(e) = self.api.open_modal(ctx, &request).await {
                        error!(error = %e, user_id = ctx.user.id, "Failed to open modal");
                        self.reply(ctx, OPEN_FAILED).await;
                    }
                    return Ok(());
                }
            }
        }

        let Some(server) = self.servers.get(guild_id).await? else {
            self.reply(ctx, NOT_CONFIGURED).await;
            return Ok(());
        };

        match self.tickets.check_eligibility(&server, ctx.user.id).await? {
            Eligibility::Allowed => {}
            Eligibility::Denied { reason } => {
                info!(user_id = ctx.user.id, %reason, "Ticket request denied");
                self.reply(ctx, &reason).await;
                return Ok(());
            }
        }

        let request = OpenTicketRequest {
            guild_id,
            user: ctx.user.clone(),
            option,
            modal_answers: modal_answers.unwrap_or_default(),
        };
        match self.tickets.open_ticket(&request).await {
            Ok(opened) => {
                self.reply(
                    ctx,
                    &format!("Your ticket is ready: {}", opened.channel.mention()),
                )
                .await;
            }
            Err(e) => {
                error!(error = %e, user_id = ctx.user.id, "Ticket creation failed");
                self.reply(ctx, OPEN_FAILED).await;
            }
        }
        Ok(())
    }

    async fn open_by_option_id(
        &self,
        ctx: &InteractionContext,
        option_id: &str,
        modal_answers: Option<HashMap<String, String>>,
    ) -> Result<()> {
        match self.ticket_options.find_by_id(option_id).await? {
            Some(option) if option.enabled => {
                self.start_open(ctx, Some(option), modal_answers).await
            }
            _ => {
                self.reply(ctx, "That ticket type no longer exists.").await;
                Ok(())
            }
        }
    }

    async fn handle_close(
        &self,
        ctx: &InteractionContext,
        reason: Option<&str>,
    ) -> Result<()> {
        match self
            .tickets
            .close_ticket(ctx.channel_id, &ctx.user, reason)
            .await?
        {
            Some(ticket) => {
                self.reply(ctx, &format!("Ticket #{:04} closed.", ticket.number))
                    .await;
            }
            None => self.reply(ctx, NO_OPEN_TICKET).await,
        }
        Ok(())
    }

    async fn handle_claim(&self, ctx: &InteractionContext) -> Result<()> {
        match self.tickets.claim_ticket(ctx.channel_id, &ctx.user).await? {
            Some(ticket) => {
                self.reply(ctx, &format!("Ticket #{:04} is yours.", ticket.number))
                    .await;
            }
            None => self.reply(ctx, NO_OPEN_TICKET).await,
        }
        Ok(())
    }

    async fn dispatch(&self, interaction: &Interaction) -> Result<HandlerResponse> {
        let ctx = &interaction.ctx;
        match &interaction.data {
            InteractionData::Button { custom_id } => {
                if let Some(option_id) = custom_id::parse_open_button(custom_id) {
                    self.open_by_option_id(ctx, option_id, None).await?;
                } else if custom_id.as_str() == CLOSE_BUTTON_ID {
                    self.handle_close(ctx, None).await?;
                } else if custom_id.as_str() == CLAIM_BUTTON_ID {
                    self.handle_claim(ctx).await?;
                } else {
                    return Ok(HandlerResponse::Ignore);
                }
            }
            InteractionData::Select { custom_id, values } => {
                if custom_id.as_str() != custom_id::PANEL_SELECT_ID {
                    return Ok(HandlerResponse::Ignore);
                }
                let Some(option_id) = values.first() else {
                    return Ok(HandlerResponse::Ignore);
                };
                self.open_by_option_id(ctx, option_id, None).await?;
            }
            InteractionData::Command { name, options } => match name.as_str() {
                OPEN_COMMAND => {
                    let type_name = options
                        .iter()
                        .find(|(name, _)| name.as_str() == "type")
                        .map(|(_, value)| value.as_str());
                    let option = match (ctx.guild_id, type_name) {
                        (Some(guild_id), Some(type_name)) => {
                            match self
                                .ticket_options
                                .find_by_name(guild_id, type_name)
                                .await?
                            {
                                Some(option) => Some(option),
                                None => {
                                    self.reply(
                                        ctx,
                                        &format!(
                                            "No ticket type named \"{}\".",
                                            type_name
                                        ),
                                    )
                                    .await;
                                    return Ok(HandlerResponse::Stop);
                                }
                            }
                        }
                        _ => None,
                    };
                    self.start_open(ctx, option, None).await?;
                }
                CLOSE_COMMAND => {
                    let reason = options
                        .iter()
                        .find(|(name, _)| name.as_str() == "reason")
                        .map(|(_, value)| value.as_str());
                    self.handle_close(ctx, reason).await?;
                }
                _ => return Ok(HandlerResponse::Ignore),
            },
            InteractionData::ModalSubmit { custom_id, fields } => {
                let Some(option_id) = custom_id::parse_modal(custom_id) else {
                    return Ok(HandlerResponse::Ignore);
                };
                let answers: HashMap<String, String> = fields.iter().cloned().collect();
                self.open_by_option_id(ctx, option_id, Some(answers)).await?;
            }
        }
        Ok(HandlerResponse::Stop)
    }
}

#[async_trait]
impl Handler for InteractionHandler {
    #[instrument(skip(self, event))]
    async fn handle(&self, event: &Event) -> Result<HandlerResponse> {
        let Event::InteractionCreated(interaction) = event else {
            return Ok(HandlerResponse::Continue);
        };

        info!(
            user_id = interaction.ctx.user.id,
            channel_id = interaction.ctx.channel_id,
            "step: interaction dispatch"
        );
        self.dispatch(interaction).await
    }
}
