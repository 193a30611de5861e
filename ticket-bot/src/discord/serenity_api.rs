//! Serenity-backed implementation of [`crate::core::DiscordApi`].
//!
//! Production code talks to Discord through this adapter; tests substitute
//! another DiscordApi impl. The one platform failure the rest of the bot
//! distinguishes is the category-channel limit, mapped to
//! [`ApiError::CategoryFull`] here.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ButtonStyle, ChannelId, ChannelType, CreateActionRow, CreateButton, CreateChannel,
    CreateEmbed, CreateInputText, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, CreateModal, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, GuildId, InputTextStyle,
    InteractionId, MessageId, PermissionOverwrite, PermissionOverwriteType, Permissions,
    ReactionType, RoleId, UserId,
};
use serenity::http::{Http, HttpError};

use crate::core::{
    ApiError, ButtonKind, ChannelRef, CreateChannelRequest, DiscordApi,
    InteractionContext, ModalRequest, OutgoingMessage, PanelView,
};

/// Thin wrapper around serenity's Http client.
pub struct SerenityApi {
    http: Arc<Http>,
    /// The bot's own user id, granted access on every ticket channel.
    bot_user_id: u64,
}

impl SerenityApi {
    /// Creates the adapter and resolves the bot's own user id.
    pub async fn new(http: Arc<Http>) -> Result<Self, ApiError> {
        let me = http
            .get_current_user()
            .await
            .map_err(|e| ApiError::Platform(e.to_string()))?;
        Ok(Self {
            http,
            bot_user_id: me.id.get(),
        })
    }

    /// Maps a channel-creation failure; Discord reports a full category as a
    /// form-body validation error naming the parent channel maximum.
    fn map_create_channel_error(e: serenity::Error) -> ApiError {
        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) = &e {
            let detail = format!("{} {:?}", resp.error.message, resp.error.errors);
            if resp.error.code == 50035
                && (detail.contains("CHANNEL_PARENT_MAX_CHANNELS")
                    || detail.to_lowercase().contains("maximum number of channels"))
            {
                return ApiError::CategoryFull;
            }
        }
        ApiError::Platform(e.to_string())
    }

    fn platform_error(e: serenity::Error) -> ApiError {
        ApiError::Platform(e.to_string())
    }

    fn build_buttons(message: &OutgoingMessage) -> Option<CreateActionRow> {
        if message.buttons.is_empty() {
            return None;
        }
        let buttons = message
            .buttons
            .iter()
            .map(|spec| {
                let style = match spec.kind {
                    ButtonKind::Primary => ButtonStyle::Primary,
                    ButtonKind::Secondary => ButtonStyle::Secondary,
                    ButtonKind::Success => ButtonStyle::Success,
                    ButtonKind::Danger => ButtonStyle::Danger,
                };
                let mut button = CreateButton::new(&spec.custom_id)
                    .label(&spec.label)
                    .style(style);
                if let Some(emoji) = &spec.emoji {
                    button = button.emoji(ReactionType::Unicode(emoji.clone()));
                }
                button
            })
            .collect();
        Some(CreateActionRow::Buttons(buttons))
    }

    fn build_embed(message: &OutgoingMessage) -> Option<CreateEmbed> {
        message.embed.as_ref().map(|spec| {
            let mut embed = CreateEmbed::new().description(&spec.description);
            if let Some(title) = &spec.title {
                embed = embed.title(title);
            }
            if let Some(color) = spec.color {
                embed = embed.color(color as u32);
            }
            embed
        })
    }

    fn build_message(message: &OutgoingMessage) -> CreateMessage {
        let mut builder = CreateMessage::new();
        if let Some(content) = &message.content {
            builder = builder.content(content);
        }
        if let Some(embed) = Self::build_embed(message) {
            builder = builder.embed(embed);
        }
        if let Some(row) = Self::build_buttons(message) {
            builder = builder.components(vec![row]);
        }
        builder
    }
}

#[async_trait]
impl DiscordApi for SerenityApi {
    async fn create_ticket_channel(
        &self,
        req: &CreateChannelRequest,
    ) -> Result<ChannelRef, ApiError> {
        let guild_id = GuildId::new(req.guild_id as u64);

        // Private channel: deny @everyone (the everyone role id equals the
        // guild id), allow the bot, the opener, and the responsible roles.
        let member_allow = Permissions::VIEW_CHANNEL
            | Permissions::SEND_MESSAGES
            | Permissions::READ_MESSAGE_HISTORY
            | Permissions::ATTACH_FILES;
        let mut permissions = vec![
            PermissionOverwrite {
                allow: Permissions::empty(),
                deny: Permissions::VIEW_CHANNEL,
                kind: PermissionOverwriteType::Role(RoleId::new(req.guild_id as u64)),
            },
            PermissionOverwrite {
                allow: member_allow,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Member(UserId::new(self.bot_user_id)),
            },
        ];
        for user_id in &req.allow_user_ids {
            permissions.push(PermissionOverwrite {
                allow: member_allow,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Member(UserId::new(*user_id as u64)),
            });
        }
        for role_id in &req.allow_role_ids {
            permissions.push(PermissionOverwrite {
                allow: member_allow,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Role(RoleId::new(*role_id as u64)),
            });
        }

        let mut builder = CreateChannel::new(&req.name)
            .kind(ChannelType::Text)
            .permissions(permissions);
        if let Some(category_id) = req.category_id {
            builder = builder.category(ChannelId::new(category_id as u64));
        }
        if let Some(topic) = &req.topic {
            builder = builder.topic(topic);
        }

        let channel = guild_id
            .create_channel(&self.http, builder)
            .await
            .map_err(Self::map_create_channel_error)?;

        Ok(ChannelRef {
            guild_id: req.guild_id,
            channel_id: channel.id.get() as i64,
            name: channel.name.clone(),
        })
    }

    async fn send_message(
        &self,
        channel_id: i64,
        message: &OutgoingMessage,
    ) -> Result<i64, ApiError> {
        let sent = ChannelId::new(channel_id as u64)
            .send_message(&self.http, Self::build_message(message))
            .await
            .map_err(Self::platform_error)?;
        Ok(sent.id.get() as i64)
    }

    async fn delete_message(
        &self,
        channel_id: i64,
        message_id: i64,
    ) -> Result<(), ApiError> {
        ChannelId::new(channel_id as u64)
            .delete_message(&self.http, MessageId::new(message_id as u64))
            .await
            .map_err(Self::platform_error)?;
        Ok(())
    }

    async fn respond_ephemeral(
        &self,
        interaction: &InteractionContext,
        text: &str,
    ) -> Result<(), ApiError> {
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(text)
                .ephemeral(true),
        );
        self.http
            .create_interaction_response(
                InteractionId::new(interaction.interaction_id as u64),
                &interaction.token,
                &response,
                vec![],
            )
            .await
            .map_err(Self::platform_error)?;
        Ok(())
    }

    async fn open_modal(
        &self,
        interaction: &InteractionContext,
        modal: &ModalRequest,
    ) -> Result<(), ApiError> {
        let rows = modal
            .fields
            .iter()
            .map(|field| {
                let mut input =
                    CreateInputText::new(InputTextStyle::Short, &field.label, &field.id)
                        .required(field.required);
                if let Some(placeholder) = &field.placeholder {
                    input = input.placeholder(placeholder);
                }
                CreateActionRow::InputText(input)
            })
            .collect();

        let response = CreateInteractionResponse::Modal(
            CreateModal::new(&modal.custom_id, &modal.title).components(rows),
        );
        self.http
            .create_interaction_response(
                InteractionId::new(interaction.interaction_id as u64),
                &interaction.token,
                &response,
                vec![],
            )
            .await
            .map_err(Self::platform_error)?;
        Ok(())
    }

    async fn publish_panel(
        &self,
        channel_id: i64,
        view: &PanelView,
    ) -> Result<i64, ApiError> {
        let mut embed = CreateEmbed::new().title(&view.title).description(&view.body);
        if let Some(color) = view.color {
            embed = embed.color(color as u32);
        }

        let row = if view.dropdown {
            let options = view
                .options
                .iter()
                .map(|option| {
                    let mut entry = CreateSelectMenuOption::new(
                        option.label.clone(),
                        option.option_id.clone(),
                    );
                    if let Some(description) = &option.description {
                        entry = entry.description(description);
                    }
                    if let Some(emoji) = &option.emoji {
                        entry = entry.emoji(ReactionType::Unicode(emoji.clone()));
                    }
                    entry
                })
                .collect();
            CreateActionRow::SelectMenu(
                CreateSelectMenu::new(
                    crate::discord::custom_id::PANEL_SELECT_ID,
                    CreateSelectMenuKind::String { options },
                )
                .placeholder("Select a ticket type"),
            )
        } else {
            let buttons = view
                .options
                .iter()
                .map(|option| {
                    let mut button = CreateButton::new(
                        crate::discord::custom_id::open_button(&option.option_id),
                    )
                    .label(&option.label)
                    .style(ButtonStyle::Primary);
                    if let Some(emoji) = &option.emoji {
                        button = button.emoji(ReactionType::Unicode(emoji.clone()));
                    }
                    button
                })
                .collect();
            CreateActionRow::Buttons(buttons)
        };

        let sent = ChannelId::new(channel_id as u64)
            .send_message(
                &self.http,
                CreateMessage::new().embed(embed).components(vec![row]),
            )
            .await
            .map_err(Self::platform_error)?;
        Ok(sent.id.get() as i64)
    }
}
