//! Gateway runner: converts serenity events to core [`Event`]s and passes
//! them to the HandlerChain. Each event is handled in a spawned task; chain
//! errors are logged and never crash the process.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serenity::all::{
    ChannelId, Emoji, EmojiId, Guild, GuildChannel, GuildId, Interaction, Member,
    Message, MessageId, MessageUpdateEvent, Ready, Role,
};
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::user::User as SerenityUser;
use tracing::{error, info};

use crate::chain::HandlerChain;
use crate::core::{
    ChannelInfo, EmojiInfo, Event, GuildSnapshot, InteractionContext, InteractionData,
    MemberInfo, MessageDeletePayload, MessagePayload, MessageUpdatePayload, RoleInfo,
    User,
};

fn to_core_user(user: &SerenityUser) -> User {
    User {
        id: user.id.get() as i64,
        username: user.name.clone(),
        display_name: user.global_name.clone(),
        is_bot: user.bot,
    }
}

fn to_utc(ts: &serenity::model::Timestamp) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts.unix_timestamp(), 0).unwrap_or_else(Utc::now)
}

fn to_channel_info(channel: &GuildChannel) -> ChannelInfo {
    ChannelInfo {
        guild_id: channel.guild_id.get() as i64,
        channel_id: channel.id.get() as i64,
        name: channel.name.clone(),
        kind: channel.kind.name().to_string(),
        parent_id: channel.parent_id.map(|id| id.get() as i64),
    }
}

fn to_role_info(role: &Role) -> RoleInfo {
    RoleInfo {
        guild_id: role.guild_id.get() as i64,
        role_id: role.id.get() as i64,
        name: role.name.clone(),
        color: role.colour.0 as i64,
        position: role.position as i64,
    }
}

fn to_member_info(member: &Member) -> MemberInfo {
    MemberInfo {
        guild_id: member.guild_id.get() as i64,
        user: to_core_user(&member.user),
        joined_at: member.joined_at.as_ref().map(to_utc),
    }
}

fn to_emoji_info(guild_id: GuildId, emoji: &Emoji) -> EmojiInfo {
    EmojiInfo {
        guild_id: guild_id.get() as i64,
        emoji_id: emoji.id.get() as i64,
        name: emoji.name.clone(),
        animated: emoji.animated,
    }
}

fn to_message_payload(msg: &Message) -> MessagePayload {
    MessagePayload {
        message_id: msg.id.get() as i64,
        guild_id: msg.guild_id.map(|id| id.get() as i64),
        channel_id: msg.channel_id.get() as i64,
        author: to_core_user(&msg.author),
        content: msg.content.clone(),
        attachments: msg.attachments.iter().map(|a| a.url.clone()).collect(),
        embeds: msg
            .embeds
            .iter()
            .filter_map(|e| serde_json::to_value(e).ok())
            .collect(),
        created_at: to_utc(&msg.timestamp),
    }
}

fn to_update_payload(event: &MessageUpdateEvent) -> MessageUpdatePayload {
    MessageUpdatePayload {
        message_id: event.id.get() as i64,
        guild_id: event.guild_id.map(|id| id.get() as i64),
        channel_id: event.channel_id.get() as i64,
        author: event.author.as_ref().map(to_core_user),
        content: event.content.clone(),
        attachments: event
            .attachments
            .as_ref()
            .map(|list| list.iter().map(|a| a.url.clone()).collect()),
        embeds: event.embeds.as_ref().map(|list| {
            list.iter()
                .filter_map(|e| serde_json::to_value(e).ok())
                .collect()
        }),
        edited_at: event
            .edited_timestamp
            .as_ref()
            .map(to_utc)
            .unwrap_or_else(Utc::now),
    }
}

fn to_snapshot(guild: &Guild) -> GuildSnapshot {
    GuildSnapshot {
        guild_id: guild.id.get() as i64,
        name: guild.name.clone(),
        icon_url: guild.icon_url(),
        channels: guild.channels.values().map(to_channel_info).collect(),
        roles: guild.roles.values().map(to_role_info).collect(),
        members: guild.members.values().map(to_member_info).collect(),
        emojis: guild
            .emojis
            .values()
            .map(|e| to_emoji_info(guild.id, e))
            .collect(),
    }
}

fn to_interaction(interaction: &Interaction) -> Option<crate::core::Interaction> {
    match interaction {
        Interaction::Command(cmd) => Some(crate::core::Interaction {
            ctx: InteractionContext {
                interaction_id: cmd.id.get() as i64,
                token: cmd.token.clone(),
                guild_id: cmd.guild_id.map(|id| id.get() as i64),
                channel_id: cmd.channel_id.get() as i64,
                user: to_core_user(&cmd.user),
            },
            data: InteractionData::Command {
                name: cmd.data.name.clone(),
                options: cmd
                    .data
                    .options
                    .iter()
                    .map(|option| {
                        let value = option
                            .value
                            .as_str()
                            .map(str::to_string)
                            .unwrap_or_default();
                        (option.name.clone(), value)
                    })
                    .collect(),
            },
        }),
        Interaction::Component(component) => {
            use serenity::all::ComponentInteractionDataKind;
            let data = match &component.data.kind {
                ComponentInteractionDataKind::Button => InteractionData::Button {
                    custom_id: component.data.custom_id.clone(),
                },
                ComponentInteractionDataKind::StringSelect { values } => {
                    InteractionData::Select {
                        custom_id: component.data.custom_id.clone(),
                        values: values.clone(),
                    }
                }
                _ => return None,
            };
            Some(crate::core::Interaction {
                ctx: InteractionContext {
                    interaction_id: component.id.get() as i64,
                    token: component.token.clone(),
                    guild_id: component.guild_id.map(|id| id.get() as i64),
                    channel_id: component.channel_id.get() as i64,
                    user: to_core_user(&component.user),
                },
                data,
            })
        }
        Interaction::Modal(modal) => {
            use serenity::all::ActionRowComponent;
            let mut fields = Vec::new();
            for row in &modal.data.components {
                for component in &row.components {
                    if let ActionRowComponent::InputText(input) = component {
                        fields.push((
                            input.custom_id.clone(),
                            input.value.clone().unwrap_or_default(),
                        ));
                    }
                }
            }
            Some(crate::core::Interaction {
                ctx: InteractionContext {
                    interaction_id: modal.id.get() as i64,
                    token: modal.token.clone(),
                    guild_id: modal.guild_id.map(|id| id.get() as i64),
                    channel_id: modal.channel_id.get() as i64,
                    user: to_core_user(&modal.user),
                },
                data: InteractionData::ModalSubmit {
                    custom_id: modal.data.custom_id.clone(),
                    fields,
                },
            })
        }
        _ => None,
    }
}

/// Receives serenity events and drives the handler chain.
pub struct GatewayHandler {
    chain: HandlerChain,
}

impl GatewayHandler {
    pub fn new(chain: HandlerChain) -> Self {
        Self { chain }
    }

    /// Runs the chain for one core event in a spawned task.
    fn dispatch(&self, event: Event) {
        let chain = self.chain.clone();
        tokio::spawn(async move {
            if let Err(e) = chain.handle(&event).await {
                error!(error = %e, event = event.kind(), "Handler chain failed");
            }
        });
    }
}

#[async_trait]
impl EventHandler for GatewayHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(bot = %ready.user.name, guilds = ready.guilds.len(), "Gateway ready");
        if let Err(e) = super::commands::register_commands(&ctx.http).await {
            error!(error = %e, "Failed to register slash commands");
        }
    }

    async fn guild_create(&self, _ctx: Context, guild: Guild, _is_new: Option<bool>) {
        self.dispatch(Event::GuildAvailable(to_snapshot(&guild)));
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        self.dispatch(Event::MessageCreated(to_message_payload(&msg)));
    }

    async fn message_update(
        &self,
        _ctx: Context,
        _old: Option<Message>,
        _new: Option<Message>,
        event: MessageUpdateEvent,
    ) {
        self.dispatch(Event::MessageUpdated(to_update_payload(&event)));
    }

    async fn message_delete(
        &self,
        _ctx: Context,
        channel_id: ChannelId,
        deleted_message_id: MessageId,
        guild_id: Option<GuildId>,
    ) {
        self.dispatch(Event::MessageDeleted(MessageDeletePayload {
            message_id: deleted_message_id.get() as i64,
            guild_id: guild_id.map(|id| id.get() as i64),
            channel_id: channel_id.get() as i64,
            deleted_at: Utc::now(),
        }));
    }

    async fn channel_create(&self, _ctx: Context, channel: GuildChannel) {
        self.dispatch(Event::ChannelCreated(to_channel_info(&channel)));
    }

    async fn channel_delete(
        &self,
        _ctx: Context,
        channel: GuildChannel,
        _messages: Option<Vec<Message>>,
    ) {
        self.dispatch(Event::ChannelDeleted {
            guild_id: channel.guild_id.get() as i64,
            channel_id: channel.id.get() as i64,
        });
    }

    async fn guild_role_create(&self, _ctx: Context, new: Role) {
        self.dispatch(Event::RoleCreated(to_role_info(&new)));
    }

    async fn guild_role_delete(
        &self,
        _ctx: Context,
        guild_id: GuildId,
        removed_role_id: serenity::all::RoleId,
        _removed_role_data: Option<Role>,
    ) {
        self.dispatch(Event::RoleDeleted {
            guild_id: guild_id.get() as i64,
            role_id: removed_role_id.get() as i64,
        });
    }

    async fn guild_member_addition(&self, _ctx: Context, new_member: Member) {
        self.dispatch(Event::MemberJoined(to_member_info(&new_member)));
    }

    async fn guild_member_removal(
        &self,
        _ctx: Context,
        guild_id: GuildId,
        user: SerenityUser,
        _member_data: Option<Member>,
    ) {
        self.dispatch(Event::MemberLeft {
            guild_id: guild_id.get() as i64,
            user_id: user.id.get() as i64,
        });
    }

    async fn guild_emojis_update(
        &self,
        _ctx: Context,
        guild_id: GuildId,
        current_state: HashMap<EmojiId, Emoji>,
    ) {
        self.dispatch(Event::EmojisUpdated {
            guild_id: guild_id.get() as i64,
            emojis: current_state
                .values()
                .map(|e| to_emoji_info(guild_id, e))
                .collect(),
        });
    }

    async fn interaction_create(&self, _ctx: Context, interaction: Interaction) {
        if let Some(core) = to_interaction(&interaction) {
            self.dispatch(Event::InteractionCreated(core));
        }
    }
}
