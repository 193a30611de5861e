//! Core gateway event model consumed by the handler chain.
//!
//! The gateway module converts platform types into these before any
//! handler sees them; nothing downstream touches the transport library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::interaction::Interaction;
use super::user::User;

/// A newly sent message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub message_id: i64,
    pub guild_id: Option<i64>,
    pub channel_id: i64,
    pub author: User,
    pub content: String,
    /// Attachment URLs.
    pub attachments: Vec<String>,
    /// Raw embed values as delivered by the platform.
    pub embeds: Vec<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// A message edit. Optional fields mirror the platform payload: `None`
/// means the field was omitted, not cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageUpdatePayload {
    pub message_id: i64,
    pub guild_id: Option<i64>,
    pub channel_id: i64,
    pub author: Option<User>,
    pub content: Option<String>,
    pub attachments: Option<Vec<String>>,
    pub embeds: Option<Vec<serde_json::Value>>,
    pub edited_at: DateTime<Utc>,
}

/// A message deletion; the platform only delivers ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeletePayload {
    pub message_id: i64,
    pub guild_id: Option<i64>,
    pub channel_id: i64,
    pub deleted_at: DateTime<Utc>,
}

/// One channel in a guild snapshot or live channel event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub guild_id: i64,
    pub channel_id: i64,
    pub name: String,
    /// "text", "voice", "category", ...
    pub kind: String,
    pub parent_id: Option<i64>,
}

/// One role in a guild snapshot or live role event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleInfo {
    pub guild_id: i64,
    pub role_id: i64,
    pub name: String,
    pub color: i64,
    pub position: i64,
}

/// One member in a guild snapshot or live member event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInfo {
    pub guild_id: i64,
    pub user: User,
    pub joined_at: Option<DateTime<Utc>>,
}

/// One custom emoji in a guild snapshot or emoji update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiInfo {
    pub guild_id: i64,
    pub emoji_id: i64,
    pub name: String,
    pub animated: bool,
}

/// Full guild state captured when a guild becomes available; input to the
/// sync service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildSnapshot {
    pub guild_id: i64,
    pub name: String,
    pub icon_url: Option<String>,
    pub channels: Vec<ChannelInfo>,
    pub roles: Vec<RoleInfo>,
    pub members: Vec<MemberInfo>,
    pub emojis: Vec<EmojiInfo>,
}

/// A single core event fed to the handler chain.
#[derive(Debug, Clone)]
pub enum Event {
    MessageCreated(MessagePayload),
    MessageUpdated(MessageUpdatePayload),
    MessageDeleted(MessageDeletePayload),
    InteractionCreated(Interaction),
    GuildAvailable(GuildSnapshot),
    ChannelCreated(ChannelInfo),
    ChannelDeleted { guild_id: i64, channel_id: i64 },
    RoleCreated(RoleInfo),
    RoleDeleted { guild_id: i64, role_id: i64 },
    MemberJoined(MemberInfo),
    MemberLeft { guild_id: i64, user_id: i64 },
    EmojisUpdated { guild_id: i64, emojis: Vec<EmojiInfo> },
}

impl Event {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::MessageCreated(_) => "message_created",
            Event::MessageUpdated(_) => "message_updated",
            Event::MessageDeleted(_) => "message_deleted",
            Event::InteractionCreated(_) => "interaction_created",
            Event::GuildAvailable(_) => "guild_available",
            Event::ChannelCreated(_) => "channel_created",
            Event::ChannelDeleted { .. } => "channel_deleted",
            Event::RoleCreated(_) => "role_created",
            Event::RoleDeleted { .. } => "role_deleted",
            Event::MemberJoined(_) => "member_joined",
            Event::MemberLeft { .. } => "member_left",
            Event::EmojisUpdated { .. } => "emojis_updated",
        }
    }
}
