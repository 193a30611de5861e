//! Records for synced guild entities: channels, roles, members, emojis.
//!
//! Each row mirrors one platform entity as of the latest sync; the sync
//! service upserts seen entities and prunes unseen ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row from the guild_channels table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GuildChannelRecord {
    pub guild_id: i64,
    pub channel_id: i64,
    pub name: String,
    /// Channel kind, e.g. "text", "voice", "category".
    pub kind: String,
    /// Parent category id, if any.
    pub parent_id: Option<i64>,
    pub seen_at: DateTime<Utc>,
}

/// One row from the guild_roles table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GuildRoleRecord {
    pub guild_id: i64,
    pub role_id: i64,
    pub name: String,
    pub color: i64,
    pub position: i64,
    pub seen_at: DateTime<Utc>,
}

/// One row from the guild_members table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GuildMemberRecord {
    pub guild_id: i64,
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
    pub seen_at: DateTime<Utc>,
}

/// One row from the guild_emojis table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GuildEmojiRecord {
    pub guild_id: i64,
    pub emoji_id: i64,
    pub name: String,
    pub animated: bool,
    pub seen_at: DateTime<Utc>,
}
