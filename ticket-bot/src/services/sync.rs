//! Guild sync: reconciles the stored mirror of a guild's channels, roles,
//! members and emojis against a gateway snapshot.
//!
//! Every snapshot entity is upserted, then rows unseen in the snapshot are
//! pruned. Individual live events apply single upserts/deletes between full
//! syncs. Per-entity failures are logged and the batch continues.

use chrono::Utc;
use storage::{
    GuildChannelRecord, GuildEmojiRecord, GuildMemberRecord, GuildRoleRecord,
    ServerRecord, ServerRepository, SyncRepository,
};
use tracing::{error, info, instrument};

use crate::core::{
    ChannelInfo, EmojiInfo, GuildSnapshot, MemberInfo, Result, RoleInfo,
};

/// Batch reconciliation of guild state against the store.
#[derive(Clone)]
pub struct SyncService {
    servers: ServerRepository,
    sync: SyncRepository,
}

impl SyncService {
    pub fn new(servers: ServerRepository, sync: SyncRepository) -> Self {
        Self { servers, sync }
    }

    /// Full snapshot reconciliation: upsert the server row and every entity,
    /// then prune what the snapshot no longer contains.
    #[instrument(skip(self, snapshot), fields(guild_id = snapshot.guild_id))]
    pub async fn sync_guild(&self, snapshot: &GuildSnapshot) -> Result<()> {
        info!(
            guild_id = snapshot.guild_id,
            channels = snapshot.channels.len(),
            roles = snapshot.roles.len(),
            members = snapshot.members.len(),
            emojis = snapshot.emojis.len(),
            "step: guild sync started"
        );

        let mut server = ServerRecord::new(snapshot.guild_id, &snapshot.name);
        server.icon_url = snapshot.icon_url.clone();
        self.servers.upsert(&server).await?;

        let now = Utc::now();

        let mut seen_channels = Vec::with_capacity(snapshot.channels.len());
        for channel in &snapshot.channels {
            seen_channels.push(channel.channel_id);
            let record = GuildChannelRecord {
                guild_id: channel.guild_id,
                channel_id: channel.channel_id,
                name: channel.name.clone(),
                kind: channel.kind.clone(),
                parent_id: channel.parent_id,
                seen_at: now,
            };
            if let Err(e) = self.sync.upsert_channel(&record).await {
                error!(error = %e, channel_id = channel.channel_id, "Failed to upsert channel");
            }
        }
        let pruned = self
            .sync
            .prune_channels(snapshot.guild_id, &seen_channels)
            .await?;
        if pruned > 0 {
            info!(guild_id = snapshot.guild_id, pruned, "Pruned unseen channels");
        }

        let mut seen_roles = Vec::with_capacity(snapshot.roles.len());
        for role in &snapshot.roles {
            seen_roles.push(role.role_id);
            let record = GuildRoleRecord {
                guild_id: role.guild_id,
                role_id: role.role_id,
                name: role.name.clone(),
                color: role.color,
                position: role.position,
                seen_at: now,
            };
            if let Err(e) = self.sync.upsert_role(&record).await {
                error!(error = %e, role_id = role.role_id, "Failed to upsert role");
            }
        }
        self.sync.prune_roles(snapshot.guild_id, &seen_roles).await?;

        let mut seen_members = Vec::with_capacity(snapshot.members.len());
        for member in &snapshot.members {
            seen_members.push(member.user.id);
            let record = GuildMemberRecord {
                guild_id: member.guild_id,
                user_id: member.user.id,
                username: member.user.username.clone(),
                display_name: member.user.display_name.clone(),
                joined_at: member.joined_at,
                seen_at: now,
            };
            if let Err(e) = self.sync.upsert_member(&record).await {
                error!(error = %e, user_id = member.user.id, "Failed to upsert member");
            }
        }
        self.sync
            .prune_members(snapshot.guild_id, &seen_members)
            .await?;

        self.apply_emojis(snapshot.guild_id, &snapshot.emojis).await?;

        info!(guild_id = snapshot.guild_id, "step: guild sync finished");
        Ok(())
    }

    /// Live channel create/update.
    pub async fn apply_channel(&self, channel: &ChannelInfo) -> Result<()> {
        let record = GuildChannelRecord {
            guild_id: channel.guild_id,
            channel_id: channel.channel_id,
            name: channel.name.clone(),
            kind: channel.kind.clone(),
            parent_id: channel.parent_id,
            seen_at: Utc::now(),
        };
        self.sync.upsert_channel(&record).await?;
        Ok(())
    }

    pub async fn remove_channel(&self, guild_id: i64, channel_id: i64) -> Result<()> {
        self.sync.delete_channel(guild_id, channel_id).await?;
        Ok(())
    }

    /// Live role create/update.
    pub async fn apply_role(&self, role: &RoleInfo) -> Result<()> {
        let record = GuildRoleRecord {
            guild_id: role.guild_id,
            role_id: role.role_id,
            name: role.name.clone(),
            color: role.color,
            position: role.position,
            seen_at: Utc::now(),
        };
        self.sync.upsert_role(&record).await?;
        Ok(())
    }

    pub async fn remove_role(&self, guild_id: i64, role_id: i64) -> Result<()> {
        self.sync.delete_role(guild_id, role_id).await?;
        Ok(())
    }

    /// Live member join/update.
    pub async fn apply_member(&self, member: &MemberInfo) -> Result<()> {
        let record = GuildMemberRecord {
            guild_id: member.guild_id,
            user_id: member.user.id,
            username: member.user.username.clone(),
            display_name: member.user.display_name.clone(),
            joined_at: member.joined_at,
            seen_at: Utc::now(),
        };
        self.sync.upsert_member(&record).await?;
        Ok(())
    }

    pub async fn remove_member(&self, guild_id: i64, user_id: i64) -> Result<()> {
        self.sync.delete_member(guild_id, user_id).await?;
        Ok(())
    }

    /// Emoji updates arrive as the full current set; reconcile in one step.
    pub async fn apply_emojis(&self, guild_id: i64, emojis: &[EmojiInfo]) -> Result<()> {
        let now = Utc::now();
        let mut seen = Vec::with_capacity(emojis.len());
        for emoji in emojis {
            seen.push(emoji.emoji_id);
            let record = GuildEmojiRecord {
                guild_id,
                emoji_id: emoji.emoji_id,
                name: emoji.name.clone(),
                animated: emoji.animated,
                seen_at: now,
            };
            if let Err(e) = self.sync.upsert_emoji(&record).await {
                error!(error = %e, emoji_id = emoji.emoji_id, "Failed to upsert emoji");
            }
        }
        self.sync.prune_emojis(guild_id, &seen).await?;
        Ok(())
    }
}
