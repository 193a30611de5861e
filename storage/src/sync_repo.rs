//! Sync repository: mirrors of guild channels, roles, members and emojis.
//!
//! The sync service upserts every entity seen in a snapshot and then calls
//! the matching `prune_*` with the seen ids; rows absent from the snapshot
//! are deleted. Single-row deletes serve the live delete events between
//! full syncs.

use tracing::info;

use crate::error::StorageError;
use crate::models::{
    GuildChannelRecord, GuildEmojiRecord, GuildMemberRecord, GuildRoleRecord,
};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SyncRepository {
    pool_manager: SqlitePoolManager,
}

impl SyncRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating guild sync tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guild_channels (
                guild_id INTEGER NOT NULL,
                channel_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                parent_id INTEGER,
                seen_at TEXT NOT NULL,
                PRIMARY KEY (guild_id, channel_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guild_roles (
                guild_id INTEGER NOT NULL,
                role_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                color INTEGER NOT NULL DEFAULT 0,
                position INTEGER NOT NULL DEFAULT 0,
                seen_at TEXT NOT NULL,
                PRIMARY KEY (guild_id, role_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guild_members (
                guild_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                username TEXT NOT NULL,
                display_name TEXT,
                joined_at TEXT,
                seen_at TEXT NOT NULL,
                PRIMARY KEY (guild_id, user_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guild_emojis (
                guild_id INTEGER NOT NULL,
                emoji_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                animated INTEGER NOT NULL DEFAULT 0,
                seen_at TEXT NOT NULL,
                PRIMARY KEY (guild_id, emoji_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Deletes rows of `table` for `guild_id` whose `id_column` is not in
    /// `seen_ids`. An empty snapshot clears the guild's rows.
    async fn prune(
        &self,
        table: &str,
        id_column: &str,
        guild_id: i64,
        seen_ids: &[i64],
    ) -> Result<u64, StorageError> {
        let pool = self.pool_manager.pool();

        if seen_ids.is_empty() {
            let result = sqlx::query(&format!(
                "DELETE FROM {} WHERE guild_id = ?",
                table
            ))
            .bind(guild_id)
            .execute(pool)
            .await?;
            return Ok(result.rows_affected());
        }

        let placeholders = vec!["?"; seen_ids.len()].join(", ");
        let sql = format!(
            "DELETE FROM {} WHERE guild_id = ? AND {} NOT IN ({})",
            table, id_column, placeholders
        );

        let mut query = sqlx::query(&sql).bind(guild_id);
        for id in seen_ids {
            query = query.bind(*id);
        }
        let result = query.execute(pool).await?;

        Ok(result.rows_affected())
    }

    // --- channels ---

    pub async fn upsert_channel(
        &self,
        channel: &GuildChannelRecord,
    ) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO guild_channels (guild_id, channel_id, name, kind, parent_id, seen_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(guild_id, channel_id) DO UPDATE SET
                name = excluded.name,
                kind = excluded.kind,
                parent_id = excluded.parent_id,
                seen_at = excluded.seen_at
            "#,
        )
        .bind(channel.guild_id)
        .bind(channel.channel_id)
        .bind(&channel.name)
        .bind(&channel.kind)
        .bind(channel.parent_id)
        .bind(channel.seen_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn prune_channels(
        &self,
        guild_id: i64,
        seen_ids: &[i64],
    ) -> Result<u64, StorageError> {
        self.prune("guild_channels", "channel_id", guild_id, seen_ids)
            .await
    }

    pub async fn delete_channel(
        &self,
        guild_id: i64,
        channel_id: i64,
    ) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            "DELETE FROM guild_channels WHERE guild_id = ? AND channel_id = ?",
        )
        .bind(guild_id)
        .bind(channel_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_channels(
        &self,
        guild_id: i64,
    ) -> Result<Vec<GuildChannelRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let channels = sqlx::query_as::<_, GuildChannelRecord>(
            "SELECT * FROM guild_channels WHERE guild_id = ? ORDER BY channel_id",
        )
        .bind(guild_id)
        .fetch_all(pool)
        .await?;

        Ok(channels)
    }

    // --- roles ---

    pub async fn upsert_role(&self, role: &GuildRoleRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO guild_roles (guild_id, role_id, name, color, position, seen_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(guild_id, role_id) DO UPDATE SET
                name = excluded.name,
                color = excluded.color,
                position = excluded.position,
                seen_at = excluded.seen_at
            "#,
        )
        .bind(role.guild_id)
        .bind(role.role_id)
        .bind(&role.name)
        .bind(role.color)
        .bind(role.position)
        .bind(role.seen_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn prune_roles(
        &self,
        guild_id: i64,
        seen_ids: &[i64],
    ) -> Result<u64, StorageError> {
        self.prune("guild_roles", "role_id", guild_id, seen_ids).await
    }

    pub async fn delete_role(
        &self,
        guild_id: i64,
        role_id: i64,
    ) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result =
            sqlx::query("DELETE FROM guild_roles WHERE guild_id = ? AND role_id = ?")
                .bind(guild_id)
                .bind(role_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_roles(
        &self,
        guild_id: i64,
    ) -> Result<Vec<GuildRoleRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let roles = sqlx::query_as::<_, GuildRoleRecord>(
            "SELECT * FROM guild_roles WHERE guild_id = ? ORDER BY position DESC",
        )
        .bind(guild_id)
        .fetch_all(pool)
        .await?;

        Ok(roles)
    }

    // --- members ---

    pub async fn upsert_member(
        &self,
        member: &GuildMemberRecord,
    ) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO guild_members (guild_id, user_id, username, display_name, joined_at, seen_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(guild_id, user_id) DO UPDATE SET
                username = excluded.username,
                display_name = excluded.display_name,
                joined_at = excluded.joined_at,
                seen_at = excluded.seen_at
            "#,
        )
        .bind(member.guild_id)
        .bind(member.user_id)
        .bind(&member.username)
        .bind(&member.display_name)
        .bind(member.joined_at)
        .bind(member.seen_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn prune_members(
        &self,
        guild_id: i64,
        seen_ids: &[i64],
    ) -> Result<u64, StorageError> {
        self.prune("guild_members", "user_id", guild_id, seen_ids)
            .await
    }

    pub async fn delete_member(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result =
            sqlx::query("DELETE FROM guild_members WHERE guild_id = ? AND user_id = ?")
                .bind(guild_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_members(
        &self,
        guild_id: i64,
    ) -> Result<Vec<GuildMemberRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let members = sqlx::query_as::<_, GuildMemberRecord>(
            "SELECT * FROM guild_members WHERE guild_id = ? ORDER BY user_id",
        )
        .bind(guild_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    // --- emojis ---

    pub async fn upsert_emoji(&self, emoji: &GuildEmojiRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO guild_emojis (guild_id, emoji_id, name, animated, seen_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(guild_id, emoji_id) DO UPDATE SET
                name = excluded.name,
                animated = excluded.animated,
                seen_at = excluded.seen_at
            "#,
        )
        .bind(emoji.guild_id)
        .bind(emoji.emoji_id)
        .bind(&emoji.name)
        .bind(emoji.animated)
        .bind(emoji.seen_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn prune_emojis(
        &self,
        guild_id: i64,
        seen_ids: &[i64],
    ) -> Result<u64, StorageError> {
        self.prune("guild_emojis", "emoji_id", guild_id, seen_ids)
            .await
    }

    pub async fn list_emojis(
        &self,
        guild_id: i64,
    ) -> Result<Vec<GuildEmojiRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let emojis = sqlx::query_as::<_, GuildEmojiRecord>(
            "SELECT * FROM guild_emojis WHERE guild_id = ? ORDER BY emoji_id",
        )
        .bind(guild_id)
        .fetch_all(pool)
        .await?;

        Ok(emojis)
    }
}
