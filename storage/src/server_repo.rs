//! Server repository: per-guild settings, the ticket counter, and the user
//! blacklist.
//!
//! Uses SqlitePoolManager and [`ServerRecord`]. The counter increment relies
//! on SQLite's per-statement atomicity; there is no in-process locking.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::StorageError;
use crate::models::ServerRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct ServerRepository {
    pool_manager: SqlitePoolManager,
}

impl ServerRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating servers tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS servers (
                guild_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                icon_url TEXT,
                ticket_counter INTEGER NOT NULL DEFAULT 0,
                max_open_tickets_per_user INTEGER NOT NULL DEFAULT 1,
                ticket_cooldown_secs INTEGER NOT NULL DEFAULT 0,
                ticket_category_id INTEGER,
                fallback_category_id INTEGER,
                channel_name_template TEXT NOT NULL,
                welcome_message TEXT,
                synced_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blacklisted_users (
                guild_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                reason TEXT,
                added_at TEXT NOT NULL,
                PRIMARY KEY (guild_id, user_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Inserts the guild row or refreshes name/icon/synced_at, keeping the
    /// counter and settings of an existing row.
    pub async fn upsert(&self, server: &ServerRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO servers (guild_id, name, icon_url, ticket_counter,
                max_open_tickets_per_user, ticket_cooldown_secs,
                ticket_category_id, fallback_category_id,
                channel_name_template, welcome_message, synced_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(guild_id) DO UPDATE SET
                name = excluded.name,
                icon_url = excluded.icon_url,
                synced_at = excluded.synced_at
            "#,
        )
        .bind(server.guild_id)
        .bind(&server.name)
        .bind(&server.icon_url)
        .bind(server.ticket_counter)
        .bind(server.max_open_tickets_per_user)
        .bind(server.ticket_cooldown_secs)
        .bind(server.ticket_category_id)
        .bind(server.fallback_category_id)
        .bind(&server.channel_name_template)
        .bind(&server.welcome_message)
        .bind(server.synced_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Writes every settings column of an existing row.
    pub async fn update_settings(&self, server: &ServerRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            r#"
            UPDATE servers SET
                max_open_tickets_per_user = ?,
                ticket_cooldown_secs = ?,
                ticket_category_id = ?,
                fallback_category_id = ?,
                channel_name_template = ?,
                welcome_message = ?
            WHERE guild_id = ?
            "#,
        )
        .bind(server.max_open_tickets_per_user)
        .bind(server.ticket_cooldown_secs)
        .bind(server.ticket_category_id)
        .bind(server.fallback_category_id)
        .bind(&server.channel_name_template)
        .bind(&server.welcome_message)
        .bind(server.guild_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!(
                "server {}",
                server.guild_id
            )));
        }
        Ok(())
    }

    pub async fn get(&self, guild_id: i64) -> Result<Option<ServerRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let server = sqlx::query_as::<_, ServerRecord>(
            "SELECT * FROM servers WHERE guild_id = ?",
        )
        .bind(guild_id)
        .fetch_optional(pool)
        .await?;

        Ok(server)
    }

    /// Returns the guild row, inserting a default one if it does not exist.
    pub async fn ensure(
        &self,
        guild_id: i64,
        name: &str,
    ) -> Result<ServerRecord, StorageError> {
        if let Some(server) = self.get(guild_id).await? {
            return Ok(server);
        }
        let server = ServerRecord::new(guild_id, name);
        self.upsert(&server).await?;
        Ok(server)
    }

    /// Atomically increments and returns the guild's ticket counter.
    pub async fn next_ticket_number(&self, guild_id: i64) -> Result<i64, StorageError> {
        let pool = self.pool_manager.pool();

        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE servers SET ticket_counter = ticket_counter + 1
            WHERE guild_id = ?
            RETURNING ticket_counter
            "#,
        )
        .bind(guild_id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some((number,)) => Ok(number),
            None => Err(StorageError::NotFound(format!("server {}", guild_id))),
        }
    }

    // --- blacklist ---

    pub async fn is_blacklisted(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM blacklisted_users WHERE guild_id = ? AND user_id = ?",
        )
        .bind(guild_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(row.0 > 0)
    }

    pub async fn blacklist_add(
        &self,
        guild_id: i64,
        user_id: i64,
        reason: Option<&str>,
        added_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO blacklisted_users (guild_id, user_id, reason, added_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(guild_id, user_id) DO UPDATE SET
                reason = excluded.reason,
                added_at = excluded.added_at
            "#,
        )
        .bind(guild_id)
        .bind(user_id)
        .bind(reason)
        .bind(added_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Removes a user from the blacklist; returns true if a row was deleted.
    pub async fn blacklist_remove(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            "DELETE FROM blacklisted_users WHERE guild_id = ? AND user_id = ?",
        )
        .bind(guild_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
