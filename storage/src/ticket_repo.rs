//! Ticket repository: persistence and queries for tickets.
//!
//! Uses SqlitePoolManager and [`TicketRecord`]. Callers use insert plus the
//! lookups the ticket service needs (by channel, open count, most recent).

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::StorageError;
use crate::models::{TicketRecord, TicketStatus};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct TicketRepository {
    pool_manager: SqlitePoolManager,
}

impl TicketRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating tickets table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                guild_id INTEGER NOT NULL,
                number INTEGER NOT NULL,
                channel_id INTEGER NOT NULL,
                opener_id INTEGER NOT NULL,
                opener_username TEXT NOT NULL,
                option_id TEXT,
                status TEXT NOT NULL,
                claimed_by INTEGER,
                opened_at TEXT NOT NULL,
                closed_at TEXT,
                close_reason TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_tickets_guild_id ON tickets(guild_id)",
        )
        .execute(pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_tickets_channel_id ON tickets(channel_id)",
        )
        .execute(pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_tickets_opener ON tickets(guild_id, opener_id, status)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn insert(&self, ticket: &TicketRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO tickets (id, guild_id, number, channel_id, opener_id,
                opener_username, option_id, status, claimed_by, opened_at,
                closed_at, close_reason)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&ticket.id)
        .bind(ticket.guild_id)
        .bind(ticket.number)
        .bind(ticket.channel_id)
        .bind(ticket.opener_id)
        .bind(&ticket.opener_username)
        .bind(&ticket.option_id)
        .bind(&ticket.status)
        .bind(ticket.claimed_by)
        .bind(ticket.opened_at)
        .bind(ticket.closed_at)
        .bind(&ticket.close_reason)
        .execute(pool)
        .await?;

        info!(
            ticket_id = %ticket.id,
            guild_id = ticket.guild_id,
            number = ticket.number,
            "Saved ticket"
        );
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<TicketRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let ticket =
            sqlx::query_as::<_, TicketRecord>("SELECT * FROM tickets WHERE id = ?")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(ticket)
    }

    /// Returns the open ticket bound to the given channel, if any.
    pub async fn find_open_by_channel(
        &self,
        channel_id: i64,
    ) -> Result<Option<TicketRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let ticket = sqlx::query_as::<_, TicketRecord>(
            "SELECT * FROM tickets WHERE channel_id = ? AND status = ?",
        )
        .bind(channel_id)
        .bind(TicketStatus::Open.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(ticket)
    }

    pub async fn count_open_by_user(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<i64, StorageError> {
        let pool = self.pool_manager.pool();

        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tickets WHERE guild_id = ? AND opener_id = ? AND status = ?",
        )
        .bind(guild_id)
        .bind(user_id)
        .bind(TicketStatus::Open.as_str())
        .fetch_one(pool)
        .await?;

        Ok(row.0)
    }

    /// When the user most recently opened a ticket in this guild (any status);
    /// used for the cooldown check.
    pub async fn most_recent_opened_at(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        let pool = self.pool_manager.pool();

        let row: Option<(DateTime<Utc>,)> = sqlx::query_as(
            r#"
            SELECT opened_at FROM tickets
            WHERE guild_id = ? AND opener_id = ?
            ORDER BY opened_at DESC LIMIT 1
            "#,
        )
        .bind(guild_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|(at,)| at))
    }

    pub async fn set_claimed(&self, id: &str, user_id: i64) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("UPDATE tickets SET claimed_by = ? WHERE id = ?")
            .bind(user_id)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("ticket {}", id)));
        }
        Ok(())
    }

    pub async fn set_closed(
        &self,
        id: &str,
        closed_at: DateTime<Utc>,
        reason: Option<&str>,
    ) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            "UPDATE tickets SET status = ?, closed_at = ?, close_reason = ? WHERE id = ?",
        )
        .bind(TicketStatus::Closed.as_str())
        .bind(closed_at)
        .bind(reason)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("ticket {}", id)));
        }
        Ok(())
    }

    /// All tickets of a guild, most recent first.
    pub async fn list_by_guild(
        &self,
        guild_id: i64,
    ) -> Result<Vec<TicketRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let tickets = sqlx::query_as::<_, TicketRecord>(
            "SELECT * FROM tickets WHERE guild_id = ? ORDER BY opened_at DESC",
        )
        .bind(guild_id)
        .fetch_all(pool)
        .await?;

        Ok(tickets)
    }
}
