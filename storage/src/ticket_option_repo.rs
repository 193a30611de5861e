//! Ticket option repository: CRUD for configurable ticket types.
//!
//! Implements the generic [`Repository`] trait for plain CRUD and adds the
//! guild-scoped lookups panels and the `open` command need.

use async_trait::async_trait;
use tracing::info;

use crate::error::StorageError;
use crate::models::TicketOptionRecord;
use crate::repository::Repository;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct TicketOptionRepository {
    pool_manager: SqlitePoolManager,
}

impl TicketOptionRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating ticket_options table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ticket_options (
                id TEXT PRIMARY KEY,
                guild_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                emoji TEXT,
                responsible_role_ids TEXT NOT NULL,
                initial_message TEXT,
                channel_name_template TEXT,
                modal_fields TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 0,
                enabled INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_ticket_options_guild ON ticket_options(guild_id)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Enabled options of a guild in panel order.
    pub async fn list_enabled(
        &self,
        guild_id: i64,
    ) -> Result<Vec<TicketOptionRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let options = sqlx::query_as::<_, TicketOptionRecord>(
            r#"
            SELECT * FROM ticket_options
            WHERE guild_id = ? AND enabled = 1
            ORDER BY position ASC, name ASC
            "#,
        )
        .bind(guild_id)
        .fetch_all(pool)
        .await?;

        Ok(options)
    }

    /// Case-insensitive name lookup within a guild (used by the `open` command).
    pub async fn find_by_name(
        &self,
        guild_id: i64,
        name: &str,
    ) -> Result<Option<TicketOptionRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let option = sqlx::query_as::<_, TicketOptionRecord>(
            r#"
            SELECT * FROM ticket_options
            WHERE guild_id = ? AND name = ? COLLATE NOCASE AND enabled = 1
            "#,
        )
        .bind(guild_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(option)
    }
}

#[async_trait]
impl Repository<TicketOptionRecord> for TicketOptionRepository {
    async fn save(&self, entity: &TicketOptionRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO ticket_options (id, guild_id, name, description, emoji,
                responsible_role_ids, initial_message, channel_name_template,
                modal_fields, position, enabled)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                emoji = excluded.emoji,
                responsible_role_ids = excluded.responsible_role_ids,
                initial_message = excluded.initial_message,
                channel_name_template = excluded.channel_name_template,
                modal_fields = excluded.modal_fields,
                position = excluded.position,
                enabled = excluded.enabled
            "#,
        )
        .bind(&entity.id)
        .bind(entity.guild_id)
        .bind(&entity.name)
        .bind(&entity.description)
        .bind(&entity.emoji)
        .bind(&entity.responsible_role_ids)
        .bind(&entity.initial_message)
        .bind(&entity.channel_name_template)
        .bind(&entity.modal_fields)
        .bind(entity.position)
        .bind(entity.enabled)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TicketOptionRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let option = sqlx::query_as::<_, TicketOptionRecord>(
            "SELECT * FROM ticket_options WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(option)
    }

    async fn find_all(&self) -> Result<Vec<TicketOptionRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let options = sqlx::query_as::<_, TicketOptionRecord>(
            "SELECT * FROM ticket_options ORDER BY guild_id, position ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(options)
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("DELETE FROM ticket_options WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
