//! Message action repository: the append-only action log behind transcript
//! reconstruction.
//!
//! Rows are only ever inserted. `list_for_ticket` returns them in replay
//! order: `action_at` ascending, insertion order (rowid) breaking ties.

use tracing::info;

use crate::error::StorageError;
use crate::models::MessageActionRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct MessageActionRepository {
    pool_manager: SqlitePoolManager,
}

impl MessageActionRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating message_actions table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS message_actions (
                id TEXT PRIMARY KEY,
                ticket_id TEXT NOT NULL,
                message_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                author_id INTEGER NOT NULL,
                author_username TEXT NOT NULL,
                content TEXT,
                attachments TEXT,
                embeds TEXT,
                is_system_message INTEGER NOT NULL DEFAULT 0,
                action_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_message_actions_ticket ON message_actions(ticket_id, action_at)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn append(&self, action: &MessageActionRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO message_actions (id, ticket_id, message_id, kind,
                author_id, author_username, content, attachments, embeds,
                is_system_message, action_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&action.id)
        .bind(&action.ticket_id)
        .bind(action.message_id)
        .bind(&action.kind)
        .bind(action.author_id)
        .bind(&action.author_username)
        .bind(&action.content)
        .bind(&action.attachments)
        .bind(&action.embeds)
        .bind(action.is_system_message)
        .bind(action.action_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// The full action log of a ticket in replay order.
    pub async fn list_for_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Vec<MessageActionRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let actions = sqlx::query_as::<_, MessageActionRecord>(
            r#"
            SELECT * FROM message_actions
            WHERE ticket_id = ?
            ORDER BY action_at ASC, rowid ASC
            "#,
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await?;

        Ok(actions)
    }

    pub async fn count_for_ticket(&self, ticket_id: &str) -> Result<i64, StorageError> {
        let pool = self.pool_manager.pool();

        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM message_actions WHERE ticket_id = ?")
                .bind(ticket_id)
                .fetch_one(pool)
                .await?;

        Ok(row.0)
    }
}
