//! Participant repository: per-ticket message activity counters.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::StorageError;
use crate::models::ParticipantRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct ParticipantRepository {
    pool_manager: SqlitePoolManager,
}

impl ParticipantRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating participants table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS participants (
                ticket_id TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                username TEXT NOT NULL,
                first_message_at TEXT NOT NULL,
                message_count INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (ticket_id, user_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Upserts the participant row and increments its message count.
    pub async fn record_message(
        &self,
        ticket_id: &str,
        user_id: i64,
        username: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO participants (ticket_id, user_id, username, first_message_at, message_count)
            VALUES (?, ?, ?, ?, 1)
            ON CONFLICT(ticket_id, user_id) DO UPDATE SET
                username = excluded.username,
                message_count = message_count + 1
            "#,
        )
        .bind(ticket_id)
        .bind(user_id)
        .bind(username)
        .bind(at)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn list_for_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Vec<ParticipantRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let participants = sqlx::query_as::<_, ParticipantRecord>(
            "SELECT * FROM participants WHERE ticket_id = ? ORDER BY first_message_at ASC",
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await?;

        Ok(participants)
    }
}
