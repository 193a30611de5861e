//! Panel repository: persistence for configured ticket panels.

use tracing::info;

use crate::error::StorageError;
use crate::models::PanelRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct PanelRepository {
    pool_manager: SqlitePoolManager,
}

impl PanelRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating panels table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS panels (
                id TEXT PRIMARY KEY,
                guild_id INTEGER NOT NULL,
                channel_id INTEGER NOT NULL,
                message_id INTEGER,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                style TEXT NOT NULL,
                option_ids TEXT NOT NULL,
                color INTEGER
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_panels_message ON panels(message_id)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn save(&self, panel: &PanelRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO panels (id, guild_id, channel_id, message_id, title,
                body, style, option_ids, color)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                channel_id = excluded.channel_id,
                message_id = excluded.message_id,
                title = excluded.title,
                body = excluded.body,
                style = excluded.style,
                option_ids = excluded.option_ids,
                color = excluded.color
            "#,
        )
        .bind(&panel.id)
        .bind(panel.guild_id)
        .bind(panel.channel_id)
        .bind(panel.message_id)
        .bind(&panel.title)
        .bind(&panel.body)
        .bind(&panel.style)
        .bind(&panel.option_ids)
        .bind(panel.color)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<PanelRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let panel = sqlx::query_as::<_, PanelRecord>("SELECT * FROM panels WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(panel)
    }

    /// Records the platform message id after the panel is published.
    pub async fn set_message_id(
        &self,
        id: &str,
        message_id: i64,
    ) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("UPDATE panels SET message_id = ? WHERE id = ?")
            .bind(message_id)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("panel {}", id)));
        }
        Ok(())
    }

    pub async fn find_by_message(
        &self,
        message_id: i64,
    ) -> Result<Option<PanelRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let panel = sqlx::query_as::<_, PanelRecord>(
            "SELECT * FROM panels WHERE message_id = ?",
        )
        .bind(message_id)
        .fetch_optional(pool)
        .await?;

        Ok(panel)
    }

    pub async fn list_by_guild(
        &self,
        guild_id: i64,
    ) -> Result<Vec<PanelRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let panels = sqlx::query_as::<_, PanelRecord>(
            "SELECT * FROM panels WHERE guild_id = ?",
        )
        .bind(guild_id)
        .fetch_all(pool)
        .await?;

        Ok(panels)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("DELETE FROM panels WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
