//! Participant record: per-ticket per-user message activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row from the participants table, keyed (ticket_id, user_id).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ParticipantRecord {
    pub ticket_id: String,
    pub user_id: i64,
    /// Username as of the participant's most recent message.
    pub username: String,
    pub first_message_at: DateTime<Utc>,
    pub message_count: i64,
}
