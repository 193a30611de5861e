//! Ticket record: one row per opened ticket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ticket lifecycle status stored in the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Closed => "closed",
        }
    }
}

/// One row from the tickets table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketRecord {
    /// Primary key (UUID).
    pub id: String,
    /// Guild the ticket belongs to.
    pub guild_id: i64,
    /// Per-guild ticket number (from the server counter).
    pub number: i64,
    /// Private channel created for this ticket.
    pub channel_id: i64,
    /// User who opened the ticket.
    pub opener_id: i64,
    /// Username of the opener at open time.
    pub opener_username: String,
    /// Ticket option the ticket was opened with, if any.
    pub option_id: Option<String>,
    /// "open" or "closed".
    pub status: String,
    /// Staff member who claimed the ticket, if any.
    pub claimed_by: Option<i64>,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub close_reason: Option<String>,
}

impl TicketRecord {
    /// Creates an open ticket with a generated UUID and current timestamp.
    pub fn new(
        guild_id: i64,
        number: i64,
        channel_id: i64,
        opener_id: i64,
        opener_username: impl Into<String>,
        option_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            guild_id,
            number,
            channel_id,
            opener_id,
            opener_username: opener_username.into(),
            option_id,
            status: TicketStatus::Open.as_str().to_string(),
            claimed_by: None,
            opened_at: Utc::now(),
            closed_at: None,
            close_reason: None,
        }
    }

    /// Whether the ticket is still open.
    pub fn is_open(&self) -> bool {
        self.status == TicketStatus::Open.as_str()
    }
}
