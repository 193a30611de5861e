//! Server (guild) record: per-guild settings and the ticket counter.
//!
//! Maps to the `servers` table; one row per guild the bot is in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row from the servers table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServerRecord {
    /// Guild id (primary key).
    pub guild_id: i64,
    /// Guild name as last seen.
    pub name: String,
    /// Guild icon URL, if any.
    pub icon_url: Option<String>,
    /// Per-guild ticket counter; incremented atomically per opened ticket.
    pub ticket_counter: i64,
    /// Maximum simultaneously open tickets per user.
    pub max_open_tickets_per_user: i64,
    /// Seconds a user must wait after opening a ticket before opening another; 0 disables.
    pub ticket_cooldown_secs: i64,
    /// Category ticket channels are created under, if configured.
    pub ticket_category_id: Option<i64>,
    /// Fallback category used when the primary category is full.
    pub fallback_category_id: Option<i64>,
    /// Channel name template, e.g. `ticket-{ticketNumber}`.
    pub channel_name_template: String,
    /// Custom initial-message template; None uses the default embed.
    pub welcome_message: Option<String>,
    /// When this row was last written by a guild sync.
    pub synced_at: DateTime<Utc>,
}

impl ServerRecord {
    /// Creates a record with default settings for a newly seen guild.
    pub fn new(guild_id: i64, name: impl Into<String>) -> Self {
        Self {
            guild_id,
            name: name.into(),
            icon_url: None,
            ticket_counter: 0,
            max_open_tickets_per_user: 1,
            ticket_cooldown_secs: 0,
            ticket_category_id: None,
            fallback_category_id: None,
            channel_name_template: "ticket-{ticketNumber}".to_string(),
            welcome_message: None,
            synced_at: Utc::now(),
        }
    }
}
