//! Message action record: one append-only entry in a ticket's action log.
//!
//! The log backs transcript reconstruction; rows are inserted and never
//! updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of a logged message action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Send,
    Edit,
    Delete,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Send => "send",
            ActionKind::Edit => "edit",
            ActionKind::Delete => "delete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "send" => Some(ActionKind::Send),
            "edit" => Some(ActionKind::Edit),
            "delete" => Some(ActionKind::Delete),
            _ => None,
        }
    }
}

/// One row from the message_actions table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageActionRecord {
    /// Primary key (UUID).
    pub id: String,
    /// Ticket the action belongs to.
    pub ticket_id: String,
    /// Platform message id the action refers to.
    pub message_id: i64,
    /// "send", "edit" or "delete".
    pub kind: String,
    pub author_id: i64,
    pub author_username: String,
    /// Message content; None for delete actions and for edits that did not
    /// change the text.
    pub content: Option<String>,
    /// JSON array of attachment URLs; None means the action carried no
    /// attachment information (keep the previous value when replaying).
    pub attachments: Option<String>,
    /// JSON array of embeds; same omit-means-keep semantics as attachments.
    pub embeds: Option<String>,
    /// True when the author is the bot itself.
    pub is_system_message: bool,
    /// When the action happened on the platform.
    pub action_at: DateTime<Utc>,
}

impl MessageActionRecord {
    /// Creates an action row with a generated UUID.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ticket_id: impl Into<String>,
        message_id: i64,
        kind: ActionKind,
        author_id: i64,
        author_username: impl Into<String>,
        content: Option<String>,
        is_system_message: bool,
        action_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_id: ticket_id.into(),
            message_id,
            kind: kind.as_str().to_string(),
            author_id,
            author_username: author_username.into(),
            content,
            attachments: None,
            embeds: None,
            is_system_message,
            action_at,
        }
    }

    /// Parses the kind column; None for unknown values (skipped by replay).
    pub fn action_kind(&self) -> Option<ActionKind> {
        ActionKind::parse(&self.kind)
    }
}
