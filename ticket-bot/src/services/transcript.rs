//! Transcript reconstruction: replays a ticket's append-only action log
//! into the current view of each message.
//!
//! The replay is an explicit fold over [`ActionKind`]; ambiguous states are
//! visible in the output rather than patched over. In particular a deleted
//! message keeps its last content (`is_deleted` true, content present);
//! [`ReconstructedMessage::display_content`] falls back to
//! `"[Content deleted]"` only when the content is empty.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::{ActionKind, MessageActionRecord, MessageActionRepository};
use tracing::instrument;

use crate::core::Result;

/// Snapshot of a message's content prior to one edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditHistoryEntry {
    pub content: String,
    pub edited_at: DateTime<Utc>,
}

/// Derived current state of one message; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructedMessage {
    pub message_id: i64,
    pub author_id: i64,
    pub author_username: String,
    /// Latest known content. Deletion does not clear this.
    pub current_content: Option<String>,
    /// Content carried by the send action.
    pub original_content: Option<String>,
    /// Latest known attachment URLs.
    pub attachments: Vec<String>,
    /// Latest known embeds.
    pub embeds: Vec<serde_json::Value>,
    pub is_deleted: bool,
    pub is_edited: bool,
    pub is_system_message: bool,
    pub created_at: DateTime<Utc>,
    /// Content snapshots taken before each edit, oldest first.
    pub edit_history: Vec<EditHistoryEntry>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ReconstructedMessage {
    /// Content for display and export. `"[Content deleted]"` only when the
    /// message is deleted and no content survives.
    pub fn display_content(&self) -> String {
        match &self.current_content {
            Some(content) if !content.is_empty() => content.clone(),
            _ if self.is_deleted => "[Content deleted]".to_string(),
            _ => String::new(),
        }
    }
}

fn decode_json_list<T: serde::de::DeserializeOwned>(raw: &str) -> Vec<T> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Replays the complete, time-ordered action log of one ticket into the
/// list of reconstructed messages, ordered by `created_at` ascending.
///
/// Edits and deletes with no prior send for their message id are ignored;
/// a duplicate send replaces the existing entry. Pure function.
pub fn reconstruct(actions: &[MessageActionRecord]) -> Vec<ReconstructedMessage> {
    let mut by_message: HashMap<i64, ReconstructedMessage> = HashMap::new();

    for action in actions {
        let kind = match action.action_kind() {
            Some(kind) => kind,
            None => continue,
        };

        match kind {
            ActionKind::Send => {
                let entry = ReconstructedMessage {
                    message_id: action.message_id,
                    author_id: action.author_id,
                    author_username: action.author_username.clone(),
                    current_content: action.content.clone(),
                    original_content: action.content.clone(),
                    attachments: action
                        .attachments
                        .as_deref()
                        .map(decode_json_list)
                        .unwrap_or_default(),
                    embeds: action
                        .embeds
                        .as_deref()
                        .map(decode_json_list)
                        .unwrap_or_default(),
                    is_deleted: false,
                    is_edited: false,
                    is_system_message: action.is_system_message,
                    created_at: action.action_at,
                    edit_history: Vec::new(),
                    deleted_at: None,
                };
                by_message.insert(action.message_id, entry);
            }
            ActionKind::Edit => {
                let Some(entry) = by_message.get_mut(&action.message_id) else {
                    continue;
                };
                if let Some(previous) = entry.current_content.take() {
                    if !previous.is_empty() {
                        entry.edit_history.push(EditHistoryEntry {
                            content: previous,
                            edited_at: action.action_at,
                        });
                    }
                }
                entry.current_content = action.content.clone();
                entry.is_edited = true;
                if let Some(raw) = action.attachments.as_deref() {
                    entry.attachments = decode_json_list(raw);
                }
                if let Some(raw) = action.embeds.as_deref() {
                    entry.embeds = decode_json_list(raw);
                }
            }
            ActionKind::Delete => {
                let Some(entry) = by_message.get_mut(&action.message_id) else {
                    continue;
                };
                entry.is_deleted = true;
                entry.deleted_at = Some(action.action_at);
            }
        }
    }

    let mut messages: Vec<ReconstructedMessage> = by_message.into_values().collect();
    messages.sort_by_key(|m| m.created_at);
    messages
}

/// Glues the pure replay to the action log store and renders exports.
#[derive(Clone)]
pub struct TranscriptService {
    actions: MessageActionRepository,
}

impl TranscriptService {
    pub fn new(actions: MessageActionRepository) -> Self {
        Self { actions }
    }

    /// Loads the ticket's action log and reconstructs the message list.
    #[instrument(skip(self))]
    pub async fn reconstruct_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Vec<ReconstructedMessage>> {
        let actions = self.actions.list_for_ticket(ticket_id).await?;
        Ok(reconstruct(&actions))
    }

    /// Plain-text transcript, one line per message, edits and deletions
    /// annotated.
    pub fn render_text(messages: &[ReconstructedMessage]) -> String {
        let mut out = String::new();
        for m in messages {
            let mut flags = String::new();
            if m.is_edited {
                flags.push_str(" (edited)");
            }
            if m.is_deleted {
                flags.push_str(" (deleted)");
            }
            out.push_str(&format!(
                "[{}] {}{}: {}\n",
                m.created_at.format("%Y-%m-%d %H:%M:%S"),
                m.author_username,
                flags,
                m.display_content()
            ));
        }
        out
    }
}
