//! Payload builders: pure mappings from core message events to action-log
//! records.
//!
//! This is the only place that knows how attachments and embeds are encoded
//! into the JSON text columns.

use storage::{ActionKind, MessageActionRecord};

use crate::core::{MessageDeletePayload, MessagePayload, MessageUpdatePayload};

fn encode_json_list<T: serde::Serialize>(items: &[T]) -> Option<String> {
    serde_json::to_string(items).ok()
}

/// Builds the `send` action for a newly created message in a ticket channel.
pub fn send_action(ticket_id: &str, payload: &MessagePayload) -> MessageActionRecord {
    let mut record = MessageActionRecord::new(
        ticket_id,
        payload.message_id,
        ActionKind::Send,
        payload.author.id,
        payload.author.username.clone(),
        Some(payload.content.clone()),
        payload.author.is_bot,
        payload.created_at,
    );
    record.attachments = encode_json_list(&payload.attachments);
    record.embeds = encode_json_list(&payload.embeds);
    record
}

/// Builds the `edit` action for a message update. Fields the platform
/// omitted stay `None`, which replay treats as keep-previous.
pub fn edit_action(ticket_id: &str, payload: &MessageUpdatePayload) -> MessageActionRecord {
    let (author_id, author_username, is_system) = match &payload.author {
        Some(author) => (author.id, author.username.clone(), author.is_bot),
        None => (0, String::new(), false),
    };

    let mut record = MessageActionRecord::new(
        ticket_id,
        payload.message_id,
        ActionKind::Edit,
        author_id,
        author_username,
        payload.content.clone(),
        is_system,
        payload.edited_at,
    );
    record.attachments = payload.attachments.as_deref().and_then(encode_json_list);
    record.embeds = payload.embeds.as_deref().and_then(encode_json_list);
    record
}

/// Builds the `delete` action; the platform only delivers ids, so author
/// fields stay empty.
pub fn delete_action(ticket_id: &str, payload: &MessageDeletePayload) -> MessageActionRecord {
    MessageActionRecord::new(
        ticket_id,
        payload.message_id,
        ActionKind::Delete,
        0,
        String::new(),
        None,
        false,
        payload.deleted_at,
    )
}
