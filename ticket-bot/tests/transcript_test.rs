//! Unit tests for transcript reconstruction (the action-log replay).
//!
//! Each test builds an action log by hand and checks the derived message
//! view: edit history, orphan actions, the deleted-but-content-present
//! state, and output ordering.

use chrono::{DateTime, Duration, TimeZone, Utc};
use storage::{ActionKind, MessageActionRecord};
use ticket_bot::services::reconstruct;

fn at(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::seconds(offset_secs)
}

fn action(
    message_id: i64,
    kind: ActionKind,
    content: Option<&str>,
    offset_secs: i64,
) -> MessageActionRecord {
    MessageActionRecord::new(
        "t1",
        message_id,
        kind,
        42,
        "alice",
        content.map(str::to_string),
        false,
        at(offset_secs),
    )
}

/// **Test: one send then N edits yields a history of length N whose last
/// entry is the content set by the second-to-last action.**
#[test]
fn edit_history_tracks_prior_contents() {
    let log = vec![
        action(1, ActionKind::Send, Some("v1"), 0),
        action(1, ActionKind::Edit, Some("v2"), 10),
        action(1, ActionKind::Edit, Some("v3"), 20),
        action(1, ActionKind::Edit, Some("v4"), 30),
    ];

    let messages = reconstruct(&log);
    assert_eq!(messages.len(), 1);
    let m = &messages[0];

    assert_eq!(m.current_content.as_deref(), Some("v4"));
    assert_eq!(m.original_content.as_deref(), Some("v1"));
    assert!(m.is_edited);
    assert_eq!(m.edit_history.len(), 3);
    // Last history entry holds the content set by the second-to-last action.
    assert_eq!(m.edit_history.last().unwrap().content, "v3");
    assert_eq!(m.edit_history.last().unwrap().edited_at, at(30));
    assert_eq!(m.edit_history[0].content, "v1");
}

/// **Test: edit and delete with no preceding send produce no entry.**
#[test]
fn orphan_actions_are_ignored() {
    let log = vec![
        action(9, ActionKind::Edit, Some("ghost"), 0),
        action(9, ActionKind::Delete, None, 10),
    ];

    assert!(reconstruct(&log).is_empty());
}

/// **Test: send("a"), edit("b"), delete() — deleted with content intact.**
#[test]
fn delete_keeps_current_content() {
    let log = vec![
        action(1, ActionKind::Send, Some("a"), 0),
        action(1, ActionKind::Edit, Some("b"), 10),
        action(1, ActionKind::Delete, None, 20),
    ];

    let messages = reconstruct(&log);
    assert_eq!(messages.len(), 1);
    let m = &messages[0];

    assert!(m.is_deleted);
    assert_eq!(m.deleted_at, Some(at(20)));
    assert_eq!(m.current_content.as_deref(), Some("b"));
    assert_eq!(m.original_content.as_deref(), Some("a"));
    assert_eq!(m.edit_history.len(), 1);
    assert_eq!(m.edit_history[0].content, "a");
    assert_eq!(m.edit_history[0].edited_at, at(10));
    // Content survives deletion, so display uses it.
    assert_eq!(m.display_content(), "b");
}

/// **Test: display falls back to "[Content deleted]" only for a deleted
/// message with no content.**
#[test]
fn display_content_fallback() {
    let log = vec![
        action(1, ActionKind::Send, Some(""), 0),
        action(1, ActionKind::Delete, None, 10),
        action(2, ActionKind::Send, Some(""), 20),
    ];

    let messages = reconstruct(&log);
    assert_eq!(messages[0].display_content(), "[Content deleted]");
    // Not deleted, just empty.
    assert_eq!(messages[1].display_content(), "");
}

/// **Test: output is sorted by created_at ascending regardless of the
/// interleaving of distinct messages in the log.**
#[test]
fn output_sorted_by_created_at() {
    let log = vec![
        action(3, ActionKind::Send, Some("third"), 20),
        action(1, ActionKind::Send, Some("first"), 0),
        action(2, ActionKind::Send, Some("second"), 10),
        action(1, ActionKind::Edit, Some("first!"), 30),
    ];

    let messages = reconstruct(&log);
    let ids: Vec<i64> = messages.iter().map(|m| m.message_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

/// **Test: a duplicate send replaces the entry (content, history, created_at).**
#[test]
fn duplicate_send_overwrites() {
    let log = vec![
        action(1, ActionKind::Send, Some("old"), 0),
        action(1, ActionKind::Edit, Some("edited"), 10),
        action(1, ActionKind::Send, Some("new"), 20),
    ];

    let messages = reconstruct(&log);
    assert_eq!(messages.len(), 1);
    let m = &messages[0];
    assert_eq!(m.original_content.as_deref(), Some("new"));
    assert_eq!(m.current_content.as_deref(), Some("new"));
    assert!(m.edit_history.is_empty());
    assert!(!m.is_edited);
    assert_eq!(m.created_at, at(20));
}

/// **Test: an edit with no prior content pushes nothing onto the history.**
#[test]
fn edit_after_empty_content_skips_history() {
    let log = vec![
        action(1, ActionKind::Send, Some(""), 0),
        action(1, ActionKind::Edit, Some("now filled"), 10),
    ];

    let messages = reconstruct(&log);
    let m = &messages[0];
    assert!(m.edit_history.is_empty());
    assert!(m.is_edited);
    assert_eq!(m.current_content.as_deref(), Some("now filled"));
}

/// **Test: attachments and embeds are overwritten only when the edit
/// supplies them.**
#[test]
fn edit_keeps_attachments_unless_supplied() {
    let mut send = action(1, ActionKind::Send, Some("with file"), 0);
    send.attachments = Some(r#"["https://cdn.example/a.png"]"#.to_string());

    // Edit without attachment info.
    let edit_keep = action(1, ActionKind::Edit, Some("text changed"), 10);

    let messages = reconstruct(&[send.clone(), edit_keep]);
    assert_eq!(messages[0].attachments, vec!["https://cdn.example/a.png"]);

    // Edit that replaces the attachment list.
    let mut edit_replace = action(1, ActionKind::Edit, Some("file swapped"), 10);
    edit_replace.attachments = Some(r#"["https://cdn.example/b.png"]"#.to_string());

    let messages = reconstruct(&[send, edit_replace]);
    assert_eq!(messages[0].attachments, vec!["https://cdn.example/b.png"]);
}

/// **Test: system messages keep their flag through reconstruction.**
#[test]
fn system_flag_preserved() {
    let mut send = action(1, ActionKind::Send, Some("Welcome"), 0);
    send.is_system_message = true;

    let messages = reconstruct(&[send]);
    assert!(messages[0].is_system_message);
}

/// **Test: TranscriptService reads the stored log, replays it, and the
/// rendered export annotates edits and deletions.**
#[tokio::test]
async fn transcript_service_round_trip() {
    use storage::Storage;
    use ticket_bot::services::TranscriptService;

    let storage = Storage::connect("sqlite::memory:")
        .await
        .expect("Failed to connect storage");

    for record in [
        action(1, ActionKind::Send, Some("first message"), 0),
        action(2, ActionKind::Send, Some("second message"), 10),
        action(2, ActionKind::Edit, Some("second, edited"), 20),
        action(1, ActionKind::Delete, None, 30),
    ] {
        storage
            .message_actions
            .append(&record)
            .await
            .expect("Failed to append");
    }

    let service = TranscriptService::new(storage.message_actions.clone());
    let messages = service
        .reconstruct_ticket("t1")
        .await
        .expect("Reconstruction failed");
    assert_eq!(messages.len(), 2);

    let rendered = TranscriptService::render_text(&messages);
    let out = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    std::fs::write(out.path(), &rendered).expect("Failed to write transcript");
    let read_back = std::fs::read_to_string(out.path()).expect("Failed to read transcript");

    assert_eq!(rendered, read_back);
    assert!(rendered.contains("alice (deleted): first message"));
    assert!(rendered.contains("alice (edited): second, edited"));
}
