//! Integration tests for [`storage::MessageActionRepository`].
//!
//! Covers append-only inserts and replay ordering (action_at, then
//! insertion order for equal timestamps) using an in-memory SQLite database.

use chrono::{Duration, Utc};
use storage::{ActionKind, MessageActionRecord, Storage};

async fn connect() -> Storage {
    Storage::connect("sqlite::memory:")
        .await
        .expect("Failed to connect storage")
}

/// **Test: list_for_ticket returns actions ordered by action_at ascending.**
///
/// **Setup:** Three actions inserted out of chronological order.
/// **Action:** `list_for_ticket("t1")`.
/// **Expected:** Actions come back sorted by action_at.
#[tokio::test]
async fn test_list_for_ticket_orders_by_action_at() {
    let storage = connect().await;

    let base = Utc::now();
    let mk = |message_id: i64, kind: ActionKind, offset_secs: i64| {
        MessageActionRecord::new(
            "t1",
            message_id,
            kind,
            1,
            "alice",
            Some(format!("m{}", message_id)),
            false,
            base + Duration::seconds(offset_secs),
        )
    };

    // Inserted newest first on purpose.
    storage
        .message_actions
        .append(&mk(3, ActionKind::Send, 20))
        .await
        .expect("Failed to append");
    storage
        .message_actions
        .append(&mk(1, ActionKind::Send, 0))
        .await
        .expect("Failed to append");
    storage
        .message_actions
        .append(&mk(2, ActionKind::Send, 10))
        .await
        .expect("Failed to append");

    let actions = storage
        .message_actions
        .list_for_ticket("t1")
        .await
        .expect("Failed to list");

    let ids: Vec<i64> = actions.iter().map(|a| a.message_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

/// **Test: equal timestamps fall back to insertion order.**
///
/// **Setup:** A send and an edit for the same message with identical
/// action_at, inserted send first.
/// **Action:** `list_for_ticket`.
/// **Expected:** The send comes first.
#[tokio::test]
async fn test_equal_timestamps_keep_insertion_order() {
    let storage = connect().await;

    let at = Utc::now();
    let send = MessageActionRecord::new(
        "t1",
        7,
        ActionKind::Send,
        1,
        "alice",
        Some("hello".to_string()),
        false,
        at,
    );
    let edit = MessageActionRecord::new(
        "t1",
        7,
        ActionKind::Edit,
        1,
        "alice",
        Some("hello!".to_string()),
        false,
        at,
    );

    storage.message_actions.append(&send).await.expect("Failed to append");
    storage.message_actions.append(&edit).await.expect("Failed to append");

    let actions = storage
        .message_actions
        .list_for_ticket("t1")
        .await
        .expect("Failed to list");

    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].kind, "send");
    assert_eq!(actions[1].kind, "edit");
}

/// **Test: actions of other tickets are not returned.**
#[tokio::test]
async fn test_list_scoped_to_ticket() {
    let storage = connect().await;

    let a = MessageActionRecord::new(
        "t1",
        1,
        ActionKind::Send,
        1,
        "alice",
        Some("in t1".to_string()),
        false,
        Utc::now(),
    );
    let b = MessageActionRecord::new(
        "t2",
        2,
        ActionKind::Send,
        2,
        "bob",
        Some("in t2".to_string()),
        false,
        Utc::now(),
    );

    storage.message_actions.append(&a).await.expect("Failed to append");
    storage.message_actions.append(&b).await.expect("Failed to append");

    let actions = storage
        .message_actions
        .list_for_ticket("t1")
        .await
        .expect("Failed to list");
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].ticket_id, "t1");

    let count = storage
        .message_actions
        .count_for_ticket("t2")
        .await
        .expect("Failed to count");
    assert_eq!(count, 1);
}
