//! Integration tests for [`storage::ServerRepository`].
//!
//! Covers ensure/upsert semantics, settings updates, and the blacklist
//! using an in-memory SQLite database.

use chrono::Utc;
use storage::{ServerRecord, Storage};

async fn connect() -> Storage {
    Storage::connect("sqlite::memory:")
        .await
        .expect("Failed to connect storage")
}

/// **Test: ensure inserts a default row once and returns the existing row after.**
#[tokio::test]
async fn test_ensure_inserts_defaults_once() {
    let storage = connect().await;

    let created = storage
        .servers
        .ensure(100, "My Guild")
        .await
        .expect("Failed to ensure");
    assert_eq!(created.ticket_counter, 0);
    assert_eq!(created.max_open_tickets_per_user, 1);
    assert_eq!(created.channel_name_template, "ticket-{ticketNumber}");

    // Counter advances, then ensure must NOT reset it.
    storage
        .servers
        .next_ticket_number(100)
        .await
        .expect("Failed to increment");

    let again = storage
        .servers
        .ensure(100, "My Guild")
        .await
        .expect("Failed to ensure");
    assert_eq!(again.ticket_counter, 1);
}

/// **Test: upsert refreshes name/icon but keeps counter and settings.**
#[tokio::test]
async fn test_upsert_keeps_counter_and_settings() {
    let storage = connect().await;

    let mut server = ServerRecord::new(100, "Old Name");
    server.max_open_tickets_per_user = 3;
    storage.servers.upsert(&server).await.expect("Failed to upsert");
    storage.servers.update_settings(&server).await.expect("Failed to update");
    storage
        .servers
        .next_ticket_number(100)
        .await
        .expect("Failed to increment");

    let refreshed = ServerRecord::new(100, "New Name");
    storage.servers.upsert(&refreshed).await.expect("Failed to upsert");

    let row = storage
        .servers
        .get(100)
        .await
        .expect("Failed to get")
        .expect("Server not found");
    assert_eq!(row.name, "New Name");
    assert_eq!(row.ticket_counter, 1);
    assert_eq!(row.max_open_tickets_per_user, 3);
}

/// **Test: blacklist add/check/remove round trip.**
#[tokio::test]
async fn test_blacklist_round_trip() {
    let storage = connect().await;

    assert!(!storage
        .servers
        .is_blacklisted(100, 42)
        .await
        .expect("Failed to check"));

    storage
        .servers
        .blacklist_add(100, 42, Some("spam"), Utc::now())
        .await
        .expect("Failed to add");
    assert!(storage
        .servers
        .is_blacklisted(100, 42)
        .await
        .expect("Failed to check"));

    // Scoped per guild.
    assert!(!storage
        .servers
        .is_blacklisted(200, 42)
        .await
        .expect("Failed to check"));

    assert!(storage
        .servers
        .blacklist_remove(100, 42)
        .await
        .expect("Failed to remove"));
    assert!(!storage
        .servers
        .is_blacklisted(100, 42)
        .await
        .expect("Failed to check"));
}

/// **Test: a file-backed database is created on first connect and survives
/// a reconnect.**
#[tokio::test]
async fn test_file_database_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("tickets.db");
    let url = db_path.to_str().expect("utf-8 path").to_string();

    {
        let storage = Storage::connect(&url).await.expect("Failed to connect");
        storage
            .servers
            .upsert(&ServerRecord::new(100, "Persistent Guild"))
            .await
            .expect("Failed to upsert");
    }

    let storage = Storage::connect(&url).await.expect("Failed to reconnect");
    let server = storage
        .servers
        .get(100)
        .await
        .expect("Failed to get")
        .expect("Server not found");
    assert_eq!(server.name, "Persistent Guild");
}
