//! Integration tests for [`storage::SyncRepository`].
//!
//! Covers upsert idempotency and the prune-unseen half of snapshot
//! reconciliation using an in-memory SQLite database.

use chrono::Utc;
use storage::{GuildChannelRecord, GuildRoleRecord, Storage};

async fn connect() -> Storage {
    Storage::connect("sqlite::memory:")
        .await
        .expect("Failed to connect storage")
}

fn channel(guild_id: i64, channel_id: i64, name: &str) -> GuildChannelRecord {
    GuildChannelRecord {
        guild_id,
        channel_id,
        name: name.to_string(),
        kind: "text".to_string(),
        parent_id: None,
        seen_at: Utc::now(),
    }
}

/// **Test: upserting the same channel twice keeps one row with the latest name.**
#[tokio::test]
async fn test_upsert_channel_idempotent() {
    let storage = connect().await;

    storage
        .sync
        .upsert_channel(&channel(100, 1, "general"))
        .await
        .expect("Failed to upsert");
    storage
        .sync
        .upsert_channel(&channel(100, 1, "general-renamed"))
        .await
        .expect("Failed to upsert");

    let channels = storage.sync.list_channels(100).await.expect("Failed to list");
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].name, "general-renamed");
}

/// **Test: prune_channels deletes rows absent from the snapshot.**
///
/// **Setup:** Channels 1, 2, 3 stored for guild 100; channel 9 for guild 200.
/// **Action:** `prune_channels(100, &[1, 3])`.
/// **Expected:** Channel 2 deleted; 1 and 3 remain; guild 200 untouched.
#[tokio::test]
async fn test_prune_channels_deletes_unseen() {
    let storage = connect().await;

    for id in [1, 2, 3] {
        storage
            .sync
            .upsert_channel(&channel(100, id, &format!("chan-{}", id)))
            .await
            .expect("Failed to upsert");
    }
    storage
        .sync
        .upsert_channel(&channel(200, 9, "other-guild"))
        .await
        .expect("Failed to upsert");

    let pruned = storage
        .sync
        .prune_channels(100, &[1, 3])
        .await
        .expect("Failed to prune");
    assert_eq!(pruned, 1);

    let remaining: Vec<i64> = storage
        .sync
        .list_channels(100)
        .await
        .expect("Failed to list")
        .iter()
        .map(|c| c.channel_id)
        .collect();
    assert_eq!(remaining, vec![1, 3]);

    let other = storage.sync.list_channels(200).await.expect("Failed to list");
    assert_eq!(other.len(), 1);
}

/// **Test: pruning with an empty snapshot clears the guild's rows.**
#[tokio::test]
async fn test_prune_empty_snapshot_clears_guild() {
    let storage = connect().await;

    for id in [1, 2] {
        storage
            .sync
            .upsert_channel(&channel(100, id, "chan"))
            .await
            .expect("Failed to upsert");
    }

    let pruned = storage
        .sync
        .prune_channels(100, &[])
        .await
        .expect("Failed to prune");
    assert_eq!(pruned, 2);
    assert!(storage
        .sync
        .list_channels(100)
        .await
        .expect("Failed to list")
        .is_empty());
}

/// **Test: role delete removes a single row and reports whether it existed.**
#[tokio::test]
async fn test_delete_role() {
    let storage = connect().await;

    let role = GuildRoleRecord {
        guild_id: 100,
        role_id: 5,
        name: "support".to_string(),
        color: 0x00ff00,
        position: 1,
        seen_at: Utc::now(),
    };
    storage.sync.upsert_role(&role).await.expect("Failed to upsert");

    assert!(storage.sync.delete_role(100, 5).await.expect("Failed to delete"));
    assert!(!storage.sync.delete_role(100, 5).await.expect("Failed to delete"));
}
