//! Integration tests for [`storage::TicketRepository`] and the server
//! ticket counter.
//!
//! Covers counter increments, open-ticket counting, channel lookup and
//! close/claim transitions using an in-memory SQLite database.

use storage::{ServerRecord, Storage, TicketRecord};

async fn connect() -> Storage {
    Storage::connect("sqlite::memory:")
        .await
        .expect("Failed to connect storage")
}

/// **Test: next_ticket_number increments per guild, starting at 1.**
///
/// **Setup:** In-memory DB; one server row.
/// **Action:** Call `next_ticket_number` three times.
/// **Expected:** Returns 1, 2, 3; a different guild starts again at 1.
#[tokio::test]
async fn test_next_ticket_number_increments_per_guild() {
    let storage = connect().await;

    storage
        .servers
        .upsert(&ServerRecord::new(100, "Guild A"))
        .await
        .expect("Failed to upsert server");
    storage
        .servers
        .upsert(&ServerRecord::new(200, "Guild B"))
        .await
        .expect("Failed to upsert server");

    for expected in 1..=3 {
        let n = storage
            .servers
            .next_ticket_number(100)
            .await
            .expect("Failed to increment counter");
        assert_eq!(n, expected);
    }

    let other = storage
        .servers
        .next_ticket_number(200)
        .await
        .expect("Failed to increment counter");
    assert_eq!(other, 1);
}

/// **Test: next_ticket_number for an unknown guild returns NotFound.**
#[tokio::test]
async fn test_next_ticket_number_unknown_guild() {
    let storage = connect().await;

    let result = storage.servers.next_ticket_number(999).await;
    assert!(result.is_err());
}

/// **Test: count_open_by_user counts only open tickets of that user.**
///
/// **Setup:** Two open tickets and one closed ticket for user 1, one open
/// ticket for user 2, all in guild 100.
/// **Action:** `count_open_by_user(100, 1)`.
/// **Expected:** Returns 2.
#[tokio::test]
async fn test_count_open_by_user() {
    let storage = connect().await;

    let t1 = TicketRecord::new(100, 1, 111, 1, "alice", None);
    let t2 = TicketRecord::new(100, 2, 222, 1, "alice", None);
    let t3 = TicketRecord::new(100, 3, 333, 1, "alice", None);
    let t4 = TicketRecord::new(100, 4, 444, 2, "bob", None);

    for t in [&t1, &t2, &t3, &t4] {
        storage.tickets.insert(t).await.expect("Failed to insert");
    }
    storage
        .tickets
        .set_closed(&t3.id, chrono::Utc::now(), Some("resolved"))
        .await
        .expect("Failed to close");

    let count = storage
        .tickets
        .count_open_by_user(100, 1)
        .await
        .expect("Failed to count");
    assert_eq!(count, 2);
}

/// **Test: find_open_by_channel returns the open ticket and ignores closed ones.**
#[tokio::test]
async fn test_find_open_by_channel() {
    let storage = connect().await;

    let ticket = TicketRecord::new(100, 1, 555, 1, "alice", None);
    storage.tickets.insert(&ticket).await.expect("Failed to insert");

    let found = storage
        .tickets
        .find_open_by_channel(555)
        .await
        .expect("Failed to query")
        .expect("Ticket not found");
    assert_eq!(found.id, ticket.id);
    assert!(found.is_open());

    storage
        .tickets
        .set_closed(&ticket.id, chrono::Utc::now(), None)
        .await
        .expect("Failed to close");

    let gone = storage
        .tickets
        .find_open_by_channel(555)
        .await
        .expect("Failed to query");
    assert!(gone.is_none());
}

/// **Test: set_claimed records the claimer on the ticket.**
#[tokio::test]
async fn test_set_claimed() {
    let storage = connect().await;

    let ticket = TicketRecord::new(100, 1, 555, 1, "alice", None);
    storage.tickets.insert(&ticket).await.expect("Failed to insert");

    storage
        .tickets
        .set_claimed(&ticket.id, 42)
        .await
        .expect("Failed to claim");

    let found = storage
        .tickets
        .get(&ticket.id)
        .await
        .expect("Failed to query")
        .expect("Ticket not found");
    assert_eq!(found.claimed_by, Some(42));
}

/// **Test: most_recent_opened_at returns the latest opened_at, or None when
/// the user has no tickets.**
#[tokio::test]
async fn test_most_recent_opened_at() {
    let storage = connect().await;

    let none = storage
        .tickets
        .most_recent_opened_at(100, 1)
        .await
        .expect("Failed to query");
    assert!(none.is_none());

    let mut early = TicketRecord::new(100, 1, 111, 1, "alice", None);
    early.opened_at = chrono::Utc::now() - chrono::Duration::hours(2);
    let late = TicketRecord::new(100, 2, 222, 1, "alice", None);

    storage.tickets.insert(&early).await.expect("Failed to insert");
    storage.tickets.insert(&late).await.expect("Failed to insert");

    let recent = storage
        .tickets
        .most_recent_opened_at(100, 1)
        .await
        .expect("Failed to query")
        .expect("Expected a timestamp");
    assert_eq!(recent, late.opened_at);
}
