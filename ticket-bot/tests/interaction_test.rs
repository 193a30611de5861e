//! End-to-end interaction tests: core interaction events through the full
//! handler chain with in-memory storage and a mock platform API.

mod mock_api;

use std::sync::Arc;

use chrono::Utc;
use mock_api::MockApi;
use storage::{ModalField, Repository, ServerRecord, Storage, TicketOptionRecord};
use ticket_bot::core::{
    Event, Interaction, InteractionContext, InteractionData, MessagePayload, User,
};
use ticket_bot::handlers::{ActionLogHandler, InteractionHandler};
use ticket_bot::services::TicketService;
use ticket_bot::HandlerChain;

struct Fixture {
    storage: Storage,
    api: Arc<MockApi>,
    chain: HandlerChain,
}

async fn setup() -> Fixture {
    let storage = Storage::connect("sqlite::memory:")
        .await
        .expect("Failed to connect storage");
    let api = Arc::new(MockApi::new());

    let ticket_service = TicketService::new(
        storage.servers.clone(),
        storage.tickets.clone(),
        storage.message_actions.clone(),
        api.clone(),
    );
    let chain = HandlerChain::new()
        .add_handler(Arc::new(ActionLogHandler::new(
            storage.tickets.clone(),
            storage.message_actions.clone(),
            storage.participants.clone(),
        )))
        .add_handler(Arc::new(InteractionHandler::new(
            storage.servers.clone(),
            storage.ticket_options.clone(),
            ticket_service,
            api.clone(),
        )));

    storage
        .servers
        .upsert(&ServerRecord::new(100, "Test Guild"))
        .await
        .expect("Failed to upsert server");

    Fixture { storage, api, chain }
}

fn user() -> User {
    User {
        id: 42,
        username: "alice".to_string(),
        display_name: None,
        is_bot: false,
    }
}

fn interaction(data: InteractionData) -> Event {
    Event::InteractionCreated(Interaction {
        ctx: InteractionContext {
            interaction_id: 1,
            token: "tok".to_string(),
            guild_id: Some(100),
            channel_id: 500,
            user: user(),
        },
        data,
    })
}

/// **Test: the open command without a type opens a plain ticket and
/// confirms with the channel mention.**
#[tokio::test]
async fn test_open_command_creates_ticket() {
    let fixture = setup().await;

    fixture
        .chain
        .handle(&interaction(InteractionData::Command {
            name: "open".to_string(),
            options: vec![],
        }))
        .await
        .expect("chain failed");

    let tickets = fixture
        .storage
        .tickets
        .list_by_guild(100)
        .await
        .expect("Failed to list tickets");
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].opener_id, 42);

    let replies = fixture.api.ephemeral_replies.lock().unwrap();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("Your ticket is ready"));
}

/// **Test: a panel button for an option with an intake form opens the
/// modal instead of a ticket; the modal submit then opens the ticket with
/// the answers applied.**
#[tokio::test]
async fn test_modal_round_trip() {
    let fixture = setup().await;

    let mut option = TicketOptionRecord::new(100, "Bug Report");
    option.initial_message = Some("Reported issue: {modal:issue}".to_string());
    option
        .set_modal_fields(&[ModalField {
            id: "issue".to_string(),
            label: "What broke?".to_string(),
            placeholder: None,
            required: true,
        }])
        .expect("Failed to set fields");
    fixture
        .storage
        .ticket_options
        .save(&option)
        .await
        .expect("Failed to save option");

    // Button press: no ticket yet, a modal instead.
    fixture
        .chain
        .handle(&interaction(InteractionData::Button {
            custom_id: format!("ticket_open:{}", option.id),
        }))
        .await
        .expect("chain failed");

    assert!(fixture
        .storage
        .tickets
        .list_by_guild(100)
        .await
        .expect("Failed to list")
        .is_empty());
    {
        let modals = fixture.api.opened_modals.lock().unwrap();
        assert_eq!(modals.len(), 1);
        assert_eq!(modals[0].custom_id, format!("ticket_modal:{}", option.id));
        assert_eq!(modals[0].fields[0].id, "issue");
    }

    // Modal submit: the ticket is created and the answer lands in the
    // initial message.
    fixture
        .chain
        .handle(&interaction(InteractionData::ModalSubmit {
            custom_id: format!("ticket_modal:{}", option.id),
            fields: vec![("issue".to_string(), "Login broken".to_string())],
        }))
        .await
        .expect("chain failed");

    let tickets = fixture
        .storage
        .tickets
        .list_by_guild(100)
        .await
        .expect("Failed to list");
    assert_eq!(tickets.len(), 1);

    let sent = fixture.api.sent_messages.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].1.content.as_deref(),
        Some("Reported issue: Login broken")
    );
}

/// **Test: a blacklisted user gets the denial as an ephemeral reply and no
/// ticket is created.**
#[tokio::test]
async fn test_blacklisted_user_denied() {
    let fixture = setup().await;
    fixture
        .storage
        .servers
        .blacklist_add(100, 42, None, Utc::now())
        .await
        .expect("Failed to blacklist");

    fixture
        .chain
        .handle(&interaction(InteractionData::Command {
            name: "open".to_string(),
            options: vec![],
        }))
        .await
        .expect("chain failed");

    assert!(fixture
        .storage
        .tickets
        .list_by_guild(100)
        .await
        .expect("Failed to list")
        .is_empty());
    let replies = fixture.api.ephemeral_replies.lock().unwrap();
    assert!(replies[0].contains("blacklisted"));
}

/// **Test: the close button in a channel with no open ticket answers with
/// a user-facing reply, not an error.**
#[tokio::test]
async fn test_close_without_ticket_is_a_reply() {
    let fixture = setup().await;

    fixture
        .chain
        .handle(&interaction(InteractionData::Button {
            custom_id: "ticket_close".to_string(),
        }))
        .await
        .expect("chain failed");

    let replies = fixture.api.ephemeral_replies.lock().unwrap();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("no open ticket"));
}

/// **Test: user messages in a ticket channel are recorded as send actions;
/// messages elsewhere are not.**
#[tokio::test]
async fn test_action_log_scoped_to_ticket_channels() {
    let fixture = setup().await;

    // Open a ticket first.
    fixture
        .chain
        .handle(&interaction(InteractionData::Command {
            name: "open".to_string(),
            options: vec![],
        }))
        .await
        .expect("chain failed");
    let ticket = fixture
        .storage
        .tickets
        .list_by_guild(100)
        .await
        .expect("Failed to list")
        .remove(0);

    let message = |channel_id: i64| {
        Event::MessageCreated(MessagePayload {
            message_id: channel_id * 10,
            guild_id: Some(100),
            channel_id,
            author: user(),
            content: "hello there".to_string(),
            attachments: vec![],
            embeds: vec![],
            created_at: Utc::now(),
        })
    };

    fixture
        .chain
        .handle(&message(ticket.channel_id))
        .await
        .expect("chain failed");
    fixture
        .chain
        .handle(&message(999_999))
        .await
        .expect("chain failed");

    let actions = fixture
        .storage
        .message_actions
        .list_for_ticket(&ticket.id)
        .await
        .expect("Failed to list actions");
    // The system initial message plus the user's message.
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[1].kind, "send");
    assert_eq!(actions[1].author_id, 42);
    assert!(!actions[1].is_system_message);

    let participants = fixture
        .storage
        .participants
        .list_for_ticket(&ticket.id)
        .await
        .expect("Failed to list participants");
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].user_id, 42);
    assert_eq!(participants[0].message_count, 1);
}
