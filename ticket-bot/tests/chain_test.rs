//! Unit/integration tests for [`ticket_bot::HandlerChain`].
//!
//! Covers ordering (before all → handle until Stop → after reverse) and the
//! before-false short circuit, using recording handlers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use ticket_bot::core::{
    Event, Handler, HandlerResponse, MessagePayload, Result, User,
};
use ticket_bot::{HandlerChain, NoOpHandler};

fn make_event() -> Event {
    Event::MessageCreated(MessagePayload {
        message_id: 1,
        guild_id: Some(100),
        channel_id: 5,
        author: User {
            id: 42,
            username: "alice".to_string(),
            display_name: None,
            is_bot: false,
        },
        content: "hello".to_string(),
        attachments: vec![],
        embeds: vec![],
        created_at: Utc::now(),
    })
}

/// Records its phase calls into a shared log.
struct RecordingHandler {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    response: HandlerResponse,
    before_result: bool,
}

#[async_trait]
impl Handler for RecordingHandler {
    async fn before(&self, _event: &Event) -> Result<bool> {
        self.log.lock().unwrap().push(format!("{}:before", self.name));
        Ok(self.before_result)
    }

    async fn handle(&self, _event: &Event) -> Result<HandlerResponse> {
        self.log.lock().unwrap().push(format!("{}:handle", self.name));
        Ok(self.response.clone())
    }

    async fn after(&self, _event: &Event, _response: &HandlerResponse) -> Result<()> {
        self.log.lock().unwrap().push(format!("{}:after", self.name));
        Ok(())
    }
}

/// **Test: all before in order, handle until Stop, after in reverse.**
#[tokio::test]
async fn test_chain_ordering_and_stop() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(RecordingHandler {
            name: "a",
            log: log.clone(),
            response: HandlerResponse::Continue,
            before_result: true,
        }))
        .add_handler(Arc::new(RecordingHandler {
            name: "b",
            log: log.clone(),
            response: HandlerResponse::Stop,
            before_result: true,
        }))
        .add_handler(Arc::new(RecordingHandler {
            name: "c",
            log: log.clone(),
            response: HandlerResponse::Continue,
            before_result: true,
        }));

    let response = chain.handle(&make_event()).await.expect("chain failed");
    assert_eq!(response, HandlerResponse::Stop);

    let calls = log.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            "a:before", "b:before", "c:before",
            "a:handle", "b:handle",
            "c:after", "b:after", "a:after",
        ]
    );
}

/// **Test: a false from before stops the chain before any handle runs.**
#[tokio::test]
async fn test_before_false_short_circuits() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(RecordingHandler {
            name: "gate",
            log: log.clone(),
            response: HandlerResponse::Continue,
            before_result: false,
        }))
        .add_handler(Arc::new(RecordingHandler {
            name: "late",
            log: log.clone(),
            response: HandlerResponse::Continue,
            before_result: true,
        }));

    let response = chain.handle(&make_event()).await.expect("chain failed");
    assert_eq!(response, HandlerResponse::Stop);

    let calls = log.lock().unwrap().clone();
    assert_eq!(calls, vec!["gate:before"]);
}

/// **Test: an empty chain and a NoOp-only chain both continue.**
#[tokio::test]
async fn test_noop_chain_continues() {
    let chain = HandlerChain::new().add_handler(Arc::new(NoOpHandler::new()));
    let response = chain.handle(&make_event()).await.expect("chain failed");
    assert_eq!(response, HandlerResponse::Continue);
}
