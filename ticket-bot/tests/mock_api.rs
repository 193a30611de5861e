//! Mock [`DiscordApi`] implementation shared by integration tests.
//!
//! Records every call and can be configured to report full categories or
//! fail sends, so tests can drive the fallback and no-rollback paths.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use ticket_bot::core::{
    ApiError, ChannelRef, CreateChannelRequest, DiscordApi, InteractionContext,
    ModalRequest, OutgoingMessage, PanelView,
};

#[derive(Default)]
pub struct MockApi {
    /// Category ids that report the category-full failure.
    pub full_categories: Mutex<HashSet<i64>>,
    /// category_id of every create attempt, in call order.
    pub create_attempts: Mutex<Vec<Option<i64>>>,
    /// Successfully created channels.
    pub created_channels: Mutex<Vec<CreateChannelRequest>>,
    /// (channel_id, message) of every sent message.
    pub sent_messages: Mutex<Vec<(i64, OutgoingMessage)>>,
    pub ephemeral_replies: Mutex<Vec<String>>,
    pub opened_modals: Mutex<Vec<ModalRequest>>,
    /// When true every send_message fails.
    pub fail_send: AtomicBool,
    next_id: AtomicI64,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1000),
            ..Default::default()
        }
    }

    pub fn mark_category_full(&self, category_id: i64) {
        self.full_categories.lock().unwrap().insert(category_id);
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl DiscordApi for MockApi {
    async fn create_ticket_channel(
        &self,
        req: &CreateChannelRequest,
    ) -> Result<ChannelRef, ApiError> {
        self.create_attempts.lock().unwrap().push(req.category_id);
        if let Some(category_id) = req.category_id {
            if self.full_categories.lock().unwrap().contains(&category_id) {
                return Err(ApiError::CategoryFull);
            }
        }
        self.created_channels.lock().unwrap().push(req.clone());
        Ok(ChannelRef {
            guild_id: req.guild_id,
            channel_id: self.next_id(),
            name: req.name.clone(),
        })
    }

    async fn send_message(
        &self,
        channel_id: i64,
        message: &OutgoingMessage,
    ) -> Result<i64, ApiError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(ApiError::Platform("send failed".to_string()));
        }
        self.sent_messages
            .lock()
            .unwrap()
            .push((channel_id, message.clone()));
        Ok(self.next_id())
    }

    async fn delete_message(
        &self,
        _channel_id: i64,
        _message_id: i64,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    async fn respond_ephemeral(
        &self,
        _interaction: &InteractionContext,
        text: &str,
    ) -> Result<(), ApiError> {
        self.ephemeral_replies.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn open_modal(
        &self,
        _interaction: &InteractionContext,
        modal: &ModalRequest,
    ) -> Result<(), ApiError> {
        self.opened_modals.lock().unwrap().push(modal.clone());
        Ok(())
    }

    async fn publish_panel(
        &self,
        _channel_id: i64,
        _view: &PanelView,
    ) -> Result<i64, ApiError> {
        Ok(self.next_id())
    }
}
