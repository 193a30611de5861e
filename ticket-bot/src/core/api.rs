//! Platform API abstraction for the REST calls the bot makes.
//!
//! [`DiscordApi`] is the trait seam: production code uses the serenity-backed
//! adapter in `discord`; tests substitute a mock implementation. All ids are
//! i64 snowflakes to match storage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::types::{ChannelRef, InteractionContext};

/// Request to create a private ticket channel.
#[derive(Debug, Clone)]
pub struct CreateChannelRequest {
    pub guild_id: i64,
    pub name: String,
    /// Category to create under; None creates at the guild root.
    pub category_id: Option<i64>,
    pub topic: Option<String>,
    /// Users granted view/send on the channel (the opener).
    pub allow_user_ids: Vec<i64>,
    /// Roles granted view/send on the channel (responsible roles).
    pub allow_role_ids: Vec<i64>,
}

/// Button style, mapped to the platform's button colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonKind {
    Primary,
    Secondary,
    Success,
    Danger,
}

/// One button on an outgoing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonSpec {
    pub custom_id: String,
    pub label: String,
    pub kind: ButtonKind,
    pub emoji: Option<String>,
}

/// Embed content for an outgoing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedSpec {
    pub title: Option<String>,
    pub description: String,
    pub color: Option<i64>,
}

/// An outgoing message: plain content and/or an embed, plus buttons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    pub embed: Option<EmbedSpec>,
    pub buttons: Vec<ButtonSpec>,
}

impl OutgoingMessage {
    /// Plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Embed-only message.
    pub fn embed(embed: EmbedSpec) -> Self {
        Self {
            embed: Some(embed),
            ..Default::default()
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<ButtonSpec>) -> Self {
        self.buttons = buttons;
        self
    }
}

/// One input field of a modal to present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalFieldSpec {
    pub id: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub required: bool,
}

/// A modal (intake form) to present in response to an interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalRequest {
    pub custom_id: String,
    pub title: String,
    pub fields: Vec<ModalFieldSpec>,
}

/// One option rendered on a panel (button label or dropdown entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelOptionView {
    pub option_id: String,
    pub label: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
}

/// A panel message to publish: embed plus one button per option, or a
/// dropdown of options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelView {
    pub title: String,
    pub body: String,
    pub color: Option<i64>,
    pub dropdown: bool,
    pub options: Vec<PanelOptionView>,
}

/// The REST calls the bot makes against the chat platform.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    /// Creates a private text channel; fails with [`ApiError::CategoryFull`]
    /// when the target category cannot take another channel.
    async fn create_ticket_channel(
        &self,
        req: &CreateChannelRequest,
    ) -> std::result::Result<ChannelRef, ApiError>;

    /// Sends a message and returns its id.
    async fn send_message(
        &self,
        channel_id: i64,
        message: &OutgoingMessage,
    ) -> std::result::Result<i64, ApiError>;

    async fn delete_message(
        &self,
        channel_id: i64,
        message_id: i64,
    ) -> std::result::Result<(), ApiError>;

    /// Ephemeral text reply to an interaction (only the user sees it).
    async fn respond_ephemeral(
        &self,
        interaction: &InteractionContext,
        text: &str,
    ) -> std::result::Result<(), ApiError>;

    /// Presents a modal in response to an interaction.
    async fn open_modal(
        &self,
        interaction: &InteractionContext,
        modal: &ModalRequest,
    ) -> std::result::Result<(), ApiError>;

    /// Publishes a panel message and returns its id.
    async fn publish_panel(
        &self,
        channel_id: i64,
        view: &PanelView,
    ) -> std::result::Result<i64, ApiError>;
}
