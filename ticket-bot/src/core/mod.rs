//! Core types and traits: Handler, DiscordApi, events, HandlerResponse, error, logger.
//! Transport-agnostic; the serenity bindings live in `discord`.

pub mod api;
pub mod error;
pub mod logger;
pub mod types;

pub use api::{
    ButtonKind, ButtonSpec, CreateChannelRequest, DiscordApi, EmbedSpec, ModalFieldSpec,
    ModalRequest, OutgoingMessage, PanelOptionView, PanelView,
};
pub use error::{ApiError, BotError, HandlerError, Result};
pub use logger::init_tracing;
pub use types::{
    ChannelInfo, ChannelRef, EmojiInfo, Event, GuildSnapshot, Handler, HandlerResponse,
    Interaction, InteractionContext, InteractionData, MemberInfo, MessageDeletePayload,
    MessagePayload, MessageUpdatePayload, RoleInfo, User,
};
