//! Core types: user, channel, events, interactions, handler response, and Handler trait.
//!
//! Types are split into one file per main type for easier navigation and alignment with project conventions.

mod channel;
mod event;
mod handler;
mod interaction;
mod response;
mod user;

pub use channel::ChannelRef;
pub use event::{
    ChannelInfo, EmojiInfo, Event, GuildSnapshot, MemberInfo, MessageDeletePayload,
    MessagePayload, MessageUpdatePayload, RoleInfo,
};
pub use handler::Handler;
pub use interaction::{Interaction, InteractionContext, InteractionData};
pub use response::HandlerResponse;
pub use user::User;
