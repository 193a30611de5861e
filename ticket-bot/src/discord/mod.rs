//! Discord bindings: the serenity adapter behind [`crate::core::DiscordApi`],
//! the gateway event handler, slash commands, and the custom-id scheme.

pub mod commands;
pub mod custom_id;
pub mod gateway;
mod serenity_api;

pub use gateway::GatewayHandler;
pub use serenity_api::SerenityApi;
