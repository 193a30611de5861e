//! # Discord ticket bot
//!
//! Wires the handler chain, domain services, storage, and the serenity
//! gateway/REST bindings. Users open tickets via panel buttons, dropdowns,
//! and slash commands; the bot creates private channels, records every
//! message action, and reconstructs transcripts from the action log.

pub mod chain;
pub mod cli;
pub mod components;
pub mod config;
pub mod core;
pub mod discord;
pub mod handlers;
pub mod runner;
pub mod services;

// Re-export CLI
pub use cli::{database_url_from_env, load_config, Cli, Commands};

// Re-export core
pub use core::{
    ApiError, BotError, ChannelRef, DiscordApi, Event, Handler, HandlerError,
    HandlerResponse, Interaction, InteractionContext, InteractionData, OutgoingMessage,
    Result, User, init_tracing,
};

// Re-export chain
pub use chain::HandlerChain;

pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use config::{BaseConfig, BotConfig};
pub use handlers::{ActionLogHandler, InteractionHandler, NoOpHandler, SyncHandler};
pub use runner::{connect_components, run_bot};
