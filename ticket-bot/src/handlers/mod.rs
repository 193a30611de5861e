//! Handler implementations: action log, guild sync, interactions.

mod action_log_handler;
mod interaction_handler;
mod noop_handler;
mod sync_handler;

pub use action_log_handler::ActionLogHandler;
pub use interaction_handler::InteractionHandler;
pub use noop_handler::NoOpHandler;
pub use sync_handler::SyncHandler;
