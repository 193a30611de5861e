//! Core interaction model: buttons, dropdowns, slash commands, modals.

use serde::{Deserialize, Serialize};

use super::user::User;

/// Identity needed to respond to an interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionContext {
    pub interaction_id: i64,
    /// One-shot response token issued by the platform.
    pub token: String,
    pub guild_id: Option<i64>,
    pub channel_id: i64,
    pub user: User,
}

/// What the user did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InteractionData {
    /// A button press; dispatched on `custom_id`.
    Button { custom_id: String },
    /// A dropdown selection; `values` holds the chosen option values.
    Select { custom_id: String, values: Vec<String> },
    /// A slash command with (name, value) argument pairs.
    Command { name: String, options: Vec<(String, String)> },
    /// A submitted modal; `fields` holds (field id, answer) pairs.
    ModalSubmit { custom_id: String, fields: Vec<(String, String)> },
}

/// One interaction event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub ctx: InteractionContext,
    pub data: InteractionData,
}
