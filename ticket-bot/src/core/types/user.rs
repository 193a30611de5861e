//! User identity type for core events.

use serde::{Deserialize, Serialize};

/// User identity (id, username, optional display name, bot flag).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    /// True for the bot's own messages; recorded as system messages in the
    /// action log.
    pub is_bot: bool,
}

impl User {
    /// Platform mention string, e.g. `<@42>`.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}
