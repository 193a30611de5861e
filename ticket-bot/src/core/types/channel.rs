//! Channel identity type for core events.

use serde::{Deserialize, Serialize};

/// A guild channel reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRef {
    pub guild_id: i64,
    pub channel_id: i64,
    pub name: String,
}

impl ChannelRef {
    /// Platform mention string, e.g. `<#42>`.
    pub fn mention(&self) -> String {
        format!("<#{}>", self.channel_id)
    }
}
