//! Panel record: a configured message (buttons or dropdown) that lets end
//! users open a ticket.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;

/// How the panel renders its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStyle {
    Buttons,
    Dropdown,
}

impl PanelStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelStyle::Buttons => "buttons",
            PanelStyle::Dropdown => "dropdown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "buttons" => Some(PanelStyle::Buttons),
            "dropdown" => Some(PanelStyle::Dropdown),
            _ => None,
        }
    }
}

/// One row from the panels table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PanelRecord {
    /// Primary key (UUID).
    pub id: String,
    pub guild_id: i64,
    /// Channel the panel message is published in.
    pub channel_id: i64,
    /// Published message id; None until the panel is published.
    pub message_id: Option<i64>,
    pub title: String,
    pub body: String,
    /// "buttons" or "dropdown".
    pub style: String,
    /// JSON array of ticket option ids shown on this panel.
    pub option_ids: String,
    /// Embed color, if configured.
    pub color: Option<i64>,
}

impl PanelRecord {
    /// Creates an unpublished panel with a generated UUID.
    pub fn new(
        guild_id: i64,
        channel_id: i64,
        title: impl Into<String>,
        body: impl Into<String>,
        style: PanelStyle,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            guild_id,
            channel_id,
            message_id: None,
            title: title.into(),
            body: body.into(),
            style: style.as_str().to_string(),
            option_ids: "[]".to_string(),
            color: None,
        }
    }

    /// Decodes the option ids from the JSON column.
    pub fn option_id_list(&self) -> Result<Vec<String>, StorageError> {
        Ok(serde_json::from_str(&self.option_ids)?)
    }

    /// Encodes and stores the option ids.
    pub fn set_option_ids(&mut self, ids: &[String]) -> Result<(), StorageError> {
        self.option_ids = serde_json::to_string(ids)?;
        Ok(())
    }
}
