//! Ticket option record: a configurable ticket "type" (name, responsible
//! roles, optional intake form, initial message template).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;

/// One field of an option's intake modal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModalField {
    /// Field id; modal answers are keyed by this (see the `modal:<id>` placeholder).
    pub id: String,
    /// Label shown to the user.
    pub label: String,
    /// Placeholder text inside the input, if any.
    pub placeholder: Option<String>,
    pub required: bool,
}

/// One row from the ticket_options table. List-valued fields are stored as
/// JSON text columns; use the typed accessors.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketOptionRecord {
    /// Primary key (UUID).
    pub id: String,
    pub guild_id: i64,
    /// Option name shown on panel buttons and matched by the `open` command.
    pub name: String,
    pub description: Option<String>,
    /// Emoji shown on the panel button, if any.
    pub emoji: Option<String>,
    /// JSON array of role ids granted access to tickets of this type.
    pub responsible_role_ids: String,
    /// Initial-message template; None falls back to the server welcome message.
    pub initial_message: Option<String>,
    /// Channel-name template override; None uses the server template.
    pub channel_name_template: Option<String>,
    /// JSON array of [`ModalField`]; empty array means no intake form.
    pub modal_fields: String,
    /// Sort position on panels.
    pub position: i64,
    pub enabled: bool,
}

impl TicketOptionRecord {
    /// Creates an enabled option with a generated UUID and no roles or form.
    pub fn new(guild_id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            guild_id,
            name: name.into(),
            description: None,
            emoji: None,
            responsible_role_ids: "[]".to_string(),
            initial_message: None,
            channel_name_template: None,
            modal_fields: "[]".to_string(),
            position: 0,
            enabled: true,
        }
    }

    /// Decodes the responsible role ids from the JSON column.
    pub fn role_ids(&self) -> Result<Vec<i64>, StorageError> {
        Ok(serde_json::from_str(&self.responsible_role_ids)?)
    }

    /// Encodes and stores the responsible role ids.
    pub fn set_role_ids(&mut self, ids: &[i64]) -> Result<(), StorageError> {
        self.responsible_role_ids = serde_json::to_string(ids)?;
        Ok(())
    }

    /// Decodes the intake form fields from the JSON column.
    pub fn modal_field_list(&self) -> Result<Vec<ModalField>, StorageError> {
        Ok(serde_json::from_str(&self.modal_fields)?)
    }

    /// Encodes and stores the intake form fields.
    pub fn set_modal_fields(&mut self, fields: &[ModalField]) -> Result<(), StorageError> {
        self.modal_fields = serde_json::to_string(fields)?;
        Ok(())
    }
}
