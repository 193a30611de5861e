//! The component custom-id scheme shared by panel publishing and
//! interaction dispatch.
//!
//! - `ticket_open:<option_id>` — panel button
//! - `ticket_select` — panel dropdown (the value is the option id)
//! - `ticket_modal:<option_id>` — intake form submit
//! - `ticket_close` / `ticket_claim` — initial-message buttons

/// Custom id of a panel dropdown.
pub const PANEL_SELECT_ID: &str = "ticket_select";

const OPEN_PREFIX: &str = "ticket_open:";
const MODAL_PREFIX: &str = "ticket_modal:";

/// Custom id for a panel button opening the given option.
pub fn open_button(option_id: &str) -> String {
    format!("{}{}", OPEN_PREFIX, option_id)
}

/// Option id from a panel-button custom id, if it is one.
pub fn parse_open_button(custom_id: &str) -> Option<&str> {
    custom_id.strip_prefix(OPEN_PREFIX)
}

/// Custom id for the intake modal of the given option.
pub fn modal(option_id: &str) -> String {
    format!("{}{}", MODAL_PREFIX, option_id)
}

/// Option id from a modal custom id, if it is one.
pub fn parse_modal(custom_id: &str) -> Option<&str> {
    custom_id.strip_prefix(MODAL_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_button_round_trip() {
        let id = open_button("abc-123");
        assert_eq!(id, "ticket_open:abc-123");
        assert_eq!(parse_open_button(&id), Some("abc-123"));
        assert_eq!(parse_open_button("ticket_close"), None);
    }

    #[test]
    fn modal_round_trip() {
        let id = modal("xyz");
        assert_eq!(parse_modal(&id), Some("xyz"));
        assert_eq!(parse_modal("ticket_open:xyz"), None);
    }
}
