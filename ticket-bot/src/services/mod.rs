//! Domain services: placeholder engine, transcript reconstruction, payload
//! builders, guild sync, panels, and the ticket lifecycle.

pub mod panels;
pub mod payload;
pub mod placeholder;
pub mod sync;
pub mod ticket;
pub mod transcript;

pub use panels::PanelService;
pub use placeholder::{
    replace_channel_name_placeholders, replace_placeholders, PlaceholderContext,
};
pub use sync::SyncService;
pub use ticket::{
    Eligibility, OpenTicketRequest, OpenedTicket, TicketService, CLAIM_BUTTON_ID,
    CLOSE_BUTTON_ID,
};
pub use transcript::{
    reconstruct, EditHistoryEntry, ReconstructedMessage, TranscriptService,
};
