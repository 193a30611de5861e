//! Typed records for every stored collection.

mod message_action_record;
mod panel_record;
mod participant_record;
mod server_record;
mod sync_record;
mod ticket_option_record;
mod ticket_record;

pub use message_action_record::{ActionKind, MessageActionRecord};
pub use panel_record::{PanelRecord, PanelStyle};
pub use participant_record::ParticipantRecord;
pub use server_record::ServerRecord;
pub use sync_record::{
    GuildChannelRecord, GuildEmojiRecord, GuildMemberRecord, GuildRoleRecord,
};
pub use ticket_option_record::{ModalField, TicketOptionRecord};
pub use ticket_record::{TicketRecord, TicketStatus};
