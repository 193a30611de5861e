//! Storage crate: SQLite persistence for the ticket bot.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – typed records per collection
//! - [`repository`] – generic Repository trait
//! - repositories – servers, tickets, ticket options, panels, message
//!   actions, participants, synced guild entities
//! - [`sqlite_pool`] – SqlitePoolManager
//!
//! [`Storage::connect`] builds one pool and every repository over it.

mod error;
mod message_action_repo;
mod models;
mod panel_repo;
mod participant_repo;
mod repository;
mod server_repo;
mod sqlite_pool;
mod sync_repo;
mod ticket_option_repo;
mod ticket_repo;

pub use error::StorageError;
pub use message_action_repo::MessageActionRepository;
pub use models::{
    ActionKind, GuildChannelRecord, GuildEmojiRecord, GuildMemberRecord,
    GuildRoleRecord, MessageActionRecord, ModalField, PanelRecord, PanelStyle,
    ParticipantRecord, ServerRecord, TicketOptionRecord, TicketRecord, TicketStatus,
};
pub use panel_repo::PanelRepository;
pub use participant_repo::ParticipantRepository;
pub use repository::Repository;
pub use server_repo::ServerRepository;
pub use sqlite_pool::SqlitePoolManager;
pub use sync_repo::SyncRepository;
pub use ticket_option_repo::TicketOptionRepository;
pub use ticket_repo::TicketRepository;

/// Every repository over one shared pool.
#[derive(Clone)]
pub struct Storage {
    pub servers: ServerRepository,
    pub tickets: TicketRepository,
    pub ticket_options: TicketOptionRepository,
    pub panels: PanelRepository,
    pub message_actions: MessageActionRepository,
    pub participants: ParticipantRepository,
    pub sync: SyncRepository,
}

impl Storage {
    /// Connects to the database URL and initializes every table.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(Self {
            servers: ServerRepository::new(pool_manager.clone()).await?,
            tickets: TicketRepository::new(pool_manager.clone()).await?,
            ticket_options: TicketOptionRepository::new(pool_manager.clone()).await?,
            panels: PanelRepository::new(pool_manager.clone()).await?,
            message_actions: MessageActionRepository::new(pool_manager.clone()).await?,
            participants: ParticipantRepository::new(pool_manager.clone()).await?,
            sync: SyncRepository::new(pool_manager).await?,
        })
    }
}
