//! Panel publishing: renders a stored panel and its options into a panel
//! message (buttons or dropdown) and records the published message id.

use std::sync::Arc;

use storage::{PanelRepository, PanelStyle, Repository, TicketOptionRepository};
use tracing::{info, instrument, warn};

use crate::core::{BotError, DiscordApi, PanelOptionView, PanelView, Result};

/// Publishes configured panels to their channels.
#[derive(Clone)]
pub struct PanelService {
    panels: PanelRepository,
    ticket_options: TicketOptionRepository,
    api: Arc<dyn DiscordApi>,
}

impl PanelService {
    pub fn new(
        panels: PanelRepository,
        ticket_options: TicketOptionRepository,
        api: Arc<dyn DiscordApi>,
    ) -> Self {
        Self {
            panels,
            ticket_options,
            api,
        }
    }

    /// Publishes the panel message and stores the resulting message id.
    #[instrument(skip(self))]
    pub async fn publish(&self, panel_id: &str) -> Result<i64> {
        let panel = self
            .panels
            .get(panel_id)
            .await?
            .ok_or_else(|| BotError::Config(format!("panel {} not found", panel_id)))?;

        let mut options = Vec::new();
        for option_id in panel.option_id_list()? {
            let Some(option) = self.ticket_options.find_by_id(&option_id).await? else {
                continue;
            };
            if !option.enabled {
                continue;
            }
            options.push(PanelOptionView {
                option_id: option.id,
                label: option.name,
                description: option.description,
                emoji: option.emoji,
            });
        }
        if options.is_empty() {
            return Err(BotError::Config(format!(
                "panel {} has no enabled options",
                panel_id
            )));
        }

        let view = PanelView {
            title: panel.title.clone(),
            body: panel.body.clone(),
            color: panel.color,
            dropdown: PanelStyle::parse(&panel.style) == Some(PanelStyle::Dropdown),
            options,
        };

        // Republish: drop the previous panel message first, best-effort.
        if let Some(old_message_id) = panel.message_id {
            if let Err(e) = self
                .api
                .delete_message(panel.channel_id, old_message_id)
                .await
            {
                warn!(
                    error = %e,
                    panel_id = %panel.id,
                    old_message_id,
                    "Failed to delete previous panel message"
                );
            }
        }

        let message_id = self.api.publish_panel(panel.channel_id, &view).await?;
        self.panels.set_message_id(&panel.id, message_id).await?;

        info!(panel_id = %panel.id, message_id, "Panel published");
        Ok(message_id)
    }
}
