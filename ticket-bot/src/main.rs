//! Binary for the ticket bot: run the gateway, export a transcript, or
//! publish a panel.

use anyhow::Result;
use clap::Parser;
use ticket_bot::services::TranscriptService;
use ticket_bot::{database_url_from_env, load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::Transcript { ticket_id, out } => {
            let storage = storage::Storage::connect(&database_url_from_env()).await?;
            let service = TranscriptService::new(storage.message_actions.clone());
            let messages = service.reconstruct_ticket(&ticket_id).await?;
            let rendered = TranscriptService::render_text(&messages);
            match out {
                Some(path) => std::fs::write(&path, rendered)?,
                None => print!("{}", rendered),
            }
            Ok(())
        }
        Commands::PublishPanel { panel_id } => {
            let config = load_config(None)?;
            config.validate()?;
            let (_http, components) = ticket_bot::connect_components(&config).await?;
            let message_id = components.panel_service.publish(&panel_id).await?;
            println!("Panel published as message {}", message_id);
            Ok(())
        }
    }
}
