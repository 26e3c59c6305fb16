//! SkyLink CLI
//!
//! Entry point for the `skylink` binary.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use skylink_cli::cli::{Cli, Command, HistoryAction};
use skylink_cli::{commands, config_handlers};
use skylink_core::{HistoryStore, SkylinkConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config commands must work even when the file is broken.
    if let Command::Config { action } = cli.command {
        init_tracing(cli.verbose, "warn");
        config_handlers::handle_config_command(cli.config.as_deref(), action)?;
        return Ok(());
    }

    let config = SkylinkConfig::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, &config.logging.level);
    tracing::debug!(environment = %config.environment, "Configuration loaded");

    match cli.command {
        Command::Serve { host, port } => commands::cmd_serve(config, host, port).await?,
        Command::Track {
            number,
            json,
            no_history,
        } => {
            let store = if no_history {
                None
            } else {
                HistoryStore::default_location()
                    .inspect_err(|e| tracing::warn!(error = %e, "History disabled"))
                    .ok()
            };
            commands::cmd_track(&config, &number, json, store.as_ref()).await?;
        }
        Command::Weight { value } => commands::cmd_weight(&value),
        Command::Eta {
            destination,
            booking_date,
        } => commands::cmd_eta(&destination, &booking_date),
        Command::History { action } => {
            let store = HistoryStore::default_location()?;
            commands::cmd_history(&store, action.unwrap_or(HistoryAction::List))?;
        }
        Command::Content { action } => commands::cmd_content(&config, action).await?,
        Command::Config { .. } => {}
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `--verbose`, otherwise the configured level.
fn init_tracing(verbose: bool, level: &str) {
    let fallback = if verbose { "debug" } else { level };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}
