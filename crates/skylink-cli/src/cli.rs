//! Command-line definitions.

use clap::{Parser, Subcommand};

/// SkyLink shipment tracking service and tools
#[derive(Parser, Debug)]
#[command(name = "skylink", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API (tracking proxy and health)
    Serve {
        /// Override `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Override `server.port`
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Look up a shipment by tracking number
    Track {
        /// Tracking (AWB) number; punctuation and spaces are ignored
        number: String,
        /// Print the raw carrier envelope as JSON
        #[arg(long)]
        json: bool,
        /// Do not record the lookup in history
        #[arg(long)]
        no_history: bool,
    },

    /// Parse a weight string and show the inferred unit
    Weight {
        /// Weight as printed by the carrier, e.g. "1.5kg" or "11.000"
        value: String,
    },

    /// Estimate delivery for a destination and booking date
    Eta {
        /// Destination country, e.g. "UK"
        destination: String,
        /// Booking date in carrier format, e.g. "14-JUN-2025"
        booking_date: String,
    },

    /// Recent lookups
    History {
        /// History action (defaults to `list`)
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Browse CMS content
    Content {
        /// Content action
        #[command(subcommand)]
        action: ContentAction,
    },

    /// Configuration management
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `history` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    /// List recent lookups, newest first
    List,
    /// Forget one tracking number
    Remove {
        /// Tracking number to remove
        number: String,
    },
    /// Forget everything
    Clear,
}

/// `content` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ContentAction {
    /// List blog posts, newest first
    Posts {
        /// 1-based page
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Posts per page
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
    /// Show one blog post
    Post {
        /// Post slug
        slug: String,
        /// Render the body as HTML instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// List open positions
    Jobs,
    /// List frequently asked questions
    Faqs,
    /// List shipping rates
    Rates,
    /// Show a legal page
    Legal {
        /// Page slug, e.g. "privacy-policy"
        slug: String,
        /// Render the body as HTML instead of plain text
        #[arg(long)]
        html: bool,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print one value by dotted key, e.g. `server.port`
    Get {
        /// Dotted key
        key: String,
    },
    /// Set one value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value (bool, integer, float, or string)
        value: String,
    },
    /// Write a default config file
    Init {
        /// Target file (defaults to the platform config directory)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the effective configuration as TOML
    Show,
    /// Print the effective configuration as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for `docker run`
        #[arg(long)]
        docker_env: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_track() {
        let cli = Cli::try_parse_from(["skylink", "track", "SKY 123", "--json"]);
        let Ok(cli) = cli else {
            unreachable!("track should parse");
        };
        match cli.command {
            Command::Track {
                number,
                json,
                no_history,
            } => {
                assert_eq!(number, "SKY 123");
                assert!(json);
                assert!(!no_history);
            }
            other => unreachable!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["skylink", "config", "show", "--config", "/tmp/s.toml"]);
        assert!(matches!(
            cli.map(|c| c.config),
            Ok(Some(path)) if path == "/tmp/s.toml"
        ));
    }

    #[test]
    fn test_history_defaults_to_none() {
        let cli = Cli::try_parse_from(["skylink", "history"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Command::History { action: None })
        ));
    }

    #[test]
    fn test_posts_defaults() {
        let cli = Cli::try_parse_from(["skylink", "content", "posts"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Command::Content {
                action: ContentAction::Posts { page: 1, page_size: 10 }
            })
        ));
    }
}
