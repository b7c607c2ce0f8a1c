//! Panfletos feed generator CLI.
//!
//! The official RSS feed for the "Panfletos" program (Antena 1 / RTP)
//! stopped updating; this tool scrapes RTP Play and regenerates an
//! up-to-date podcast feed. Run it periodically and publish the output
//! file from a static host.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use panfletos_rss::{error::Result, models::Config, pipeline, storage::FeedStorage};

/// panfletos-rss - Podcast feed generator for Panfletos (Antena 1 / RTP)
#[derive(Parser, Debug)]
#[command(
    name = "panfletos-rss",
    version,
    about = "Generates a podcast RSS feed for Panfletos by scraping RTP Play"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the feed and write it to the output path
    Generate {
        /// Override the configured output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render from fallback data without touching the network
        #[arg(long)]
        offline: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Show information about the published feed
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Generate { output, offline } => {
            if let Some(path) = output {
                config.output.feed_path = path;
            }
            config.validate()?;

            let storage = FeedStorage::new(&config.output.feed_path);
            pipeline::run_generate(Arc::new(config), &storage, offline).await?;
        }

        Command::Validate => {
            pipeline::run_validate(&config)?;
        }

        Command::Info => {
            let storage = FeedStorage::new(&config.output.feed_path);
            match storage.read_current().await? {
                Some(channel) => {
                    log::info!("Feed: {}", storage.path().display());
                    log::info!("  items: {}", channel.items().len());
                    if let Some(date) = channel.last_build_date() {
                        log::info!("  last build: {}", date);
                    }
                    if let Some(newest) = channel.items().first().and_then(|i| i.title()) {
                        log::info!("  newest: {}", newest);
                    }
                }
                None => {
                    log::info!("No feed found at {}", storage.path().display());
                }
            }
        }
    }

    Ok(())
}
