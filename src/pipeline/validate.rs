// src/pipeline/validate.rs

//! Configuration validation pipeline.

use crate::error::Result;
use crate::models::Config;

/// Validate the configuration and print a summary.
pub fn run_validate(config: &Config) -> Result<()> {
    config.validate()?;

    log::info!("Configuration OK");
    log::info!(
        "  program: {} ({} / {})",
        config.program.title,
        config.program.id,
        config.program.slug
    );
    log::info!("  listing URL: {}", config.program.listing_url());
    log::info!("  feed self URL: {}", config.program.feed_url);
    log::info!("  output: {}", config.output.feed_path.display());
    log::info!(
        "  fetcher: timeout {}s, {} concurrent, {}ms delay",
        config.fetcher.timeout_secs,
        config.fetcher.max_concurrent,
        config.fetcher.request_delay_ms
    );
    log::info!("  fallback episodes: {}", config.fallback.len());

    Ok(())
}
