// src/pipeline/generate.rs

//! Feed generation pipeline.
//!
//! Orchestrates scrape, fallback/merge, audio resolution, rendering,
//! and the output write. Every run ends with a well-formed feed file:
//! a failed scrape degrades to the configured fallback episodes.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::feed;
use crate::models::{Config, Episode};
use crate::services::{AudioResolver, ListingScraper};
use crate::storage::FeedStorage;
use crate::utils::http;

/// Run the feed generator.
pub async fn run_generate(config: Arc<Config>, storage: &FeedStorage, offline: bool) -> Result<()> {
    let start = Utc::now();

    let episodes = if offline {
        log::info!(
            "Offline mode, rendering {} fallback episodes",
            config.fallback.len()
        );
        fallback_episodes(&config)
    } else {
        collect_episodes(Arc::clone(&config)).await
    };

    let xml = feed::render(&config.program, &episodes)?;
    storage.write_feed(&xml).await?;

    let elapsed = (Utc::now() - start).num_milliseconds();
    log::info!(
        "Feed with {} episodes written to {} ({} ms)",
        episodes.len(),
        storage.path().display(),
        elapsed
    );

    Ok(())
}

/// Scrape episodes, degrading to fallback data as needed.
async fn collect_episodes(config: Arc<Config>) -> Vec<Episode> {
    match scrape_episodes(Arc::clone(&config)).await {
        Ok(episodes) if !episodes.is_empty() => merge_with_fallback(&config, episodes),
        Ok(_) => {
            log::warn!("Listing page yielded no episodes, using fallback data");
            fallback_episodes(&config)
        }
        Err(error) => {
            log::warn!("Scrape failed ({}), using fallback data", error);
            fallback_episodes(&config)
        }
    }
}

/// Fetch the listing page and resolve audio URLs for what it lists.
async fn scrape_episodes(config: Arc<Config>) -> Result<Vec<Episode>> {
    let client = http::create_client(&config.fetcher)?;

    let scraper = ListingScraper::new(Arc::clone(&config), client.clone())?;
    let episodes = scraper.fetch_episodes().await?;
    log::info!("Found {} episodes on the listing page", episodes.len());

    let resolver = AudioResolver::new(config, client);
    let outcome = resolver.resolve_all(episodes).await;
    log::info!(
        "Audio URLs resolved for {}/{} episodes",
        outcome.resolved,
        outcome.episodes.len()
    );
    if outcome.failed > 0 {
        log::warn!("{} episodes will ship without an enclosure", outcome.failed);
    }

    Ok(outcome.episodes)
}

/// Merge scraped episodes with fallback entries missing from the scrape.
///
/// The listing page rotates old episodes out; keeping known entries in
/// the feed stops it from shrinking between runs. Result is sorted
/// newest first.
fn merge_with_fallback(config: &Config, mut episodes: Vec<Episode>) -> Vec<Episode> {
    let known: HashSet<String> = episodes.iter().map(|e| e.episode_id.clone()).collect();

    let mut merged = 0;
    for entry in &config.fallback {
        if !known.contains(&entry.episode_id) {
            episodes.push(entry.to_episode(&config.program));
            merged += 1;
        }
    }
    if merged > 0 {
        log::info!("Merged {} fallback episodes absent from the listing", merged);
    }

    sort_newest_first(episodes)
}

/// Expand the configured fallback list, sorted newest first.
fn fallback_episodes(config: &Config) -> Vec<Episode> {
    let episodes = config
        .fallback
        .iter()
        .map(|entry| entry.to_episode(&config.program))
        .collect();
    sort_newest_first(episodes)
}

fn sort_newest_first(mut episodes: Vec<Episode>) -> Vec<Episode> {
    episodes.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    episodes
}
