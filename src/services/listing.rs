// src/services/listing.rs

//! Listing page scraper service.
//!
//! Fetches the RTP Play program page and extracts episode records from
//! the episode anchors it contains.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Config, Episode};
use crate::utils::{date, duration, http, resolve_url};

/// Service for scraping episodes from the program listing page.
pub struct ListingScraper {
    config: Arc<Config>,
    client: Client,
    link_pattern: Regex,
}

impl ListingScraper {
    /// Create a new listing scraper for the configured program.
    pub fn new(config: Arc<Config>, client: Client) -> Result<Self> {
        // Episode links follow /play/{program_id}/e{digits}/{slug}
        let link_pattern = Regex::new(&format!(
            r"/play/{}/e(\d+)/{}",
            regex::escape(&config.program.id),
            regex::escape(&config.program.slug),
        ))
        .map_err(|e| AppError::scrape("episode link pattern", e))?;

        Ok(Self {
            config,
            client,
            link_pattern,
        })
    }

    /// Fetch the listing page and extract all episodes found on it.
    pub async fn fetch_episodes(&self) -> Result<Vec<Episode>> {
        let url = self.config.program.listing_url();
        log::debug!("Fetching listing page {}", url);
        let html = http::fetch_text(&self.client, &url).await?;
        self.extract_episodes(&html)
    }

    /// Extract episode records from listing page HTML.
    ///
    /// The anchor's stripped text runs are positional: title, then the
    /// Portuguese date, then the duration. Duplicate episode ids keep
    /// the first occurrence.
    pub fn extract_episodes(&self, html: &str) -> Result<Vec<Episode>> {
        let document = Html::parse_document(html);
        let anchor_sel = Self::parse_selector("a[href]")?;
        let base_url = url::Url::parse(&self.config.program.base_url)?;

        let mut seen = HashSet::new();
        let mut episodes = Vec::new();

        for anchor in document.select(&anchor_sel) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Some(caps) = self.link_pattern.captures(href) else {
                continue;
            };
            let episode_id = caps[1].to_string();
            if !seen.insert(episode_id.clone()) {
                continue;
            }

            let parts: Vec<&str> = anchor
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect();

            let Some(title) = parts.first().map(|t| t.to_string()) else {
                continue;
            };

            let published_at = parts
                .get(1)
                .and_then(|raw| date::parse_pt_date(raw))
                .unwrap_or_else(Utc::now);
            let duration_secs = parts
                .get(2)
                .map(|raw| duration::parse_listing_duration(raw))
                .unwrap_or(0);

            episodes.push(Episode {
                episode_id,
                title,
                page_url: resolve_url(&base_url, href),
                published_at,
                duration_secs,
                audio_url: None,
            });
        }

        Ok(episodes)
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_HTML: &str = r#"
        <html><body>
          <a href="/play/p8339/e908229/panfletos">
            <span class="episode-title">Cara de Espelho e "A Seita"</span>
            <span class="episode-date">11 fev. 2026</span>
            <span class="episode-duration">7min</span>
          </a>
          <a href="/play/p8339/e907740/panfletos">
            <b>Semana de 02 a 06 de Fevereiro de 2026</b>
            <i>7 fev. 2026</i>
            <i>27min</i>
          </a>
          <a href="/play/p8339/e908229/panfletos">Duplicate link</a>
          <a href="/play/p9999/e111111/outro-programa">Other program</a>
          <a href="/play/p8339/panfletos">Listing self link</a>
        </body></html>
    "#;

    fn scraper() -> ListingScraper {
        ListingScraper::new(Arc::new(Config::default()), Client::new()).unwrap()
    }

    #[test]
    fn extracts_episodes_with_positional_fields() {
        let episodes = scraper().extract_episodes(LISTING_HTML).unwrap();
        assert_eq!(episodes.len(), 2);

        let first = &episodes[0];
        assert_eq!(first.episode_id, "908229");
        assert_eq!(first.title, "Cara de Espelho e \"A Seita\"");
        assert_eq!(
            first.page_url,
            "https://www.rtp.pt/play/p8339/e908229/panfletos"
        );
        assert_eq!(first.published_at.to_rfc2822(), "Wed, 11 Feb 2026 12:00:00 +0000");
        assert_eq!(first.duration_secs, 420);

        let second = &episodes[1];
        assert_eq!(second.episode_id, "907740");
        assert_eq!(second.duration_secs, 1620);
    }

    #[test]
    fn dedupes_by_episode_id_first_wins() {
        let episodes = scraper().extract_episodes(LISTING_HTML).unwrap();
        let with_id: Vec<_> = episodes
            .iter()
            .filter(|e| e.episode_id == "908229")
            .collect();
        assert_eq!(with_id.len(), 1);
        assert_ne!(with_id[0].title, "Duplicate link");
    }

    #[test]
    fn missing_date_falls_back_to_now() {
        let html = r#"<a href="/play/p8339/e900001/panfletos">Só título</a>"#;
        let episodes = scraper().extract_episodes(html).unwrap();
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].duration_secs, 0);
        // Published "now": within the last minute.
        let age = Utc::now() - episodes[0].published_at;
        assert!(age.num_seconds() < 60);
    }

    #[test]
    fn empty_page_yields_no_episodes() {
        let episodes = scraper().extract_episodes("<html></html>").unwrap();
        assert!(episodes.is_empty());
    }
}
