// src/services/audio.rs

//! Audio URL resolution service.
//!
//! The listing page links to episode pages, not to media files. Each
//! episode page embeds a player configuration carrying the direct
//! stream URL; this service fetches those pages with bounded
//! concurrency and pattern-matches the URL out. A failed resolution
//! leaves the episode without an enclosure and never fails the run.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use regex::Regex;
use reqwest::Client;

use crate::error::Result;
use crate::models::{Config, Episode};
use crate::utils::http;

/// Patterns for media URLs inside the player configuration, most
/// specific first. The JSON-ish player blob escapes slashes, so the
/// match runs on unescaped text.
static MEDIA_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#""(?:file|fileUrl|url)"\s*:\s*"(https?://[^"]+?\.(?:mp3|m4a)[^"]*)""#,
        r#""(?:file|hls|playlist)"\s*:\s*"(https?://[^"]+?\.m3u8[^"]*)""#,
        r#"(https?://[^\s"'<>\\]+?\.mp3)"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid media pattern"))
    .collect()
});

/// Summary of an audio resolution run.
#[derive(Debug, Default)]
pub struct AudioOutcome {
    pub episodes: Vec<Episode>,
    pub resolved: usize,
    pub failed: usize,
}

/// Service for resolving direct audio URLs from episode pages.
pub struct AudioResolver {
    config: Arc<Config>,
    client: Client,
}

impl AudioResolver {
    /// Create a new audio resolver with the given configuration.
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    /// Resolve audio URLs for all episodes, bounded by the configured
    /// concurrency, preserving episode order.
    pub async fn resolve_all(&self, episodes: Vec<Episode>) -> AudioOutcome {
        let delay = Duration::from_millis(self.config.fetcher.request_delay_ms);
        let concurrency = self.config.fetcher.max_concurrent.max(1);

        let mut outcome = AudioOutcome::default();

        let mut page_stream = stream::iter(episodes)
            .map(|episode| async move {
                let result = self.resolve_one(&episode.page_url).await;
                (episode, result)
            })
            .buffered(concurrency);

        while let Some((mut episode, result)) = page_stream.next().await {
            match result {
                Ok(Some(audio_url)) => {
                    log::debug!("Audio URL for {}: {}", episode.title, audio_url);
                    episode.audio_url = Some(audio_url);
                    outcome.resolved += 1;
                }
                Ok(None) => {
                    log::warn!(
                        "No audio URL found on {} ({})",
                        episode.title,
                        episode.page_url
                    );
                    outcome.failed += 1;
                }
                Err(error) => {
                    log::warn!(
                        "Failed to fetch episode page {} ({}): {}",
                        episode.title,
                        episode.page_url,
                        error
                    );
                    outcome.failed += 1;
                }
            }
            outcome.episodes.push(episode);

            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        outcome
    }

    /// Fetch one episode page and extract its media URL.
    async fn resolve_one(&self, page_url: &str) -> Result<Option<String>> {
        let html = http::fetch_text(&self.client, page_url).await?;
        Ok(extract_audio_url(&html))
    }
}

/// Pattern-match a direct media URL out of episode page HTML.
pub fn extract_audio_url(html: &str) -> Option<String> {
    let unescaped = html.replace("\\/", "/");
    MEDIA_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(&unescaped))
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_mp3_from_player_config() {
        let html = r#"
            <script>
            var player = new RTPPlayer({
                "file": "https://streaming-ondemand.rtp.pt/nas2.share/panfletos/e908229.mp3",
                "autoplay": false
            });
            </script>
        "#;
        assert_eq!(
            extract_audio_url(html).as_deref(),
            Some("https://streaming-ondemand.rtp.pt/nas2.share/panfletos/e908229.mp3")
        );
    }

    #[test]
    fn extracts_url_with_escaped_slashes() {
        let html = r#""file":"https:\/\/streaming-ondemand.rtp.pt\/panfletos\/e907966.mp3?t=1""#;
        assert_eq!(
            extract_audio_url(html).as_deref(),
            Some("https://streaming-ondemand.rtp.pt/panfletos/e907966.mp3?t=1")
        );
    }

    #[test]
    fn prefers_direct_file_over_hls() {
        let html = r#"
            "hls": "https://example.com/stream/master.m3u8",
            "file": "https://example.com/audio/episode.mp3"
        "#;
        assert_eq!(
            extract_audio_url(html).as_deref(),
            Some("https://example.com/audio/episode.mp3")
        );
    }

    #[test]
    fn falls_back_to_hls_playlist() {
        let html = r#""hls": "https://example.com/stream/master.m3u8""#;
        assert_eq!(
            extract_audio_url(html).as_deref(),
            Some("https://example.com/stream/master.m3u8")
        );
    }

    #[test]
    fn no_media_url_yields_none() {
        assert!(extract_audio_url("<html><body>nothing here</body></html>").is_none());
    }
}
