//! Episode data structure.

use chrono::{DateTime, Utc};

/// A program episode scraped from the listing page.
///
/// Episodes are built once per run and discarded after the feed is
/// rendered; the only persistent artifact is the output XML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// Numeric episode identifier from the RTP Play URL
    pub episode_id: String,

    /// Episode title
    pub title: String,

    /// Full URL of the episode page
    pub page_url: String,

    /// Publication timestamp (noon UTC on the listed day)
    pub published_at: DateTime<Utc>,

    /// Duration in seconds (zero when unknown)
    pub duration_secs: u32,

    /// Direct audio stream URL, when one could be resolved
    pub audio_url: Option<String>,
}

impl Episode {
    /// Stable feed GUID for this episode.
    ///
    /// Derived from the RTP episode id so it never changes across runs.
    pub fn guid(&self, slug: &str) -> String {
        format!("rtp-{}-e{}", slug, self.episode_id)
    }
}
