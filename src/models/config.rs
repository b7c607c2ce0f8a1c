//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Episode;
use crate::utils::date;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Program identity and feed metadata
    #[serde(default)]
    pub program: ProgramConfig,

    /// HTTP fetching behavior settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Known episodes used when scraping fails or the listing shrinks
    #[serde(default = "defaults::fallback_episodes")]
    pub fallback: Vec<FallbackEpisode>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.program.id.trim().is_empty() {
            return Err(AppError::validation("program.id is empty"));
        }
        if self.program.slug.trim().is_empty() {
            return Err(AppError::validation("program.slug is empty"));
        }
        if self.program.title.trim().is_empty() {
            return Err(AppError::validation("program.title is empty"));
        }
        url::Url::parse(&self.program.base_url)
            .map_err(|e| AppError::validation(format!("program.base_url is invalid: {e}")))?;
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.max_concurrent == 0 {
            return Err(AppError::validation("fetcher.max_concurrent must be > 0"));
        }
        if self.output.feed_path.as_os_str().is_empty() {
            return Err(AppError::validation("output.feed_path is empty"));
        }
        if self.fallback.is_empty() {
            return Err(AppError::validation("No fallback episodes defined"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            program: ProgramConfig::default(),
            fetcher: FetcherConfig::default(),
            output: OutputConfig::default(),
            fallback: defaults::fallback_episodes(),
        }
    }
}

/// Program identity and feed channel metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// RTP Play program identifier (e.g. "p8339")
    #[serde(default = "defaults::program_id")]
    pub id: String,

    /// URL slug of the program (e.g. "panfletos")
    #[serde(default = "defaults::program_slug")]
    pub slug: String,

    /// Program display title
    #[serde(default = "defaults::program_title")]
    pub title: String,

    /// Program author/presenter
    #[serde(default = "defaults::program_author")]
    pub author: String,

    /// Channel description
    #[serde(default = "defaults::program_description")]
    pub description: String,

    /// Cover image URL
    #[serde(default = "defaults::program_image")]
    pub image_url: String,

    /// iTunes category
    #[serde(default = "defaults::program_category")]
    pub category: String,

    /// Feed language code
    #[serde(default = "defaults::program_language")]
    pub language: String,

    /// Radio channel broadcasting the program
    #[serde(default = "defaults::program_channel")]
    pub channel: String,

    /// Copyright line
    #[serde(default = "defaults::program_copyright")]
    pub copyright: String,

    /// Base URL of the site hosting the listing
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Public URL the generated feed is served from (atom:link rel=self)
    #[serde(default = "defaults::feed_url")]
    pub feed_url: String,
}

impl ProgramConfig {
    /// URL of the program listing page.
    pub fn listing_url(&self) -> String {
        format!("{}/play/{}/{}", self.base_url, self.id, self.slug)
    }

    /// URL of a single episode page.
    pub fn episode_url(&self, episode_id: &str) -> String {
        format!(
            "{}/play/{}/e{}/{}",
            self.base_url, self.id, episode_id, self.slug
        )
    }
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            id: defaults::program_id(),
            slug: defaults::program_slug(),
            title: defaults::program_title(),
            author: defaults::program_author(),
            description: defaults::program_description(),
            image_url: defaults::program_image(),
            category: defaults::program_category(),
            language: defaults::program_language(),
            channel: defaults::program_channel(),
            copyright: defaults::program_copyright(),
            base_url: defaults::base_url(),
            feed_url: defaults::feed_url(),
        }
    }
}

/// HTTP client and fetching behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between episode page requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent episode page requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path the rendered feed is written to
    #[serde(default = "defaults::feed_path")]
    pub feed_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            feed_path: defaults::feed_path(),
        }
    }
}

/// A known episode used when the listing page cannot be scraped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackEpisode {
    /// Numeric episode identifier from the RTP Play URL
    pub episode_id: String,

    /// Episode title
    pub title: String,

    /// Broadcast date (quoted ISO date in TOML, e.g. "2026-02-11")
    pub date: NaiveDate,

    /// Duration in seconds
    #[serde(default)]
    pub duration_secs: u32,
}

impl FallbackEpisode {
    /// Expand into a full episode record using program metadata.
    pub fn to_episode(&self, program: &ProgramConfig) -> Episode {
        Episode {
            episode_id: self.episode_id.clone(),
            title: self.title.clone(),
            page_url: program.episode_url(&self.episode_id),
            published_at: date::noon_utc(self.date),
            duration_secs: self.duration_secs,
            audio_url: None,
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use super::FallbackEpisode;

    // Program defaults
    pub fn program_id() -> String {
        "p8339".into()
    }
    pub fn program_slug() -> String {
        "panfletos".into()
    }
    pub fn program_title() -> String {
        "Panfletos".into()
    }
    pub fn program_author() -> String {
        "Pedro Tadeu".into()
    }
    pub fn program_description() -> String {
        "As palavras-chave deste projeto são estas: música-política, canções-poder, \
         criatividade-resistência, cultura-opressão, talento-censura, poesia-liberdade, \
         arte-causas. Panfletos foi um programa de Ruben de Carvalho na antiga Telefonia \
         de Lisboa. Recriado agora por Pedro Tadeu, na Antena 1, trata da relação íntima, \
         ao longo dos tempos, da arte musical com a vida e a luta dos povos. \
         Diariamente: uma canção na História."
            .into()
    }
    pub fn program_image() -> String {
        "https://cdn-images.rtp.pt/EPG/radio/imagens/7290_10886_10223.jpg".into()
    }
    pub fn program_category() -> String {
        "Music".into()
    }
    pub fn program_language() -> String {
        "pt".into()
    }
    pub fn program_channel() -> String {
        "Antena1".into()
    }
    pub fn program_copyright() -> String {
        "© RTP - Rádio e Televisão de Portugal".into()
    }
    pub fn base_url() -> String {
        "https://www.rtp.pt".into()
    }
    pub fn feed_url() -> String {
        "https://javiercubre.github.io/panfletos-rss/panfletos.xml".into()
    }

    // Fetcher defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Output defaults
    pub fn feed_path() -> PathBuf {
        PathBuf::from("public/panfletos.xml")
    }

    fn fallback(id: &str, title: &str, ymd: (i32, u32, u32), duration_secs: u32) -> FallbackEpisode {
        FallbackEpisode {
            episode_id: id.to_string(),
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).expect("valid fallback date"),
            duration_secs,
        }
    }

    // Recent episodes known at release time, used when the listing page
    // cannot be scraped.
    pub fn fallback_episodes() -> Vec<FallbackEpisode> {
        vec![
            fallback("908229", "Cara de Espelho e \"A Seita\"", (2026, 2, 11), 420),
            fallback("907966", "Bad Bunny e \"DtMF\"", (2026, 2, 10), 420),
            fallback("907751", "Moonspell e \"Desastre\"", (2026, 2, 9), 420),
            fallback(
                "907740",
                "Semana de 02 a 06 de Fevereiro de 2026",
                (2026, 2, 7),
                1620,
            ),
            fallback("907254", "Carlos Paredes e \"Verdes Anos\"", (2026, 2, 6), 420),
            fallback(
                "907010",
                "Verdi e o coro dos escravos hebreus",
                (2026, 2, 5),
                420,
            ),
            fallback("906746", "Billy Bragg e \"City of Heroes\"", (2026, 2, 4), 420),
            fallback("906461", "Nicki Minaj e \"Black Barbies\"", (2026, 2, 3), 420),
            fallback(
                "906203",
                "Bruce Springsteen e \"Streets of Minneapolis\"",
                (2026, 2, 2),
                420,
            ),
            fallback(
                "905765",
                "Semana de 26 a 30 de Janeiro de 2026",
                (2026, 1, 31),
                1920,
            ),
            fallback("905712", "Dino d'Santiago e \"Utopia\"", (2026, 1, 30), 420),
            fallback(
                "905426",
                "Pedro Abrunhosa e \"Oxalá o meu vestido ainda se lembre de mim\"",
                (2026, 1, 29),
                420,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.fetcher.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.fetcher.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_fallback() {
        let mut config = Config::default();
        config.fallback.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.program.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn listing_and_episode_urls() {
        let program = ProgramConfig::default();
        assert_eq!(program.listing_url(), "https://www.rtp.pt/play/p8339/panfletos");
        assert_eq!(
            program.episode_url("908229"),
            "https://www.rtp.pt/play/p8339/e908229/panfletos"
        );
    }

    #[test]
    fn fallback_expands_to_episode() {
        let config = Config::default();
        let episode = config.fallback[0].to_episode(&config.program);
        assert_eq!(episode.episode_id, "908229");
        assert_eq!(
            episode.page_url,
            "https://www.rtp.pt/play/p8339/e908229/panfletos"
        );
        assert_eq!(episode.published_at.to_rfc2822(), "Wed, 11 Feb 2026 12:00:00 +0000");
        assert!(episode.audio_url.is_none());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [fetcher]
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.fetcher.timeout_secs, 5);
        assert_eq!(config.program.id, "p8339");
        assert!(!config.fallback.is_empty());
    }
}
