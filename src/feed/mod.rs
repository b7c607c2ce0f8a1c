// src/feed/mod.rs

//! RSS 2.0 feed rendering with iTunes podcast extensions.
//!
//! Builds the channel from episode records and program metadata,
//! validates it, and serializes it to XML for the output file.

use chrono::Utc;
use rss::extension::atom::{AtomExtension, Link};
use rss::extension::itunes::{
    ITunesCategoryBuilder, ITunesChannelExtensionBuilder, ITunesItemExtensionBuilder,
    ITunesOwnerBuilder,
};
use rss::validation::Validate;
use rss::{Channel, ChannelBuilder, EnclosureBuilder, GuidBuilder, ImageBuilder, Item, ItemBuilder};

use crate::error::Result;
use crate::models::{Episode, ProgramConfig};
use crate::utils::duration;

const GENERATOR: &str = concat!("panfletos-rss ", env!("CARGO_PKG_VERSION"));

/// Render the podcast feed as an XML document string.
///
/// The channel is validated before serialization; a feed that would be
/// rejected by readers never reaches the output file.
pub fn render(program: &ProgramConfig, episodes: &[Episode]) -> Result<String> {
    let channel = build_channel(program, episodes);
    channel.validate()?;

    let buf = channel.pretty_write_to(Vec::new(), b' ', 2)?;
    let body = String::from_utf8(buf)?;
    Ok(format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n",
        body
    ))
}

/// Build the RSS channel with podcast metadata from episode records.
pub fn build_channel(program: &ProgramConfig, episodes: &[Episode]) -> Channel {
    let items: Vec<Item> = episodes
        .iter()
        .map(|episode| episode_to_item(program, episode))
        .collect();

    let itunes = ITunesChannelExtensionBuilder::default()
        .author(Some(program.author.clone()))
        .summary(Some(program.description.clone()))
        .r#type(Some("episodic".to_string()))
        .explicit(Some("false".to_string()))
        .owner(Some(
            ITunesOwnerBuilder::default()
                .name(Some(program.author.clone()))
                .build(),
        ))
        .categories(vec![
            ITunesCategoryBuilder::default()
                .text(program.category.clone())
                .build(),
        ])
        .image(Some(program.image_url.clone()))
        .build();

    let self_link = Link {
        rel: "self".to_string(),
        href: program.feed_url.clone(),
        mime_type: Some("application/rss+xml".to_string()),
        ..Link::default()
    };

    let image = ImageBuilder::default()
        .url(program.image_url.clone())
        .title(program.title.clone())
        .link(program.listing_url())
        .build();

    ChannelBuilder::default()
        .title(program.title.clone())
        .link(program.listing_url())
        .description(program.description.clone())
        .language(Some(program.language.clone()))
        .copyright(Some(program.copyright.clone()))
        .last_build_date(Some(Utc::now().to_rfc2822()))
        .generator(Some(GENERATOR.to_string()))
        .atom_ext(Some(AtomExtension {
            links: vec![self_link],
        }))
        .itunes_ext(Some(itunes))
        .image(Some(image))
        .items(items)
        .build()
}

fn episode_to_item(program: &ProgramConfig, episode: &Episode) -> Item {
    let description = format!(
        "{} - {} com {} na {}.",
        episode.title, program.title, program.author, program.channel
    );
    let summary = format!(
        "{} - {}: música-política, canções-poder, criatividade-resistência.",
        episode.title, program.title
    );

    let itunes = ITunesItemExtensionBuilder::default()
        .author(Some(program.author.clone()))
        .summary(Some(summary))
        .duration(
            (episode.duration_secs > 0).then(|| duration::format_itunes(episode.duration_secs)),
        )
        .build();

    let enclosure = episode.audio_url.as_ref().map(|audio_url| {
        EnclosureBuilder::default()
            .url(audio_url.clone())
            .length("0".to_string())
            .mime_type("audio/mpeg".to_string())
            .build()
    });

    ItemBuilder::default()
        .title(Some(episode.title.clone()))
        .link(Some(episode.page_url.clone()))
        .guid(Some(
            GuidBuilder::default()
                .permalink(false)
                .value(episode.guid(&program.slug))
                .build(),
        ))
        .pub_date(Some(episode.published_at.to_rfc2822()))
        .description(Some(description))
        .enclosure(enclosure)
        .itunes_ext(Some(itunes))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_episodes() -> Vec<Episode> {
        vec![
            Episode {
                episode_id: "908229".to_string(),
                title: "Cara de Espelho e \"A Seita\"".to_string(),
                page_url: "https://www.rtp.pt/play/p8339/e908229/panfletos".to_string(),
                published_at: Utc.with_ymd_and_hms(2026, 2, 11, 12, 0, 0).unwrap(),
                duration_secs: 420,
                audio_url: Some("https://streaming.rtp.pt/panfletos/e908229.mp3".to_string()),
            },
            Episode {
                episode_id: "907966".to_string(),
                title: "Bad Bunny e \"DtMF\"".to_string(),
                page_url: "https://www.rtp.pt/play/p8339/e907966/panfletos".to_string(),
                published_at: Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap(),
                duration_secs: 0,
                audio_url: None,
            },
        ]
    }

    #[test]
    fn channel_carries_podcast_metadata() {
        let program = ProgramConfig::default();
        let channel = build_channel(&program, &sample_episodes());

        assert_eq!(channel.title(), "Panfletos");
        assert_eq!(channel.link(), "https://www.rtp.pt/play/p8339/panfletos");
        assert_eq!(channel.language(), Some("pt"));
        assert_eq!(channel.items().len(), 2);

        let itunes = channel.itunes_ext().unwrap();
        assert_eq!(itunes.author(), Some("Pedro Tadeu"));
        assert_eq!(itunes.explicit(), Some("false"));
        assert_eq!(itunes.categories()[0].text(), "Music");

        let atom = channel.atom_ext().unwrap();
        assert_eq!(atom.links[0].rel, "self");
        assert_eq!(atom.links[0].href, program.feed_url);
    }

    #[test]
    fn item_fields_follow_episode() {
        let program = ProgramConfig::default();
        let channel = build_channel(&program, &sample_episodes());

        let first = &channel.items()[0];
        assert_eq!(first.title(), Some("Cara de Espelho e \"A Seita\""));
        assert_eq!(
            first.guid().map(|g| g.value()),
            Some("rtp-panfletos-e908229")
        );
        assert!(!first.guid().unwrap().is_permalink());
        assert_eq!(
            first.pub_date(),
            Some("Wed, 11 Feb 2026 12:00:00 +0000")
        );
        assert_eq!(
            first.enclosure().map(|e| e.url()),
            Some("https://streaming.rtp.pt/panfletos/e908229.mp3")
        );
        assert_eq!(
            first.itunes_ext().and_then(|i| i.duration()),
            Some("07:00")
        );

        // No resolved audio and unknown duration: no enclosure, no tag.
        let second = &channel.items()[1];
        assert!(second.enclosure().is_none());
        assert!(second.itunes_ext().and_then(|i| i.duration()).is_none());
    }

    #[test]
    fn render_produces_valid_xml_document() {
        let program = ProgramConfig::default();
        let xml = render(&program, &sample_episodes()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<rss"));
        assert!(xml.contains("itunes"));
        assert!(xml.contains("rtp-panfletos-e908229"));

        // Escaping is the serializer's job; raw quotes must survive round-trip.
        let channel = Channel::read_from(xml.as_bytes()).unwrap();
        assert_eq!(
            channel.items()[0].title(),
            Some("Cara de Espelho e \"A Seita\"")
        );
    }

    #[test]
    fn render_validates_empty_feed_too() {
        // A fallback-only run with zero episodes must still be well formed.
        let program = ProgramConfig::default();
        let xml = render(&program, &[]).unwrap();
        let channel = Channel::read_from(xml.as_bytes()).unwrap();
        assert!(channel.items().is_empty());
    }
}
