// src/utils/duration.rs

//! Episode duration parsing and iTunes formatting.

use std::sync::LazyLock;

use regex::Regex;

static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*min").expect("valid duration pattern"));

/// Parse a listing duration like "7min" into seconds.
///
/// Unrecognized strings yield zero; the item is then rendered without
/// an itunes:duration tag.
pub fn parse_listing_duration(raw: &str) -> u32 {
    MINUTES
        .captures(&raw.trim().to_lowercase())
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .map(|mins| mins * 60)
        .unwrap_or(0)
}

/// Format seconds as an iTunes duration, `HH:MM:SS` or `MM:SS`.
pub fn format_itunes(seconds: u32) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing_duration() {
        assert_eq!(parse_listing_duration("7min"), 420);
        assert_eq!(parse_listing_duration(" 27 MIN "), 1620);
        assert_eq!(parse_listing_duration("soon"), 0);
        assert_eq!(parse_listing_duration(""), 0);
    }

    #[test]
    fn test_format_itunes() {
        assert_eq!(format_itunes(420), "07:00");
        assert_eq!(format_itunes(1620), "27:00");
        assert_eq!(format_itunes(3725), "01:02:05");
        assert_eq!(format_itunes(0), "00:00");
    }
}
