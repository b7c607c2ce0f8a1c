// src/utils/date.rs

//! Portuguese date handling for the RTP Play listing.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Abbreviated Portuguese month names as they appear on the listing page.
const PT_MONTHS: [(&str, u32); 12] = [
    ("jan", 1),
    ("fev", 2),
    ("mar", 3),
    ("abr", 4),
    ("mai", 5),
    ("jun", 6),
    ("jul", 7),
    ("ago", 8),
    ("set", 9),
    ("out", 10),
    ("nov", 11),
    ("dez", 12),
];

/// Parse listing dates like "11 fev. 2026" into a UTC timestamp at noon.
///
/// Returns `None` when the string does not look like a date at all;
/// callers decide the fallback.
pub fn parse_pt_date(raw: &str) -> Option<DateTime<Utc>> {
    let cleaned = raw.trim().replace('.', "");
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].parse().ok()?;
    let month = month_number(parts[1])?;
    let year: i32 = parts[2].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day).map(noon_utc)
}

/// Noon UTC on the given day.
///
/// The listing only shows a day; noon keeps the pubDate stable across
/// timezones without claiming false precision.
pub fn noon_utc(date: NaiveDate) -> DateTime<Utc> {
    let noon = date.and_hms_opt(12, 0, 0).expect("noon is a valid time");
    Utc.from_utc_datetime(&noon)
}

fn month_number(name: &str) -> Option<u32> {
    let key = name.to_lowercase();
    PT_MONTHS
        .iter()
        .find(|(abbr, _)| key.starts_with(abbr))
        .map(|(_, n)| *n)
}
