//! Service layer for the feed generator.
//!
//! This module contains the business logic for:
//! - Listing page scraping (`ListingScraper`)
//! - Audio URL resolution (`AudioResolver`)

mod audio;
mod listing;

pub use audio::{AudioOutcome, AudioResolver};
pub use listing::ListingScraper;
