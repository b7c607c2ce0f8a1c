//! Pipeline entry points for feed generator operations.
//!
//! - `run_generate`: Scrape episodes, merge with fallback data, render
//!   the feed, and write it to the output path
//! - `run_validate`: Check configuration values

pub mod generate;
pub mod validate;

pub use generate::run_generate;
pub use validate::run_validate;
