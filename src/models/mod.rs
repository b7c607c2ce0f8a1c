// src/models/mod.rs

//! Domain models for the feed generator.

mod config;
mod episode;

pub use config::{Config, FallbackEpisode, FetcherConfig, OutputConfig, ProgramConfig};
pub use episode::Episode;
