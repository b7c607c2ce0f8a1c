// src/lib.rs

//! Panfletos Feed Generator Library

pub mod error;
pub mod feed;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
