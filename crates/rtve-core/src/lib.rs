//! RTVE Scraper Core Library
//!
//! This crate provides the core scraping functionality for rtve.es radio
//! programmes.
//!
//! # Features
//! - Extract episode summaries from a programme's listing page
//! - Extract descriptions, structured metadata and song mentions from
//!   episode detail pages
//! - Extract the radio programme catalog from the RTVE API
//! - Rate-limited HTTP client configured per instance
//! - CSV output with a fixed column order

pub mod client;
pub mod error;
pub mod parser;
pub mod scraper;
pub mod sink;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, RateLimiter, RtveClient};
pub use error::{Result, RtveError};
pub use scraper::{RtveScraper, DISCOPOLIS_LISTING_URL, RNE_PROGRAMS_API_URL};
pub use sink::{CsvRow, CsvSink, Sink};
pub use types::{EpisodeDetail, EpisodeRecord, EpisodeSummary, ProgramRecord};
