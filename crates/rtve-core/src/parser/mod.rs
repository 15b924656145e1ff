//! HTML and JSON parsers for RTVE pages
//!
//! This module contains the extraction logic, all of it pure and free of I/O:
//! - `listing`: Parse a programme's episode listing page
//! - `detail`: Parse an episode detail page
//! - `programs`: Parse the programme catalog API response
//! - `setup`: Decode the `data-setup` blobs of listing entries

pub mod detail;
pub mod listing;
pub mod programs;
pub mod setup;

// Re-export main parsing functions
pub use detail::{extract_detail, extract_song_mentions};
pub use listing::{extract_summary, parse_listing};
pub use programs::{extract_programs, try_extract_programs, PROGRAM_BASE_URL};
pub use setup::parse_setup_blob;
