//! Data types for the RTVE scraper
//!
//! An episode is assembled in two passes: an [`EpisodeSummary`] read from the
//! programme's listing page and an [`EpisodeDetail`] read from the episode's
//! own page. [`EpisodeRecord::merge`] combines them into the emitted record.

use serde::{Deserialize, Serialize};

/// Fields read from a single listing entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode title, trimmed
    pub title: String,
    /// Air date exactly as displayed on the listing (e.g. "12 mar 2024")
    pub air_date: String,
    /// Duration exactly as displayed on the listing (e.g. "58:12")
    pub duration: String,
    /// Link to the episode detail page
    pub detail_url: Option<String>,
    /// Opaque media identifier from the entry's `data-setup` blob
    pub asset_id: Option<String>,
}

/// Fields read from an episode detail page
///
/// Every field is independently optional; a page that yields nothing is a
/// valid, empty fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeDetail {
    pub description: Option<String>,
    /// `datePublished` of the AudioObject block
    pub publish_date: Option<String>,
    /// ISO 8601 duration of the AudioObject block (e.g. "PT58M12S")
    pub iso_duration: Option<String>,
    pub embed_url: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Lines of the AudioObject description that look like "artist: track".
    /// `None` when no line qualifies, never an empty vector.
    pub song_mentions: Option<Vec<String>>,
    /// Raw content of the keywords meta tag
    pub keywords: Option<String>,
    pub director: Option<String>,
}

/// A fully assembled broadcast episode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub title: String,
    pub air_date: String,
    pub duration: String,
    pub detail_url: Option<String>,
    pub asset_id: Option<String>,
    pub description: Option<String>,
    pub publish_date: Option<String>,
    pub iso_duration: Option<String>,
    pub embed_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub song_mentions: Option<Vec<String>>,
    pub keywords: Option<String>,
    pub director: Option<String>,
}

impl EpisodeRecord {
    /// Combine a listing summary with a detail fragment.
    ///
    /// The two halves have no fields in common, so the result does not
    /// depend on which half was extracted first.
    pub fn merge(summary: EpisodeSummary, detail: EpisodeDetail) -> Self {
        Self {
            title: summary.title,
            air_date: summary.air_date,
            duration: summary.duration,
            detail_url: summary.detail_url,
            asset_id: summary.asset_id,
            description: detail.description,
            publish_date: detail.publish_date,
            iso_duration: detail.iso_duration,
            embed_url: detail.embed_url,
            thumbnail_url: detail.thumbnail_url,
            song_mentions: detail.song_mentions,
            keywords: detail.keywords,
            director: detail.director,
        }
    }

    /// Whether any detail-page field was filled in
    pub fn has_detail(&self) -> bool {
        self.description.is_some()
            || self.publish_date.is_some()
            || self.iso_duration.is_some()
            || self.embed_url.is_some()
            || self.thumbnail_url.is_some()
            || self.song_mentions.is_some()
            || self.keywords.is_some()
            || self.director.is_some()
    }
}

/// A summary-only record, used when no detail page could be read
impl From<EpisodeSummary> for EpisodeRecord {
    fn from(summary: EpisodeSummary) -> Self {
        Self::merge(summary, EpisodeDetail::default())
    }
}

/// A radio programme from the RTVE catalog API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRecord {
    /// Programme name, empty if the API omitted it
    pub title: String,
    /// Programme description, empty if the API omitted it
    pub description: String,
    /// Public programme page URL
    pub url: String,
    /// Cover image URL, `None` when the item carried no image
    pub image_url: Option<String>,
}
