//! Main RTVE scraper API
//!
//! Combines the HTTP client with the parsers: fetch a listing, follow each
//! entry to its detail page, and merge both halves into episode records.
//! Requests run one at a time through the client's rate limiter.

use reqwest::Url;

use crate::client::RtveClient;
use crate::error::{RtveError, Result};
use crate::parser::{extract_detail, extract_programs, parse_listing};
use crate::types::{EpisodeRecord, EpisodeSummary, ProgramRecord};

/// Episode listing of the Discópolis programme
pub const DISCOPOLIS_LISTING_URL: &str =
    "https://www.rtve.es/play/audios/moduloRadio/1936/emisiones";

/// Catalog of every Radio Nacional programme
pub const RNE_PROGRAMS_API_URL: &str = "https://api.rtve.es/api/programas/radio/rne/todos";

/// Main scraper API for rtve.es
///
/// # Example
/// ```no_run
/// use rtve_core::{RtveScraper, DISCOPOLIS_LISTING_URL};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = RtveScraper::new()?;
///
///     let episodes = scraper.crawl_episodes(DISCOPOLIS_LISTING_URL).await?;
///     println!("Found {} episodes", episodes.len());
///
///     Ok(())
/// }
/// ```
pub struct RtveScraper {
    client: RtveClient,
}

impl RtveScraper {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        let client = RtveClient::new()?;
        Ok(Self { client })
    }

    /// Create a new scraper with a custom client.
    ///
    /// # Arguments
    /// * `client` - Pre-configured RtveClient instance
    pub fn with_client(client: RtveClient) -> Self {
        Self { client }
    }

    /// Crawl a programme's episode listing and every episode page it links to.
    ///
    /// # Arguments
    /// * `listing_url` - Absolute URL of the episode listing page
    ///
    /// # Returns
    /// * `Ok(Vec<EpisodeRecord>)` in listing order. Entries whose detail page
    ///   is missing or fails to load are returned summary-only.
    /// * `Err(RtveError::InvalidUrl)` if `listing_url` is not absolute
    /// * `Err(_)` if the listing page itself cannot be fetched
    pub async fn crawl_episodes(&self, listing_url: &str) -> Result<Vec<EpisodeRecord>> {
        let base = Url::parse(listing_url)
            .map_err(|e| RtveError::InvalidUrl(format!("{}: {}", listing_url, e)))?;

        let html = self.client.fetch(base.as_str()).await?;
        let summaries = parse_listing(&html);
        tracing::info!(count = summaries.len(), url = listing_url, "Parsed episode listing");

        let mut records = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let summary = resolve_detail_url(&base, summary);
            records.push(self.fetch_episode(summary).await);
        }

        Ok(records)
    }

    /// Enrich one listing summary with its detail page.
    ///
    /// Never fails: a missing link or a failed fetch yields the summary as a
    /// record on its own.
    pub async fn fetch_episode(&self, summary: EpisodeSummary) -> EpisodeRecord {
        let Some(url) = summary.detail_url.clone() else {
            tracing::debug!(title = %summary.title, "No detail link; keeping summary only");
            return EpisodeRecord::from(summary);
        };

        match self.client.fetch(&url).await {
            Ok(html) => EpisodeRecord::merge(summary, extract_detail(&html)),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Detail page fetch failed; keeping summary only");
                EpisodeRecord::from(summary)
            }
        }
    }

    /// Fetch the programme catalog from the RTVE API.
    ///
    /// # Returns
    /// * `Ok(Vec<ProgramRecord>)`, empty if the response could not be decoded
    /// * `Err(_)` if the request itself failed
    pub async fn fetch_programs(&self, api_url: &str) -> Result<Vec<ProgramRecord>> {
        tracing::info!(url = api_url, "Fetching programme catalog");
        let body = self.client.fetch_json(api_url).await?;
        Ok(extract_programs(&body))
    }
}

/// Make a relative detail link absolute against the listing page URL.
///
/// Links that cannot be resolved are dropped so the entry stays
/// summary-only instead of aborting the crawl.
fn resolve_detail_url(base: &Url, mut summary: EpisodeSummary) -> EpisodeSummary {
    summary.detail_url = summary.detail_url.and_then(|href| match base.join(&href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::warn!(href = %href, error = %e, "Unresolvable detail link");
            None
        }
    });
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_with_link(href: Option<&str>) -> EpisodeSummary {
        EpisodeSummary {
            title: "Discópolis 1".to_string(),
            detail_url: href.map(str::to_string),
            ..EpisodeSummary::default()
        }
    }

    #[test]
    fn test_scraper_creation() {
        let scraper = RtveScraper::new();
        assert!(scraper.is_ok());
    }

    #[test]
    fn test_resolve_relative_detail_url() {
        let base = Url::parse(DISCOPOLIS_LISTING_URL).unwrap();
        let summary = resolve_detail_url(
            &base,
            summary_with_link(Some("/play/audios/discopolis/discopolis-1/7012345/")),
        );
        assert_eq!(
            summary.detail_url.as_deref(),
            Some("https://www.rtve.es/play/audios/discopolis/discopolis-1/7012345/")
        );
    }

    #[test]
    fn test_resolve_absolute_detail_url_unchanged() {
        let base = Url::parse(DISCOPOLIS_LISTING_URL).unwrap();
        let href = "https://www.rtve.es/play/audios/discopolis/x/1/";
        let summary = resolve_detail_url(&base, summary_with_link(Some(href)));
        assert_eq!(summary.detail_url.as_deref(), Some(href));
    }

    #[test]
    fn test_resolve_missing_detail_url() {
        let base = Url::parse(DISCOPOLIS_LISTING_URL).unwrap();
        let summary = resolve_detail_url(&base, summary_with_link(None));
        assert_eq!(summary.detail_url, None);
    }

    #[tokio::test]
    async fn test_crawl_episodes_rejects_relative_listing_url() {
        let scraper = RtveScraper::new().unwrap();
        let result = scraper.crawl_episodes("/play/audios/moduloRadio/1936/emisiones").await;

        match result {
            Err(RtveError::InvalidUrl(msg)) => assert!(msg.contains("moduloRadio")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[tokio::test]
    async fn test_fetch_episode_without_link_is_summary_only() {
        let scraper = RtveScraper::new().unwrap();
        let record = scraper.fetch_episode(summary_with_link(None)).await;
        assert_eq!(record.title, "Discópolis 1");
        assert!(!record.has_detail());
    }
}
