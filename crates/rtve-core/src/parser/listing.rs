//! Listing page parser for RTVE programme pages
//!
//! Parses the episode index of a programme (`.../moduloRadio/{id}/emisiones`),
//! where every episode is an `li.elem_` entry.

use scraper::{ElementRef, Html, Selector};

use crate::error::{RtveError, Result};
use crate::types::EpisodeSummary;

use super::setup::{asset_id_from_setup, parse_setup_blob};

/// Parse every listing entry on an episode index page.
///
/// Entries without a title are logged and skipped; the remaining entries
/// keep their page order.
///
/// # Arguments
/// * `html` - Raw HTML content of the listing page
pub fn parse_listing(html: &str) -> Vec<EpisodeSummary> {
    let document = Html::parse_document(html);
    let mut summaries = Vec::new();

    let Ok(entry_selector) = Selector::parse("li.elem_") else {
        return summaries;
    };

    for (index, entry) in document.select(&entry_selector).enumerate() {
        match extract_summary(&entry) {
            Ok(summary) => summaries.push(summary),
            Err(e) => tracing::warn!(entry = index, error = %e, "Skipping listing entry"),
        }
    }

    tracing::debug!(count = summaries.len(), "Parsed listing entries");
    summaries
}

/// Extract the summary fields of a single listing entry.
///
/// # Arguments
/// * `entry` - The `li.elem_` element of one episode
///
/// # Returns
/// * `Ok(EpisodeSummary)` with the trimmed title and whatever else was found
/// * `Err(RtveError::MissingField)` if the entry has no non-empty title
///
/// # Examples
/// ```
/// use rtve_core::parser::extract_summary;
/// use scraper::{Html, Selector};
///
/// let html = Html::parse_fragment(
///     r#"<ul><li class="elem_" data-setup="{'idAsset': '42'}">
///         <span class="maintitle"> Discópolis 1 </span>
///         <a class="goto_media" href="/play/audios/discopolis/1/42/">ver</a>
///     </li></ul>"#,
/// );
/// let selector = Selector::parse("li.elem_").unwrap();
/// let entry = html.select(&selector).next().unwrap();
///
/// let summary = extract_summary(&entry).unwrap();
/// assert_eq!(summary.title, "Discópolis 1");
/// assert_eq!(summary.asset_id.as_deref(), Some("42"));
/// ```
pub fn extract_summary(entry: &ElementRef) -> Result<EpisodeSummary> {
    let title = select_text(entry, "span.maintitle")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RtveError::MissingField("title".to_string()))?;

    let air_date = select_text(entry, "span.datemi").unwrap_or_default();
    let duration = select_text(entry, "span.duration").unwrap_or_default();
    let detail_url = extract_detail_url(entry);
    let asset_id = extract_asset_id(entry);

    Ok(EpisodeSummary {
        title,
        air_date,
        duration,
        detail_url,
        asset_id,
    })
}

/// Trimmed text of the first element matching `selector` within `entry`.
fn select_text(entry: &ElementRef, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let el = entry.select(&selector).next()?;
    Some(el.text().collect::<String>().trim().to_string())
}

/// `href` of the entry's media link, if any.
fn extract_detail_url(entry: &ElementRef) -> Option<String> {
    let selector = Selector::parse("a.goto_media").ok()?;
    entry
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .map(str::to_string)
}

/// Asset identifier from the entry's `data-setup` attribute.
///
/// A missing or undecodable blob only costs this one field.
fn extract_asset_id(entry: &ElementRef) -> Option<String> {
    let blob = entry.value().attr("data-setup")?;
    match parse_setup_blob(blob) {
        Ok(setup) => asset_id_from_setup(&setup),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring undecodable data-setup blob");
            None
        }
    }
}
