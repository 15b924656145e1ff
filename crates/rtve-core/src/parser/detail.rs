//! Episode detail page parser for RTVE
//!
//! Reads the meta tags and the `application/ld+json` blocks of an episode
//! page. Nothing on this page is required: every field is read on its own
//! and a missing or malformed source simply leaves that field empty.

use scraper::{Html, Selector};
use serde_json::Value;

use crate::types::EpisodeDetail;

/// Selector for embedded structured-data blocks.
const LD_JSON_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// Structured-data type that describes the episode audio.
const AUDIO_OBJECT_TYPE: &str = "AudioObject";

/// Extract the detail fragment of an episode page.
///
/// # Arguments
/// * `html` - Raw HTML content of the episode detail page
///
/// # Returns
/// An [`EpisodeDetail`]; fields not found on the page are `None`.
///
/// # Examples
/// ```
/// use rtve_core::parser::extract_detail;
///
/// let html = r#"<html><head>
///   <meta name="description" content=" Rock de los 70 ">
///   <script type="application/ld+json">
///     {"@type": "AudioObject", "datePublished": "2024-03-12",
///      "description": "David Bowie: Heroes\nhttps://www.rtve.es\nIggy Pop: The Passenger"}
///   </script>
/// </head></html>"#;
///
/// let detail = extract_detail(html);
/// assert_eq!(detail.description.as_deref(), Some("Rock de los 70"));
/// assert_eq!(detail.publish_date.as_deref(), Some("2024-03-12"));
/// assert_eq!(
///     detail.song_mentions,
///     Some(vec!["David Bowie: Heroes".to_string(), "Iggy Pop: The Passenger".to_string()])
/// );
/// ```
pub fn extract_detail(html: &str) -> EpisodeDetail {
    let document = Html::parse_document(html);
    let mut detail = EpisodeDetail {
        description: meta_content(&document, "description")
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        ..EpisodeDetail::default()
    };

    if let Some(audio) = find_audio_object(&document) {
        detail.publish_date = string_field(&audio, "datePublished");
        detail.iso_duration = string_field(&audio, "duration");
        detail.embed_url = string_field(&audio, "embedUrl");
        detail.thumbnail_url = string_field(&audio, "thumbnailUrl");
        detail.song_mentions = audio
            .get("description")
            .and_then(Value::as_str)
            .and_then(extract_song_mentions);
    } else {
        tracing::debug!("No AudioObject structured data on detail page");
    }

    detail.keywords = meta_content(&document, "keywords");
    detail.director = extract_director(&document);

    detail
}

/// Split a free-text description into "artist: track" lines.
///
/// A line qualifies when it contains a colon and does not start with
/// `http` (ignoring leading whitespace). Qualifying lines are trimmed and
/// keep their order. The heuristic both over- and under-matches depending
/// on how a description is written.
///
/// # Returns
/// * `Some(lines)` with at least one line
/// * `None` if no line qualifies
///
/// # Examples
/// ```
/// use rtve_core::parser::extract_song_mentions;
///
/// let text = "Artist A: Song 1\nhttp://example.com\nArtist B: Song 2";
/// assert_eq!(
///     extract_song_mentions(text),
///     Some(vec!["Artist A: Song 1".to_string(), "Artist B: Song 2".to_string()])
/// );
/// assert_eq!(extract_song_mentions("Sin lista de canciones"), None);
/// ```
pub fn extract_song_mentions(description: &str) -> Option<Vec<String>> {
    let songs: Vec<String> = description
        .lines()
        .filter(|line| line.contains(':') && !line.trim_start().starts_with("http"))
        .map(|line| line.trim().to_string())
        .collect();

    if songs.is_empty() {
        None
    } else {
        Some(songs)
    }
}

/// Content attribute of `<meta name="{name}">`, untouched.
fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[name="{}"]"#, name)).ok()?;
    document
        .select(&selector)
        .find_map(|meta| meta.value().attr("content"))
        .map(str::to_string)
}

/// Raw text of every structured-data block, in document order.
fn ld_json_blocks(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(LD_JSON_SELECTOR) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|script| script.text().collect::<String>())
        .collect()
}

/// First structured-data object declaring the AudioObject type.
///
/// Blocks that are not valid JSON are skipped. A block holding an array is
/// searched element by element.
fn find_audio_object(document: &Html) -> Option<Value> {
    for (index, block) in ld_json_blocks(document).iter().enumerate() {
        let data = match serde_json::from_str::<Value>(block) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(block = index, error = %e, "Skipping malformed structured-data block");
                continue;
            }
        };

        let candidates = match data {
            Value::Array(items) => items,
            other => vec![other],
        };

        if let Some(audio) = candidates.into_iter().find(is_audio_object) {
            return Some(audio);
        }
    }

    None
}

fn is_audio_object(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == AUDIO_OBJECT_TYPE,
        Some(Value::Array(types)) => types.iter().any(|t| *t == AUDIO_OBJECT_TYPE),
        _ => false,
    }
}

/// A string field, or the first string of an array field.
fn string_field(object: &Value, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Director name matched out of the raw structured-data text.
///
/// This is a text match, not a lookup in parsed JSON, so it also works on
/// blocks that fail to parse and may miss names written in other shapes.
fn extract_director(document: &Html) -> Option<String> {
    let re = regex_lite::Regex::new(r#""director":\s*"([^"]+)""#).ok()?;
    ld_json_blocks(document)
        .iter()
        .filter(|block| block.contains("director"))
        .find_map(|block| {
            re.captures(block)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
}
