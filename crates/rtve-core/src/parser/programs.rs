//! Programme catalog parser for the RTVE API
//!
//! Parses responses of `api.rtve.es/api/programas/...`, which list
//! programmes under `page.items`.

use serde_json::Value;

use crate::error::{RtveError, Result};
use crate::types::ProgramRecord;

/// Public base path that programme `uri` values are relative to.
pub const PROGRAM_BASE_URL: &str = "https://www.rtve.es/play/radio/";

/// Number of body characters logged when a response fails to decode.
const BODY_PREVIEW_CHARS: usize = 500;

/// Extract programme records from an API response body.
///
/// Decoding problems are logged and produce an empty list; they never reach
/// the caller. Use [`try_extract_programs`] to observe the error itself.
///
/// # Examples
/// ```
/// use rtve_core::parser::{extract_programs, PROGRAM_BASE_URL};
///
/// let programs = extract_programs(r#"{"page": {"items": [{"name": "X", "uri": "x"}]}}"#);
/// assert_eq!(programs.len(), 1);
/// assert_eq!(programs[0].url, format!("{}x", PROGRAM_BASE_URL));
/// assert_eq!(programs[0].image_url, None);
///
/// assert!(extract_programs("<html>not json</html>").is_empty());
/// ```
pub fn extract_programs(body: &str) -> Vec<ProgramRecord> {
    match try_extract_programs(body) {
        Ok(programs) => programs,
        Err(e @ RtveError::UnexpectedShape(_)) => {
            tracing::warn!(error = %e, "Unexpected data structure in API response");
            Vec::new()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to decode API response");
            tracing::debug!(
                body = %body.chars().take(BODY_PREVIEW_CHARS).collect::<String>(),
                "Response content"
            );
            Vec::new()
        }
    }
}

/// Extract programme records, surfacing decoding problems.
///
/// # Returns
/// * `Ok(Vec<ProgramRecord>)`, one per item in `page.items`
/// * `Err(RtveError::MalformedResponse)` if the body is not JSON
/// * `Err(RtveError::UnexpectedShape)` if `page.items` is missing or not a list
pub fn try_extract_programs(body: &str) -> Result<Vec<ProgramRecord>> {
    let data: Value =
        serde_json::from_str(body).map_err(|e| RtveError::MalformedResponse(e.to_string()))?;

    tracing::debug!(bytes = body.len(), "Received API response");

    let items = data
        .get("page")
        .and_then(|page| page.get("items"))
        .and_then(Value::as_array)
        .ok_or_else(|| RtveError::UnexpectedShape("missing page.items".to_string()))?;

    tracing::info!(count = items.len(), "Found programmes");

    Ok(items.iter().map(parse_program).collect())
}

/// Map one catalog item to a record, defaulting absent text fields.
fn parse_program(item: &Value) -> ProgramRecord {
    let text = |key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    ProgramRecord {
        title: text("name"),
        description: text("description"),
        url: format!("{}{}", PROGRAM_BASE_URL, text("uri")),
        image_url: extract_image_url(item),
    }
}

/// `image.url` when the item carries a non-empty image object.
///
/// An image object without a `url` yields an empty string rather than
/// `None`, so such rows stay distinguishable from image-less items.
fn extract_image_url(item: &Value) -> Option<String> {
    let image = item.get("image")?.as_object()?;
    if image.is_empty() {
        return None;
    }
    Some(
        image
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    )
}
