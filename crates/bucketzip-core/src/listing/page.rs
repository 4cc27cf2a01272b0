//! S3 `ListBucketResult` pagination markers.
//!
//! Only the few elements needed to continue a truncated listing are read;
//! archive names themselves come from the pattern scan.

use anyhow::{Context, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn truncated_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<IsTruncated>\s*true\s*</IsTruncated>").unwrap())
}

fn next_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<NextMarker>([^<]*)</NextMarker>").unwrap())
}

fn key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<Key>([^<]*)</Key>").unwrap())
}

/// Marker for the next page of a truncated listing, or `None` when the page is complete.
///
/// Uses `<NextMarker>` when the server sends one, else the last `<Key>` on the page.
pub fn continuation_marker(page: &str) -> Option<String> {
    if !truncated_re().is_match(page) {
        return None;
    }
    let raw = next_marker_re()
        .captures(page)
        .and_then(|c| c.get(1))
        .or_else(|| key_re().captures_iter(page).last().and_then(|c| c.get(1)))?
        .as_str();
    if raw.is_empty() {
        return None;
    }
    Some(unescape_xml(raw))
}

/// Listing URL for the page after `marker`. Any previous `marker` parameter is replaced.
pub fn next_page_url(listing_url: &str, marker: &str) -> Result<String> {
    let mut url = Url::parse(listing_url).with_context(|| format!("invalid listing URL: {}", listing_url))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "marker")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("marker", marker);
    Ok(url.to_string())
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
