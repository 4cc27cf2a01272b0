//! Archive URLs and local filenames.
//!
//! Archive names come straight out of the listing text, so they are treated
//! as untrusted: the download URL is built by appending the name to the
//! listing base, and the local filename is reduced to one sanitized segment.

mod sanitize;

pub use sanitize::sanitize_filename_for_linux;

use anyhow::{Context, Result};
use std::collections::HashSet;
use url::Url;

/// Filename used when a listed name sanitizes to nothing.
const DEFAULT_FILENAME: &str = "archive.zip";

/// Download URL for `name`: the listing URL without query or fragment, with `name` appended.
///
/// # Examples
///
/// - `archive_url("https://s3.amazonaws.com/baywheels-data/", "201801-baywheels-tripdata.csv.zip")`
///   → `https://s3.amazonaws.com/baywheels-data/201801-baywheels-tripdata.csv.zip`
/// - `archive_url("https://host/bucket?prefix=2019", "a.zip")` → `https://host/bucket/a.zip`
pub fn archive_url(listing_url: &str, name: &str) -> Result<String> {
    let mut base = Url::parse(listing_url)
        .with_context(|| format!("invalid listing URL: {}", listing_url))?;
    base.set_query(None);
    base.set_fragment(None);

    let mut out = base.to_string();
    if !out.ends_with('/') {
        out.push('/');
    }
    out.push_str(name.trim_start_matches('/'));
    let url = Url::parse(&out).with_context(|| format!("invalid archive URL for {:?}", name))?;
    Ok(url.to_string())
}

/// Local filename for a listed archive: last `/` segment of `name`, sanitized.
pub fn local_archive_name(name: &str) -> String {
    let segment = name
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
        .unwrap_or("");
    let sanitized = sanitize_filename_for_linux(segment);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// `file_name`, or `<stem>-<n>.<ext>` (n = 2, 3, ...) when it is already in `taken`.
/// The returned name is added to `taken`.
pub fn unique_file_name(file_name: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(file_name.to_string()) {
        return file_name.to_string();
    }
    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    };
    let mut n = 2u32;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{}-{}.{}", stem, n, ext),
            None => format!("{}-{}", stem, n),
        };
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
