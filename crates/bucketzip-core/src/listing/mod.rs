//! Bucket listing scan: fetch the listing page(s) and pull archive names out with a regex.

mod page;
mod pattern;

pub use page::{continuation_marker, next_page_url};
pub use pattern::ArchivePattern;

use anyhow::{Context, Result};
use std::collections::HashSet;

use crate::config::HarvestConfig;
use crate::control::AbortToken;
use crate::http;
use crate::retry::run_with_retry;

/// Fetch the listing and return matching archive names in listing order, without duplicates.
///
/// Truncated S3 listings are followed page by page while `follow_pagination` is
/// set, up to `max_pages`. Blocking; call from `spawn_blocking` in async code.
pub fn list_archives(
    cfg: &HarvestConfig,
    pattern: &ArchivePattern,
    abort: &AbortToken,
) -> Result<Vec<String>> {
    let opts = cfg.http_options();
    let policy = cfg.retry_policy()?;
    let max_pages = cfg.max_pages.max(1);

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    let mut url = cfg.listing_url.clone();
    let mut pages = 0u32;

    loop {
        abort.check()?;
        let body = run_with_retry(&policy, |_| {
            abort.check()?;
            http::fetch_text(&url, &opts, abort)
        })
        .with_context(|| format!("GET listing {}", url))?;
        pages += 1;

        let before = names.len();
        pattern.collect_into(&body, &mut seen, &mut names);
        tracing::debug!(page = pages, url = %url, matched = names.len() - before, "scanned listing page");

        if !cfg.follow_pagination {
            break;
        }
        let Some(marker) = continuation_marker(&body) else {
            break;
        };
        if pages >= max_pages {
            tracing::warn!(
                "listing still truncated after {} page(s); stopping at max_pages",
                pages
            );
            break;
        }
        url = next_page_url(&cfg.listing_url, &marker)?;
    }

    tracing::info!(
        "listing {} yielded {} archive(s) matching {:?} over {} page(s)",
        cfg.listing_url,
        names.len(),
        pattern.as_str(),
        pages
    );
    Ok(names)
}
