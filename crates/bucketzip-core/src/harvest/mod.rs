//! The harvest pipeline: list, then download → extract → delete each archive in order.
//!
//! Archives are processed strictly one at a time. The first failure stops the
//! run; archives already extracted stay in the data directory.

mod archive;
mod report;

pub use archive::unpack;
pub use report::{ArchiveOutcome, HarvestReport, ListedArchive};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tokio::sync::mpsc::Sender;

use crate::config::HarvestConfig;
use crate::control::AbortToken;
use crate::listing::{self, ArchivePattern};
use crate::progress::{emit, HarvestProgress};
use crate::url_model;

use archive::{process_archive, Slot};

/// Scan the listing and resolve each matched name to its download URL and local filename.
pub async fn scan(cfg: &HarvestConfig, abort: &AbortToken) -> Result<Vec<ListedArchive>> {
    let pattern = ArchivePattern::new(&cfg.pattern)?;
    let names = tokio::task::spawn_blocking({
        let cfg = cfg.clone();
        let abort = abort.clone();
        move || listing::list_archives(&cfg, &pattern, &abort)
    })
    .await
    .context("listing task join")??;

    // Names from different prefixes can share a last segment; keep their local files apart.
    let mut taken = HashSet::new();
    names
        .into_iter()
        .map(|name| -> Result<ListedArchive> {
            let url = url_model::archive_url(&cfg.listing_url, &name)?;
            let local = url_model::local_archive_name(&name);
            let file_name = url_model::unique_file_name(&local, &mut taken);
            if file_name != local {
                tracing::warn!("{} shares local name {}; saving as {}", name, local, file_name);
            }
            Ok(ListedArchive { name, url, file_name })
        })
        .collect()
}

/// Run a full harvest. Archives are downloaded into `download_dir` and extracted into `cfg.data_dir`.
pub async fn run_harvest(
    cfg: &HarvestConfig,
    download_dir: &Path,
    abort: &AbortToken,
    progress: Option<&Sender<HarvestProgress>>,
) -> Result<HarvestReport> {
    // Validate the pattern before touching the filesystem.
    ArchivePattern::new(&cfg.pattern)?;

    tokio::fs::create_dir_all(&cfg.data_dir)
        .await
        .with_context(|| format!("create data dir {}", cfg.data_dir.display()))?;

    let listed = scan(cfg, abort).await?;
    let count = listed.len();
    emit(progress, HarvestProgress::Listed { count });
    if count == 0 {
        tracing::warn!(
            "no archives in {} match {:?}",
            cfg.listing_url,
            cfg.pattern
        );
    }

    let mut archives = Vec::with_capacity(count);
    for (index, item) in listed.iter().enumerate() {
        abort.check()?;
        let slot = Slot { index, count };
        let outcome = process_archive(item, cfg, download_dir, abort, progress, slot)
            .await
            .with_context(|| format!("archive {} ({}/{})", item.name, index + 1, count))?;
        archives.push(outcome);
    }

    tracing::info!(
        "harvest complete: {} archive(s) into {}",
        archives.len(),
        cfg.data_dir.display()
    );
    Ok(HarvestReport {
        listing_url: cfg.listing_url.clone(),
        data_dir: cfg.data_dir.clone(),
        archives,
    })
}
