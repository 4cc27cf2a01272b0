//! One archive: download with retry, extract, delete.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::Sender;

use crate::config::HarvestConfig;
use crate::control::AbortToken;
use crate::extract::{self, ExtractSummary};
use crate::http;
use crate::progress::{emit, ByteProgress, HarvestProgress};
use crate::retry::{run_with_retry, TransferError};
use crate::storage::{ArchiveFile, StoredArchive};

use super::report::{ArchiveOutcome, ListedArchive};

/// Position of the archive in the run, for progress events.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Slot {
    pub index: usize,
    pub count: usize,
}

/// Download `url` to `final_path` (via `.part`), retrying transient failures from byte 0.
/// Blocking; runs inside `spawn_blocking`.
fn download_archive(
    url: &str,
    final_path: &Path,
    cfg: &HarvestConfig,
    abort: &AbortToken,
    progress: Option<&Sender<HarvestProgress>>,
    slot: Slot,
) -> Result<StoredArchive> {
    let opts = cfg.http_options();
    let policy = cfg.retry_policy()?;
    let mut file = ArchiveFile::create(final_path)?;

    let bytes = run_with_retry(&policy, |attempt| {
        abort.check()?;
        if attempt > 1 {
            file.reset().map_err(TransferError::Storage)?;
        }
        http::download_to(url, &mut file, &opts, abort, |done, total| {
            emit(
                progress,
                HarvestProgress::Bytes {
                    index: slot.index,
                    count: slot.count,
                    bytes: ByteProgress { done, total },
                },
            );
        })
    })
    .with_context(|| format!("GET {}", url))?;

    tracing::debug!(url, bytes, "archive downloaded");
    file.finalize()
}

/// Extract `archive_path` into `data_dir`, then remove the archive unless `keep` is set.
pub async fn unpack(archive_path: &Path, data_dir: &Path, keep: bool) -> Result<ExtractSummary> {
    let summary = tokio::task::spawn_blocking({
        let archive_path = archive_path.to_path_buf();
        let data_dir = data_dir.to_path_buf();
        move || extract::extract_all(&archive_path, &data_dir)
    })
    .await
    .context("extract task join")??;

    if !keep {
        tokio::fs::remove_file(archive_path)
            .await
            .with_context(|| format!("remove archive {}", archive_path.display()))?;
        tracing::debug!("removed {}", archive_path.display());
    }
    Ok(summary)
}

pub(crate) async fn process_archive(
    listed: &ListedArchive,
    cfg: &HarvestConfig,
    download_dir: &Path,
    abort: &AbortToken,
    progress: Option<&Sender<HarvestProgress>>,
    slot: Slot,
) -> Result<ArchiveOutcome> {
    emit(
        progress,
        HarvestProgress::Downloading {
            index: slot.index,
            count: slot.count,
            name: listed.name.clone(),
        },
    );

    let final_path: PathBuf = download_dir.join(&listed.file_name);
    let stored = tokio::task::spawn_blocking({
        let url = listed.url.clone();
        let final_path = final_path.clone();
        let cfg = cfg.clone();
        let abort = abort.clone();
        let progress = progress.cloned();
        move || download_archive(&url, &final_path, &cfg, &abort, progress.as_ref(), slot)
    })
    .await
    .context("download task join")??;

    let extracted = unpack(&stored.path, &cfg.data_dir, cfg.keep_archives).await?;
    emit(
        progress,
        HarvestProgress::Extracted {
            index: slot.index,
            count: slot.count,
            name: listed.name.clone(),
            files: extracted.files,
        },
    );
    tracing::info!(
        "archive {} ({} bytes, sha256 {}) -> {} file(s) in {}",
        listed.name,
        stored.bytes,
        stored.sha256,
        extracted.files,
        cfg.data_dir.display()
    );

    Ok(ArchiveOutcome {
        name: listed.name.clone(),
        url: listed.url.clone(),
        archive_path: stored.path,
        archive_bytes: stored.bytes,
        sha256: stored.sha256,
        extracted,
        kept: cfg.keep_archives,
    })
}
