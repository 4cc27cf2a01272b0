//! `bucketzip run` – list, download, extract and delete every matching archive.

use anyhow::Result;
use bucketzip_core::config::HarvestConfig;
use bucketzip_core::control::AbortToken;
use bucketzip_core::harvest::{self, HarvestReport};
use bucketzip_core::progress::HarvestProgress;
use std::path::Path;
use std::time::{Duration, Instant};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

pub async fn run_harvest(cfg: &HarvestConfig, download_dir: &Path, json: bool) -> Result<()> {
    let abort = AbortToken::new();
    let ctrl_c = tokio::spawn({
        let abort = abort.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received; stopping harvest");
                abort.abort();
            }
        }
    });

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<HarvestProgress>(64);
    let progress_handle = tokio::spawn(async move {
        let mut last_print: Option<Instant> = None;
        while let Some(event) = progress_rx.recv().await {
            if json {
                continue;
            }
            match event {
                HarvestProgress::Listed { count } => println!("Found {} archive(s).", count),
                HarvestProgress::Downloading { index, count, name } => {
                    println!("[{}/{}] {}", index + 1, count, name);
                    last_print = None;
                }
                HarvestProgress::Bytes { bytes, .. } => {
                    let now = Instant::now();
                    let due = last_print.map_or(true, |t| now.duration_since(t) >= PROGRESS_INTERVAL);
                    if due || bytes.is_complete() {
                        let done_mib = bytes.done as f64 / 1_048_576.0;
                        match (bytes.total, bytes.fraction()) {
                            (Some(total), Some(f)) => println!(
                                "  {:.1} / {:.1} MiB ({:.1}%)",
                                done_mib,
                                total as f64 / 1_048_576.0,
                                f * 100.0
                            ),
                            _ => println!("  {:.1} MiB", done_mib),
                        }
                        last_print = Some(now);
                    }
                }
                HarvestProgress::Extracted { files, .. } => {
                    println!("  extracted {} file(s)", files)
                }
            }
        }
    });

    let result = harvest::run_harvest(cfg, download_dir, &abort, Some(&progress_tx)).await;
    drop(progress_tx);
    let _ = progress_handle.await;
    ctrl_c.abort();

    let report = result?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &HarvestReport) {
    if report.archives.is_empty() {
        println!("No matching archives in {}.", report.listing_url);
        return;
    }
    println!(
        "Done: {} archive(s), {:.1} MiB downloaded, {} file(s) extracted into {}",
        report.archives.len(),
        report.downloaded_bytes() as f64 / 1_048_576.0,
        report.extracted_files(),
        report.data_dir.display()
    );
    let skipped = report.skipped_entries();
    if skipped > 0 {
        println!("Skipped {} unsafe archive entries (see log).", skipped);
    }
}
