//! `bucketzip extract <archive>` – unpack a local archive.

use anyhow::Result;
use bucketzip_core::harvest;
use std::path::Path;

pub async fn run_extract(archive: &Path, data_dir: &Path, delete: bool) -> Result<()> {
    let summary = harvest::unpack(archive, data_dir, !delete).await?;
    println!(
        "Extracted {} file(s), {} bytes from {} into {}",
        summary.files,
        summary.bytes,
        archive.display(),
        data_dir.display()
    );
    if summary.skipped > 0 {
        println!("Skipped {} unsafe archive entries.", summary.skipped);
    }
    if delete {
        println!("Removed {}", archive.display());
    }
    Ok(())
}
