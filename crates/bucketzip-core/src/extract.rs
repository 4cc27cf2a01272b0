//! ZIP extraction into the data directory.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

/// What one archive contributed to the data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    /// Regular files written.
    pub files: u64,
    /// Uncompressed bytes written.
    pub bytes: u64,
    /// Entries skipped because their path would land outside the data directory.
    pub skipped: u64,
}

/// Extract every entry of `archive_path` under `dest_dir`, overwriting existing files.
///
/// Entry paths are resolved with `enclosed_name`, so absolute paths and `..`
/// components are skipped instead of written. Blocking.
pub fn extract_all(archive_path: &Path, dest_dir: &Path) -> Result<ExtractSummary> {
    let file = File::open(archive_path)
        .with_context(|| format!("open archive {}", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("read zip archive {}", archive_path.display()))?;

    fs::create_dir_all(dest_dir)
        .with_context(|| format!("create data dir {}", dest_dir.display()))?;

    let mut summary = ExtractSummary::default();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("read entry #{} of {}", i, archive_path.display()))?;

        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(
                "skipping unsafe entry {:?} in {}",
                entry.name(),
                archive_path.display()
            );
            summary.skipped += 1;
            continue;
        };
        let out_path = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("create dir {}", out_path.display()))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        let mut out = File::create(&out_path)
            .with_context(|| format!("create {}", out_path.display()))?;
        let n = io::copy(&mut entry, &mut out)
            .with_context(|| format!("extract {} to {}", entry.name(), out_path.display()))?;
        summary.files += 1;
        summary.bytes += n;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                // Strip setuid/setgid/sticky; data files never need them.
                let perms = fs::Permissions::from_mode(mode & 0o777);
                if let Err(e) = fs::set_permissions(&out_path, perms) {
                    tracing::debug!("chmod {} failed: {}", out_path.display(), e);
                }
            }
        }
    }

    tracing::debug!(
        archive = %archive_path.display(),
        files = summary.files,
        bytes = summary.bytes,
        skipped = summary.skipped,
        "extracted archive"
    );
    Ok(summary)
}
