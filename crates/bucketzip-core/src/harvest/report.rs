//! Per-run results, serializable for `--json`.

use serde::Serialize;
use std::path::PathBuf;

use crate::extract::ExtractSummary;

/// An archive name found in the listing and where it would be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedArchive {
    /// Name as matched in the listing.
    pub name: String,
    pub url: String,
    /// Local filename the archive is downloaded to.
    pub file_name: String,
}

/// Result of processing one archive.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveOutcome {
    pub name: String,
    pub url: String,
    pub archive_path: PathBuf,
    pub archive_bytes: u64,
    pub sha256: String,
    pub extracted: ExtractSummary,
    /// True when `keep_archives` left the download on disk.
    pub kept: bool,
}

/// Summary of a whole harvest.
#[derive(Debug, Clone, Serialize)]
pub struct HarvestReport {
    pub listing_url: String,
    pub data_dir: PathBuf,
    pub archives: Vec<ArchiveOutcome>,
}

impl HarvestReport {
    pub fn downloaded_bytes(&self) -> u64 {
        self.archives.iter().map(|a| a.archive_bytes).sum()
    }

    pub fn extracted_files(&self) -> u64 {
        self.archives.iter().map(|a| a.extracted.files).sum()
    }

    pub fn skipped_entries(&self) -> u64 {
        self.archives.iter().map(|a| a.extracted.skipped).sum()
    }
}
