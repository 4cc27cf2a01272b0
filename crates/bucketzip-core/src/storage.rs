//! Downloaded-archive file lifecycle.
//!
//! Bytes land in `<name>.part`, hashed with SHA-256 as they are written.
//! `finalize` syncs and atomically renames to the final name; dropping an
//! unfinalized file removes the partial download.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.zip` → `a.zip.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// A finished archive on disk.
#[derive(Debug, Clone)]
pub struct StoredArchive {
    pub path: PathBuf,
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the archive bytes.
    pub sha256: String,
}

/// Sequential writer for an archive being downloaded.
pub struct ArchiveFile {
    out: Option<BufWriter<File>>,
    hasher: Sha256,
    bytes: u64,
    temp_path: PathBuf,
    final_path: PathBuf,
    finalized: bool,
}

impl ArchiveFile {
    /// Create (or truncate) `<final_path>.part`.
    pub fn create(final_path: &Path) -> Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(Self {
            out: Some(BufWriter::new(file)),
            hasher: Sha256::new(),
            bytes: 0,
            temp_path,
            final_path: final_path.to_path_buf(),
            finalized: false,
        })
    }

    /// Discard what was written so far and start again from byte 0 (used between retries).
    pub fn reset(&mut self) -> io::Result<()> {
        // Close the old handle first; its buffered tail would otherwise land after the truncate.
        drop(self.out.take());
        let file = File::options()
            .write(true)
            .truncate(true)
            .open(&self.temp_path)?;
        self.out = Some(BufWriter::new(file));
        self.hasher = Sha256::new();
        self.bytes = 0;
        Ok(())
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Flush, fsync and rename to the final path. Returns size and digest.
    pub fn finalize(mut self) -> Result<StoredArchive> {
        let out = self
            .out
            .take()
            .ok_or_else(|| anyhow::anyhow!("archive file already closed"))?;
        let file = out
            .into_inner()
            .map_err(|e| e.into_error())
            .context("storage flush failed")?;
        file.sync_all().context("storage sync failed")?;
        drop(file);

        std::fs::rename(&self.temp_path, &self.final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                self.temp_path.display(),
                self.final_path.display()
            )
        })?;
        self.finalized = true;
        let sha256 = hex::encode(std::mem::take(&mut self.hasher).finalize());
        Ok(StoredArchive {
            path: self.final_path.clone(),
            bytes: self.bytes,
            sha256,
        })
    }
}

impl Write for ArchiveFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let out = self
            .out
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "archive file closed"))?;
        let n = out.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.out.as_mut() {
            Some(out) => out.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for ArchiveFile {
    fn drop(&mut self) {
        if !self.finalized {
            drop(self.out.take());
            if let Err(e) = std::fs::remove_file(&self.temp_path) {
                tracing::debug!("could not remove {}: {}", self.temp_path.display(), e);
            }
        }
    }
}
