//! # Artifact Output
//!
//! Atomic file writes and the machine-readable run summary.
//!
//! Every artifact goes to a temporary file in the destination directory
//! ([`stage_file`]) and is renamed into place ([`StagedFile::commit`]), so a
//! reader never observes a partial file. Callers stage every file of a run
//! before committing any of them.

use seedtrust_core::{RunStats, TrustError, TrustReport};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A fully written, synced temporary file waiting to replace its
/// destination. Dropping it without committing removes the temp file.
#[derive(Debug)]
pub struct StagedFile {
    tmp: NamedTempFile,
    dest: PathBuf,
}

impl StagedFile {
    /// Rename the temp file onto its destination.
    pub fn commit(self) -> Result<(), TrustError> {
        let dest = self.dest;
        self.tmp.persist(&dest).map_err(|e| {
            TrustError::WriteFailure(format!("rename into {}: {}", dest.display(), e.error))
        })?;
        Ok(())
    }

    /// Final path the file will be renamed to.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.dest
    }
}

/// Write `data` next to `path` without making it visible yet, creating
/// parent directories.
pub fn stage_file(path: &Path, data: &[u8]) -> Result<StagedFile, TrustError> {
    let file_name = path.file_name().ok_or_else(|| {
        TrustError::WriteFailure(format!("output path '{}' has no filename", path.display()))
    })?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| {
        TrustError::WriteFailure(format!("create directory {}: {}", parent.display(), e))
    })?;
    if !parent.is_dir() {
        return Err(TrustError::WriteFailure(format!(
            "output directory '{}' is not a directory",
            parent.display()
        )));
    }

    let mut tmp = NamedTempFile::new_in(parent)
        .map_err(|e| TrustError::WriteFailure(format!("temp file: {}", e)))?;
    tmp.write_all(data)
        .map_err(|e| TrustError::WriteFailure(format!("write: {}", e)))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| TrustError::WriteFailure(format!("sync: {}", e)))?;

    Ok(StagedFile {
        tmp,
        dest: parent.join(file_name),
    })
}

// =============================================================================
// RUN SUMMARY
// =============================================================================

/// What a finished run reports, as printed in `--json-mode` and written by
/// `--summary`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output: PathBuf,
    pub seeds: usize,
    pub rows: usize,
    pub checksum: String,
    pub blake3: String,
    pub stats: RunStats,
}

impl RunSummary {
    pub fn new(output: &Path, seeds: usize, report: &TrustReport) -> Self {
        Self {
            output: output.to_path_buf(),
            seeds,
            rows: report.edges.len(),
            checksum: format!("{:016x}", report.edges.checksum()),
            blake3: report.edges.blake3_hex(),
            stats: report.stats.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, TrustError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TrustError::WriteFailure(format!("summary encoding: {}", e)))
    }
}

// =============================================================================
// TESTS
// =============================================================================
