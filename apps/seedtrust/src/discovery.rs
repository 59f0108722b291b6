//! # Seed File Discovery
//!
//! Maps each seed identity to its three raw files and reads them lazily,
//! one file per iteration step, in sorted seed order:
//!
//! ```text
//! <raw_dir>/<seed>_seed_followings.json
//! <raw_dir>/<seed>_seed_extended_followings.json
//! <raw_dir>/<seed>_seed_interactions.json
//! ```
//!
//! A missing or undecodable file is reported as a [`SourceItem`] rather
//! than an error so the caller can count it and move on.

use seedtrust_core::primitives::{
    EXTENDED_FOLLOWINGS_SUFFIX, FOLLOWINGS_SUFFIX, INTERACTIONS_SUFFIX, MAX_INPUT_FILE_SIZE,
};
use seedtrust_core::{
    Identity, RecordBatch, TrustError, parse_extended_followings, parse_followings,
    parse_interactions,
};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE ROLES
// =============================================================================

/// Which of the three per-seed files a path is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileRole {
    Followings,
    ExtendedFollowings,
    Interactions,
}

impl FileRole {
    /// Read order within one seed. Extended followings need the master
    /// list from the followings file, so followings come first.
    pub const ORDER: [FileRole; 3] = [
        FileRole::Followings,
        FileRole::ExtendedFollowings,
        FileRole::Interactions,
    ];

    pub const fn suffix(self) -> &'static str {
        match self {
            FileRole::Followings => FOLLOWINGS_SUFFIX,
            FileRole::ExtendedFollowings => EXTENDED_FOLLOWINGS_SUFFIX,
            FileRole::Interactions => INTERACTIONS_SUFFIX,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FileRole::Followings => "followings",
            FileRole::ExtendedFollowings => "extended_followings",
            FileRole::Interactions => "interactions",
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path of one seed's file.
#[must_use]
pub fn seed_file_path(raw_dir: &Path, seed: &Identity, role: FileRole) -> PathBuf {
    raw_dir.join(format!("{}{}", seed.as_str(), role.suffix()))
}

// =============================================================================
// READING
// =============================================================================

/// Read a raw input file, refusing anything over [`MAX_INPUT_FILE_SIZE`].
pub fn read_input(path: &Path) -> Result<Vec<u8>, TrustError> {
    if !path.is_file() {
        return Err(TrustError::MissingInputFile(path.to_path_buf()));
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| TrustError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_INPUT_FILE_SIZE {
        return Err(TrustError::UnreadableInput(format!(
            "{}: size {} bytes exceeds maximum allowed {} bytes",
            path.display(),
            metadata.len(),
            MAX_INPUT_FILE_SIZE
        )));
    }

    std::fs::read(path).map_err(|e| TrustError::IoError(format!("{}: {}", path.display(), e)))
}

/// One step of discovery.
#[derive(Debug)]
pub enum SourceItem {
    /// A decoded file.
    Batch {
        seed: Identity,
        role: FileRole,
        path: PathBuf,
        batch: RecordBatch,
    },
    /// The file does not exist.
    Missing {
        seed: Identity,
        role: FileRole,
        path: PathBuf,
    },
    /// The file exists but could not be read or decoded.
    Unreadable {
        seed: Identity,
        role: FileRole,
        path: PathBuf,
        error: TrustError,
    },
}

/// Lazy, finite iterator over every seed's files.
///
/// Construct a fresh one to read the inputs again.
#[derive(Debug)]
pub struct SeedBatches {
    raw_dir: PathBuf,
    queue: VecDeque<(Identity, FileRole)>,
    master_list: Option<BTreeSet<Identity>>,
}

impl SeedBatches {
    /// Plan reads for `seeds` in sorted, deduplicated order.
    pub fn new(raw_dir: impl Into<PathBuf>, seeds: &[Identity]) -> Self {
        let ordered: BTreeSet<&Identity> = seeds.iter().collect();
        let queue = ordered
            .into_iter()
            .flat_map(|seed| FileRole::ORDER.map(|role| (seed.clone(), role)))
            .collect();
        Self {
            raw_dir: raw_dir.into(),
            queue,
            master_list: None,
        }
    }

    fn decode(&mut self, role: FileRole, bytes: &[u8]) -> Result<RecordBatch, TrustError> {
        match role {
            FileRole::Followings => {
                let decoded = parse_followings(bytes)?;
                self.master_list = decoded.master_list;
                Ok(decoded.batch)
            }
            FileRole::ExtendedFollowings => {
                parse_extended_followings(bytes, self.master_list.as_ref())
            }
            FileRole::Interactions => parse_interactions(bytes),
        }
    }
}

impl Iterator for SeedBatches {
    type Item = SourceItem;

    fn next(&mut self) -> Option<SourceItem> {
        let (seed, role) = self.queue.pop_front()?;
        let path = seed_file_path(&self.raw_dir, &seed, role);

        // A master list never leaks from one seed into the next.
        if role == FileRole::Followings {
            self.master_list = None;
        }

        let item = match read_input(&path) {
            Err(TrustError::MissingInputFile(_)) => SourceItem::Missing { seed, role, path },
            Err(error) => SourceItem::Unreadable {
                seed,
                role,
                path,
                error,
            },
            Ok(bytes) => match self.decode(role, &bytes) {
                Ok(batch) => SourceItem::Batch {
                    seed,
                    role,
                    path,
                    batch,
                },
                Err(error) => SourceItem::Unreadable {
                    seed,
                    role,
                    path,
                    error,
                },
            },
        };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
