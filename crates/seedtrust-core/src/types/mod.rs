//! # Core Type Definitions
//!
//! This module contains all core types for the seedtrust aggregation engine:
//! - Identities and record keys (`Identity`, `PostId`)
//! - Deduplicated records (`FollowRecord`, `Post`)
//! - Raw collaborator input (`RawFollow`, `RawPost`, `RecordBatch`)
//! - Derived units (`InteractionEvent`, `TrustEdge`, `Score`)
//! - Error types (`TrustError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Use saturating arithmetic for scores to prevent overflow

use crate::run::RunState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// IDENTITY
// =============================================================================

/// A normalized username.
///
/// Only [`crate::normalizer::normalize`] constructs identities, so every
/// value is lower-case, carries no leading `@` and no surrounding whitespace.
/// An empty identity is representable but never valid as an edge endpoint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub(crate) fn from_normalized(s: String) -> Self {
        Self(s)
    }

    /// Get the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when normalization left nothing behind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// POST IDENTIFIER
// =============================================================================

/// Opaque post identifier, compared by exact raw value.
///
/// Upstream producers emit either JSON numbers or strings. The two are kept
/// apart: `5` and `"5"` are different identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Numeric(u64),
    Text(String),
}

impl PostId {
    /// An empty textual id carries no identity.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, PostId::Text(s) if s.is_empty())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Numeric(n) => write!(f, "{}", n),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// SCORE
// =============================================================================

/// A non-negative trust contribution or aggregated trust score.
///
/// Uses u64 with saturating arithmetic to prevent overflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Score(pub u64);

impl Score {
    /// The starting value of every pair.
    pub const ZERO: Score = Score(0);

    /// Create a new score with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Add another contribution using saturating arithmetic.
    #[must_use]
    pub const fn saturating_add(self, other: Score) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Get the raw score value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// INTERACTION KIND
// =============================================================================

/// The five interaction kinds that contribute trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Follow,
    Mention,
    Reply,
    Retweet,
    Quote,
}

impl InteractionKind {
    /// Every kind, in configuration order.
    pub const ALL: [InteractionKind; 5] = [
        InteractionKind::Follow,
        InteractionKind::Mention,
        InteractionKind::Reply,
        InteractionKind::Retweet,
        InteractionKind::Quote,
    ];

    /// The configuration key for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Follow => "follow",
            InteractionKind::Mention => "mention",
            InteractionKind::Reply => "reply",
            InteractionKind::Retweet => "retweet",
            InteractionKind::Quote => "quote",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InteractionKind {
    type Err = TrustError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        InteractionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value.trim())
            .ok_or_else(|| {
                TrustError::Configuration(format!(
                    "unknown interaction kind '{}', expected one of: follow, mention, reply, retweet, quote",
                    value
                ))
            })
    }
}

// =============================================================================
// RAW RECORDS (collaborator input)
// =============================================================================

/// A follow pair exactly as the upstream producer wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFollow {
    pub source: String,
    pub target: String,
}

impl RawFollow {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A post or reply before validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawPost {
    pub post_id: Option<PostId>,
    pub author: String,
    pub text: String,
    pub kind: PostKind,
    pub reply_to: Option<String>,
    pub retweet_of: Option<String>,
    pub quote_of: Option<String>,
}

/// One unit of input handed to the engine by a discovery collaborator.
///
/// Batches are consumed in order; the engine never asks for a batch twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordBatch {
    Follows(Vec<RawFollow>),
    Posts(Vec<RawPost>),
}

impl RecordBatch {
    /// Number of raw records in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            RecordBatch::Follows(follows) => follows.len(),
            RecordBatch::Posts(posts) => posts.len(),
        }
    }

    /// Check if the batch carries no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// DEDUPLICATED RECORDS
// =============================================================================

/// A unique follow edge. The pair itself is the identity of the record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FollowRecord {
    pub source: Identity,
    pub target: Identity,
}

/// Post-or-reply tag carried by every post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PostKind {
    #[default]
    Post,
    Reply,
}

/// A validated post. Each optional reference is an explicit field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author: Identity,
    pub text: String,
    pub kind: PostKind,
    pub reply_to: Option<Identity>,
    pub retweet_of: Option<Identity>,
    pub quote_of: Option<Identity>,
}

// =============================================================================
// INTERACTION EVENT
// =============================================================================

/// A directed, typed contribution derived from one record.
///
/// Events are transient: created per record, folded into the trust matrix,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct InteractionEvent {
    pub source: Identity,
    pub target: Identity,
    pub kind: InteractionKind,
}

impl InteractionEvent {
    /// Create a new event.
    #[must_use]
    pub fn new(source: Identity, target: Identity, kind: InteractionKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }

    /// True when the event points back at its own source.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

// =============================================================================
// TRUST EDGE
// =============================================================================

/// One row of the exported edge list.
///
/// Sorted by (source, target) for deterministic ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrustEdge {
    /// Trusting identity (`i`).
    pub source: Identity,
    /// Trusted identity (`j`).
    pub target: Identity,
    /// Aggregated score (`v`).
    pub score: Score,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in a trust run.
///
/// - No silent failures
/// - Per-record and per-file variants are recoverable; callers log, count, skip
/// - Configuration, transition and write variants are fatal for the run
#[derive(Debug, Error)]
pub enum TrustError {
    /// An expected seed input file is absent.
    #[error("Missing input file: {}", .0.display())]
    MissingInputFile(PathBuf),

    /// A record lacks a required field or normalizes to an empty identity.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// An input file exists but cannot be decoded.
    #[error("Unreadable input: {0}")]
    UnreadableInput(String),

    /// The weight table or run configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The output artifact could not be written.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(String),

    /// A run method was called out of pipeline order.
    #[error("Invalid run transition: {from:?} -> {to:?}")]
    InvalidTransition { from: RunState, to: RunState },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_saturating_add() {
        let score = Score::new(u64::MAX);
        assert_eq!(score.saturating_add(Score::new(5)).value(), u64::MAX);
    }

    #[test]
    fn score_normal_add() {
        assert_eq!(Score::ZERO.saturating_add(Score::new(30)), Score::new(30));
    }

    #[test]
    fn interaction_kind_parses_config_keys() {
        for kind in InteractionKind::ALL {
            let parsed: InteractionKind = kind.as_str().parse().expect("parse");
            assert_eq!(parsed, kind);
        }
        assert!("like".parse::<InteractionKind>().is_err());
    }

    #[test]
    fn post_id_numeric_and_text_are_distinct() {
        let numeric: PostId = serde_json::from_str("5").expect("numeric");
        let text: PostId = serde_json::from_str("\"5\"").expect("text");
        assert_eq!(numeric, PostId::Numeric(5));
        assert_eq!(text, PostId::Text("5".to_string()));
        assert_ne!(numeric, text);
    }
}
