//! # seedtrust-core
//!
//! The deterministic trust aggregation engine - THE LOGIC.
//!
//! This crate turns per-seed interaction logs (follows, mentions, replies,
//! retweets, quotes) into a weighted, directed local trust graph and
//! exports it as a sorted `i,j,v` edge list.
//!
//! ## Pipeline
//!
//! ```text
//! RecordBatch ──► RecordStore ──► Extractor ──► TrustMatrix ──► EdgeList
//!   (raw)         (dedup)        (events)     (weight sums)   (sorted)
//! ```
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network and NO file-system access (pure Rust)
//! - Integer arithmetic only; BTreeMap/BTreeSet only
//! - All state lives in an explicitly constructed [`TrustRun`]; there are
//!   no module-level mutable singletons
//! - Identical input in any batch order yields a byte-identical edge list

// =============================================================================
// MODULES
// =============================================================================

pub mod aggregator;
pub mod export;
pub mod extractor;
pub mod formats;
pub mod normalizer;
pub mod primitives;
pub mod run;
pub mod stats;
pub mod store;
pub mod types;
pub mod weights;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    FollowRecord, Identity, InteractionEvent, InteractionKind, Post, PostId, PostKind, RawFollow,
    RawPost, RecordBatch, Score, TrustEdge, TrustError,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use aggregator::TrustMatrix;
pub use export::{EdgeList, export};
pub use extractor::{extract, extract_follow, extract_mentions};
pub use normalizer::normalize;
pub use run::{BatchOutcome, RunState, TrustReport, TrustRun, build_trust_graph};
pub use stats::{RunStats, ScoreSummary};
pub use store::RecordStore;
pub use weights::WeightTable;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{SeedFollowings, parse_extended_followings, parse_followings, parse_interactions};
