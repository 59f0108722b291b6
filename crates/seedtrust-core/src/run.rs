//! # Trust Run
//!
//! The aggregation context for one computation: record store, pending
//! events, trust matrix and statistics, owned by a single [`TrustRun`].
//! Nothing is shared between runs.
//!
//! ## Pipeline
//!
//! | State | Entered by | Work |
//! |-------|------------|------|
//! | Idle | `TrustRun::new` | nothing yet |
//! | Ingesting | `ingest` | dedup records, extract events |
//! | Aggregating | `aggregate` | fold events into the matrix |
//! | Exporting | `export` | freeze and sort the edge list |
//! | Done | `export` returns | run is spent |
//!
//! There is no backward transition. Calling a method out of order returns
//! `TrustError::InvalidTransition` and leaves the run untouched.

use crate::aggregator::TrustMatrix;
use crate::export::{EdgeList, export};
use crate::extractor::{Extraction, extract, extract_follow};
use crate::primitives::MAX_REPORTED_REJECTIONS;
use crate::stats::{RunStats, ScoreSummary};
use crate::store::RecordStore;
use crate::weights::WeightTable;
use crate::{InteractionEvent, RawFollow, RawPost, RecordBatch, TrustError};
use serde::{Deserialize, Serialize};

// =============================================================================
// RUN STATE
// =============================================================================

/// Position of a run in the single-pass pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Ingesting,
    Aggregating,
    Exporting,
    Done,
}

impl RunState {
    /// Get the next state, if any.
    #[must_use]
    pub fn next(&self) -> Option<RunState> {
        match self {
            RunState::Idle => Some(RunState::Ingesting),
            RunState::Ingesting => Some(RunState::Aggregating),
            RunState::Aggregating => Some(RunState::Exporting),
            RunState::Exporting => Some(RunState::Done),
            RunState::Done => None,
        }
    }
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// What happened to the records of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    pub admitted: u64,
    pub duplicates: u64,
    pub malformed: u64,
    /// Why records were skipped, first [`MAX_REPORTED_REJECTIONS`] only.
    pub rejections: Vec<String>,
}

impl BatchOutcome {
    fn reject(&mut self, error: TrustError) {
        self.malformed += 1;
        if self.rejections.len() < MAX_REPORTED_REJECTIONS {
            self.rejections.push(error.to_string());
        }
    }
}

/// The finished product of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustReport {
    pub edges: EdgeList,
    pub stats: RunStats,
}

// =============================================================================
// TRUST RUN
// =============================================================================

/// One independent trust computation.
#[derive(Debug)]
pub struct TrustRun {
    state: RunState,
    weights: WeightTable,
    store: RecordStore,
    pending: Vec<InteractionEvent>,
    matrix: TrustMatrix,
    stats: RunStats,
}

impl TrustRun {
    /// Create an idle run with a validated weight table.
    #[must_use]
    pub fn new(weights: WeightTable) -> Self {
        Self {
            state: RunState::Idle,
            weights,
            store: RecordStore::new(),
            pending: Vec::new(),
            matrix: TrustMatrix::new(),
            stats: RunStats::default(),
        }
    }

    /// Current pipeline state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Statistics gathered so far.
    #[must_use]
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Move to `to`, or stay put if already there and `to` is Ingesting.
    fn enter(&mut self, to: RunState) -> Result<(), TrustError> {
        let allowed = self.state.next() == Some(to)
            || (self.state == RunState::Ingesting && to == RunState::Ingesting);
        if !allowed {
            return Err(TrustError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    // =========================================================================
    // INGESTING
    // =========================================================================

    /// Ingest one batch of raw records.
    ///
    /// Malformed records and duplicates are skipped and counted; only a call
    /// out of pipeline order fails.
    pub fn ingest(&mut self, batch: RecordBatch) -> Result<BatchOutcome, TrustError> {
        self.enter(RunState::Ingesting)?;

        let mut outcome = BatchOutcome::default();
        match batch {
            RecordBatch::Follows(follows) => {
                for follow in follows {
                    self.ingest_follow(&follow, &mut outcome);
                }
            }
            RecordBatch::Posts(posts) => {
                for post in posts {
                    self.ingest_post(post, &mut outcome);
                }
            }
        }
        Ok(outcome)
    }

    fn ingest_follow(&mut self, follow: &RawFollow, outcome: &mut BatchOutcome) {
        match self.store.add_follow(&follow.source, &follow.target) {
            Ok(Some(record)) => {
                outcome.admitted += 1;
                self.stats.unique_follows += 1;
                let extraction = extract_follow(&record);
                self.queue(extraction);
            }
            Ok(None) => {
                outcome.duplicates += 1;
                self.stats.duplicate_follows += 1;
            }
            Err(error) => {
                outcome.reject(error);
                self.stats.malformed_records += 1;
            }
        }
    }

    fn ingest_post(&mut self, post: RawPost, outcome: &mut BatchOutcome) {
        match self.store.add_post(post) {
            Ok(Some(post)) => {
                outcome.admitted += 1;
                self.stats.unique_posts += 1;
                let extraction = extract(&post);
                self.queue(extraction);
            }
            Ok(None) => {
                outcome.duplicates += 1;
                self.stats.duplicate_posts += 1;
            }
            Err(error) => {
                outcome.reject(error);
                self.stats.malformed_records += 1;
            }
        }
    }

    fn queue(&mut self, extraction: Extraction) {
        self.stats.self_loops_dropped += extraction.self_loops;
        self.pending.extend(extraction.events);
    }

    /// Count an expected input file that was absent.
    pub fn note_missing_input(&mut self) -> Result<(), TrustError> {
        self.ensure_collecting()?;
        self.stats.missing_inputs += 1;
        Ok(())
    }

    /// Count an input file that existed but could not be decoded.
    pub fn note_unreadable_input(&mut self) -> Result<(), TrustError> {
        self.ensure_collecting()?;
        self.stats.unreadable_inputs += 1;
        Ok(())
    }

    fn ensure_collecting(&self) -> Result<(), TrustError> {
        match self.state {
            RunState::Idle | RunState::Ingesting => Ok(()),
            from => Err(TrustError::InvalidTransition {
                from,
                to: RunState::Ingesting,
            }),
        }
    }

    // =========================================================================
    // AGGREGATING
    // =========================================================================

    /// Fold every pending event into the trust matrix.
    ///
    /// A run that never saw a batch passes through Ingesting with nothing
    /// to fold.
    pub fn aggregate(&mut self) -> Result<(), TrustError> {
        if self.state == RunState::Idle {
            self.enter(RunState::Ingesting)?;
        }
        self.enter(RunState::Aggregating)?;

        for event in std::mem::take(&mut self.pending) {
            self.matrix.accumulate(&event, &self.weights);
        }
        self.stats.self_loops_dropped += self.matrix.rejected();
        self.stats.events_by_kind = self.matrix.events_by_kind().clone();
        Ok(())
    }

    // =========================================================================
    // EXPORTING
    // =========================================================================

    /// Freeze the matrix into the sorted edge list and final statistics.
    pub fn export(&mut self) -> Result<TrustReport, TrustError> {
        self.enter(RunState::Exporting)?;

        let edges = export(&self.matrix);
        let mut stats = std::mem::take(&mut self.stats);
        stats.edge_count = edges.len() as u64;
        stats.score = ScoreSummary::from_edges(edges.edges());
        self.matrix = TrustMatrix::new();

        self.enter(RunState::Done)?;
        Ok(TrustReport { edges, stats })
    }
}

/// Run the whole pipeline over a finite sequence of batches.
pub fn build_trust_graph<I>(weights: WeightTable, batches: I) -> Result<TrustReport, TrustError>
where
    I: IntoIterator<Item = RecordBatch>,
{
    let mut run = TrustRun::new(weights);
    for batch in batches {
        run.ingest(batch)?;
    }
    run.aggregate()?;
    run.export()
}

// =============================================================================
// TESTS
// =============================================================================
