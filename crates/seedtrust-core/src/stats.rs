//! # Run Statistics
//!
//! Counters and score distribution reported alongside the edge list.
//!
//! All figures are integers. The mean is kept as fixed-point hundredths
//! (`mean_centis`) so the summary is identical on every platform.

use crate::{InteractionKind, TrustEdge};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// SCORE SUMMARY
// =============================================================================

/// Distribution of final edge scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScoreSummary {
    pub min: u64,
    pub max: u64,
    pub sum: u64,
    /// Mean score * 100, truncated.
    pub mean_centis: u64,
}

impl ScoreSummary {
    /// Summarize a set of exported edges. Empty input yields all zeros.
    #[must_use]
    pub fn from_edges(edges: &[TrustEdge]) -> Self {
        if edges.is_empty() {
            return Self::default();
        }

        let mut min = u64::MAX;
        let mut max = 0;
        let mut sum: u64 = 0;
        for edge in edges {
            let v = edge.score.value();
            min = min.min(v);
            max = max.max(v);
            sum = sum.saturating_add(v);
        }

        // u128 keeps sum * 100 exact for any u64 sum
        let mean_centis = (u128::from(sum) * 100 / edges.len() as u128) as u64;

        Self {
            min,
            max,
            sum,
            mean_centis,
        }
    }

    /// Mean rendered with two decimals, e.g. `80.00`.
    #[must_use]
    pub fn mean_display(&self) -> String {
        format!("{}.{:02}", self.mean_centis / 100, self.mean_centis % 100)
    }
}

// =============================================================================
// RUN STATS
// =============================================================================

/// Everything a run counted, from ingestion to export.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RunStats {
    /// Unique follow pairs admitted by the record store.
    pub unique_follows: u64,
    /// Unique posts and replies admitted by the record store.
    pub unique_posts: u64,
    pub duplicate_follows: u64,
    pub duplicate_posts: u64,
    pub malformed_records: u64,
    /// Events dropped because source and target were the same identity.
    pub self_loops_dropped: u64,
    pub missing_inputs: u64,
    pub unreadable_inputs: u64,
    /// Aggregated events per interaction kind.
    pub events_by_kind: BTreeMap<InteractionKind, u64>,
    /// Rows in the exported edge list.
    pub edge_count: u64,
    pub score: ScoreSummary,
}

impl RunStats {
    /// Total aggregated events across all kinds.
    #[must_use]
    pub fn total_events(&self) -> u64 {
        self.events_by_kind.values().sum()
    }

    /// Aggregated events of one kind (zero if none).
    #[must_use]
    pub fn events_of(&self, kind: InteractionKind) -> u64 {
        self.events_by_kind.get(&kind).copied().unwrap_or(0)
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records")?;
        writeln!(f, "  Unique follows:     {}", self.unique_follows)?;
        writeln!(f, "  Unique posts:       {}", self.unique_posts)?;
        writeln!(f, "  Duplicate follows:  {}", self.duplicate_follows)?;
        writeln!(f, "  Duplicate posts:    {}", self.duplicate_posts)?;
        writeln!(f, "  Malformed records:  {}", self.malformed_records)?;
        writeln!(f, "  Self-loops dropped: {}", self.self_loops_dropped)?;
        writeln!(f, "  Missing inputs:     {}", self.missing_inputs)?;
        writeln!(f, "  Unreadable inputs:  {}", self.unreadable_inputs)?;
        writeln!(f)?;
        writeln!(f, "Events ({} total)", self.total_events())?;
        for kind in InteractionKind::ALL {
            writeln!(f, "  {:<8} {}", kind.as_str(), self.events_of(kind))?;
        }
        writeln!(f)?;
        writeln!(f, "Trust edges: {}", self.edge_count)?;
        if self.edge_count > 0 {
            writeln!(f, "  Min:     {}", self.score.min)?;
            writeln!(f, "  Max:     {}", self.score.max)?;
            writeln!(f, "  Average: {}", self.score.mean_display())?;
            write!(f, "  Total:   {}", self.score.sum)?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
