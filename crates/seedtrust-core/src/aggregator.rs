//! # Aggregator
//!
//! Folds weighted interaction events into the trust matrix.
//!
//! - One running total per ordered (source, target) pair, starting at zero
//! - Every event is a distinct contribution; no event-level deduplication
//! - Self-loops and empty endpoints never enter the matrix
//! - BTreeMap keeps iteration order deterministic

use crate::weights::WeightTable;
use crate::{Identity, InteractionEvent, InteractionKind, Score, TrustEdge};
use std::collections::BTreeMap;

/// The in-progress mapping from ordered identity pairs to aggregated score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustMatrix {
    scores: BTreeMap<(Identity, Identity), Score>,
    events_by_kind: BTreeMap<InteractionKind, u64>,
    rejected: u64,
}

impl TrustMatrix {
    /// Create an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weights.weight_of(event.kind)` to the event's pair.
    ///
    /// Returns `false` (and records nothing) for a self-loop or an event
    /// with an empty endpoint.
    pub fn accumulate(&mut self, event: &InteractionEvent, weights: &WeightTable) -> bool {
        if event.is_self_loop() || event.source.is_empty() || event.target.is_empty() {
            self.rejected = self.rejected.saturating_add(1);
            return false;
        }

        let weight = weights.weight_of(event.kind);
        let entry = self
            .scores
            .entry((event.source.clone(), event.target.clone()))
            .or_insert(Score::ZERO);
        *entry = entry.saturating_add(weight);

        let count = self.events_by_kind.entry(event.kind).or_insert(0);
        *count = count.saturating_add(1);
        true
    }

    /// Current total for an ordered pair, if any contribution was made.
    #[must_use]
    pub fn score(&self, source: &Identity, target: &Identity) -> Option<Score> {
        self.scores
            .get(&(source.clone(), target.clone()))
            .copied()
    }

    /// Iterate all pairs in (source, target) order.
    pub fn edges(&self) -> impl Iterator<Item = TrustEdge> + '_ {
        self.scores.iter().map(|((source, target), score)| TrustEdge {
            source: source.clone(),
            target: target.clone(),
            score: *score,
        })
    }

    /// Number of unique ordered pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.scores.len()
    }

    /// Accepted events per kind.
    #[must_use]
    pub fn events_by_kind(&self) -> &BTreeMap<InteractionKind, u64> {
        &self.events_by_kind
    }

    /// Events refused because they were self-loops or had empty endpoints.
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;

    const WEIGHTS: WeightTable = WeightTable::new(30, 30, 20, 50, 40);

    fn event(source: &str, target: &str, kind: InteractionKind) -> InteractionEvent {
        InteractionEvent::new(normalize(source), normalize(target), kind)
    }

    #[test]
    fn unseen_pair_starts_at_zero() {
        let matrix = TrustMatrix::new();
        assert_eq!(matrix.score(&normalize("a"), &normalize("b")), None);
        assert_eq!(matrix.pair_count(), 0);
    }

    #[test]
    fn contributions_for_a_pair_are_summed() {
        let mut matrix = TrustMatrix::new();
        matrix.accumulate(&event("alice", "bob", InteractionKind::Follow), &WEIGHTS);
        matrix.accumulate(&event("alice", "bob", InteractionKind::Reply), &WEIGHTS);
        matrix.accumulate(&event("alice", "bob", InteractionKind::Mention), &WEIGHTS);

        assert_eq!(
            matrix.score(&normalize("alice"), &normalize("bob")),
            Some(Score::new(80))
        );
        assert_eq!(matrix.pair_count(), 1);
    }

    #[test]
    fn repeated_kind_from_distinct_posts_is_fully_counted() {
        let mut matrix = TrustMatrix::new();
        for _ in 0..3 {
            matrix.accumulate(&event("alice", "bob", InteractionKind::Retweet), &WEIGHTS);
        }
        assert_eq!(
            matrix.score(&normalize("alice"), &normalize("bob")),
            Some(Score::new(150))
        );
        assert_eq!(matrix.events_by_kind()[&InteractionKind::Retweet], 3);
    }

    #[test]
    fn pairs_are_directed() {
        let mut matrix = TrustMatrix::new();
        matrix.accumulate(&event("alice", "bob", InteractionKind::Quote), &WEIGHTS);
        assert_eq!(matrix.score(&normalize("bob"), &normalize("alice")), None);
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut matrix = TrustMatrix::new();
        assert!(!matrix.accumulate(&event("eve", "@Eve", InteractionKind::Follow), &WEIGHTS));
        assert_eq!(matrix.pair_count(), 0);
        assert_eq!(matrix.rejected(), 1);
        assert!(matrix.events_by_kind().is_empty());
    }

    #[test]
    fn edges_iterate_in_pair_order() {
        let mut matrix = TrustMatrix::new();
        matrix.accumulate(&event("zed", "amy", InteractionKind::Follow), &WEIGHTS);
        matrix.accumulate(&event("amy", "zed", InteractionKind::Follow), &WEIGHTS);
        matrix.accumulate(&event("amy", "bob", InteractionKind::Follow), &WEIGHTS);

        let pairs: Vec<(String, String)> = matrix
            .edges()
            .map(|e| (e.source.to_string(), e.target.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("amy".to_string(), "bob".to_string()),
                ("amy".to_string(), "zed".to_string()),
                ("zed".to_string(), "amy".to_string()),
            ]
        );
    }
}
