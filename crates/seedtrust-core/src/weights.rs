//! # Weight Mapper
//!
//! Maps interaction kinds to configured trust weights.
//!
//! A [`WeightTable`] can only be built with a weight for every kind, so
//! `weight_of` is total once construction succeeds. No kind receives a
//! multiplier on top of its configured weight.

use crate::{InteractionKind, Score, TrustError};
use serde::Serialize;
use std::collections::BTreeMap;

/// Read-only interaction weights for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeightTable {
    pub follow: Score,
    pub mention: Score,
    pub reply: Score,
    pub retweet: Score,
    pub quote: Score,
}

impl WeightTable {
    /// Create a table from explicit weights.
    #[must_use]
    pub const fn new(follow: u64, mention: u64, reply: u64, retweet: u64, quote: u64) -> Self {
        Self {
            follow: Score::new(follow),
            mention: Score::new(mention),
            reply: Score::new(reply),
            retweet: Score::new(retweet),
            quote: Score::new(quote),
        }
    }

    /// Build a table from configuration entries keyed by kind name.
    ///
    /// # Errors
    /// Returns `TrustError::Configuration` if a key is not an interaction
    /// kind, if any of the five kinds is missing, or if a weight is negative.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, TrustError>
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        let mut weights: BTreeMap<InteractionKind, Score> = BTreeMap::new();

        for (key, value) in entries {
            let kind: InteractionKind = key.as_ref().parse()?;
            let weight = u64::try_from(value).map_err(|_| {
                TrustError::Configuration(format!(
                    "weight for '{}' must be non-negative, got {}",
                    kind, value
                ))
            })?;
            if weights.insert(kind, Score::new(weight)).is_some() {
                return Err(TrustError::Configuration(format!(
                    "weight for '{}' given twice",
                    kind
                )));
            }
        }

        let missing: Vec<&str> = InteractionKind::ALL
            .iter()
            .filter(|kind| !weights.contains_key(kind))
            .map(InteractionKind::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(TrustError::Configuration(format!(
                "missing weight for: {}",
                missing.join(", ")
            )));
        }

        let get = |kind| weights.get(&kind).copied().unwrap_or(Score::ZERO);
        Ok(Self {
            follow: get(InteractionKind::Follow),
            mention: get(InteractionKind::Mention),
            reply: get(InteractionKind::Reply),
            retweet: get(InteractionKind::Retweet),
            quote: get(InteractionKind::Quote),
        })
    }

    /// The configured weight of an interaction kind.
    #[must_use]
    pub const fn weight_of(&self, kind: InteractionKind) -> Score {
        match kind {
            InteractionKind::Follow => self.follow,
            InteractionKind::Mention => self.mention,
            InteractionKind::Reply => self.reply,
            InteractionKind::Retweet => self.retweet,
            InteractionKind::Quote => self.quote,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
