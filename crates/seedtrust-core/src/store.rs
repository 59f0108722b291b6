//! # Record Store
//!
//! In-memory deduplicating index for the two record families.
//!
//! - Follow edges are keyed by the normalized (source, target) pair
//! - Posts and replies are keyed by their raw post identifier
//! - First occurrence wins; later duplicates are no-ops
//!
//! Check-and-insert is a single `BTreeSet::insert` call, so a key can never
//! be admitted twice regardless of file order.

use crate::normalizer::{normalize_optional, normalize_required};
use crate::{FollowRecord, Post, PostId, RawPost, TrustError};
use std::collections::BTreeSet;

/// Deduplicating record index owned by exactly one run.
#[derive(Debug, Default)]
pub struct RecordStore {
    follows: BTreeSet<FollowRecord>,
    posts: BTreeSet<PostId>,
}

impl RecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a follow pair.
    ///
    /// Returns `Ok(Some(record))` the first time the normalized pair is seen
    /// and `Ok(None)` on every later sighting.
    ///
    /// # Errors
    /// Returns `TrustError::MalformedRecord` if either endpoint normalizes to
    /// an empty identity. Malformed pairs are not registered.
    pub fn add_follow(
        &mut self,
        source_raw: &str,
        target_raw: &str,
    ) -> Result<Option<FollowRecord>, TrustError> {
        let record = FollowRecord {
            source: normalize_required(source_raw, "follow source")?,
            target: normalize_required(target_raw, "follow target")?,
        };

        if self.follows.insert(record.clone()) {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    /// Register a post or reply.
    ///
    /// Returns `Ok(Some(post))` with the validated post on first sight of its
    /// identifier and `Ok(None)` if the identifier was already recorded.
    ///
    /// # Errors
    /// Returns `TrustError::MalformedRecord` if the post has no identifier or
    /// no usable author. Malformed posts do not claim their identifier.
    pub fn add_post(&mut self, raw: RawPost) -> Result<Option<Post>, TrustError> {
        let id = raw
            .post_id
            .filter(|id| !id.is_blank())
            .ok_or_else(|| TrustError::MalformedRecord("post without post_id".to_string()))?;
        let author = normalize_required(&raw.author, "post author")?;

        if !self.posts.insert(id.clone()) {
            return Ok(None);
        }

        Ok(Some(Post {
            id,
            author,
            text: raw.text,
            kind: raw.kind,
            reply_to: normalize_optional(raw.reply_to.as_deref()),
            retweet_of: normalize_optional(raw.retweet_of.as_deref()),
            quote_of: normalize_optional(raw.quote_of.as_deref()),
        }))
    }

    /// Number of unique follow pairs.
    #[must_use]
    pub fn follow_count(&self) -> usize {
        self.follows.len()
    }

    /// Number of unique posts and replies.
    #[must_use]
    pub fn post_count(&self) -> usize {
        self.posts.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
