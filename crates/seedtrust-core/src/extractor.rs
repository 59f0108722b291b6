//! # Interaction Extractor
//!
//! Derives directed interaction events from deduplicated records.
//!
//! Reply, retweet, quote and mention extraction are independent: a single
//! post emits every event it qualifies for. Self-referential events are
//! dropped here, so nothing downstream ever sees a self-loop from this path.

use crate::normalizer::normalize;
use crate::primitives::MENTION_PATTERN;
use crate::{FollowRecord, Identity, InteractionEvent, InteractionKind, Post, PostKind};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static RE_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MENTION_PATTERN).expect("mention pattern is valid"));

/// Events derived from one record plus the number of self-loops dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub events: Vec<InteractionEvent>,
    pub self_loops: u64,
}

impl Extraction {
    fn push(&mut self, source: &Identity, target: &Identity, kind: InteractionKind) {
        let event = InteractionEvent::new(source.clone(), target.clone(), kind);
        if event.is_self_loop() {
            self.self_loops += 1;
        } else {
            self.events.push(event);
        }
    }
}

/// Extract every interaction event a post qualifies for.
///
/// Order of the returned events: reply, retweet, quote, then mentions in
/// identity order.
#[must_use]
pub fn extract(post: &Post) -> Extraction {
    let mut extraction = Extraction::default();

    if let (PostKind::Reply, Some(target)) = (post.kind, &post.reply_to) {
        extraction.push(&post.author, target, InteractionKind::Reply);
    }
    if let Some(target) = &post.retweet_of {
        extraction.push(&post.author, target, InteractionKind::Retweet);
    }
    if let Some(target) = &post.quote_of {
        extraction.push(&post.author, target, InteractionKind::Quote);
    }
    for mentioned in extract_mentions(&post.text) {
        extraction.push(&post.author, &mentioned, InteractionKind::Mention);
    }

    extraction
}

/// Convert a unique follow record into its event.
#[must_use]
pub fn extract_follow(record: &FollowRecord) -> Extraction {
    let mut extraction = Extraction::default();
    extraction.push(&record.source, &record.target, InteractionKind::Follow);
    extraction
}

/// Distinct mentioned identities in `text`.
///
/// A handle mentioned several times (in any case) appears once.
#[must_use]
pub fn extract_mentions(text: &str) -> BTreeSet<Identity> {
    RE_MENTION
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|handle| normalize(handle.as_str()))
        .filter(|identity| !identity.is_empty())
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
