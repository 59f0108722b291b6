//! # Seed File Formats
//!
//! Pure decoders for the three per-seed JSON files. File I/O lives in the
//! app layer; these functions only turn bytes into [`RecordBatch`]es.
//!
//! | File | Yields |
//! |------|--------|
//! | `<seed>_seed_followings.json` | seed users × master list follow pairs |
//! | `<seed>_seed_extended_followings.json` | user → followed pairs, restricted to the master list |
//! | `<seed>_seed_interactions.json` | posts and replies |
//!
//! Unknown fields are ignored. Missing optional fields default to empty.

use crate::normalizer::normalize_optional;
use crate::{Identity, PostId, PostKind, RawFollow, RawPost, RecordBatch, TrustError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeSet;

// =============================================================================
// WIRE SHAPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct UserRef {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FollowingsFile {
    #[serde(default)]
    seed_users: Vec<UserRef>,
    #[serde(default)]
    master_list: Option<Vec<UserRef>>,
}

#[derive(Debug, Deserialize)]
struct ExtendedUser {
    #[serde(default)]
    username: Option<String>,
    #[serde(default, alias = "following_usernames")]
    following: Vec<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct ExtendedFollowingsFile {
    #[serde(default)]
    users: Vec<ExtendedUser>,
}

#[derive(Debug, Deserialize)]
struct PostEntry {
    #[serde(default, deserialize_with = "lenient_post_id")]
    post_id: Option<PostId>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    is_reply: bool,
    #[serde(default)]
    reply_to_username: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    is_retweet: bool,
    #[serde(default, deserialize_with = "truthy")]
    is_quote: bool,
    #[serde(default)]
    original_post_creator_username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InteractionUser {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    posts: Vec<PostEntry>,
    #[serde(default)]
    replies: Vec<PostEntry>,
}

#[derive(Debug, Deserialize)]
struct InteractionsFile {
    #[serde(default)]
    users: Vec<InteractionUser>,
}

/// Flags arrive as booleans, nulls or embedded objects (a quoted tweet is
/// sometimes inlined under `is_quote`). Anything non-empty counts as set.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_u64() != Some(0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

/// Numeric and string ids are kept; anything else leaves the post without
/// an id, which the record store rejects as malformed.
fn lenient_post_id<'de, D>(deserializer: D) -> Result<Option<PostId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().map(PostId::Numeric),
        Value::String(s) => Some(PostId::Text(s)),
        _ => None,
    })
}

fn decode<T: DeserializeOwned>(bytes: &[u8], what: &str) -> Result<T, TrustError> {
    serde_json::from_slice(bytes)
        .map_err(|e| TrustError::UnreadableInput(format!("{}: {}", what, e)))
}

// =============================================================================
// FOLLOWINGS
// =============================================================================

/// Decoded `<seed>_seed_followings.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFollowings {
    /// One follow pair from every seed user to every master-list user.
    pub batch: RecordBatch,
    /// Normalized master list, used to restrict extended follows. `None`
    /// when the file has no `master_list` key.
    pub master_list: Option<BTreeSet<Identity>>,
}

/// Decode a seed followings file.
pub fn parse_followings(bytes: &[u8]) -> Result<SeedFollowings, TrustError> {
    let file: FollowingsFile = decode(bytes, "seed followings")?;

    let masters = file.master_list.as_deref().unwrap_or_default();
    let master_list = file.master_list.as_ref().map(|users| {
        users
            .iter()
            .filter_map(|user| normalize_optional(user.username.as_deref()))
            .collect()
    });

    let mut follows = Vec::with_capacity(file.seed_users.len() * masters.len());
    for seed in &file.seed_users {
        let source = seed.username.as_deref().unwrap_or_default();
        for master in masters {
            let target = master.username.as_deref().unwrap_or_default();
            follows.push(RawFollow::new(source, target));
        }
    }

    Ok(SeedFollowings {
        batch: RecordBatch::Follows(follows),
        master_list,
    })
}

// =============================================================================
// EXTENDED FOLLOWINGS
// =============================================================================

/// Decode a seed extended followings file.
///
/// When `master_list` is given, only follows whose target is on it are
/// kept; otherwise every listed follow is kept.
pub fn parse_extended_followings(
    bytes: &[u8],
    master_list: Option<&BTreeSet<Identity>>,
) -> Result<RecordBatch, TrustError> {
    let file: ExtendedFollowingsFile = decode(bytes, "seed extended followings")?;

    let mut follows = Vec::new();
    for user in &file.users {
        let source = user.username.as_deref().unwrap_or_default();
        for followed in &user.following {
            let target = followed.as_deref().unwrap_or_default();
            if let Some(master) = master_list {
                match normalize_optional(Some(target)) {
                    Some(identity) if master.contains(&identity) => {}
                    _ => continue,
                }
            }
            follows.push(RawFollow::new(source, target));
        }
    }

    Ok(RecordBatch::Follows(follows))
}

// =============================================================================
// INTERACTIONS
// =============================================================================

/// Decode a seed interactions file into posts, user by user, posts before
/// replies.
pub fn parse_interactions(bytes: &[u8]) -> Result<RecordBatch, TrustError> {
    let file: InteractionsFile = decode(bytes, "seed interactions")?;

    let mut posts = Vec::new();
    for user in file.users {
        let owner = user.username.unwrap_or_default();
        for entry in user.posts {
            posts.push(entry.into_raw(&owner, false));
        }
        for entry in user.replies {
            posts.push(entry.into_raw(&owner, true));
        }
    }

    Ok(RecordBatch::Posts(posts))
}

impl PostEntry {
    fn into_raw(self, owner: &str, from_replies: bool) -> RawPost {
        let kind = if from_replies || self.is_reply {
            PostKind::Reply
        } else {
            PostKind::Post
        };
        let retweet_of = if self.is_retweet {
            self.original_post_creator_username.clone()
        } else {
            None
        };
        // A retweet of a quote credits the retweeted author once.
        let quote_of = if self.is_quote && !self.is_retweet {
            self.original_post_creator_username
        } else {
            None
        };

        RawPost {
            post_id: self.post_id,
            author: self.author.unwrap_or_else(|| owner.to_string()),
            text: self.text.unwrap_or_default(),
            kind,
            reply_to: self.reply_to_username,
            retweet_of,
            quote_of,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;

    #[test]
    fn followings_cross_product() {
        let json = br#"{
            "seed_users": [{"username": "Alice"}, {"username": "bob"}],
            "master_list": [{"username": "@Carol"}, {"username": "dave"}]
        }"#;
        let parsed = parse_followings(json).expect("parse");

        let RecordBatch::Follows(follows) = &parsed.batch else {
            unreachable!("followings decode to follows")
        };
        assert_eq!(follows.len(), 4);
        assert_eq!(follows[0], RawFollow::new("Alice", "@Carol"));
        assert_eq!(follows[3], RawFollow::new("bob", "dave"));
        assert!(
            parsed
                .master_list
                .is_some_and(|master| master.contains(&normalize("carol")))
        );
    }

    #[test]
    fn followings_missing_sections_are_empty() {
        let parsed = parse_followings(b"{}").expect("parse");
        assert!(parsed.batch.is_empty());
        assert_eq!(parsed.master_list, None);
    }

    #[test]
    fn empty_master_list_is_still_a_master_list() {
        let parsed = parse_followings(br#"{"seed_users": [{"username": "amy"}], "master_list": []}"#)
            .expect("parse");
        assert_eq!(parsed.master_list, Some(BTreeSet::new()));
    }

    #[test]
    fn extended_followings_respect_master_list() {
        let json = br#"{"users": [
            {"username": "erin", "following": ["carol", "@DAVE", "zed", null]}
        ]}"#;
        let master: BTreeSet<Identity> = [normalize("carol"), normalize("dave")].into();

        let filtered = parse_extended_followings(json, Some(&master)).expect("parse");
        assert_eq!(
            filtered,
            RecordBatch::Follows(vec![
                RawFollow::new("erin", "carol"),
                RawFollow::new("erin", "@DAVE"),
            ])
        );

        let unfiltered = parse_extended_followings(json, None).expect("parse");
        assert_eq!(unfiltered.len(), 4);
    }

    #[test]
    fn interactions_map_flags_to_references() {
        let json = br#"{"users": [{
            "username": "alice",
            "posts": [
                {"post_id": 1, "text": "rt", "is_retweet": true,
                 "original_post_creator_username": "bob"},
                {"post_id": "2", "text": "look", "is_quote": {"id": 99},
                 "original_post_creator_username": "carol"},
                {"post_id": 3, "text": "@dave yes", "is_reply": true,
                 "reply_to_username": "dave", "created_at": "2024-01-01"}
            ],
            "replies": [
                {"post_id": 4, "text": "ok", "reply_to_username": "erin"}
            ]
        }]}"#;
        let RecordBatch::Posts(posts) = parse_interactions(json).expect("parse") else {
            unreachable!("interactions decode to posts")
        };

        assert_eq!(posts.len(), 4);
        assert_eq!(posts[0].retweet_of.as_deref(), Some("bob"));
        assert_eq!(posts[0].quote_of, None);
        assert_eq!(posts[1].post_id, Some(PostId::Text("2".to_string())));
        assert_eq!(posts[1].quote_of.as_deref(), Some("carol"));
        assert_eq!(posts[2].kind, PostKind::Reply);
        assert_eq!(posts[3].kind, PostKind::Reply);
        assert_eq!(posts[3].author, "alice");
    }

    #[test]
    fn retweeted_quote_is_only_a_retweet() {
        let json = br#"{"users": [{"username": "alice", "posts": [
            {"post_id": 1, "is_retweet": true, "is_quote": {"id": 5},
             "original_post_creator_username": "bob"}
        ]}]}"#;
        let RecordBatch::Posts(posts) = parse_interactions(json).expect("parse") else {
            unreachable!("interactions decode to posts")
        };
        assert_eq!(posts[0].retweet_of.as_deref(), Some("bob"));
        assert_eq!(posts[0].quote_of, None);
    }

    #[test]
    fn falsy_flags_do_not_set_references() {
        let json = br#"{"users": [{"username": "alice", "posts": [
            {"post_id": 1, "is_quote": null, "is_retweet": false,
             "original_post_creator_username": "bob"}
        ]}]}"#;
        let RecordBatch::Posts(posts) = parse_interactions(json).expect("parse") else {
            unreachable!("interactions decode to posts")
        };
        assert_eq!(posts[0].retweet_of, None);
        assert_eq!(posts[0].quote_of, None);
    }

    #[test]
    fn odd_post_ids_become_missing() {
        let json = br#"{"users": [{"username": "alice", "posts": [
            {"post_id": -4}, {"post_id": 1.5}, {"post_id": [1]}
        ]}]}"#;
        let RecordBatch::Posts(posts) = parse_interactions(json).expect("parse") else {
            unreachable!("interactions decode to posts")
        };
        assert!(posts.iter().all(|p| p.post_id.is_none()));
    }

    #[test]
    fn invalid_json_is_unreadable() {
        let result = parse_interactions(b"{not json");
        assert!(matches!(result, Err(TrustError::UnreadableInput(_))));
    }
}
