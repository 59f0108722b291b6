//! # Normalizer
//!
//! Canonicalizes raw usernames into [`Identity`] keys.
//!
//! Normalization lower-cases, drops leading `@` sigils and trims surrounding
//! whitespace. It is pure and idempotent:
//! `normalize(normalize(x)) == normalize(x)`.

use crate::primitives::{MAX_IDENTITY_LENGTH, MENTION_SIGIL};
use crate::{Identity, TrustError};

/// Normalize a raw username.
///
/// Sigils and whitespace interleaved at the front (`" @ @Bob"`) are all
/// removed, so the result never starts with either and a second pass is a
/// no-op. Empty or all-whitespace input yields an empty identity.
#[must_use]
pub fn normalize(raw: &str) -> Identity {
    let lowered = raw.to_lowercase();
    let stripped = lowered
        .trim_start_matches(|c: char| c == MENTION_SIGIL || c.is_whitespace())
        .trim_end();
    Identity::from_normalized(stripped.to_string())
}

/// Normalize a username that must name an edge endpoint.
///
/// `field` names the record field for the error message.
pub fn normalize_required(raw: &str, field: &str) -> Result<Identity, TrustError> {
    if raw.len() > MAX_IDENTITY_LENGTH {
        return Err(TrustError::MalformedRecord(format!(
            "{} exceeds {} bytes",
            field, MAX_IDENTITY_LENGTH
        )));
    }
    let identity = normalize(raw);
    if identity.is_empty() {
        return Err(TrustError::MalformedRecord(format!("empty {}", field)));
    }
    Ok(identity)
}

/// Normalize an optional reference; blank or oversized references vanish.
#[must_use]
pub fn normalize_optional(raw: Option<&str>) -> Option<Identity> {
    raw.filter(|s| s.len() <= MAX_IDENTITY_LENGTH)
        .map(normalize)
        .filter(|identity| !identity.is_empty())
}

// =============================================================================
// TESTS
// =============================================================================
