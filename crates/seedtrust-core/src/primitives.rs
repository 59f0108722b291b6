//! # Engine Primitives
//!
//! Hardcoded runtime constants for the seedtrust engine.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Header row of the exported edge list.
pub const EDGE_LIST_HEADER: &str = "i,j,v";

/// Marker introducing a mention inside post text.
pub const MENTION_SIGIL: char = '@';

/// Pattern matching one mention token; group 1 is the handle.
pub const MENTION_PATTERN: &str = r"@(\w+)";

// =============================================================================
// SEED FILE NAMING
// =============================================================================

/// Suffix of the per-seed follow list (`<seed>_seed_followings.json`).
pub const FOLLOWINGS_SUFFIX: &str = "_seed_followings.json";

/// Suffix of the per-seed extended follow list.
pub const EXTENDED_FOLLOWINGS_SUFFIX: &str = "_seed_extended_followings.json";

/// Suffix of the per-seed interaction log.
pub const INTERACTIONS_SUFFIX: &str = "_seed_interactions.json";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum size of a single seed input file (256 MB).
///
/// Larger files are reported as unreadable rather than loaded.
pub const MAX_INPUT_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Maximum length of a raw username before normalization.
///
/// Longer names are treated as malformed.
pub const MAX_IDENTITY_LENGTH: usize = 256;

/// Malformed-record reasons kept per batch; later ones are only counted.
pub const MAX_REPORTED_REJECTIONS: usize = 16;
