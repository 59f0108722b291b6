//! # Edge List Export
//!
//! Freezes the trust matrix into a sorted, byte-reproducible edge list.
//!
//! Format (UTF-8, `\n` line endings):
//! ```text
//! i,j,v
//! alice,bob,80
//! bob,carol,30
//! ```
//!
//! Rows are sorted by (i, j). Self-loops and zero-score pairs are never
//! written, even if one slipped past the extractor.

use crate::aggregator::TrustMatrix;
use crate::primitives::EDGE_LIST_HEADER;
use crate::TrustEdge;

// =============================================================================
// EDGE LIST
// =============================================================================

/// The finalized, sorted output of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EdgeList {
    edges: Vec<TrustEdge>,
}

impl EdgeList {
    /// Edges in (source, target) order.
    #[must_use]
    pub fn edges(&self) -> &[TrustEdge] {
        &self.edges
    }

    /// Number of rows (header excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Check if the list has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Render the `i,j,v` artifact.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(EDGE_LIST_HEADER.len() + 1 + self.edges.len() * 24);
        out.push_str(EDGE_LIST_HEADER);
        out.push('\n');
        for edge in &self.edges {
            push_field(&mut out, edge.source.as_str());
            out.push(',');
            push_field(&mut out, edge.target.as_str());
            out.push(',');
            out.push_str(&edge.score.to_string());
            out.push('\n');
        }
        out
    }

    /// Compute a deterministic checksum of the rendered artifact.
    ///
    /// FNV-1a over the CSV bytes. This is **NOT** a cryptographic hash; it
    /// detects accidental differences between runs. Enable the
    /// `crypto-hash` feature for a BLAKE3 digest.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

        self.to_csv().bytes().fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
    }

    /// BLAKE3 digest of the rendered artifact, hex encoded.
    #[cfg(feature = "crypto-hash")]
    #[must_use]
    pub fn blake3_hex(&self) -> String {
        blake3::hash(self.to_csv().as_bytes()).to_hex().to_string()
    }
}

// =============================================================================
// EXPORT FUNCTIONS
// =============================================================================

/// Freeze a trust matrix into a sorted edge list.
///
/// The matrix already iterates in (source, target) order; the sort is kept
/// so the ordering does not depend on that detail.
#[must_use]
pub fn export(matrix: &TrustMatrix) -> EdgeList {
    let mut edges: Vec<TrustEdge> = matrix
        .edges()
        .filter(|edge| edge.source != edge.target)
        .filter(|edge| edge.score.value() > 0)
        .collect();
    edges.sort();
    EdgeList { edges }
}

/// Append a CSV field, quoting it when it contains a separator, quote or
/// line break.
fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

// =============================================================================
// TESTS
// =============================================================================
