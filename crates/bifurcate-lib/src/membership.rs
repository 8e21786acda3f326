//! Edge membership: the seam between edge population and classification
//!
//! Population (pass 1) writes through an [`EdgeSetBuilder`], which only
//! needs `&self` so several threads can insert at once. Classification
//! (pass 2) reads through [`EdgeMembership`]. The builder is turned into a
//! queryable set by [`EdgeSetBuilder::freeze`], which consumes it: every
//! insert happens-before every query.
//!
//! [`ExactEdgeSet`] is the zero-false-positive implementation. It costs a
//! hash-set entry per distinct edge and serves as the reference the Bloom
//! filter is checked against.

use ahash::{AHashSet, RandomState};
use dashmap::DashSet;

use crate::kmer::DnaKmer;

/// Read side: "was this edge inserted?"
///
/// Implementations may answer `true` for edges that were never inserted,
/// but never `false` for one that was.
pub trait EdgeMembership {
    /// Whether `edge` may have been inserted
    fn contains(&self, edge: &DnaKmer) -> bool;
}

/// Write side of an edge set, shareable across threads
pub trait EdgeSetBuilder: Sync {
    /// The read-only set produced once population is complete
    type Frozen: EdgeMembership + Sync;

    /// Record an edge
    fn insert(&self, edge: &DnaKmer);

    /// Finish population and return the queryable set
    fn freeze(self) -> Self::Frozen;
}

/// Exact edge set builder backed by a concurrent hash set
pub struct ExactEdgeSetBuilder {
    edges: DashSet<u64, RandomState>,
}

impl ExactEdgeSetBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            edges: DashSet::with_hasher(RandomState::new()),
        }
    }
}

impl Default for ExactEdgeSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeSetBuilder for ExactEdgeSetBuilder {
    type Frozen = ExactEdgeSet;

    #[inline]
    fn insert(&self, edge: &DnaKmer) {
        self.edges.insert(edge.body());
    }

    fn freeze(self) -> ExactEdgeSet {
        ExactEdgeSet {
            edges: self.edges.into_iter().collect(),
        }
    }
}

/// Exact, immutable set of edge bodies
///
/// All edges of one enumeration share the same length, so the body alone
/// identifies an edge.
#[derive(Debug, Default, Clone)]
pub struct ExactEdgeSet {
    edges: AHashSet<u64>,
}

impl ExactEdgeSet {
    /// Number of distinct edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no edge was inserted
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl EdgeMembership for ExactEdgeSet {
    #[inline]
    fn contains(&self, edge: &DnaKmer) -> bool {
        self.edges.contains(&edge.body())
    }
}
