//! The two passes of vertex enumeration, applied to one fragment
//!
//! A fragment is a run of 2-bit codes with no invalid base inside it.
//!
//! Pass 1 ([`insert_edges`]) slides a window of length L + 1 over the
//! fragment and records every edge. Pass 2 ([`classify_fragment`]) slides a
//! window of length L and keeps the vertices that are bifurcations:
//! - the first and the last vertex of a fragment, always;
//! - any other vertex with more than one incoming or more than one
//!   outgoing edge among its eight single-base extensions.
//!
//! With a Bloom filter, extra edges may be reported present. That can only
//! raise the counts, so a true bifurcation is never missed; a
//! non-bifurcating vertex may be kept.
//!
//! ## Rounds
//!
//! The vertex set can be split into several rounds by hashing vertex
//! bodies. Round r only inserts edges whose prefix or suffix vertex belongs
//! to r, and only classifies vertices of r. Both extensions of a vertex `v`
//! (`c·v` has suffix `v`, `v·c` has prefix `v`) are therefore inserted in
//! the round that classifies `v`.

use crate::constants::ALPHABET;
use crate::hasher::DeterministicHasher;
use crate::kmer::DnaKmer;
use crate::membership::{EdgeMembership, EdgeSetBuilder};

/// Seed tweak keeping the round hash independent of the filter hashes
const ROUND_SEED_SALT: u64 = 0x5bd1_e995_c6a4_a793;

/// Assignment of vertices to rounds
#[derive(Debug, Clone)]
pub struct RoundPartition {
    rounds: usize,
    hasher: DeterministicHasher,
}

impl RoundPartition {
    /// Partition into `rounds` rounds (at least one)
    pub fn new(rounds: usize, seed: u64) -> Self {
        Self {
            rounds: rounds.max(1),
            hasher: DeterministicHasher::new(seed ^ ROUND_SEED_SALT),
        }
    }

    /// A partition with a single round that owns every vertex
    pub fn single() -> Self {
        Self::new(1, 0)
    }

    /// Number of rounds
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Round a vertex belongs to
    #[inline]
    pub fn round_of(&self, vertex: &DnaKmer) -> usize {
        if self.rounds == 1 {
            0
        } else {
            (self.hasher.hash_u64(vertex.body()) % self.rounds as u64) as usize
        }
    }

    #[inline]
    fn owns(&self, vertex: &DnaKmer, round: usize) -> bool {
        self.rounds == 1 || self.round_of(vertex) == round
    }
}

/// Pass 1: insert the edges of `fragment` that belong to `round`
pub fn insert_edges<B: EdgeSetBuilder>(
    fragment: &[u8],
    vertex_length: usize,
    partition: &RoundPartition,
    round: usize,
    builder: &B,
) {
    let edge_length = vertex_length + 1;
    if fragment.len() < edge_length {
        return;
    }

    let mut edge = DnaKmer::from_codes(&fragment[..edge_length]);
    let mut next = edge_length;
    loop {
        if partition.owns(&edge.prefix(), round) || partition.owns(&edge.suffix(), round) {
            builder.insert(&edge);
        }
        match fragment.get(next) {
            Some(&code) => {
                edge.roll(code);
                next += 1;
            }
            None => break,
        }
    }
}

/// Whether an internal vertex has more than one incoming or outgoing edge
///
/// Extensions are probed in [`ALPHABET`] order and the scan stops as soon
/// as either count exceeds one.
#[inline]
pub fn is_bifurcation<M: EdgeMembership + ?Sized>(vertex: &DnaKmer, edges: &M) -> bool {
    let mut in_count = 0usize;
    let mut out_count = 0usize;
    for &code in &ALPHABET {
        if edges.contains(&vertex.with_front(code)) {
            in_count += 1;
        }
        if edges.contains(&vertex.with_back(code)) {
            out_count += 1;
        }
        if in_count > 1 || out_count > 1 {
            return true;
        }
    }
    false
}

/// Pass 2: append the bifurcation vertices of `fragment` in `round` to `out`
///
/// Returns the number of vertex windows examined in this round.
pub fn classify_fragment<M: EdgeMembership + ?Sized>(
    fragment: &[u8],
    vertex_length: usize,
    partition: &RoundPartition,
    round: usize,
    edges: &M,
    out: &mut Vec<u64>,
) -> u64 {
    if fragment.len() < vertex_length {
        return 0;
    }

    let last = fragment.len() - vertex_length;
    let mut vertex = DnaKmer::from_codes(&fragment[..vertex_length]);
    let mut examined = 0u64;
    for start in 0..=last {
        if start > 0 {
            vertex.roll(fragment[start + vertex_length - 1]);
        }
        if !partition.owns(&vertex, round) {
            continue;
        }
        examined += 1;
        if start == 0 || start == last || is_bifurcation(&vertex, edges) {
            out.push(vertex.body());
        }
    }
    examined
}
