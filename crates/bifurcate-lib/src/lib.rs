// bifurcate: Bloom-filter enumeration of de Bruijn graph bifurcation vertices
//
// Finds the k-mers of a sequence collection that are sequence endpoints or
// branch points of the implied de Bruijn graph, under a fixed memory bound.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod constants;
pub mod encoding;
pub mod kmer;
pub mod hasher;
pub mod membership;
pub mod bloom;
pub mod error;
pub mod vertex_index;
pub mod enumerator;

// Re-export common types at crate root
pub use kmer::DnaKmer;
pub use bloom::{BloomFilter, BloomFilterBuilder};
pub use membership::{EdgeMembership, EdgeSetBuilder, ExactEdgeSet, ExactEdgeSetBuilder};
pub use error::EnumeratorError;
pub use vertex_index::VertexIndex;
pub use enumerator::{EnumerationStats, EnumeratorConfig, FastxFile, InMemorySequences, SequenceSource, VertexEnumerator};

/// Version information
pub fn version() -> (u8, u8, u8) {
    constants::VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let (major, minor, patch) = version();
        assert_eq!(major, 0);
        assert_eq!(minor, 1);
        assert_eq!(patch, 0);
    }
}
