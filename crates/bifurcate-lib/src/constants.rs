//! Constants and configuration defaults
//!
//! This module defines the limits on vertex length, the default Bloom
//! filter parameters and the fixed symbol order used by the classifier.

/// Largest supported vertex length.
///
/// An edge is one symbol longer than a vertex, so a 30-symbol edge still
/// packs into 60 bits of a `u64` body.
pub const MAX_VERTEX_LENGTH: usize = 29;

/// Smallest supported vertex length
pub const MIN_VERTEX_LENGTH: usize = 1;

/// Number of symbols a [`DnaKmer`](crate::kmer::DnaKmer) can hold
pub const KMER_CAPACITY: usize = 32;

/// Default number of hash functions in the Bloom filter hash family
pub const DEFAULT_HASH_FUNCTIONS: usize = 3;

/// Default master seed the hash family seeds are derived from
pub const DEFAULT_SEED: u64 = 1;

/// Default Bloom filter size in bits (512 MiB of bit array)
pub const DEFAULT_FILTER_BITS: u64 = 1 << 32;

/// Default vertex length
pub const DEFAULT_VERTEX_LENGTH: usize = 25;

/// 2-bit codes of the nucleotide alphabet, in the order the classifier
/// scans candidate extensions: A, C, G, T.
pub const ALPHABET: [u8; 4] = [0b00, 0b01, 0b10, 0b11];

/// Version number
pub const VERSION: (u8, u8, u8) = (0, 1, 0);

/// Check if a vertex length is supported
#[inline]
pub const fn is_valid_vertex_length(vertex_length: usize) -> bool {
    vertex_length >= MIN_VERTEX_LENGTH && vertex_length <= MAX_VERTEX_LENGTH
}
