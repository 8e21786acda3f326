//! Bloom filter over edge bodies
//!
//! A fixed array of `M` bits plus a [`HashFamily`] of `Q` functions.
//! Inserting sets the `Q` bits an edge hashes to; a query answers `true`
//! only if all of them are set. There are no false negatives. The
//! false-positive rate grows with the number of inserted edges relative to
//! `M` and is controlled by the caller through `M` and `Q`.
//!
//! Construction is split in two types. [`BloomFilterBuilder`] stores its
//! bits in atomic words so that pass 1 can insert from several threads;
//! setting a bit is a monotone union, so inserts commute. Freezing it
//! yields a plain [`BloomFilter`] for the read-only classification pass.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::EnumeratorError;
use crate::hasher::HashFamily;
use crate::kmer::DnaKmer;
use crate::membership::{EdgeMembership, EdgeSetBuilder};

#[inline]
fn num_words(num_bits: u64) -> usize {
    num_bits.div_ceil(64) as usize
}

/// Bloom filter under construction
pub struct BloomFilterBuilder {
    words: Vec<AtomicU64>,
    num_bits: u64,
    hashes: HashFamily,
}

impl BloomFilterBuilder {
    /// Create an empty filter of `num_bits` bits
    ///
    /// # Errors
    /// Fails if `num_bits` is zero or the hash family is empty.
    pub fn new(num_bits: u64, hashes: HashFamily) -> Result<Self, EnumeratorError> {
        if num_bits == 0 {
            return Err(EnumeratorError::InvalidFilterSize);
        }
        if hashes.is_empty() {
            return Err(EnumeratorError::InvalidHashFunctions);
        }
        let mut words = Vec::with_capacity(num_words(num_bits));
        words.resize_with(num_words(num_bits), || AtomicU64::new(0));
        Ok(Self {
            words,
            num_bits,
            hashes,
        })
    }

    /// Set the bits of a packed body
    #[inline]
    pub fn insert_body(&self, body: u64) {
        for pos in self.hashes.positions(body, self.num_bits) {
            let word = (pos >> 6) as usize;
            let bit = 1u64 << (pos & 63);
            self.words[word].fetch_or(bit, Ordering::Relaxed);
        }
    }

    /// Size of the bit array
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }
}

impl EdgeSetBuilder for BloomFilterBuilder {
    type Frozen = BloomFilter;

    #[inline]
    fn insert(&self, edge: &DnaKmer) {
        self.insert_body(edge.body());
    }

    fn freeze(self) -> BloomFilter {
        BloomFilter {
            words: self.words.into_iter().map(AtomicU64::into_inner).collect(),
            num_bits: self.num_bits,
            hashes: self.hashes,
        }
    }
}

/// Read-only Bloom filter
#[derive(Clone, Debug)]
pub struct BloomFilter {
    words: Vec<u64>,
    num_bits: u64,
    hashes: HashFamily,
}

impl BloomFilter {
    /// Whether all bits of a packed body are set
    #[inline]
    pub fn contains_body(&self, body: u64) -> bool {
        self.hashes.positions(body, self.num_bits).all(|pos| {
            let word = (pos >> 6) as usize;
            self.words[word] & (1u64 << (pos & 63)) != 0
        })
    }

    /// Size of the bit array
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Number of hash functions applied per operation
    pub fn num_hash_functions(&self) -> usize {
        self.hashes.len()
    }

    /// Number of set bits
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// Fraction of set bits
    pub fn fill_ratio(&self) -> f64 {
        self.count_ones() as f64 / self.num_bits as f64
    }

    /// Probability that a never-inserted edge is reported present,
    /// estimated from the current fill ratio
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.hashes.len() as i32)
    }

    /// Memory used by the bit array in bytes
    pub fn num_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>()
    }
}

impl EdgeMembership for BloomFilter {
    #[inline]
    fn contains(&self, edge: &DnaKmer) -> bool {
        self.contains_body(edge.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(num_bits: u64, q: usize) -> BloomFilterBuilder {
        BloomFilterBuilder::new(num_bits, HashFamily::new(q, 42)).unwrap()
    }

    #[test]
    fn test_degenerate_parameters_are_rejected() {
        assert!(matches!(
            BloomFilterBuilder::new(0, HashFamily::new(3, 42)),
            Err(EnumeratorError::InvalidFilterSize)
        ));
        assert!(matches!(
            BloomFilterBuilder::new(1024, HashFamily::new(0, 42)),
            Err(EnumeratorError::InvalidHashFunctions)
        ));
    }

    #[test]
    fn test_inserted_items_are_found() {
        for &(num_bits, q) in &[(1u64, 1usize), (7, 3), (64, 3), (1000, 5), (1 << 16, 3)] {
            let builder = filter(num_bits, q);
            for body in (0..500u64).map(|x| x.wrapping_mul(0x9e37_79b9)) {
                builder.insert_body(body);
            }
            let frozen = builder.freeze();
            for body in (0..500u64).map(|x| x.wrapping_mul(0x9e37_79b9)) {
                assert!(frozen.contains_body(body), "false negative with M={} Q={}", num_bits, q);
            }
        }
    }

    #[test]
    fn test_empty_filter_rejects_everything() {
        let frozen = filter(1024, 3).freeze();
        assert_eq!(frozen.count_ones(), 0);
        assert!((0..1000u64).all(|b| !frozen.contains_body(b)));
        assert_eq!(frozen.estimated_false_positive_rate(), 0.0);
    }

    #[test]
    fn test_large_filter_has_few_false_positives() {
        let builder = filter(1 << 20, 3);
        for body in 0..1000u64 {
            builder.insert_body(body);
        }
        let frozen = builder.freeze();
        let false_positives = (1_000_000..1_010_000u64)
            .filter(|&b| frozen.contains_body(b))
            .count();
        // Expected rate is about (3000 / 2^20)^3, effectively zero
        assert!(false_positives < 10, "too many false positives: {}", false_positives);
    }

    #[test]
    fn test_single_bit_filter_saturates() {
        let builder = filter(1, 3);
        builder.insert_body(5);
        let frozen = builder.freeze();
        assert_eq!(frozen.count_ones(), 1);
        assert!(frozen.contains_body(123_456));
        assert_eq!(frozen.fill_ratio(), 1.0);
    }

    #[test]
    fn test_edge_membership_trait() {
        let builder = filter(4096, 3);
        let edge = DnaKmer::from_str("ACGTA").unwrap();
        builder.insert(&edge);
        let frozen = builder.freeze();
        assert!(frozen.contains(&edge));
        assert_eq!(frozen.num_hash_functions(), 3);
        assert_eq!(frozen.num_bits(), 4096);
        assert_eq!(frozen.num_bytes(), 512);
    }

    #[test]
    fn test_parallel_inserts_commute() {
        use rayon::prelude::*;

        let sequential = filter(10_007, 3);
        for body in 0..5000u64 {
            sequential.insert_body(body);
        }
        let parallel = filter(10_007, 3);
        (0..5000usize)
            .into_par_iter()
            .rev()
            .for_each(|body| parallel.insert_body(body as u64));

        let a = sequential.freeze();
        let b = parallel.freeze();
        assert_eq!(a.words, b.words);
    }
}
