//! Deterministic seeded hashing using ahash.
//!
//! [`DeterministicHasher`] wraps an `AHasher` state built from explicit
//! seeds. [`HashFamily`] bundles a fixed number of independently seeded
//! hashers and maps a k-mer body onto that many bit positions, which is all
//! the Bloom filter needs.

use ahash::RandomState;
use std::hash::{BuildHasher, Hasher};

/// A deterministic hasher with a seeded state
#[derive(Clone)]
pub struct DeterministicHasher {
    seed: u64,
    state: RandomState,
}

impl DeterministicHasher {
    /// Create a new deterministic hasher with the given seed
    pub fn new(seed: u64) -> Self {
        let state = RandomState::with_seeds(seed, !seed, seed.rotate_left(32), !seed.rotate_left(32));
        Self { seed, state }
    }

    /// Hash a u64 value using a seeded AHasher
    #[inline]
    pub fn hash_u64(&self, value: u64) -> u64 {
        let mut hasher = self.state.build_hasher();
        hasher.write_u64(value);
        hasher.finish()
    }

    /// Get the seed value
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl std::fmt::Debug for DeterministicHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeterministicHasher").field("seed", &self.seed).finish()
    }
}

/// splitmix64 step, used to spread one master seed over the family
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// A fixed-size family of independently seeded hash functions
///
/// Every insert and query of the Bloom filter evaluates all members.
#[derive(Clone, Debug)]
pub struct HashFamily {
    hashers: Vec<DeterministicHasher>,
}

impl HashFamily {
    /// Create `count` hashers whose seeds are drawn from `master_seed`
    ///
    /// The same `(count, master_seed)` always yields the same family.
    pub fn new(count: usize, master_seed: u64) -> Self {
        let mut state = master_seed;
        let hashers = (0..count)
            .map(|_| DeterministicHasher::new(splitmix64(&mut state)))
            .collect();
        Self { hashers }
    }

    /// Number of hash functions
    #[inline]
    pub fn len(&self) -> usize {
        self.hashers.len()
    }

    /// Whether the family is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hashers.is_empty()
    }

    /// Seeds of the individual hash functions
    pub fn seeds(&self) -> Vec<u64> {
        self.hashers.iter().map(DeterministicHasher::seed).collect()
    }

    /// Bit positions of `body` in a bit array of `num_bits` bits
    ///
    /// `num_bits` must be non-zero.
    #[inline]
    pub fn positions(&self, body: u64, num_bits: u64) -> impl Iterator<Item = u64> + '_ {
        self.hashers
            .iter()
            .map(move |h| h.hash_u64(body) % num_bits)
    }
}
