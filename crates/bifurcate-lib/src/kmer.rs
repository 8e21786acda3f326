//! K-mer representation packed into a single machine word
//!
//! A [`DnaKmer`] holds up to 32 bases, two bits each, together with its
//! length. Bases are packed most-significant-first: the first base sits in
//! the highest used bit pair, so two k-mers of the same length compare as
//! integers exactly like their strings compare lexicographically.
//!
//! Vertices and edges have different lengths but share this type; the
//! length is a runtime value because the vertex length comes from the
//! command line.

use crate::constants::KMER_CAPACITY;
use crate::encoding::{decode_base, encode_base, EncodingError};
use std::fmt;

/// Mask covering the low `2 * len` bits
#[inline]
const fn body_mask(len: usize) -> u64 {
    if len >= KMER_CAPACITY {
        u64::MAX
    } else {
        (1u64 << (2 * len)) - 1
    }
}

/// A DNA k-mer of runtime length packed into a `u64` body
///
/// # Example
/// ```
/// use bifurcate_lib::kmer::DnaKmer;
///
/// let mut kmer = DnaKmer::from_str("ACG").unwrap();
/// kmer.roll(0b11); // slide in a T
/// assert_eq!(kmer.to_string(), "CGT");
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DnaKmer {
    body: u64,
    len: u8,
}

impl DnaKmer {
    /// Create an empty k-mer
    #[inline]
    pub const fn new() -> Self {
        Self { body: 0, len: 0 }
    }

    /// Rebuild a k-mer from its packed body and length
    ///
    /// Bits above `2 * len` are discarded.
    ///
    /// # Panics
    /// Panics if `len` exceeds the 32-base capacity.
    #[inline]
    pub fn from_body(len: usize, body: u64) -> Self {
        assert!(
            len <= KMER_CAPACITY,
            "K-mer length {} exceeds capacity {}",
            len,
            KMER_CAPACITY
        );
        Self {
            body: body & body_mask(len),
            len: len as u8,
        }
    }

    /// Create a k-mer from a DNA string
    ///
    /// This is an inherent method so callers don't need to import [`std::str::FromStr`].
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, EncodingError> {
        Self::from_bytes(s.as_bytes())
    }

    /// Create a k-mer from raw DNA bytes (case-insensitive)
    ///
    /// # Errors
    /// Returns an error if the input is longer than 32 bases or contains
    /// a byte outside `ACGTacgt`.
    pub fn from_bytes(seq: &[u8]) -> Result<Self, EncodingError> {
        if seq.len() > KMER_CAPACITY {
            return Err(EncodingError::TooLong(seq.len(), KMER_CAPACITY));
        }
        let mut kmer = Self::new();
        for &base in seq {
            kmer.push_back(encode_base(base)?);
        }
        Ok(kmer)
    }

    /// Create a k-mer from already encoded 2-bit codes
    #[inline]
    pub fn from_codes(codes: &[u8]) -> Self {
        debug_assert!(codes.len() <= KMER_CAPACITY);
        let mut kmer = Self::new();
        for &code in codes {
            kmer.push_back(code);
        }
        kmer
    }

    /// Number of bases
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the k-mer holds no bases
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The packed integer body
    #[inline]
    pub fn body(&self) -> u64 {
        self.body
    }

    /// Append a base (2-bit code) at the back
    #[inline]
    pub fn push_back(&mut self, code: u8) {
        debug_assert!(self.len() < KMER_CAPACITY, "K-mer is full");
        self.body = (self.body << 2) | (code & 0b11) as u64;
        self.len += 1;
    }

    /// Prepend a base (2-bit code) at the front
    #[inline]
    pub fn push_front(&mut self, code: u8) {
        debug_assert!(self.len() < KMER_CAPACITY, "K-mer is full");
        self.body |= ((code & 0b11) as u64) << (2 * self.len());
        self.len += 1;
    }

    /// Remove and return the first base, or `None` if empty
    #[inline]
    pub fn pop_front(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let shift = 2 * self.len();
        let code = ((self.body >> shift) & 0b11) as u8;
        self.body &= body_mask(self.len());
        Some(code)
    }

    /// Slide the window by one base: drop the first base and append `code`
    ///
    /// Equivalent to `push_back` followed by `pop_front`, in constant time.
    #[inline]
    pub fn roll(&mut self, code: u8) {
        debug_assert!(self.len > 0, "Cannot roll an empty k-mer");
        self.body = ((self.body << 2) | (code & 0b11) as u64) & body_mask(self.len());
    }

    /// Copy of this k-mer extended by one base at the front
    #[inline]
    pub fn with_front(mut self, code: u8) -> Self {
        self.push_front(code);
        self
    }

    /// Copy of this k-mer extended by one base at the back
    #[inline]
    pub fn with_back(mut self, code: u8) -> Self {
        self.push_back(code);
        self
    }

    /// The k-mer without its last base
    #[inline]
    pub fn prefix(&self) -> Self {
        debug_assert!(self.len > 0);
        Self {
            body: self.body >> 2,
            len: self.len - 1,
        }
    }

    /// The k-mer without its first base
    #[inline]
    pub fn suffix(&self) -> Self {
        debug_assert!(self.len > 0);
        let len = self.len() - 1;
        Self {
            body: self.body & body_mask(len),
            len: len as u8,
        }
    }

    /// 2-bit code of the base at `pos`, counted from the front
    pub fn get_base(&self, pos: usize) -> u8 {
        assert!(
            pos < self.len(),
            "Position {} out of bounds for k-mer of length {}",
            pos,
            self.len()
        );
        let shift = 2 * (self.len() - 1 - pos);
        ((self.body >> shift) & 0b11) as u8
    }
}

impl fmt::Display for DnaKmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in 0..self.len() {
            write!(f, "{}", decode_base(self.get_base(pos)) as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DnaKmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DnaKmer(\"{}\")", self)
    }
}

impl std::str::FromStr for DnaKmer {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}
