//! Error type for vertex enumeration

use thiserror::Error;

use crate::constants::{MAX_VERTEX_LENGTH, MIN_VERTEX_LENGTH};

/// Errors raised while configuring or running an enumeration
#[derive(Error, Debug)]
pub enum EnumeratorError {
    /// The vertex length cannot be packed together with its edges
    #[error(
        "The vertex size is too large or too small: {0} (supported range is [{min}, {max}])",
        min = MIN_VERTEX_LENGTH,
        max = MAX_VERTEX_LENGTH
    )]
    InvalidVertexLength(usize),

    /// The Bloom filter must hold at least one bit
    #[error("Bloom filter size must be positive")]
    InvalidFilterSize,

    /// At least one hash function is required
    #[error("Number of hash functions must be positive")]
    InvalidHashFunctions,

    /// At least one round is required
    #[error("Number of rounds must be positive")]
    InvalidRounds,

    /// The worker thread pool could not be created
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),

    /// Reading or parsing an input failed
    #[error(transparent)]
    Input(#[from] anyhow::Error),
}
