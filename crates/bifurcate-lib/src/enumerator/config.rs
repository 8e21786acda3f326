//! Configuration for vertex enumeration
//!
//! Holds the vertex length, the Bloom filter parameters and the resource
//! knobs (rounds, threads). Validation happens eagerly, before any input
//! is opened.

use crate::constants::{
    is_valid_vertex_length, DEFAULT_FILTER_BITS, DEFAULT_HASH_FUNCTIONS, DEFAULT_SEED,
    DEFAULT_VERTEX_LENGTH,
};
use crate::error::EnumeratorError;

/// Configuration parameters for enumerating bifurcation vertices
#[derive(Debug, Clone)]
pub struct EnumeratorConfig {
    /// Vertex length L (edges have length L + 1), in [1, 29]
    pub vertex_length: usize,

    /// Bloom filter size M in bits
    pub filter_size: u64,

    /// Number of hash functions Q
    pub hash_functions: usize,

    /// Number of rounds the vertex set is partitioned into.
    /// Each round builds a fresh filter of `filter_size` bits.
    pub rounds: usize,

    /// Number of threads for parallel operations (0 = all available cores)
    pub num_threads: usize,

    /// Master seed for the hash family
    pub seed: u64,
}

impl Default for EnumeratorConfig {
    fn default() -> Self {
        Self {
            vertex_length: DEFAULT_VERTEX_LENGTH,
            filter_size: DEFAULT_FILTER_BITS,
            hash_functions: DEFAULT_HASH_FUNCTIONS,
            rounds: 1,
            num_threads: 0,
            seed: DEFAULT_SEED,
        }
    }
}

impl EnumeratorConfig {
    /// Create a configuration with the given vertex length and filter size
    pub fn new(vertex_length: usize, filter_size: u64) -> Result<Self, EnumeratorError> {
        let config = Self {
            vertex_length,
            filter_size,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Edge length, one more than the vertex length
    #[inline]
    pub fn edge_length(&self) -> usize {
        self.vertex_length + 1
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), EnumeratorError> {
        if !is_valid_vertex_length(self.vertex_length) {
            return Err(EnumeratorError::InvalidVertexLength(self.vertex_length));
        }
        if self.filter_size == 0 {
            return Err(EnumeratorError::InvalidFilterSize);
        }
        if self.hash_functions == 0 {
            return Err(EnumeratorError::InvalidHashFunctions);
        }
        if self.rounds == 0 {
            return Err(EnumeratorError::InvalidRounds);
        }
        Ok(())
    }

    /// Log configuration parameters via tracing
    pub fn print(&self) {
        tracing::info!("Enumerator Configuration:");
        tracing::info!("  vertex_length = {}", self.vertex_length);
        tracing::info!(
            "  filter_size = {} bits ({:.2} MB)",
            self.filter_size,
            self.filter_size as f64 / (8.0 * 1024.0 * 1024.0)
        );
        tracing::info!("  hash_functions = {}", self.hash_functions);
        tracing::debug!("  rounds = {}", self.rounds);
        if self.num_threads == 0 {
            tracing::debug!("  num_threads = all available cores");
        } else {
            tracing::debug!("  num_threads = {}", self.num_threads);
        }
        tracing::debug!("  seed = {}", self.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EnumeratorConfig::default();
        assert_eq!(config.vertex_length, 25);
        assert_eq!(config.hash_functions, 3);
        assert_eq!(config.rounds, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_config() {
        let config = EnumeratorConfig::new(21, 1 << 20).unwrap();
        assert_eq!(config.vertex_length, 21);
        assert_eq!(config.edge_length(), 22);
        assert_eq!(config.filter_size, 1 << 20);
    }

    #[test]
    fn test_vertex_length_bounds() {
        assert!(EnumeratorConfig::new(29, 64).is_ok());
        assert!(EnumeratorConfig::new(1, 64).is_ok());
        assert!(matches!(
            EnumeratorConfig::new(30, 64),
            Err(EnumeratorError::InvalidVertexLength(30))
        ));
        assert!(matches!(
            EnumeratorConfig::new(0, 64),
            Err(EnumeratorError::InvalidVertexLength(0))
        ));
    }

    #[test]
    fn test_validate_filter_size() {
        assert!(matches!(
            EnumeratorConfig::new(11, 0),
            Err(EnumeratorError::InvalidFilterSize)
        ));
    }

    #[test]
    fn test_validate_hash_functions_and_rounds() {
        let config = EnumeratorConfig { hash_functions: 0, ..EnumeratorConfig::default() };
        assert!(matches!(config.validate(), Err(EnumeratorError::InvalidHashFunctions)));

        let config = EnumeratorConfig { rounds: 0, ..EnumeratorConfig::default() };
        assert!(matches!(config.validate(), Err(EnumeratorError::InvalidRounds)));
    }
}
