//! Enumeration of bifurcation vertices
//!
//! This module implements the two-pass pipeline:
//! 1. Read sequences and split them at invalid bases
//! 2. Insert every (L+1)-mer edge into an edge set (Bloom filter)
//! 3. Freeze the edge set
//! 4. Classify every L-mer window as bifurcation or not
//! 5. Sort and deduplicate the recorded vertices

pub mod config;
pub mod parse;
pub mod classify;
pub mod vertex_enumerator;

pub use config::EnumeratorConfig;
pub use parse::{FastxFile, InMemorySequences, SequenceSource};
pub use vertex_enumerator::{EnumerationStats, VertexEnumerator};
