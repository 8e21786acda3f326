//! Sorted, deduplicated set of bifurcation vertices
//!
//! The index is the only artifact left after enumeration. A vertex's
//! identifier is its rank in ascending body order, which is stable for the
//! lifetime of one index only.

use rayon::prelude::*;
use std::io::{self, Write};

use crate::kmer::DnaKmer;

/// Immutable index of bifurcation vertices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexIndex {
    vertex_length: usize,
    bodies: Vec<u64>,
}

impl VertexIndex {
    /// Sort and deduplicate raw vertex bodies into an index
    pub fn from_raw(vertex_length: usize, mut bodies: Vec<u64>) -> Self {
        bodies.par_sort_unstable();
        bodies.dedup();
        bodies.shrink_to_fit();
        Self {
            vertex_length,
            bodies,
        }
    }

    /// Number of distinct vertices
    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the index holds no vertex
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Length of every vertex in the index
    #[inline]
    pub fn vertex_length(&self) -> usize {
        self.vertex_length
    }

    /// Sorted vertex bodies
    pub fn bodies(&self) -> &[u64] {
        &self.bodies
    }

    /// Identifier (rank) of a vertex, or `None` if it is not a bifurcation
    ///
    /// A k-mer whose length differs from the vertex length is never found.
    #[inline]
    pub fn lookup_id(&self, vertex: &DnaKmer) -> Option<usize> {
        if vertex.len() != self.vertex_length {
            return None;
        }
        self.bodies.binary_search(&vertex.body()).ok()
    }

    /// Identifier of a vertex given as a string
    ///
    /// Strings that are not valid DNA are reported as absent.
    pub fn lookup_str(&self, vertex: &str) -> Option<usize> {
        DnaKmer::from_str(vertex)
            .ok()
            .and_then(|kmer| self.lookup_id(&kmer))
    }

    /// Whether a vertex is in the index
    #[inline]
    pub fn contains(&self, vertex: &DnaKmer) -> bool {
        self.lookup_id(vertex).is_some()
    }

    /// Vertex with the given identifier
    pub fn get(&self, id: usize) -> Option<DnaKmer> {
        self.bodies
            .get(id)
            .map(|&body| DnaKmer::from_body(self.vertex_length, body))
    }

    /// Iterate over the vertices in identifier order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = DnaKmer> + '_ {
        self.bodies
            .iter()
            .map(move |&body| DnaKmer::from_body(self.vertex_length, body))
    }

    /// Decode every vertex and pour the strings, in order, into `sink`
    pub fn dump<E: Extend<String>>(&self, sink: &mut E) {
        sink.extend(self.iter().map(|vertex| vertex.to_string()));
    }

    /// Write the vertices, one per line, in identifier order
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for vertex in self.iter() {
            writeln!(writer, "{}", vertex)?;
        }
        writer.flush()
    }
}
