//! Vertex enumeration orchestration
//!
//! Coordinates the passes that turn sequence sources into a
//! [`VertexIndex`]. For every round:
//! 1. Populate an edge set with every edge of every source
//! 2. Freeze the edge set
//! 3. Classify every vertex of every source against the frozen set
//!
//! and finally sort and deduplicate all recorded vertices.
//!
//! Sources are processed in parallel inside each pass. Freezing consumes
//! the builder, so classification cannot start before population is done.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    bloom::{BloomFilter, BloomFilterBuilder},
    enumerator::{
        classify::{classify_fragment, insert_edges, RoundPartition},
        config::EnumeratorConfig,
        parse::{split_fragments, FastxFile, InMemorySequences, SequenceSource},
    },
    error::EnumeratorError,
    hasher::HashFamily,
    membership::{ExactEdgeSet, ExactEdgeSetBuilder, EdgeSetBuilder},
    vertex_index::VertexIndex,
};

/// Counters collected while enumerating
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    /// Records read from all sources
    pub num_records: u64,
    /// Runs of valid bases the records were split into
    pub num_fragments: u64,
    /// Vertex windows classified
    pub num_windows: u64,
    /// Vertices recorded before deduplication
    pub num_raw_vertices: u64,
    /// Distinct vertices in the final index
    pub num_vertices: u64,
}

impl EnumerationStats {
    /// Log the statistics via tracing
    pub fn print_summary(&self) {
        info!("Enumeration Statistics:");
        info!("  Records: {}", self.num_records);
        debug!("  Fragments: {}", self.num_fragments);
        info!("  Vertex windows: {}", self.num_windows);
        debug!("  Raw bifurcations: {}", self.num_raw_vertices);
        info!("  Bifurcation vertices: {}", self.num_vertices);
        if self.num_windows > 0 {
            info!(
                "  Kept: {:.2}% of windows",
                self.num_vertices as f64 / self.num_windows as f64 * 100.0
            );
        }
    }
}

/// Enumerator of bifurcation vertices
pub struct VertexEnumerator {
    config: EnumeratorConfig,
}

impl VertexEnumerator {
    /// Create a new enumerator, validating the configuration
    ///
    /// Fails before any input is touched if the configuration is invalid.
    pub fn new(config: EnumeratorConfig) -> Result<Self, EnumeratorError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &EnumeratorConfig {
        &self.config
    }

    /// Enumerate the bifurcation vertices of `sources` using Bloom filters
    ///
    /// # Parallelism
    /// The number of threads is controlled by `config.num_threads`:
    /// - `0` — use all available CPU cores (rayon default)
    /// - `N` — use exactly N threads
    ///
    /// Sources are the unit of parallel work.
    pub fn enumerate<S: SequenceSource>(&self, sources: &[S]) -> Result<VertexIndex, EnumeratorError> {
        self.enumerate_with_stats(sources).map(|(index, _)| index)
    }

    /// Same as [`enumerate`](Self::enumerate), also returning counters
    pub fn enumerate_with_stats<S: SequenceSource>(
        &self,
        sources: &[S],
    ) -> Result<(VertexIndex, EnumerationStats), EnumeratorError> {
        self.install(|| {
            self.run(
                sources,
                || {
                    BloomFilterBuilder::new(
                        self.config.filter_size,
                        HashFamily::new(self.config.hash_functions, self.config.seed),
                    )
                },
                log_bloom_filter,
            )
        })
    }

    /// Enumerate with an exact edge set instead of a Bloom filter
    ///
    /// The result holds exactly the true bifurcations. Memory grows with
    /// the number of distinct edges, so this is meant for verification.
    pub fn enumerate_exact<S: SequenceSource>(
        &self,
        sources: &[S],
    ) -> Result<(VertexIndex, EnumerationStats), EnumeratorError> {
        self.install(|| self.run(sources, || Ok(ExactEdgeSetBuilder::new()), log_exact_set))
    }

    /// Enumerate the vertices of FASTA/FASTQ files
    pub fn enumerate_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<VertexIndex, EnumeratorError> {
        let files: Vec<FastxFile> = paths.iter().map(FastxFile::new).collect();
        self.enumerate(&files[..])
    }

    /// Enumerate the vertices of in-memory records
    pub fn enumerate_sequences<I, S>(&self, records: I) -> Result<VertexIndex, EnumeratorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.enumerate(&[InMemorySequences::new(records)])
    }

    /// Run `op` inside a rayon pool sized to `config.num_threads`
    fn install<T, F>(&self, op: F) -> Result<T, EnumeratorError>
    where
        T: Send,
        F: FnOnce() -> Result<T, EnumeratorError> + Send,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads)
            .build()
            .map_err(|e| EnumeratorError::ThreadPool(e.to_string()))?;

        pool.install(op)
    }

    /// All rounds of both passes, then sort and deduplicate
    fn run<S, B, F, G>(
        &self,
        sources: &[S],
        new_edge_set: F,
        inspect: G,
    ) -> Result<(VertexIndex, EnumerationStats), EnumeratorError>
    where
        S: SequenceSource,
        B: EdgeSetBuilder,
        F: Fn() -> Result<B, EnumeratorError>,
        G: Fn(&B::Frozen),
    {
        self.config.print();
        info!("Enumerating bifurcation vertices of {} source(s)", sources.len());
        for source in sources {
            debug!("  {}", source.name());
        }

        let vertex_length = self.config.vertex_length;
        let partition = RoundPartition::new(self.config.rounds, self.config.seed);
        let mut stats = EnumerationStats::default();
        let mut raw: Vec<u64> = Vec::new();

        for round in 0..partition.rounds() {
            if partition.rounds() > 1 {
                info!("Round {} of {}", round + 1, partition.rounds());
            }

            info!("Step 1: Populating edge set...");
            let mark = Instant::now();
            let builder = new_edge_set()?;
            let counts = sources
                .par_iter()
                .map(|source| -> anyhow::Result<(u64, u64)> {
                    let mut records = 0u64;
                    let mut fragments = 0u64;
                    source.for_each_record(&mut |record| {
                        records += 1;
                        for fragment in split_fragments(record) {
                            fragments += 1;
                            insert_edges(&fragment, vertex_length, &partition, round, &builder);
                        }
                        Ok(())
                    })?;
                    Ok((records, fragments))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            let edges = builder.freeze();
            info!("  Passed: {:.3}s", mark.elapsed().as_secs_f64());
            inspect(&edges);

            if round == 0 {
                for (records, fragments) in counts {
                    stats.num_records += records;
                    stats.num_fragments += fragments;
                }
            }

            info!("Step 2: Vertex enumeration...");
            let mark = Instant::now();
            let found = sources
                .par_iter()
                .map(|source| -> anyhow::Result<(Vec<u64>, u64)> {
                    let mut vertices = Vec::new();
                    let mut windows = 0u64;
                    source.for_each_record(&mut |record| {
                        for fragment in split_fragments(record) {
                            windows += classify_fragment(
                                &fragment,
                                vertex_length,
                                &partition,
                                round,
                                &edges,
                                &mut vertices,
                            );
                        }
                        Ok(())
                    })?;
                    Ok((vertices, windows))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            for (vertices, windows) in found {
                stats.num_windows += windows;
                raw.extend(vertices);
            }
            info!("  Passed: {:.3}s", mark.elapsed().as_secs_f64());
        }

        info!("Step 3: Sorting and duplicates removal...");
        let mark = Instant::now();
        stats.num_raw_vertices = raw.len() as u64;
        let index = VertexIndex::from_raw(vertex_length, raw);
        stats.num_vertices = index.len() as u64;
        info!("  Passed: {:.3}s", mark.elapsed().as_secs_f64());

        stats.print_summary();
        Ok((index, stats))
    }
}

fn log_bloom_filter(filter: &BloomFilter) {
    info!(
        "  Bloom filter: {} of {} bits set ({:.2}%), estimated false positive rate {:.3e}",
        filter.count_ones(),
        filter.num_bits(),
        filter.fill_ratio() * 100.0,
        filter.estimated_false_positive_rate()
    );
}

fn log_exact_set(edges: &ExactEdgeSet) {
    info!("  Exact edge set: {} distinct edges", edges.len());
}
