use anyhow::Context;
use bifurcate_lib::constants::{DEFAULT_FILTER_BITS, DEFAULT_HASH_FUNCTIONS, DEFAULT_SEED};
use bifurcate_lib::{EnumeratorConfig, FastxFile, VertexEnumerator, VertexIndex};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "bifurcate")]
#[command(version = "0.1.0")]
#[command(about = "Enumerate bifurcation vertices of a de Bruijn graph", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that builds a vertex index
#[derive(Args, Debug, Clone)]
struct BuildArgs {
    /// Input FASTA/FASTQ files (may be gzipped)
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Vertex length (at most 29)
    #[arg(short, long)]
    k: usize,

    /// Bloom filter size in bits
    #[arg(short = 'f', long, default_value_t = DEFAULT_FILTER_BITS)]
    filter_bits: u64,

    /// Number of hash functions
    #[arg(short = 'q', long, default_value_t = DEFAULT_HASH_FUNCTIONS)]
    hash_functions: usize,

    /// Number of rounds (each round allocates a filter of `filter_bits`)
    #[arg(short, long, default_value = "1")]
    rounds: usize,

    /// Number of threads (0 = all available cores)
    #[arg(short = 't', long, default_value = "0")]
    threads: usize,

    /// Seed for the hash functions
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

impl BuildArgs {
    fn config(&self) -> EnumeratorConfig {
        EnumeratorConfig {
            vertex_length: self.k,
            filter_size: self.filter_bits,
            hash_functions: self.hash_functions,
            rounds: self.rounds,
            num_threads: self.threads,
            seed: self.seed,
        }
    }

    fn sources(&self) -> Vec<FastxFile> {
        self.input.iter().map(FastxFile::new).collect()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate bifurcation vertices and optionally write them out
    Enumerate {
        #[command(flatten)]
        build: BuildArgs,

        /// Output file, one vertex per line in identifier order
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Enumerate, then look up k-mers read from a file
    Query {
        #[command(flatten)]
        build: BuildArgs,

        /// Query file with one k-mer per line
        #[arg(long)]
        query: PathBuf,
    },

    /// Compare the Bloom filter result against exact enumeration
    Check {
        #[command(flatten)]
        build: BuildArgs,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing: use RUST_LOG if set, otherwise default to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Enumerate { build, output } => enumerate_command(build, output),
        Commands::Query { build, query } => query_command(build, query),
        Commands::Check { build } => check_command(build),
    }
}

/// Validate the configuration and build the vertex index
fn build_index(build: &BuildArgs) -> anyhow::Result<VertexIndex> {
    let enumerator = VertexEnumerator::new(build.config())?;
    let sources = build.sources();
    let index = enumerator.enumerate(&sources[..])?;
    Ok(index)
}

fn enumerate_command(build: BuildArgs, output: Option<PathBuf>) -> anyhow::Result<()> {
    info!("Enumerating bifurcation vertices...");
    for input in &build.input {
        info!("  Input: {}", input.display());
    }

    let index = build_index(&build)?;
    println!("Vertices: {}", index.len());

    if let Some(path) = output {
        info!("Writing vertices to {}...", path.display());
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        index
            .write_to(BufWriter::new(file))
            .with_context(|| format!("Failed to write vertices to {}", path.display()))?;
    }

    Ok(())
}

fn query_command(build: BuildArgs, query: PathBuf) -> anyhow::Result<()> {
    let index = build_index(&build)?;
    let queries = parse_kmer_file(&query)?;
    info!("Querying {} k-mers...", queries.len());

    let mut found = 0usize;
    let mut not_found = 0usize;
    for kmer in &queries {
        match index.lookup_str(kmer) {
            Some(id) => {
                found += 1;
                println!("{}\t{}", kmer, id);
            }
            None => {
                not_found += 1;
                println!("{}\tNOT FOUND", kmer);
            }
        }
    }

    println!("\nResults:");
    println!("  Found: {}", found);
    println!("  Not found: {}", not_found);
    println!("  Total: {}", queries.len());
    if !queries.is_empty() {
        println!("  Hit rate: {:.2}%", (found as f64 / queries.len() as f64) * 100.0);
    }

    Ok(())
}

/// Check soundness: every exact bifurcation must be in the Bloom result
fn check_command(build: BuildArgs) -> anyhow::Result<()> {
    let enumerator = VertexEnumerator::new(build.config())?;
    let sources = build.sources();

    info!("Bloom filter enumeration...");
    let (bloom, _) = enumerator.enumerate_with_stats(&sources[..])?;
    info!("Exact enumeration...");
    let (exact, _) = enumerator.enumerate_exact(&sources[..])?;

    let missing: Vec<String> = exact
        .iter()
        .filter(|vertex| !bloom.contains(vertex))
        .map(|vertex| vertex.to_string())
        .collect();
    let spurious = bloom.len().saturating_sub(exact.len() - missing.len());

    println!("\n=== Check Results ===");
    println!("  Bloom vertices: {}", bloom.len());
    println!("  Exact vertices: {}", exact.len());
    println!("  Spurious (false positive) vertices: {}", spurious);
    if !bloom.is_empty() {
        println!(
            "  Precision: {:.4}%",
            (bloom.len() - spurious) as f64 / bloom.len() as f64 * 100.0
        );
    }

    if !missing.is_empty() {
        warn!("SOUNDNESS CHECK FAILED! {} bifurcations were missed", missing.len());
        println!("\n✗ SOUNDNESS CHECK FAILED!");
        println!("\nFirst {} missing vertices:", missing.len().min(10));
        for vertex in missing.iter().take(10) {
            println!("  {}", vertex);
        }
        std::process::exit(1);
    }

    println!("\n✓ SOUNDNESS CHECK PASSED!");
    println!("  Every exact bifurcation was found by the Bloom filter enumeration");
    Ok(())
}

/// Parse a plain text file with one k-mer per line
fn parse_kmer_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open query file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut kmers = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let kmer = line.trim().to_uppercase();
        if !kmer.is_empty() {
            kmers.push(kmer);
        }
    }
    debug!("Read {} query k-mers from {}", kmers.len(), path.display());

    Ok(kmers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_enumerate() {
        let cli = Cli::try_parse_from([
            "bifurcate", "enumerate", "-i", "a.fa", "b.fa", "-k", "25", "-f", "1024", "-o", "out.txt",
        ])
        .unwrap();
        match cli.command {
            Commands::Enumerate { build, output } => {
                assert_eq!(build.input.len(), 2);
                assert_eq!(build.k, 25);
                assert_eq!(build.filter_bits, 1024);
                assert_eq!(build.hash_functions, DEFAULT_HASH_FUNCTIONS);
                assert_eq!(build.rounds, 1);
                assert_eq!(output, Some(PathBuf::from("out.txt")));
            }
            _ => panic!("expected enumerate"),
        }
    }

    #[test]
    fn test_config_from_args() {
        let cli = Cli::try_parse_from([
            "bifurcate", "check", "-i", "a.fa", "-k", "30", "-r", "2", "-t", "4",
        ])
        .unwrap();
        let Commands::Check { build } = cli.command else {
            panic!("expected check");
        };
        let config = build.config();
        assert_eq!(config.rounds, 2);
        assert_eq!(config.num_threads, 4);
        // Invalid vertex lengths are rejected when the enumerator is created
        assert!(VertexEnumerator::new(config).is_err());
    }

    #[test]
    fn test_parse_kmer_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "acg\n\n  GTT  ").unwrap();
        file.flush().unwrap();

        let path = file.path().to_path_buf();
        assert_eq!(parse_kmer_file(&path).unwrap(), vec!["ACG", "GTT"]);
    }
}
