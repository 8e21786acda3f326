//! Sequence input: FASTA/FASTQ files and in-memory records
//!
//! A [`SequenceSource`] yields the raw bytes of its records in order. The
//! enumerator splits every record at non-ACGT bytes with
//! [`split_fragments`], so an `N` acts like a record boundary: no vertex or
//! edge window ever spans it.

use anyhow::{Context, Result};
use needletail::errors::ParseErrorKind;
use needletail::parse_fastx_file;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::encoding::encode_base;

/// An ordered collection of sequence records
pub trait SequenceSource: Sync {
    /// Human-readable name used in log messages
    fn name(&self) -> String;

    /// Call `callback` with the bytes of every record, in order
    fn for_each_record(&self, callback: &mut dyn FnMut(&[u8]) -> Result<()>) -> Result<()>;
}

/// A FASTA/FASTQ file, optionally gzip-compressed
#[derive(Debug, Clone)]
pub struct FastxFile {
    path: PathBuf,
}

impl FastxFile {
    /// Wrap a path; the file is opened on every pass
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SequenceSource for FastxFile {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn for_each_record(&self, callback: &mut dyn FnMut(&[u8]) -> Result<()>) -> Result<()> {
        parse_sequences(&self.path, |_name, seq| callback(seq))
    }
}

/// Records held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySequences {
    records: Vec<Vec<u8>>,
}

impl InMemorySequences {
    /// Collect records from anything byte-like
    pub fn new<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            records: records.into_iter().map(|r| r.as_ref().to_vec()).collect(),
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SequenceSource for InMemorySequences {
    fn name(&self) -> String {
        format!("<{} in-memory records>", self.records.len())
    }

    fn for_each_record(&self, callback: &mut dyn FnMut(&[u8]) -> Result<()>) -> Result<()> {
        for record in &self.records {
            callback(record)?;
        }
        Ok(())
    }
}

/// Parse a FASTA/FASTQ file and call a function for each sequence
///
/// # Arguments
/// * `path` - Path to input file (may be gzipped)
/// * `callback` - Function called for each sequence, receives (name, sequence)
///
/// # Errors
/// Returns error if the file cannot be opened or its format is invalid.
/// An empty file is not an error; it yields no records.
/// Non-ACGT characters are passed through; callers decide what to do with them.
pub fn parse_sequences<P, F>(path: P, mut callback: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(&[u8], &[u8]) -> Result<()>,
{
    let path = path.as_ref();

    // needletail automatically handles gzip decompression
    let mut reader = match parse_fastx_file(path) {
        Ok(reader) => reader,
        // An empty file holds zero records
        Err(e) if e.kind == ParseErrorKind::EmptyFile => {
            debug!("Skipping empty sequence file: {}", path.display());
            return Ok(());
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to open sequence file: {}", path.display())))
        }
    };

    while let Some(record) = reader.next() {
        let record = record
            .with_context(|| format!("Failed to parse sequence record in {}", path.display()))?;
        let seq = record.seq();
        callback(record.id(), &seq)?;
    }

    Ok(())
}

/// Split a record into maximal runs of valid bases, as 2-bit codes
pub fn split_fragments(seq: &[u8]) -> Fragments<'_> {
    Fragments { seq, pos: 0 }
}

/// Iterator returned by [`split_fragments`]
pub struct Fragments<'a> {
    seq: &'a [u8],
    pos: usize,
}

impl Iterator for Fragments<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        while self.pos < self.seq.len() && encode_base(self.seq[self.pos]).is_err() {
            self.pos += 1;
        }
        if self.pos == self.seq.len() {
            return None;
        }

        let mut codes = Vec::new();
        while let Some(&base) = self.seq.get(self.pos) {
            match encode_base(base) {
                Ok(code) => codes.push(code),
                Err(_) => break,
            }
            self.pos += 1;
        }
        Some(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_split_fragments() {
        let fragments: Vec<Vec<u8>> = split_fragments(b"ACNNgtN").collect();
        assert_eq!(fragments, vec![vec![0, 1], vec![2, 3]]);

        assert_eq!(split_fragments(b"").count(), 0);
        assert_eq!(split_fragments(b"NNNN").count(), 0);
        assert_eq!(split_fragments(b"TTTT").collect::<Vec<_>>(), vec![vec![3, 3, 3, 3]]);
    }

    #[test]
    fn test_in_memory_source() -> Result<()> {
        let source = InMemorySequences::new(["ACGT", "GG"]);
        assert_eq!(source.len(), 2);

        let mut seen = Vec::new();
        source.for_each_record(&mut |seq| {
            seen.push(seq.to_vec());
            Ok(())
        })?;
        assert_eq!(seen, vec![b"ACGT".to_vec(), b"GG".to_vec()]);
        Ok(())
    }

    #[test]
    fn test_parse_fasta_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, ">seq1")?;
        writeln!(temp_file, "ACGT")?;
        writeln!(temp_file, ">seq2")?;
        writeln!(temp_file, "TGNCA")?;
        temp_file.flush()?;

        let mut sequences = Vec::new();
        parse_sequences(temp_file.path(), |name, seq| {
            sequences.push((name.to_vec(), seq.to_vec()));
            Ok(())
        })?;

        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].0, b"seq1");
        assert_eq!(sequences[0].1, b"ACGT");
        assert_eq!(sequences[1].1, b"TGNCA");

        Ok(())
    }

    #[test]
    fn test_fastx_file_source() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, ">a")?;
        writeln!(temp_file, "ACGTACGTT")?;
        temp_file.flush()?;

        let source = FastxFile::new(temp_file.path());
        let mut records = 0;
        source.for_each_record(&mut |seq| {
            assert_eq!(seq, b"ACGTACGTT");
            records += 1;
            Ok(())
        })?;
        assert_eq!(records, 1);
        Ok(())
    }

    #[test]
    fn test_empty_file_has_no_records() -> Result<()> {
        let temp_file = NamedTempFile::new()?;

        let mut records = 0;
        FastxFile::new(temp_file.path()).for_each_record(&mut |_| {
            records += 1;
            Ok(())
        })?;
        assert_eq!(records, 0);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let source = FastxFile::new("/nonexistent/reads.fa");
        let err = source.for_each_record(&mut |_| Ok(())).unwrap_err();
        assert!(err.to_string().contains("Failed to open sequence file"));
    }
}
