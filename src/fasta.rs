//! FASTA reader.
//!
//! Reads an aligned FASTA file into an [`Alignment`]. Sequence lines may be
//! wrapped; gaps (`-`, `.`) are kept as they are, and the header is cut at the
//! first whitespace to give the sequence name.
//!
//! ```text
//! >sp|P69905|HBA_HUMAN Hemoglobin subunit alpha
//! MVLSPADKTNVKAAWGKVGAHAGEYGAEALERMFLSFPTTKTYFPHF-DLSHGSAQ
//! >sp|P01942|HBA_MOUSE
//! MVLSGEDKSNIKAAWGKIGGHGAEYGAEALERMFASFPTTKTYFPHF-DVSHGSAQ
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::model::{AlignedSequence, Alignment};

/// Errors that can occur while reading FASTA input.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to read input: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No sequences found")]
    EmptyFile,

    #[error("Empty sequence name at line {0}")]
    EmptyName(usize),

    #[error("Sequence data without a header at line {0}")]
    SequenceWithoutHeader(usize),
}

pub type FastaResult<T> = Result<T, FastaError>;

/// Reads an alignment from a FASTA file.
///
/// ```no_run
/// use seqwrap::fasta::parse_fasta_file;
///
/// let alignment = parse_fasta_file("globins.fasta").unwrap();
/// println!("{} sequences, {} columns", alignment.sequence_count(), alignment.alignment_length());
/// ```
pub fn parse_fasta_file<P: AsRef<Path>>(path: P) -> FastaResult<Alignment> {
    let path = path.as_ref();
    let alignment = parse_fasta(BufReader::new(File::open(path)?))?;
    debug!(
        path = %path.display(),
        sequences = alignment.sequence_count(),
        length = alignment.alignment_length(),
        "read FASTA file"
    );
    Ok(alignment)
}

/// Reads an alignment from any buffered reader.
///
/// A header with no sequence lines yields an empty sequence, so the
/// alignment check downstream reports it instead of silently dropping it.
pub fn parse_fasta<R: BufRead>(reader: R) -> FastaResult<Alignment> {
    let mut sequences = Vec::new();
    let mut current: Option<(String, String)> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some((name, residues)) = current.take() {
                sequences.push(AlignedSequence::new(name, residues));
            }
            let name = header.split_whitespace().next().unwrap_or_default();
            if name.is_empty() {
                return Err(FastaError::EmptyName(index + 1));
            }
            current = Some((name.to_string(), String::new()));
        } else {
            let (_, residues) = current
                .as_mut()
                .ok_or(FastaError::SequenceWithoutHeader(index + 1))?;
            residues.extend(line.chars().filter(|c| !c.is_whitespace()));
        }
    }

    if let Some((name, residues)) = current {
        sequences.push(AlignedSequence::new(name, residues));
    }
    if sequences.is_empty() {
        return Err(FastaError::EmptyFile);
    }
    Ok(Alignment::new(sequences))
}

/// Reads an alignment from an in-memory string.
pub fn parse_fasta_str(content: &str) -> FastaResult<Alignment> {
    parse_fasta(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_aligned_fasta() {
        let content = ">seq1\nMSLSQDA-TFVEL\n>seq2\nMSLSQDATFV-EL\n";
        let alignment = parse_fasta_str(content).unwrap();

        assert_eq!(alignment.sequence_count(), 2);
        assert_eq!(alignment.get(0).unwrap().name, "seq1");
        assert_eq!(alignment.get(0).unwrap().as_str(), "MSLSQDA-TFVEL");
        assert_eq!(alignment.get(1).unwrap().as_str(), "MSLSQDATFV-EL");
        assert!(alignment.is_valid_alignment);
        assert_eq!(alignment.alignment_length(), 13);
    }

    #[test]
    fn test_wrapped_sequence_lines() {
        let content = ">seq1\nMSLSQ\nDA-TF\n  VEL  \n";
        let alignment = parse_fasta_str(content).unwrap();
        assert_eq!(alignment.get(0).unwrap().as_str(), "MSLSQDA-TFVEL");
    }

    #[test]
    fn test_header_description_is_dropped() {
        let content = ">sp|P69905|HBA_HUMAN Hemoglobin subunit alpha\nMVLS\n";
        let alignment = parse_fasta_str(content).unwrap();
        assert_eq!(alignment.get(0).unwrap().name, "sp|P69905|HBA_HUMAN");
    }

    #[test]
    fn test_blank_and_comment_lines() {
        let content = "; exported alignment\n>seq1\nMS\n\n>seq2\n\nMT\n";
        let alignment = parse_fasta_str(content).unwrap();
        assert_eq!(alignment.sequence_count(), 2);
        assert_eq!(alignment.get(1).unwrap().as_str(), "MT");
    }

    #[test]
    fn test_header_without_residues_is_kept() {
        let alignment = parse_fasta_str(">empty\n>seq1\nMS\n").unwrap();
        assert_eq!(alignment.sequence_count(), 2);
        assert!(alignment.get(0).unwrap().is_empty());
        assert!(!alignment.is_valid_alignment);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse_fasta_str(""), Err(FastaError::EmptyFile)));
        assert!(matches!(
            parse_fasta_str("MSL\n>seq1\nMSL\n"),
            Err(FastaError::SequenceWithoutHeader(1))
        ));
        assert!(matches!(parse_fasta_str(">seq1\nMS\n> \nMS\n"), Err(FastaError::EmptyName(3))));
    }

    #[test]
    fn test_ragged_input_is_flagged() {
        let alignment = parse_fasta_str(">seq1\nMSLS\n>seq2\nMS\n").unwrap();
        assert!(!alignment.is_valid_alignment);
        assert!(alignment.warning.is_some());
        assert_eq!(alignment.padded().get(1).unwrap().as_str(), "MS--");
    }

    #[test]
    fn test_case_is_preserved() {
        let alignment = parse_fasta_str(">seq1\nmsLS\n").unwrap();
        assert_eq!(alignment.get(0).unwrap().as_str(), "msLS");
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">seq1\nMSLSQDA-TFVEL\n>seq2\nMSLSQDATFV-EL").unwrap();
        let alignment = parse_fasta_file(file.path()).unwrap();
        assert_eq!(alignment.sequence_count(), 2);
        assert_eq!(alignment.position("seq2"), Some(1));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_fasta_file(dir.path().join("missing.fasta"));
        assert!(matches!(result, Err(FastaError::IoError(_))));
    }
}
