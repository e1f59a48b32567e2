//! Data model for the layout engine.
//!
//! This module contains the plain data the rest of the crate works on:
//! - Aligned sequences and alignments
//! - Display configuration and render mode
//! - Blocks (wrapped column ranges)
//!
//! Nothing here holds UI state: a caller builds a [`DisplayConfig`] for each
//! render call and hands it to the engine together with the alignment.

use std::collections::HashSet;
use std::ops::Range;

use tracing::warn;

use crate::layout::LayoutError;

/// Gap symbol inserted by aligners.
pub const GAP: char = '-';

/// Returns true for symbols that do not count as residues (gaps and padding).
pub fn is_gap(symbol: char) -> bool {
    symbol == GAP || symbol == '.' || symbol == ' '
}

/// A named sequence padded with gaps to the alignment length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSequence {
    /// The sequence identifier (unique within an alignment)
    pub name: String,
    /// Residues and gap symbols
    residues: String,
}

impl AlignedSequence {
    /// Creates a new aligned sequence.
    pub fn new(name: impl Into<String>, residues: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            residues: residues.into(),
        }
    }

    /// Returns the number of columns (residues and gaps).
    pub fn len(&self) -> usize {
        self.residues.chars().count()
    }

    /// Returns true if the sequence has no columns.
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Returns the residue string, gaps included.
    pub fn as_str(&self) -> &str {
        &self.residues
    }

    /// Iterates over the symbols of the sequence.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.residues.chars()
    }

    fn padded_to(&self, length: usize) -> Self {
        let missing = length.saturating_sub(self.len());
        let mut residues = self.residues.clone();
        residues.extend(std::iter::repeat(GAP).take(missing));
        Self {
            name: self.name.clone(),
            residues,
        }
    }
}

/// An ordered set of aligned sequences.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// All sequences, in display order
    pub sequences: Vec<AlignedSequence>,
    /// Length of the longest sequence
    alignment_length: usize,
    /// Whether all sequences have the same length
    pub is_valid_alignment: bool,
    /// Warning message if sequences have different lengths
    pub warning: Option<String>,
}

impl Alignment {
    /// Creates a new alignment from a vector of sequences.
    pub fn new(sequences: Vec<AlignedSequence>) -> Self {
        let (is_valid, alignment_length, warning) = Self::validate_alignment(&sequences);
        Self {
            sequences,
            alignment_length,
            is_valid_alignment: is_valid,
            warning,
        }
    }

    /// Builds an alignment from `(name, residues)` pairs, keeping their order.
    pub fn from_pairs<I, N, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, residues)| AlignedSequence::new(name, residues))
                .collect(),
        )
    }

    /// Validates that all sequences have the same length.
    fn validate_alignment(sequences: &[AlignedSequence]) -> (bool, usize, Option<String>) {
        let lengths: Vec<usize> = sequences.iter().map(AlignedSequence::len).collect();
        let max_len = lengths.iter().copied().max().unwrap_or(0);
        let min_len = lengths.iter().copied().min().unwrap_or(0);

        if min_len == max_len {
            (true, max_len, None)
        } else {
            let warning = format!(
                "Warning: Sequences have different lengths (min: {}, max: {}). \
                 Not a valid alignment.",
                min_len, max_len
            );
            (false, max_len, Some(warning))
        }
    }

    /// Returns a copy where every shorter sequence is padded with gaps.
    ///
    /// Sequences are never truncated; the result is always a valid alignment.
    pub fn padded(&self) -> Self {
        if self.is_valid_alignment {
            return self.clone();
        }
        warn!(
            length = self.alignment_length,
            "padding ragged alignment with gaps"
        );
        Self::new(
            self.sequences
                .iter()
                .map(|seq| seq.padded_to(self.alignment_length))
                .collect(),
        )
    }

    /// Checks the preconditions of the layout engine.
    pub fn ensure_aligned(&self) -> Result<(), LayoutError> {
        if let Some(seq) = self
            .sequences
            .iter()
            .find(|seq| seq.len() != self.alignment_length)
        {
            return Err(LayoutError::MismatchedLength {
                name: seq.name.clone(),
                expected: self.alignment_length,
                found: seq.len(),
            });
        }

        let mut seen = HashSet::new();
        if let Some(seq) = self.sequences.iter().find(|seq| !seen.insert(seq.name.as_str())) {
            return Err(LayoutError::DuplicateName(seq.name.clone()));
        }
        Ok(())
    }

    /// Returns the number of sequences.
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// Returns the alignment length (max sequence length).
    pub fn alignment_length(&self) -> usize {
        self.alignment_length
    }

    /// Gets a sequence by index.
    pub fn get(&self, index: usize) -> Option<&AlignedSequence> {
        self.sequences.get(index)
    }

    /// Finds the index of a sequence by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.sequences.iter().position(|s| s.name == name)
    }
}

/// How much work a layout pass is allowed to do.
///
/// `Fast` is meant for interactive resizing: colors, ruler numerals and
/// structure codes are left out but every row keeps its place, so the panes
/// do not jump when the `Full` pass replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    Fast,
    #[default]
    Full,
}

/// Display settings for one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Residues per wrapped line
    pub column_width: usize,
    /// Print a position ruler above each block
    pub show_ruler: bool,
    /// Paint residue backgrounds
    pub show_colors: bool,
    /// Print a secondary-structure row above each block
    pub show_structure: bool,
    /// Color by similarity to the reference sequence instead of by category
    pub color_by_conservation: bool,
    /// Index of the reference sequence for conservation coloring
    pub reference: Option<usize>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            column_width: 60,
            show_ruler: true,
            show_colors: true,
            show_structure: false,
            color_by_conservation: false,
            reference: None,
        }
    }
}

impl DisplayConfig {
    /// Creates a configuration with the given column width and default toggles.
    pub fn with_width(column_width: usize) -> Self {
        Self {
            column_width,
            ..Self::default()
        }
    }

    /// Checks the numeric settings.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.column_width == 0 {
            return Err(LayoutError::InvalidColumnWidth(self.column_width));
        }
        Ok(())
    }
}

/// One wrapped segment of the alignment, as a half-open column range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
}

impl Block {
    /// Number of columns in the block.
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Splits `[0, length)` into blocks of `column_width` columns.
    ///
    /// The last block ends exactly at `length` and may be narrower.
    pub fn partition(length: usize, column_width: usize) -> Vec<Block> {
        if column_width == 0 {
            return Vec::new();
        }
        (0..length)
            .step_by(column_width)
            .map(|start| Block {
                start,
                end: (start + column_width).min(length),
            })
            .collect()
    }
}
