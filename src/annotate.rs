//! Per-residue annotation.
//!
//! Turns an alignment into a table of [`AnnotatedResidue`]s: display color,
//! running residue number and secondary-structure code for every
//! (sequence, column) pair. The table is rebuilt from scratch whenever the
//! theme, reference, coloring mode, comments or sequences change; the layout
//! engine only slices it.

use std::collections::{BTreeMap, BTreeSet};

use ratatui::style::Color;
use tracing::debug;

use crate::classify::{classify, classify_text};
use crate::conservation::conservation_color;
use crate::layout::LayoutError;
use crate::model::{is_gap, Alignment, DisplayConfig};
use crate::theme::{contrast_text, Theme};

/// One cell of the annotated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotatedResidue {
    pub symbol: char,
    /// Background color, `None` for white
    pub color: Option<Color>,
    /// Text color, `None` for the default foreground
    pub foreground: Option<Color>,
    /// 1-based count of residues up to this column, 0 on a gap
    pub ungapped_index: usize,
    /// Secondary-structure code from an external assignment
    pub structure: Option<char>,
}

impl AnnotatedResidue {
    pub fn is_gap(&self) -> bool {
        self.ungapped_index == 0
    }
}

/// Secondary-structure codes for one sequence, keyed by 1-based residue
/// number (gaps not counted).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureAnnotation {
    /// Index of the sequence the codes belong to
    pub sequence: usize,
    pub codes: BTreeMap<usize, char>,
}

impl StructureAnnotation {
    pub fn new(sequence: usize, codes: impl IntoIterator<Item = (usize, char)>) -> Self {
        Self {
            sequence,
            codes: codes.into_iter().collect(),
        }
    }
}

/// Data supplied by external collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    pub structure: Option<StructureAnnotation>,
    /// 0-based columns carrying a comment; highlighted regardless of theme
    pub comments: BTreeSet<usize>,
}

/// The annotated table, one row per sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedAlignment {
    names: Vec<String>,
    rows: Vec<Vec<AnnotatedResidue>>,
    length: usize,
    structure_sequence: Option<usize>,
}

impl AnnotatedAlignment {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn rows(&self) -> &[Vec<AnnotatedResidue>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[AnnotatedResidue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Alignment length `L`.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn sequence_count(&self) -> usize {
        self.rows.len()
    }

    /// Sequence whose residues carry structure codes, if any.
    pub fn structure_sequence(&self) -> Option<usize> {
        self.structure_sequence
    }

    /// Structure code per column of the structure-bearing sequence.
    pub fn structure_codes(&self) -> Option<Vec<Option<char>>> {
        let row = self.rows.get(self.structure_sequence?)?;
        Some(row.iter().map(|cell| cell.structure).collect())
    }
}

/// Builds the annotated table.
///
/// The alignment must already be rectangular (see [`Alignment::padded`]).
pub fn annotate(
    alignment: &Alignment,
    theme: &Theme,
    config: &DisplayConfig,
    annotations: &Annotations,
) -> Result<AnnotatedAlignment, LayoutError> {
    alignment.ensure_aligned()?;

    let count = alignment.sequence_count();
    let check_index = |index: usize| {
        if index < count {
            Ok(index)
        } else {
            Err(LayoutError::ReferenceOutOfRange { index, count })
        }
    };
    let reference: Option<Vec<char>> = config
        .reference
        .map(check_index)
        .transpose()?
        .and_then(|index| alignment.get(index))
        .map(|seq| seq.symbols().collect());
    let structure = annotations
        .structure
        .as_ref()
        .map(|s| check_index(s.sequence).map(|_| s))
        .transpose()?;

    let rows: Vec<Vec<AnnotatedResidue>> = alignment
        .sequences
        .iter()
        .enumerate()
        .map(|(row, seq)| {
            let codes = structure
                .filter(|s| s.sequence == row)
                .map(|s| &s.codes);
            let mut residues = 0;
            seq.symbols()
                .enumerate()
                .map(|(col, symbol)| {
                    let ungapped_index = if is_gap(symbol) {
                        0
                    } else {
                        residues += 1;
                        residues
                    };
                    let (color, foreground) = if annotations.comments.contains(&col) {
                        (Some(theme.comment), Some(contrast_text(theme.comment)))
                    } else if config.color_by_conservation {
                        let reference_symbol =
                            reference.as_ref().and_then(|r| r.get(col).copied());
                        let color = conservation_color(symbol, reference_symbol, theme);
                        (color, color.map(contrast_text))
                    } else {
                        (classify(symbol, theme), classify_text(symbol, theme))
                    };
                    let structure = match (codes, ungapped_index) {
                        (Some(codes), i) if i > 0 => codes.get(&i).copied(),
                        _ => None,
                    };
                    AnnotatedResidue {
                        symbol,
                        color,
                        foreground,
                        ungapped_index,
                        structure,
                    }
                })
                .collect()
        })
        .collect();

    debug!(
        sequences = rows.len(),
        length = alignment.alignment_length(),
        theme = %theme.name,
        conservation = config.color_by_conservation,
        "annotated alignment"
    );

    Ok(AnnotatedAlignment {
        names: alignment.sequences.iter().map(|s| s.name.clone()).collect(),
        rows,
        length: alignment.alignment_length(),
        structure_sequence: structure.map(|s| s.sequence),
    })
}
