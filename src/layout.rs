//! Line layout engine.
//!
//! Wraps the annotated table into blocks of `column_width` columns and lists,
//! for every block, the rows a display has to show:
//!
//! ```text
//! 1   5                 <- ruler (optional)
//!  HHH                  <- structure codes (optional)
//! MSLSQ  5              <- one row per sequence, with its residue count
//! MSLSQ  5
//!                       <- separator between blocks
//! ```
//!
//! All output panes iterate the same row list, which is what keeps the name
//! column and the body column on the same visual rows.

use thiserror::Error;
use tracing::debug;

use crate::annotate::{AnnotatedAlignment, AnnotatedResidue};
use crate::model::{Block, DisplayConfig, RenderMode};
use crate::ruler::{build_ruler, Ruler};

/// Errors reported to the caller of a layout pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Column width must be at least 1 (got {0}); choose a different font or font size")]
    InvalidColumnWidth(usize),

    #[error("Sequence '{name}' has length {found}, expected {expected}")]
    MismatchedLength {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Sequence index {index} is out of range ({count} sequences)")]
    ReferenceOutOfRange { index: usize, count: usize },

    #[error("Duplicate sequence name '{0}'")]
    DuplicateName(String),
}

/// Derives the column budget from pixel metrics.
///
/// `margin_px` is the horizontal space not available to residues (padding,
/// scroll bar). A zero, negative or non-finite character width, or a
/// viewport narrower than one character, is a configuration error.
pub fn columns_for_viewport(
    viewport_px: f32,
    char_px: f32,
    margin_px: f32,
) -> Result<usize, LayoutError> {
    if !char_px.is_finite() || char_px <= 0.0 || !viewport_px.is_finite() {
        return Err(LayoutError::InvalidColumnWidth(0));
    }
    let columns = ((viewport_px - margin_px) / char_px).floor();
    if columns < 1.0 {
        return Err(LayoutError::InvalidColumnWidth(0));
    }
    Ok(columns as usize)
}

/// One sequence's slice of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRow {
    /// Index of the sequence in the alignment
    pub index: usize,
    pub cells: Vec<AnnotatedResidue>,
    /// Residue number of the last residue in the block, `None` if the
    /// block holds only gaps for this sequence
    pub label: Option<usize>,
}

impl SequenceRow {
    /// The residues as bare text.
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.symbol).collect()
    }

    /// The trailing label as printed (empty for an all-gap slice).
    pub fn label_text(&self) -> String {
        self.label.map(|n| n.to_string()).unwrap_or_default()
    }
}

/// A visual row of the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Position ruler; `None` is a blank placeholder (fast mode)
    Ruler(Option<Ruler>),
    /// Structure code per column; `None` is a blank placeholder
    Structure(Option<Vec<Option<char>>>),
    Sequence(SequenceRow),
    /// Blank line between two blocks
    Separator,
}

/// Rows of one wrapped block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    pub block: Block,
    pub rows: Vec<Row>,
}

/// Result of a layout pass. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    names: Vec<String>,
    blocks: Vec<BlockLayout>,
    column_width: usize,
    length: usize,
    mode: RenderMode,
    show_ruler: bool,
}

impl Layout {
    pub fn blocks(&self) -> &[BlockLayout] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.blocks.iter().flat_map(|b| b.rows.iter())
    }

    /// Number of visual rows in every pane.
    pub fn row_count(&self) -> usize {
        self.blocks.iter().map(|b| b.rows.len()).sum()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Width of the name column.
    pub fn name_width(&self) -> usize {
        self.names.iter().map(|n| n.chars().count()).max().unwrap_or(0)
    }

    pub fn column_width(&self) -> usize {
        self.column_width
    }

    /// Alignment length `L`.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Whether every block starts with a ruler row.
    pub fn has_ruler(&self) -> bool {
        self.show_ruler
    }
}

/// Residue number of the last residue in `cells`, scanning backward.
pub fn trailing_label(cells: &[AnnotatedResidue]) -> Option<usize> {
    cells
        .iter()
        .rev()
        .find(|cell| !cell.is_gap())
        .map(|cell| cell.ungapped_index)
}

/// Wraps the annotated table into blocks.
///
/// In [`RenderMode::Fast`] the ruler and structure rows are blank and colors
/// are dropped, but every row keeps its position.
pub fn layout(
    annotated: &AnnotatedAlignment,
    config: &DisplayConfig,
    mode: RenderMode,
) -> Result<Layout, LayoutError> {
    config.validate()?;

    let width = config.column_width;
    let full = mode == RenderMode::Full;
    let colored = full && config.show_colors;
    let structure = if full && config.show_structure {
        annotated.structure_codes()
    } else {
        None
    };

    let partition = Block::partition(annotated.length(), width);
    let last = partition.len().saturating_sub(1);
    let blocks: Vec<BlockLayout> = partition
        .into_iter()
        .enumerate()
        .map(|(n, block)| {
            let mut rows = Vec::with_capacity(annotated.sequence_count() + 3);

            if config.show_ruler {
                let ruler = if full {
                    build_ruler(width, block.start, block.end)
                } else {
                    None
                };
                rows.push(Row::Ruler(ruler));
            }

            if config.show_structure {
                let codes = structure
                    .as_ref()
                    .map(|codes| codes[block.range()].to_vec());
                rows.push(Row::Structure(codes));
            }

            for (index, row) in annotated.rows().iter().enumerate() {
                let mut cells = row[block.range()].to_vec();
                if !colored {
                    cells.iter_mut().for_each(|cell| {
                        cell.color = None;
                        cell.foreground = None;
                    });
                }
                let label = trailing_label(&cells);
                rows.push(Row::Sequence(SequenceRow { index, cells, label }));
            }

            if n < last {
                rows.push(Row::Separator);
            }

            BlockLayout { block, rows }
        })
        .collect();

    let layout = Layout {
        names: annotated.names().to_vec(),
        blocks,
        column_width: width,
        length: annotated.length(),
        mode,
        show_ruler: config.show_ruler,
    };
    debug!(
        blocks = layout.block_count(),
        rows = layout.row_count(),
        width,
        ?mode,
        "laid out alignment"
    );
    Ok(layout)
}
