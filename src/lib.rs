//! # seqwrap - Wrapped Alignment Layout
//!
//! Lays out a multiple sequence alignment as wrapped, colored text: blocks of
//! a fixed number of columns, a position ruler above each block and a running
//! residue count after each line.
//!
//! ## Architecture
//!
//! Data flows one way through pure functions:
//! - `model`: Sequences, alignments, display configuration and blocks
//! - `theme`: Residue categories and color themes
//! - `classify` / `conservation`: Per-residue colors
//! - `annotate`: Colors, residue numbers and structure codes per cell
//! - `ruler`: Position labels for one block
//! - `layout`: Wrapping into blocks and rows
//! - `render`: Names, ruler and body panes as text, HTML or ratatui lines
//! - `worker`: Background rendering with stale-result dropping
//! - `fasta`: FASTA input
//!
//! ```
//! use seqwrap::{render, Alignment, Annotations, DisplayConfig, Format, RenderMode, Theme};
//!
//! let alignment = Alignment::from_pairs([("seq1", "MSLSQDA-TFVEL"), ("seq2", "MSLSQDATFV-EL")]);
//! let panes = render(
//!     &alignment,
//!     &Theme::default(),
//!     &DisplayConfig::with_width(5),
//!     &Annotations::default(),
//!     RenderMode::Full,
//! )
//! .unwrap();
//! assert_eq!(panes.row_count(), 11);
//! println!("{}", panes.to_markup(Format::Plain));
//! ```

pub mod annotate;
pub mod classify;
pub mod conservation;
pub mod fasta;
pub mod layout;
pub mod model;
pub mod render;
pub mod ruler;
pub mod theme;
pub mod worker;

pub use annotate::{
    annotate, AnnotatedAlignment, AnnotatedResidue, Annotations, StructureAnnotation,
};
pub use layout::{columns_for_viewport, layout, Layout, LayoutError};
pub use model::{AlignedSequence, Alignment, DisplayConfig, RenderMode};
pub use render::{render, render_layout, Format, RenderedPanes};
pub use theme::Theme;
pub use worker::{RenderWorker, RequestTracker, Ticket};
