//! seqwrap - print a wrapped, colored alignment.
//!
//! ## Usage
//!
//! ```bash
//! seqwrap alignment.fasta -w 60
//! seqwrap alignment.fasta --conservation --reference seq1 --format html > out.html
//! ```

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use seqwrap::fasta::parse_fasta_file;
use seqwrap::theme::THEME_NAMES;
use seqwrap::{render, Annotations, DisplayConfig, Format, RenderMode, Theme};

/// Output markup for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Plain text
    Plain,
    /// HTML with colored spans
    Html,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Plain => Format::Plain,
            FormatArg::Html => Format::Html,
        }
    }
}

/// seqwrap - Print a multiple sequence alignment wrapped into blocks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Aligned FASTA file
    file: PathBuf,

    /// Residues per line
    #[arg(short = 'w', long = "width", default_value = "60")]
    width: usize,

    /// Do not print the position ruler
    #[arg(long = "no-ruler")]
    no_ruler: bool,

    /// Do not color residues
    #[arg(long = "no-colors")]
    no_colors: bool,

    /// Color by similarity to the reference sequence
    #[arg(long = "conservation")]
    conservation: bool,

    /// Reference sequence name for conservation coloring (default: first)
    #[arg(long = "reference")]
    reference: Option<String>,

    /// Color theme
    #[arg(long = "theme", default_value = "pale")]
    theme: String,

    /// Highlight a column (1-based, repeatable)
    #[arg(long = "comment")]
    comments: Vec<usize>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "plain")]
    format: FormatArg,

    /// Skip colors and ruler numbers
    #[arg(long = "fast")]
    fast: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let theme = Theme::named(&args.theme).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown theme '{}' (available: {})",
            args.theme,
            THEME_NAMES.join(", ")
        )
    })?;

    let alignment = parse_fasta_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    if let Some(warning) = &alignment.warning {
        eprintln!("{}", warning);
    }
    let alignment = alignment.padded();

    let reference = match &args.reference {
        Some(name) => Some(
            alignment
                .position(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown reference sequence '{}'", name))?,
        ),
        None if args.conservation => Some(0),
        None => None,
    };

    if args.comments.contains(&0) {
        anyhow::bail!("Comment columns are 1-based (got 0)");
    }
    let annotations = Annotations {
        comments: args.comments.iter().map(|col| col - 1).collect(),
        ..Annotations::default()
    };

    let config = DisplayConfig {
        column_width: args.width,
        show_ruler: !args.no_ruler,
        show_colors: !args.no_colors,
        color_by_conservation: args.conservation,
        reference,
        ..DisplayConfig::default()
    };
    let mode = if args.fast {
        RenderMode::Fast
    } else {
        RenderMode::Full
    };

    let panes = render(&alignment, &theme, &config, &annotations, mode)?;
    info!(
        sequences = alignment.sequence_count(),
        rows = panes.row_count(),
        "rendered alignment"
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", panes.to_markup(args.format.into()))?;

    Ok(())
}
