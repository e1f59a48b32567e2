//! Render emitter.
//!
//! Turns a [`Layout`] into three synchronized panes:
//! - names: right-aligned sequence names, blank on every other row
//! - ruler: position ruler on ruler rows, blank elsewhere (optional)
//! - body: residues with their trailing labels, structure codes and blanks
//!
//! All three are filled in a single pass over the layout rows, so they always
//! have the same number of rows. Each pane can be emitted as plain text,
//! HTML-like markup or ratatui [`Line`]s.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use tracing::debug;

use crate::annotate::{annotate, Annotations};
use crate::layout::{layout, Layout, LayoutError, Row, SequenceRow};
use crate::model::{Alignment, DisplayConfig, RenderMode};
use crate::ruler::Ruler;
use crate::theme::{to_rgb, Theme};

/// Output markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Bare text, rows joined by newlines
    #[default]
    Plain,
    /// A `<pre>` block with colored spans
    Html,
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub underline: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self::styled(text, None, None)
    }

    fn styled(text: &str, background: Option<Color>, foreground: Option<Color>) -> Self {
        Self {
            text: text.to_string(),
            background,
            foreground,
            underline: false,
        }
    }

    fn same_style(&self, other: &Segment) -> bool {
        self.background == other.background
            && self.foreground == other.foreground
            && self.underline == other.underline
    }
}

/// Appends a segment to a row, merging it into the last one when the style
/// matches.
fn push(row: &mut Vec<Segment>, segment: Segment) {
    if segment.text.is_empty() {
        return;
    }
    match row.last_mut() {
        Some(last) if last.same_style(&segment) => last.text.push_str(&segment.text),
        _ => row.push(segment),
    }
}

/// One output stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pane {
    pub rows: Vec<Vec<Segment>>,
}

impl Pane {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Text of a row without styling.
    pub fn plain_row(&self, index: usize) -> Option<String> {
        self.rows.get(index).map(|row| plain(row))
    }

    /// The whole pane in the requested markup.
    pub fn to_markup(&self, format: Format) -> String {
        match format {
            Format::Plain => self
                .rows
                .iter()
                .map(|row| plain(row))
                .collect::<Vec<_>>()
                .join("\n"),
            Format::Html => {
                let rows: Vec<String> = self.rows.iter().map(|row| html(row)).collect();
                format!("<pre>\n{}\n</pre>", rows.join("\n"))
            }
        }
    }

    /// The pane as ratatui lines.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        self.rows
            .iter()
            .map(|row| Line::from(row.iter().map(span).collect::<Vec<_>>()))
            .collect()
    }
}

/// The three panes of one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPanes {
    pub names: Pane,
    /// `None` when the ruler is turned off
    pub ruler: Option<Pane>,
    pub body: Pane,
}

impl RenderedPanes {
    /// Number of visual rows, identical in every pane.
    pub fn row_count(&self) -> usize {
        self.body.row_count()
    }

    /// Segments of row `index` across all panes, names first.
    fn joined_row(&self, index: usize) -> Vec<Segment> {
        let mut row = Vec::new();
        let mut extend = |segments: &[Segment]| {
            for seg in segments {
                push(&mut row, seg.clone());
            }
        };
        extend(&self.names.rows[index]);
        extend(&[Segment::plain(" ")]);
        if let Some(ruler) = &self.ruler {
            extend(&ruler.rows[index]);
        }
        extend(&self.body.rows[index]);
        row
    }

    /// All panes side by side, one text line per visual row.
    pub fn to_markup(&self, format: Format) -> String {
        let rows = (0..self.row_count()).map(|i| self.joined_row(i));
        match format {
            Format::Plain => rows
                .map(|row| plain(&row).trim_end().to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            Format::Html => {
                let rows: Vec<String> = rows.map(|row| html(&row)).collect();
                format!("<pre>\n{}\n</pre>", rows.join("\n"))
            }
        }
    }

    /// All panes side by side as ratatui lines.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        (0..self.row_count())
            .map(|i| Line::from(self.joined_row(i).iter().map(span).collect::<Vec<_>>()))
            .collect()
    }
}

fn plain(row: &[Segment]) -> String {
    row.iter().map(|seg| seg.text.as_str()).collect()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// CSS hex notation for a color, `None` for [`Color::Reset`].
pub fn css_color(color: Color) -> Option<String> {
    to_rgb(color).map(|(r, g, b)| format!("#{:02x}{:02x}{:02x}", r, g, b))
}

fn html(row: &[Segment]) -> String {
    let mut out = String::new();
    for seg in row {
        let mut text = escape_html(&seg.text);
        if seg.underline {
            text = format!("<u>{}</u>", text);
        }
        let background = seg.background.and_then(css_color);
        let foreground = seg.foreground.and_then(css_color);
        let style: Vec<String> = background
            .map(|c| format!("background-color:{}", c))
            .into_iter()
            .chain(foreground.map(|c| format!("color:{}", c)))
            .collect();
        if style.is_empty() {
            out.push_str(&text);
        } else {
            out.push_str(&format!("<span style=\"{}\">{}</span>", style.join(";"), text));
        }
    }
    out
}

fn span(seg: &Segment) -> Span<'static> {
    let mut style = Style::default();
    if let Some(bg) = seg.background {
        style = style.bg(bg);
    }
    if let Some(fg) = seg.foreground {
        style = style.fg(fg);
    }
    if seg.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(seg.text.clone(), style)
}

fn ruler_row(ruler: &Ruler) -> Vec<Segment> {
    let mut row = Vec::new();
    let mut cursor = 0;
    for label in ruler.labels() {
        push(&mut row, Segment::plain(&" ".repeat(label.offset - cursor)));
        let (head, tick, tail) = label.split();
        push(&mut row, Segment::plain(head));
        push(
            &mut row,
            Segment {
                underline: true,
                ..Segment::plain(tick)
            },
        );
        push(&mut row, Segment::plain(tail));
        cursor = label.end();
    }
    push(&mut row, Segment::plain(&" ".repeat(ruler.width() - cursor)));
    row
}

fn structure_row(codes: &[Option<char>]) -> Vec<Segment> {
    let text: String = codes.iter().map(|code| code.unwrap_or(' ')).collect();
    let mut row = Vec::new();
    push(&mut row, Segment::plain(&text));
    row
}

fn sequence_row(seq: &SequenceRow) -> Vec<Segment> {
    let mut row = Vec::new();
    let mut buf = [0u8; 4];
    for cell in &seq.cells {
        let symbol = cell.symbol.encode_utf8(&mut buf);
        push(&mut row, Segment::styled(symbol, cell.color, cell.foreground));
    }
    push(&mut row, Segment::plain(&format!("  {}", seq.label_text())));
    row
}

/// Emits the panes of a finished layout.
pub fn render_layout(layout: &Layout) -> RenderedPanes {
    let width = layout.name_width();
    let blank_name = || {
        let mut row = Vec::new();
        push(&mut row, Segment::plain(&" ".repeat(width)));
        row
    };

    let mut names = Pane::default();
    let mut rulers = Pane::default();
    let mut body = Pane::default();

    for row in layout.rows() {
        let (name, ruler, content) = match row {
            Row::Ruler(ruler) => (
                blank_name(),
                ruler.as_ref().map(ruler_row).unwrap_or_default(),
                Vec::new(),
            ),
            Row::Structure(codes) => (
                blank_name(),
                Vec::new(),
                codes.as_deref().map(structure_row).unwrap_or_default(),
            ),
            Row::Sequence(seq) => {
                let name = layout.names().get(seq.index).map(String::as_str).unwrap_or("");
                let mut cell = Vec::new();
                push(&mut cell, Segment::plain(&format!("{:>width$}", name, width = width)));
                (cell, Vec::new(), sequence_row(seq))
            }
            Row::Separator => (blank_name(), Vec::new(), Vec::new()),
        };
        names.rows.push(name);
        rulers.rows.push(ruler);
        body.rows.push(content);
    }

    debug!(rows = body.row_count(), "rendered panes");
    RenderedPanes {
        names,
        ruler: layout.has_ruler().then_some(rulers),
        body,
    }
}

/// Annotates, lays out and emits an alignment in one call.
pub fn render(
    alignment: &Alignment,
    theme: &Theme,
    config: &DisplayConfig,
    annotations: &Annotations,
    mode: RenderMode,
) -> Result<RenderedPanes, LayoutError> {
    let annotated = annotate(alignment, theme, config, annotations)?;
    let layout = layout(&annotated, config, mode)?;
    Ok(render_layout(&layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::StructureAnnotation;

    fn example() -> Alignment {
        Alignment::from_pairs([("seq1", "MSLSQDA-TFVEL"), ("seq2", "MSLSQDATFV-EL")])
    }

    fn render_with(alignment: &Alignment, theme: &Theme, config: &DisplayConfig) -> RenderedPanes {
        render(alignment, theme, config, &Annotations::default(), RenderMode::Full).unwrap()
    }

    #[test]
    fn test_example_plain_output() {
        let panes = render_with(&example(), &Theme::pale(), &DisplayConfig::with_width(5));
        let expected = [
            "     1   5",
            "seq1 MSLSQ  5",
            "seq2 MSLSQ  5",
            "",
            "     6",
            "seq1 DA-TF  9",
            "seq2 DATFV  10",
            "",
            "     11",
            "seq1 VEL  12",
            "seq2 -EL  12",
        ]
        .join("\n");
        assert_eq!(panes.to_markup(Format::Plain), expected);
        assert_eq!(panes.row_count(), 11);
    }

    #[test]
    fn test_panes_have_equal_row_counts() {
        let alignments = [
            example(),
            Alignment::from_pairs([("a", "M")]),
            Alignment::from_pairs([("a", "-----"), ("bb", "MS-LQ"), ("ccc", "M---Q")]),
            Alignment::new(Vec::new()),
        ];
        let annotations = Annotations::default();
        for alignment in &alignments {
            for width in [1, 2, 5, 60] {
                for show_ruler in [true, false] {
                    for show_structure in [true, false] {
                        for mode in [RenderMode::Fast, RenderMode::Full] {
                            let config = DisplayConfig {
                                column_width: width,
                                show_ruler,
                                show_structure,
                                ..DisplayConfig::default()
                            };
                            let panes =
                                render(alignment, &Theme::pale(), &config, &annotations, mode)
                                    .unwrap();
                            assert_eq!(panes.names.row_count(), panes.body.row_count());
                            assert_eq!(panes.ruler.is_some(), show_ruler);
                            if let Some(ruler) = &panes.ruler {
                                assert_eq!(ruler.row_count(), panes.body.row_count());
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_names_are_right_aligned() {
        let alignment = Alignment::from_pairs([("a", "MS"), ("long_name", "MS")]);
        let panes = render_with(&alignment, &Theme::pale(), &DisplayConfig::default());
        assert_eq!(panes.names.plain_row(0).unwrap(), " ".repeat(9));
        assert_eq!(panes.names.plain_row(1).unwrap(), "        a");
        assert_eq!(panes.names.plain_row(2).unwrap(), "long_name");
    }

    #[test]
    fn test_ruler_row_matches_plain_ruler() {
        let panes = render_with(&example(), &Theme::pale(), &DisplayConfig::with_width(13));
        let ruler = crate::ruler::build_ruler(13, 0, 13).unwrap();
        assert_eq!(panes.ruler.as_ref().unwrap().plain_row(0).unwrap(), ruler.to_plain());
        assert_eq!(panes.body.plain_row(0).unwrap(), "");
    }

    #[test]
    fn test_colored_runs_are_merged() {
        let theme = Theme::pale();
        let alignment = Alignment::from_pairs([("a", "KRD")]);
        let config = DisplayConfig {
            show_ruler: false,
            ..DisplayConfig::default()
        };
        let panes = render_with(&alignment, &theme, &config);
        let row = &panes.body.rows[0];
        assert_eq!(row.len(), 3);
        assert_eq!(row[0].text, "KR");
        assert_eq!(row[0].background, Some(theme.positive));
        assert_eq!(row[1].text, "D");
        assert_eq!(row[2].text, "  3");
        assert_eq!(row[2].background, None);
    }

    #[test]
    fn test_dark_backgrounds_get_white_text() {
        let theme = Theme::grey();
        let alignment = Alignment::from_pairs([("a", "WDKS")]);
        let config = DisplayConfig {
            show_ruler: false,
            ..DisplayConfig::default()
        };
        let panes = render_with(&alignment, &theme, &config);
        let row = &panes.body.rows[0];
        for (seg, symbol) in row.iter().zip(["W", "D", "K"]) {
            assert_eq!(seg.text, symbol);
            assert_eq!(seg.foreground, Some(Color::White));
        }
        assert_eq!(row[3].text, "S");
        assert_eq!(row[3].foreground, Some(Color::Black));

        let lines = panes.body.to_lines();
        let first = &lines[0].spans[0];
        assert_eq!(first.style.fg, Some(Color::White));
        assert_eq!(first.style.bg, Some(theme.aromatic));

        let html = panes.body.to_markup(Format::Html);
        assert!(html.contains("<span style=\"background-color:#181818;color:#ffffff\">W</span>"));
        assert!(html.contains("<span style=\"background-color:#bababa;color:#000000\">S</span>"));
    }

    #[test]
    fn test_html_output() {
        let alignment = Alignment::from_pairs([("<a&b>", "KD")]);
        let panes = render_with(&alignment, &Theme::pale(), &DisplayConfig::default());
        let html = panes.to_markup(Format::Html);
        assert!(html.starts_with("<pre>\n"));
        assert!(html.ends_with("\n</pre>"));
        assert!(html.contains("&lt;a&amp;b&gt;"));
        assert!(!html.contains("<a&b>"));
        assert!(html.contains("<u>1</u>"));
        assert!(html.contains("<span style=\"background-color:#db8a8b;color:#000000\">K</span>"));
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(Color::Rgb(255, 170, 60)).as_deref(), Some("#ffaa3c"));
        assert_eq!(css_color(Color::Red).as_deref(), Some("#800000"));
        assert_eq!(css_color(Color::LightRed).as_deref(), Some("#ff0000"));
        assert_eq!(css_color(Color::Indexed(21)).as_deref(), Some("#0000ff"));
        assert_eq!(css_color(Color::Reset), None);
    }

    #[test]
    fn test_reset_colors_emit_no_style() {
        let row = vec![Segment::styled("K", Some(Color::Reset), Some(Color::Reset))];
        assert_eq!(html(&row), "K");
        let row = vec![Segment::styled("K", Some(Color::Reset), Some(Color::White))];
        assert_eq!(html(&row), "<span style=\"color:#ffffff\">K</span>");
    }

    #[test]
    fn test_fast_mode_rows_match_full_text() {
        let config = DisplayConfig::with_width(4);
        let annotations = Annotations::default();
        let theme = Theme::pale();
        let fast = render(&example(), &theme, &config, &annotations, RenderMode::Fast).unwrap();
        let full = render(&example(), &theme, &config, &annotations, RenderMode::Full).unwrap();
        assert_eq!(fast.row_count(), full.row_count());
        assert_eq!(fast.names, full.names);
        assert_eq!(fast.body.to_markup(Format::Plain), full.body.to_markup(Format::Plain));
        assert!(fast
            .body
            .rows
            .iter()
            .flatten()
            .all(|seg| seg.background.is_none() && seg.foreground.is_none()));
        assert!(fast.ruler.unwrap().rows.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_structure_row() {
        let annotations = Annotations {
            structure: Some(StructureAnnotation::new(1, [(1, 'E'), (2, 'E')])),
            ..Annotations::default()
        };
        let config = DisplayConfig {
            show_ruler: false,
            show_structure: true,
            ..DisplayConfig::default()
        };
        let alignment = Alignment::from_pairs([("a", "MSL"), ("b", "-ST")]);
        let panes =
            render(&alignment, &Theme::pale(), &config, &annotations, RenderMode::Full).unwrap();
        assert_eq!(panes.body.plain_row(0).unwrap(), " EE");
        assert_eq!(panes.names.plain_row(0).unwrap(), " ");
        assert_eq!(panes.body.plain_row(2).unwrap(), "-ST  2");
    }

    #[test]
    fn test_to_lines() {
        let theme = Theme::pale();
        let alignment = Alignment::from_pairs([("a", "KD")]);
        let panes = render_with(&alignment, &theme, &DisplayConfig::default());
        let lines = panes.to_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].spans.iter().any(|span| {
            span.style.add_modifier.contains(Modifier::UNDERLINED) && span.content == "1"
        }));
        assert!(lines[1]
            .spans
            .iter()
            .any(|span| span.style.bg == Some(theme.positive) && span.content == "K"));
        assert_eq!(panes.body.to_lines().len(), panes.names.to_lines().len());
    }
}
