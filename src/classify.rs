//! Residue classifier.
//!
//! Maps a residue symbol to the color of its category in a theme. The
//! category partition is fixed; only the palette changes between themes.

use ratatui::style::Color;

use crate::theme::{ResidueCategory, Theme};

/// Color scheme for residues.
///
/// This trait allows display code to ask any palette for a residue color
/// without knowing how the palette is organised.
pub trait ColorScheme {
    /// Background color for a symbol, `None` for white/background.
    fn color_for(&self, symbol: char) -> Option<Color>;

    /// Text color for a symbol, `None` for the default foreground.
    fn text_color_for(&self, symbol: char) -> Option<Color>;
}

impl ColorScheme for Theme {
    fn color_for(&self, symbol: char) -> Option<Color> {
        classify(symbol, self)
    }

    fn text_color_for(&self, symbol: char) -> Option<Color> {
        classify_text(symbol, self)
    }
}

/// Color of `symbol` under `theme`.
///
/// Gaps, padding and unknown symbols get no color.
pub fn classify(symbol: char, theme: &Theme) -> Option<Color> {
    ResidueCategory::of(symbol).map(|category| theme.category_color(category))
}

/// Text color printed over `symbol` under `theme`.
pub fn classify_text(symbol: char, theme: &Theme) -> Option<Color> {
    ResidueCategory::of(symbol).map(|category| theme.text_color(category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charged_residues() {
        let theme = Theme::pale();
        assert_eq!(classify('K', &theme), Some(theme.positive));
        assert_eq!(classify('R', &theme), Some(theme.positive));
        assert_eq!(classify('D', &theme), Some(theme.negative));
        assert_eq!(classify('e', &theme), Some(theme.negative)); // Case insensitive
    }

    #[test]
    fn test_gap_has_no_color() {
        for theme in Theme::presets() {
            assert_eq!(classify('-', &theme), None);
            assert_eq!(classify(' ', &theme), None);
            assert_eq!(classify('X', &theme), None);
            assert_eq!(classify('*', &theme), None);
        }
    }

    #[test]
    fn test_classify_is_pure() {
        let theme = Theme::mono();
        for symbol in "ACDEFGHIKLMNPQRSTVWY-X".chars() {
            let first = classify(symbol, &theme);
            for _ in 0..3 {
                assert_eq!(classify(symbol, &theme), first);
            }
        }
    }

    #[test]
    fn test_color_scheme_trait() {
        let theme = Theme::grey();
        let scheme: &dyn ColorScheme = &theme;
        assert_eq!(scheme.color_for('W'), Some(theme.aromatic));
        assert_eq!(scheme.color_for('H'), Some(theme.aromatic));
        assert_eq!(scheme.color_for('-'), None);
        assert_eq!(scheme.text_color_for('W'), Some(Color::White));
        assert_eq!(scheme.text_color_for('S'), Some(Color::Black));
        assert_eq!(scheme.text_color_for('-'), None);
    }
}
