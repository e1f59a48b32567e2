//! Color themes.
//!
//! A [`Theme`] is a plain value: one background and one text color per
//! residue category, an ordered list of conservation tier colors and a
//! highlight color for commented columns. Variants are built by copying a
//! preset and overriding entries.

use ratatui::style::Color;

/// Physico-chemical residue categories used for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResidueCategory {
    Positive,
    Negative,
    Polar,
    Aromatic,
    Hydrophobic,
    Cysteine,
    Glycine,
    Proline,
}

impl ResidueCategory {
    /// All categories, in theme field order.
    pub const ALL: [ResidueCategory; 8] = [
        ResidueCategory::Positive,
        ResidueCategory::Negative,
        ResidueCategory::Polar,
        ResidueCategory::Aromatic,
        ResidueCategory::Hydrophobic,
        ResidueCategory::Cysteine,
        ResidueCategory::Glycine,
        ResidueCategory::Proline,
    ];

    /// Category of a one-letter amino acid code (case-insensitive).
    ///
    /// Gaps, padding and anything outside the 20 standard residues map to
    /// `None`.
    pub fn of(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'R' | 'K' => Some(ResidueCategory::Positive),
            'D' | 'E' => Some(ResidueCategory::Negative),
            'S' | 'T' | 'N' | 'Q' => Some(ResidueCategory::Polar),
            'F' | 'Y' | 'W' | 'H' => Some(ResidueCategory::Aromatic),
            'A' | 'V' | 'I' | 'L' | 'M' => Some(ResidueCategory::Hydrophobic),
            'C' => Some(ResidueCategory::Cysteine),
            'G' => Some(ResidueCategory::Glycine),
            'P' => Some(ResidueCategory::Proline),
            _ => None,
        }
    }
}

/// Named color table for residue display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub positive: Color,
    pub negative: Color,
    pub polar: Color,
    pub aromatic: Color,
    pub hydrophobic: Color,
    pub cysteine: Color,
    pub glycine: Color,
    pub proline: Color,
    /// Conservation tier colors, best tier first
    pub tiers: Vec<Color>,
    /// Background for columns carrying a comment
    pub comment: Color,
    /// Categories printed in white; the rest are printed in black
    pub light_text: Vec<ResidueCategory>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::pale()
    }
}

/// Names accepted by [`Theme::named`].
pub const THEME_NAMES: [&str; 5] = ["default", "pale", "mono", "vivid", "grey"];

impl Theme {
    /// Looks up a preset by name (case-insensitive).
    pub fn named(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::standard()),
            "pale" => Some(Self::pale()),
            "mono" => Some(Self::mono()),
            "vivid" => Some(Self::vivid()),
            "grey" | "gray" => Some(Self::grey()),
            _ => None,
        }
    }

    /// All presets.
    pub fn presets() -> Vec<Self> {
        vec![
            Self::standard(),
            Self::pale(),
            Self::mono(),
            Self::vivid(),
            Self::grey(),
        ]
    }

    /// Saturated colors.
    pub fn standard() -> Self {
        Self {
            name: "default".to_string(),
            positive: Color::Rgb(100, 140, 255),
            negative: Color::Rgb(255, 70, 90),
            polar: Color::Rgb(103, 125, 76),
            aromatic: Color::Rgb(145, 255, 168),
            hydrophobic: Color::Rgb(150, 173, 200),
            cysteine: Color::Rgb(255, 255, 85),
            glycine: Color::Rgb(255, 255, 0),
            proline: Color::Rgb(243, 65, 63),
            tiers: blue_tiers(),
            comment: Color::Rgb(255, 170, 60),
            light_text: vec![
                ResidueCategory::Positive,
                ResidueCategory::Negative,
                ResidueCategory::Polar,
            ],
        }
    }

    /// Pale colors, loosely ClustalX.
    pub fn pale() -> Self {
        Self {
            name: "pale".to_string(),
            positive: Color::Rgb(219, 138, 139),
            negative: Color::Rgb(225, 144, 226),
            polar: Color::Rgb(190, 241, 172),
            aromatic: Color::Rgb(160, 237, 216),
            hydrophobic: Color::Rgb(151, 164, 232),
            cysteine: Color::Rgb(244, 242, 186),
            glycine: Color::Rgb(247, 237, 236),
            proline: Color::Rgb(246, 222, 204),
            tiers: blue_tiers(),
            comment: Color::Rgb(255, 170, 60),
            light_text: Vec::new(),
        }
    }

    /// Blue to violet single-hue ramp.
    pub fn mono() -> Self {
        Self {
            name: "mono".to_string(),
            positive: Color::Rgb(142, 167, 243),
            negative: Color::Rgb(210, 234, 254),
            polar: Color::Rgb(183, 217, 252),
            aromatic: Color::Rgb(127, 133, 236),
            hydrophobic: Color::Rgb(174, 98, 204),
            cysteine: Color::Rgb(161, 195, 248),
            glycine: Color::Rgb(157, 106, 216),
            proline: Color::Rgb(137, 116, 227),
            tiers: vec![
                Color::Rgb(137, 116, 227),
                Color::Rgb(161, 195, 248),
                Color::Rgb(210, 234, 254),
            ],
            comment: Color::Rgb(255, 170, 60),
            light_text: Vec::new(),
        }
    }

    /// Stronger ClustalX-like colors.
    pub fn vivid() -> Self {
        Self {
            name: "vivid".to_string(),
            positive: Color::Rgb(196, 88, 90),
            negative: Color::Rgb(209, 97, 210),
            polar: Color::Rgb(165, 242, 139),
            aromatic: Color::Rgb(121, 234, 202),
            hydrophobic: Color::Rgb(108, 126, 223),
            cysteine: Color::Rgb(247, 245, 161),
            glycine: Color::Rgb(254, 239, 238),
            proline: Color::Rgb(251, 215, 188),
            tiers: blue_tiers(),
            comment: Color::Rgb(255, 170, 60),
            light_text: Vec::new(),
        }
    }

    /// Greyscale, for printing.
    pub fn grey() -> Self {
        Self {
            name: "grey".to_string(),
            positive: Color::Rgb(70, 70, 70),
            negative: Color::Rgb(47, 47, 47),
            polar: Color::Rgb(186, 186, 186),
            aromatic: Color::Rgb(24, 24, 24),
            hydrophobic: Color::Rgb(93, 93, 93),
            cysteine: Color::Rgb(140, 140, 140),
            glycine: Color::Rgb(163, 163, 163),
            proline: Color::Rgb(116, 116, 116),
            tiers: vec![
                Color::Rgb(90, 90, 90),
                Color::Rgb(150, 150, 150),
                Color::Rgb(210, 210, 210),
            ],
            comment: Color::Rgb(0, 0, 0),
            light_text: vec![
                ResidueCategory::Positive,
                ResidueCategory::Negative,
                ResidueCategory::Aromatic,
                ResidueCategory::Hydrophobic,
                ResidueCategory::Cysteine,
                ResidueCategory::Proline,
            ],
        }
    }

    /// Color assigned to a category.
    pub fn category_color(&self, category: ResidueCategory) -> Color {
        match category {
            ResidueCategory::Positive => self.positive,
            ResidueCategory::Negative => self.negative,
            ResidueCategory::Polar => self.polar,
            ResidueCategory::Aromatic => self.aromatic,
            ResidueCategory::Hydrophobic => self.hydrophobic,
            ResidueCategory::Cysteine => self.cysteine,
            ResidueCategory::Glycine => self.glycine,
            ResidueCategory::Proline => self.proline,
        }
    }

    /// Text color for residues of a category.
    pub fn text_color(&self, category: ResidueCategory) -> Color {
        if self.light_text.contains(&category) {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Color of a conservation tier, `None` past the end of the tier list.
    pub fn tier_color(&self, tier: u8) -> Option<Color> {
        self.tiers.get(tier as usize).copied()
    }

    /// Returns a copy with one category recolored.
    pub fn with_category(mut self, category: ResidueCategory, color: Color) -> Self {
        match category {
            ResidueCategory::Positive => self.positive = color,
            ResidueCategory::Negative => self.negative = color,
            ResidueCategory::Polar => self.polar = color,
            ResidueCategory::Aromatic => self.aromatic = color,
            ResidueCategory::Hydrophobic => self.hydrophobic = color,
            ResidueCategory::Cysteine => self.cysteine = color,
            ResidueCategory::Glycine => self.glycine = color,
            ResidueCategory::Proline => self.proline = color,
        }
        self
    }

    /// Returns a copy with a different conservation gradient.
    pub fn with_tiers(mut self, tiers: Vec<Color>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Returns a copy under a new name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// RGB value of a color. Named and indexed colors use the xterm palette;
/// `Reset` has none.
pub fn to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    const ANSI: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (128, 0, 0),
        (0, 128, 0),
        (128, 128, 0),
        (0, 0, 128),
        (128, 0, 128),
        (0, 128, 128),
        (192, 192, 192),
        (128, 128, 128),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (0, 0, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];
    let rgb = match color {
        Color::Reset => return None,
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => ANSI[0],
        Color::Red => ANSI[1],
        Color::Green => ANSI[2],
        Color::Yellow => ANSI[3],
        Color::Blue => ANSI[4],
        Color::Magenta => ANSI[5],
        Color::Cyan => ANSI[6],
        Color::Gray => ANSI[7],
        Color::DarkGray => ANSI[8],
        Color::LightRed => ANSI[9],
        Color::LightGreen => ANSI[10],
        Color::LightYellow => ANSI[11],
        Color::LightBlue => ANSI[12],
        Color::LightMagenta => ANSI[13],
        Color::LightCyan => ANSI[14],
        Color::White => ANSI[15],
        Color::Indexed(n @ 0..=15) => ANSI[n as usize],
        Color::Indexed(n @ 16..=231) => {
            let level = |v: u8| if v == 0 { 0 } else { 55 + 40 * v };
            let n = n - 16;
            (level(n / 36), level(n / 6 % 6), level(n % 6))
        }
        Color::Indexed(n) => {
            let v = 8 + 10 * (n - 232);
            (v, v, v)
        }
    };
    Some(rgb)
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text(background: Color) -> Color {
    match to_rgb(background) {
        Some((r, g, b)) if 299 * r as u32 + 587 * g as u32 + 114 * (b as u32) < 128_000 => {
            Color::White
        }
        _ => Color::Black,
    }
}

fn blue_tiers() -> Vec<Color> {
    vec![
        Color::Rgb(60, 120, 216),
        Color::Rgb(120, 165, 230),
        Color::Rgb(190, 210, 245),
    ]
}
