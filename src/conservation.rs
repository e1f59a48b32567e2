//! Conservation scorer.
//!
//! Grades a residue against the reference residue in the same column. Tiers
//! are coarse on purpose: they index the theme's conservation gradient.
//!
//! | Tier | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | identical residue                         |
//! | 1    | same residue category                     |
//! | 2    | positive BLOSUM62 substitution score      |
//! | 3    | neutral (zero) BLOSUM62 score             |
//! | 4    | negative BLOSUM62 score                   |

use ratatui::style::Color;

use crate::theme::{ResidueCategory, Theme};

/// Best tier: the residue matches the reference.
pub const IDENTICAL: u8 = 0;
/// Same category as the reference.
pub const SAME_CATEGORY: u8 = 1;
/// Conservative substitution.
pub const SIMILAR: u8 = 2;
/// Neutral substitution.
pub const NEUTRAL: u8 = 3;
/// Dissimilar substitution.
pub const DISSIMILAR: u8 = 4;

/// Row and column order of [`BLOSUM62`].
const ALPHABET: &[u8; 20] = b"ARNDCQEGHILKMFPSTWYV";

#[rustfmt::skip]
const BLOSUM62: [[i8; 20]; 20] = [
    //A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V
    [ 4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0], // A
    [-1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3], // R
    [-2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3], // N
    [-2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3], // D
    [ 0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1], // C
    [-1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2], // Q
    [-1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2], // E
    [ 0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3], // G
    [-2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3], // H
    [-1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3], // I
    [-1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1], // L
    [-1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2], // K
    [-1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1], // M
    [-2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1], // F
    [-1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2], // P
    [ 1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2], // S
    [ 0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0], // T
    [-3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3], // W
    [-2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1], // Y
    [ 0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4], // V
];

fn alphabet_index(symbol: char) -> Option<usize> {
    let upper = symbol.to_ascii_uppercase();
    if !upper.is_ascii() {
        return None;
    }
    ALPHABET.iter().position(|&b| b == upper as u8)
}

/// BLOSUM62 substitution score, `None` outside the 20 standard residues.
pub fn blosum62(a: char, b: char) -> Option<i8> {
    Some(BLOSUM62[alphabet_index(a)?][alphabet_index(b)?])
}

/// Conservation tier of `residue` against `reference`.
///
/// Returns `None` when either symbol is a gap, padding or an unknown code.
pub fn score(residue: char, reference: char) -> Option<u8> {
    let substitution = blosum62(residue, reference)?;

    if residue.eq_ignore_ascii_case(&reference) {
        return Some(IDENTICAL);
    }
    if ResidueCategory::of(residue) == ResidueCategory::of(reference) {
        return Some(SAME_CATEGORY);
    }
    Some(match substitution {
        s if s > 0 => SIMILAR,
        0 => NEUTRAL,
        _ => DISSIMILAR,
    })
}

/// Color of `residue` in conservation mode.
///
/// Tiers past the end of the theme's gradient render uncolored.
pub fn conservation_color(residue: char, reference: Option<char>, theme: &Theme) -> Option<Color> {
    let tier = score(residue, reference?)?;
    theme.tier_color(tier)
}
