//! Ruler builder.
//!
//! Computes the position labels printed above one wrapped block. Labels are
//! 1-based alignment column numbers. The first label is left-aligned over
//! the first column of the block; every other label ends exactly above the
//! column it names. One digit of each label is marked as the tick (the first
//! digit of the first label, the last digit of the others) so a display can
//! underline it.
//!
//! ```text
//! 1                  20                  40                  60
//! ```

/// One printed label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulerLabel {
    /// Column offset of the first character within the block
    pub offset: usize,
    /// The printed number
    pub numeral: String,
    /// Index of the tick digit within `numeral`
    pub underline: usize,
    /// The 1-based column number the label stands for
    pub value: usize,
}

impl RulerLabel {
    fn new(offset: usize, value: usize, underline_last: bool) -> Self {
        let numeral = value.to_string();
        let underline = if underline_last { numeral.len() - 1 } else { 0 };
        Self {
            offset,
            numeral,
            underline,
            value,
        }
    }

    /// Splits the numeral around the tick digit.
    pub fn split(&self) -> (&str, &str, &str) {
        let (head, rest) = self.numeral.split_at(self.underline);
        let (tick, tail) = rest.split_at(1);
        (head, tick, tail)
    }

    /// Column offset just past the label.
    pub fn end(&self) -> usize {
        self.offset + self.numeral.len()
    }
}

/// Labels for one block, padded to the block width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruler {
    width: usize,
    labels: Vec<RulerLabel>,
}

impl Ruler {
    /// Printed width in characters.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn labels(&self) -> &[RulerLabel] {
        &self.labels
    }

    /// Numbers printed, left to right.
    pub fn values(&self) -> Vec<usize> {
        self.labels.iter().map(|l| l.value).collect()
    }

    /// Plain text rendering, exactly `width()` characters long.
    pub fn to_plain(&self) -> String {
        let mut line = String::with_capacity(self.width);
        let mut cursor = 0;
        for label in &self.labels {
            line.extend(std::iter::repeat(' ').take(label.offset - cursor));
            line.push_str(&label.numeral);
            cursor = label.end();
        }
        line.extend(std::iter::repeat(' ').take(self.width - cursor));
        line
    }
}

fn digits(n: usize) -> usize {
    n.to_string().len()
}

/// Distance between candidate labels for a given block width.
pub fn label_interval(block_width: usize) -> usize {
    let interval = match block_width {
        0..=24 => block_width,
        25..=50 => block_width / 2,
        51..=100 => block_width / 3,
        101..=150 => block_width / 4,
        151..=250 => block_width / 5,
        _ => block_width / 6,
    };
    interval.max(1)
}

/// Label values for the block `[start, end)`, left to right.
///
/// Always starts with `start + 1`. The block end is added only when both end
/// labels fit with two spaces between them, and intermediate labels crowding
/// either end are dropped.
pub fn label_values(block_width: usize, start: usize, end: usize) -> Vec<usize> {
    if start >= end {
        return Vec::new();
    }
    let first = start + 1;

    let mut candidates: Vec<usize> = (start..end).step_by(label_interval(block_width)).collect();
    if candidates.len() == 1 {
        // The lone candidate is the block start itself
        candidates.clear();
    } else {
        let last = candidates.len() - 1;
        let clearance = digits(candidates[last]) * 2 + 2;
        let mut crowded = vec![false; candidates.len()];
        for idx in [0, 1] {
            if candidates[idx] < first + clearance {
                crowded[idx] = true;
            }
        }
        for idx in [0, last] {
            if end - candidates[idx] < clearance {
                crowded[idx] = true;
            }
        }
        let mut flags = crowded.into_iter();
        candidates.retain(|_| !flags.next().unwrap_or(false));
    }

    let mut values = Vec::with_capacity(candidates.len() + 2);
    values.push(first);
    values.extend(candidates);
    if end - first >= digits(first) + digits(end) + 2 {
        values.push(end);
    }
    values
}

/// Builds the ruler above the block `[start, end)`.
///
/// Returns `None` for an empty block.
pub fn build_ruler(block_width: usize, start: usize, end: usize) -> Option<Ruler> {
    let values = label_values(block_width, start, end);
    let (&first, rest) = values.split_first()?;

    let mut labels = Vec::with_capacity(values.len());
    labels.push(RulerLabel::new(0, first, false));
    let mut cursor = digits(first);
    let mut prev = first;

    for (i, &value) in rest.iter().enumerate() {
        // The first label is left-aligned, so the gap after it also has to
        // absorb its extra digits.
        let taken = if i == 0 {
            digits(value) + digits(prev) - 1
        } else {
            digits(value)
        };
        let spacer = (value as i64 - prev as i64 - taken as i64).max(0) as usize;
        let label = RulerLabel::new(cursor + spacer, value, true);
        cursor = label.end();
        labels.push(label);
        prev = value;
    }

    Some(Ruler {
        width: block_width.max(cursor),
        labels,
    })
}
