//! Derived statistics used by result views.

use serde::{Deserialize, Serialize};

/// Output range for word font sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

/// Font size for a word cloud term, scaled logarithmically by its normalized
/// term frequency within `extent` (`[lowest, highest]` tfnorm of the cloud).
///
/// Degenerate inputs (equal or non-positive extents, non-positive `tfnorm`)
/// yield `range.min`.
#[must_use]
pub fn word_font_size(tfnorm: f64, extent: (f64, f64), range: SizeRange) -> f64 {
    let (lo, hi) = extent;
    if tfnorm <= 0.0 || lo <= 0.0 || hi <= 0.0 || (hi - lo).abs() < f64::EPSILON {
        return range.min;
    }
    let scale = (tfnorm.ln() - lo.ln()) / (hi.ln() - lo.ln());
    (range.max - range.min).mul_add(scale, range.min)
}

/// `count / total`, or `None` when there is nothing to divide by.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio(count: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(count as f64 / total as f64)
}

/// Render a ratio as a whole percentage (`0.256` → `"26%"`).
#[must_use]
pub fn format_percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: SizeRange = SizeRange { min: 10.0, max: 30.0 };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn font_size_hits_range_endpoints() {
        assert!(close(word_font_size(0.01, (0.01, 1.0), RANGE), 10.0));
        assert!(close(word_font_size(1.0, (0.01, 1.0), RANGE), 30.0));
    }

    #[test]
    fn font_size_is_logarithmic() {
        // 0.1 is halfway between 0.01 and 1.0 on a log scale.
        assert!(close(word_font_size(0.1, (0.01, 1.0), RANGE), 20.0));
    }

    #[test]
    fn font_size_degenerate_inputs() {
        assert!(close(word_font_size(0.5, (0.5, 0.5), RANGE), 10.0));
        assert!(close(word_font_size(0.0, (0.01, 1.0), RANGE), 10.0));
        assert!(close(word_font_size(0.5, (0.0, 1.0), RANGE), 10.0));
    }

    #[test]
    fn ratio_handles_zero_total() {
        assert_eq!(ratio(3, 0), None);
        assert_eq!(ratio(1, 4), Some(0.25));
    }

    #[test]
    fn percent_has_no_fraction_digits() {
        assert_eq!(format_percent(0.256), "26%");
        assert_eq!(format_percent(1.0), "100%");
        assert_eq!(format_percent(0.0), "0%");
    }
}
