//! Range classification and quality scores.
//!
//! Each scored scope (full sequence or terminal hairpin) is checked against
//! six independent ranges: free energy at the three target temperatures and
//! the AU, GC and GU composition percentages. The quality score is the
//! number of checks that pass.

use crate::config::MetricRanges;
use crate::constants::{IN_RANGE_LABEL, NOT_IN_RANGE_LABEL, TOP_CANDIDATE_SCORE};
use crate::types::CompositionTriple;

/// Parses a number that may be wrapped in parentheses, as in `"(-12.34)"`.
///
/// Leading and trailing parentheses and surrounding whitespace are stripped.
/// Returns `None` for anything that is not a finite number afterwards.
#[must_use]
pub fn parse_numeric(text: &str) -> Option<f64> {
    let value: f64 = text
        .trim()
        .trim_matches(|c| c == '(' || c == ')')
        .trim()
        .parse()
        .ok()?;
    value.is_finite().then_some(value)
}

/// Returns whether `value` lies within `[min, max]`.
///
/// Malformed input is reported as out of range, never as an error.
///
/// # Examples
///
/// ```rust
/// use thermofinder_core::scoring::in_range;
///
/// assert!(in_range("(-12.34)", -15.0, -5.0));
/// assert!(!in_range("abc", 0.0, 10.0));
/// ```
#[must_use]
pub fn in_range(value: &str, min: f64, max: f64) -> bool {
    parse_numeric(value).is_some_and(|v| min <= v && v <= max)
}

/// Label used in output tables for a range flag.
#[must_use]
pub const fn range_label(in_range: bool) -> &'static str {
    if in_range {
        IN_RANGE_LABEL
    } else {
        NOT_IN_RANGE_LABEL
    }
}

/// Free energies at the three target temperatures.
///
/// A temperature that was not folded holds `0.0` and is scored like any
/// other value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MfeProfile(pub [f64; 3]);

/// Outcome of the six range checks of one scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeFlags {
    /// Energy checks in temperature order.
    pub mfe: [bool; 3],
    pub au: bool,
    pub gc: bool,
    pub gu: bool,
}

impl RangeFlags {
    /// Checks a scope against its ranges.
    #[must_use]
    pub fn classify(
        mfe: &MfeProfile,
        composition: &CompositionTriple,
        ranges: &MetricRanges,
    ) -> Self {
        let energy_ranges = ranges.mfe();
        Self {
            mfe: std::array::from_fn(|i| energy_ranges[i].contains(mfe.0[i])),
            au: ranges.au.contains(composition.au),
            gc: ranges.gc.contains(composition.gc),
            gu: ranges.gu.contains(composition.gu),
        }
    }

    /// Number of passed checks, `0..=6`.
    #[must_use]
    pub fn score(&self) -> u8 {
        let passed = self.mfe.iter().filter(|&&ok| ok).count()
            + usize::from(self.au)
            + usize::from(self.gc)
            + usize::from(self.gu);
        passed as u8
    }
}

/// Whether a hairpin score qualifies a record as a top candidate.
#[must_use]
pub const fn is_top_candidate(score: u8) -> bool {
    score >= TOP_CANDIDATE_SCORE
}
