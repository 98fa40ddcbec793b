use std::cmp::Reverse;
use std::fmt;

use crate::config::MetricRanges;
use crate::engine::Stage;
use crate::rbs::RbsReport;
use crate::scoring::{MfeProfile, RangeFlags, is_top_candidate};
use crate::types::{CompositionTriple, HairpinRegion};

/// Metrics and range checks of one scored scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeAssessment {
    /// Free energies at the target temperatures.
    pub mfe: MfeProfile,
    /// AU/GC/GU percentages; all zero when not computed.
    pub composition: CompositionTriple,
    /// Outcome of the six range checks.
    pub flags: RangeFlags,
}

impl ScopeAssessment {
    #[must_use]
    pub fn assess(
        mfe: MfeProfile,
        composition: CompositionTriple,
        ranges: &MetricRanges,
    ) -> Self {
        let flags = RangeFlags::classify(&mfe, &composition, ranges);
        Self {
            mfe,
            composition,
            flags,
        }
    }

    /// Quality score, `0..=6`.
    #[must_use]
    pub fn score(&self) -> u8 {
        self.flags.score()
    }
}

/// Everything computed for one screened sequence.
///
/// # Examples
///
/// ```rust
/// use thermofinder_core::config::ScreenConfig;
/// use thermofinder_core::engine::ThermometerScreen;
/// use thermofinder_core::events::NullSink;
/// use thermofinder_core::types::{Folding, SequenceRecord, ThermoError};
/// use thermofinder_core::config::ModelConfig;
///
/// let predictor = |seq: &str, _: &ModelConfig| -> Result<Folding, ThermoError> {
///     let n = seq.len();
///     Ok(Folding::new(format!("(((({}))))", ".".repeat(n - 8)), -12.0))
/// };
/// let screen = ThermometerScreen::new(predictor, ScreenConfig::default());
/// let report = screen.screen(&[SequenceRecord::new("utr1", "GGGGAAAACCCC")], &mut NullSink)?;
///
/// let record = &report.records[0];
/// assert_eq!(record.name, "utr1");
/// assert_eq!(record.hairpin.structure, "((((....))))");
/// assert_eq!(record.hairpin_score(), record.hairpin_assessment.score());
/// # Ok::<(), ThermoError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// Sequence name from the input.
    pub name: String,

    /// Screened sequence, after any motif was attached.
    pub original_sequence: String,

    /// Base-temperature structure of `original_sequence`.
    pub original_structure: String,

    /// Full-sequence metrics. Only the base-temperature energy is always
    /// computed; energies and composition switched off by the calculation
    /// toggles are zero.
    pub original_assessment: ScopeAssessment,

    /// Terminal hairpin including its unpaired tail.
    pub hairpin: HairpinRegion,

    /// Hairpin sequence without its unpaired tail, as refolded for the
    /// temperature sweep.
    pub trimmed_hairpin: String,

    /// Hairpin metrics: sweep energies of the trimmed hairpin and pair
    /// composition of the untrimmed hairpin.
    pub hairpin_assessment: ScopeAssessment,

    /// RBS search result, `None` when the search is disabled.
    pub rbs: Option<RbsReport>,
}

impl ResultRecord {
    #[must_use]
    pub fn hairpin_score(&self) -> u8 {
        self.hairpin_assessment.score()
    }

    #[must_use]
    pub fn original_score(&self) -> u8 {
        self.original_assessment.score()
    }

    #[must_use]
    pub fn is_top_candidate(&self) -> bool {
        is_top_candidate(self.hairpin_score())
    }
}

/// Sorts records by hairpin score, highest first.
///
/// The sort is stable: records with equal scores keep their input order.
pub fn rank_records(records: &mut [ResultRecord]) {
    records.sort_by_key(|record| Reverse(record.hairpin_score()));
}

/// Why a sequence produced no record without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Too short to hold any hairpin.
    TooShort { length: usize },
    /// The base-temperature structure has no base pairs.
    NoHairpin,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { length } => write!(f, "sequence too short ({length} nt)"),
            Self::NoHairpin => f.write_str("no hairpin detected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSequence {
    pub name: String,
    pub reason: SkipReason,
}

/// A sequence whose processing raised an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedSequence {
    pub name: String,
    /// Pipeline step that failed.
    pub stage: Stage,
    pub message: String,
}

/// Outcome of screening a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenReport {
    /// Records ranked by hairpin score.
    pub records: Vec<ResultRecord>,
    pub skipped: Vec<SkippedSequence>,
    pub failed: Vec<FailedSequence>,
}

impl ScreenReport {
    /// Ranked records with a hairpin score of at least four.
    pub fn top_candidates(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter().filter(|record| record.is_top_candidate())
    }

    /// Number of input sequences accounted for.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.records.len() + self.skipped.len() + self.failed.len()
    }
}
