//! Shine-Dalgarno (ribosome binding site) detection inside a hairpin.
//!
//! The search anchors on the last `AUG` of the hairpin and scans the region
//! 5 to 13 nt upstream of it with a 6-nt window. The first window holding at
//! least three guanines is accepted; later windows are never compared.
//!
//! ## Examples
//!
//! ```rust
//! use thermofinder_core::rbs::find_rbs;
//!
//! //              0         1         2
//! //              0123456789012345678901234
//! let hairpin = "CCUUUCAGGAGGCUUCUAAAUGCCC";
//! let rbs = find_rbs(hairpin);
//!
//! assert_eq!(rbs.start_codon_index, Some(19));
//! assert_eq!(rbs.motif.as_deref(), Some("AGGAGG"));
//! ```

use crate::constants::{
    RBS_DOWNSTREAM_DISTANCE, RBS_MIN_GUANINES, RBS_UPSTREAM_DISTANCE, RBS_WINDOW, START_CODON,
};
use crate::structure::paired_percent;
use crate::types::RbsCandidate;

/// Searches a hairpin sequence for a G-rich motif upstream of its last start codon.
///
/// Matching is case-insensitive; reported motif and region are upper-case.
#[must_use]
pub fn find_rbs(hairpin_sequence: &str) -> RbsCandidate {
    let seq = hairpin_sequence.to_ascii_uppercase();
    let Some(aug_index) = seq.rfind(START_CODON) else {
        return RbsCandidate::default();
    };

    let scan_start = aug_index.saturating_sub(RBS_UPSTREAM_DISTANCE);
    let scan_end = aug_index.saturating_sub(RBS_DOWNSTREAM_DISTANCE);
    let region = &seq[scan_start..scan_end];

    let motif = region
        .as_bytes()
        .windows(RBS_WINDOW)
        .find(|window| window.iter().filter(|&&b| b == b'G').count() >= RBS_MIN_GUANINES)
        .map(|window| String::from_utf8_lossy(window).into_owned());

    RbsCandidate {
        start_codon_index: Some(aug_index),
        motif,
        scanned_region: Some(region.to_string()),
        scan_start: Some(scan_start),
    }
}

/// Maps a motif back onto the hairpin structure.
///
/// The motif is relocated by its first occurrence in `hairpin_sequence`, so a
/// motif string that also appears further upstream maps to that earlier copy.
/// Returns `None` for empty inputs, mismatched sequence/structure lengths or a
/// motif that does not occur.
#[must_use]
pub fn motif_structure(
    motif: &str,
    hairpin_sequence: &str,
    hairpin_structure: &str,
) -> Option<String> {
    if motif.is_empty() || hairpin_sequence.is_empty() || hairpin_structure.is_empty() {
        return None;
    }
    if hairpin_sequence.len() != hairpin_structure.len() {
        return None;
    }
    let start = hairpin_sequence.find(motif)?;
    hairpin_structure
        .get(start..start + motif.len())
        .map(str::to_string)
}

/// Structural context of an accepted RBS motif.
#[derive(Debug, Clone, PartialEq)]
pub struct RbsReport {
    /// Raw search result.
    pub candidate: RbsCandidate,
    /// Dot-bracket slice under the motif.
    pub structure: Option<String>,
    /// Share of paired positions in `structure`, in percent.
    pub paired_percent: Option<f64>,
}

impl RbsReport {
    /// Runs the motif search and maps an accepted motif onto the hairpin structure.
    #[must_use]
    pub fn analyze(hairpin_sequence: &str, hairpin_structure: &str) -> Self {
        let candidate = find_rbs(hairpin_sequence);
        let structure = candidate
            .motif
            .as_deref()
            .and_then(|motif| motif_structure(motif, hairpin_sequence, hairpin_structure));
        let paired_percent = structure.as_deref().map(paired_percent);
        Self {
            candidate,
            structure,
            paired_percent,
        }
    }
}
