//! Base-pair and nucleotide composition.
//!
//! Two independent measures are provided:
//!
//! - [`paired_composition`]: share of AU, GC and GU pairs among the base pairs
//!   of a dot-bracket structure.
//! - [`raw_composition`]: share of A+U, G+C and G+U nucleotides in a sequence,
//!   ignoring structure entirely.
//!
//! Both return a [`CompositionTriple`] whose components overlap by
//! construction and need not add up to 100.

use crate::structure::base_pairs;
use crate::types::CompositionTriple;

/// Tally of base-pair types, orientation-sensitive (`AU` is 5' A with 3' U).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairCounts {
    pub au: usize,
    pub ua: usize,
    pub gc: usize,
    pub cg: usize,
    pub gu: usize,
    pub ug: usize,
    /// Pairs that are neither Watson-Crick nor wobble.
    pub non_canonical: usize,
}

impl PairCounts {
    /// Counts the pairs of `structure` by the nucleotides they join in `sequence`.
    ///
    /// Pairs pointing past the end of `sequence` are ignored.
    #[must_use]
    pub fn tally(sequence: &str, structure: &str) -> Self {
        let seq = sequence.as_bytes();
        let mut counts = Self::default();
        for (i, j) in base_pairs(structure) {
            let (Some(&five), Some(&three)) = (seq.get(i), seq.get(j)) else {
                continue;
            };
            match (five.to_ascii_uppercase(), three.to_ascii_uppercase()) {
                (b'A', b'U') => counts.au += 1,
                (b'U', b'A') => counts.ua += 1,
                (b'G', b'C') => counts.gc += 1,
                (b'C', b'G') => counts.cg += 1,
                (b'G', b'U') => counts.gu += 1,
                (b'U', b'G') => counts.ug += 1,
                _ => counts.non_canonical += 1,
            }
        }
        counts
    }

    /// All tallied pairs, canonical or not.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.au + self.ua + self.gc + self.cg + self.gu + self.ug + self.non_canonical
    }

    /// Converts counts to AU/GC/GU percentages of all pairs.
    #[must_use]
    pub fn percentages(&self) -> CompositionTriple {
        let total = self.total();
        if total == 0 {
            return CompositionTriple::default();
        }
        let pct = |n: usize| n as f64 / total as f64 * 100.0;
        CompositionTriple {
            au: pct(self.au + self.ua),
            gc: pct(self.gc + self.cg),
            gu: pct(self.gu + self.ug),
        }
    }
}

/// AU/GC/GU percentages over the base pairs of `structure`.
///
/// Returns all zeros when the structure has no pairs.
///
/// # Examples
///
/// ```rust
/// use thermofinder_core::composition::paired_composition;
///
/// let comp = paired_composition("GAAAAUUC", "((....))");
/// assert_eq!(comp.gc, 50.0);
/// assert_eq!(comp.au, 50.0);
/// assert_eq!(comp.gu, 0.0);
/// ```
#[must_use]
pub fn paired_composition(sequence: &str, structure: &str) -> CompositionTriple {
    PairCounts::tally(sequence, structure).percentages()
}

/// Nucleotide counts of a sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NucleotideCounts {
    pub a: usize,
    pub c: usize,
    pub g: usize,
    pub u: usize,
    pub length: usize,
}

impl NucleotideCounts {
    #[must_use]
    pub fn count(sequence: &str) -> Self {
        let mut counts = Self {
            length: sequence.len(),
            ..Default::default()
        };
        for b in sequence.bytes() {
            match b.to_ascii_uppercase() {
                b'A' => counts.a += 1,
                b'C' => counts.c += 1,
                b'G' => counts.g += 1,
                b'U' => counts.u += 1,
                _ => {}
            }
        }
        counts
    }
}

/// AU/GC/GU percentages over the nucleotides of `sequence`.
///
/// `AU% = (A+U)/len`, `GC% = (G+C)/len`, `GU% = (G+U)/len`, each times 100
/// and rounded to two decimals before any range test sees them. An empty
/// sequence yields all zeros.
///
/// # Examples
///
/// ```rust
/// use thermofinder_core::composition::raw_composition;
///
/// let comp = raw_composition("AAGU");
/// assert_eq!(comp.au, 75.0);
/// assert_eq!(comp.gc, 25.0);
/// assert_eq!(comp.gu, 50.0);
/// ```
#[must_use]
pub fn raw_composition(sequence: &str) -> CompositionTriple {
    let counts = NucleotideCounts::count(sequence);
    if counts.length == 0 {
        return CompositionTriple::default();
    }
    let pct = |n: usize| (n as f64 / counts.length as f64 * 10_000.0).round() / 100.0;
    CompositionTriple {
        au: pct(counts.a + counts.u),
        gc: pct(counts.g + counts.c),
        gu: pct(counts.g + counts.u),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_paired_composition_without_pairs() {
        let comp = paired_composition("ACGUACGU", "........");
        assert_eq!(comp, CompositionTriple::default());
        assert_eq!(paired_composition("", ""), CompositionTriple::default());
    }

    #[test]
    fn test_pair_counts_orientation() {
        // (0,11) A-U, (1,10) U-A, (2,9) G-C, (3,8) C-G, (4,7) G-U, (5,6) U-G
        let sequence = "AUGCGUGUGCAU";
        let structure = "(((((())))))";
        let counts = PairCounts::tally(sequence, structure);
        assert_eq!(counts.au, 1);
        assert_eq!(counts.ua, 1);
        assert_eq!(counts.gc, 1);
        assert_eq!(counts.cg, 1);
        assert_eq!(counts.gu, 1);
        assert_eq!(counts.ug, 1);
        assert_eq!(counts.non_canonical, 0);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_pair_types_partition_total_for_canonical_structure() {
        let sequence = "GGGAUAAAAUAUCCCAAGUAAAAUAC";
        let structure = "((((((...))))))..(((...)))";
        let counts = PairCounts::tally(sequence, structure);
        let canonical =
            counts.au + counts.ua + counts.gc + counts.cg + counts.gu + counts.ug;
        assert_eq!(counts.non_canonical, 0);
        assert_eq!(canonical, counts.total());
        assert_eq!(counts.total(), 9);

        let comp = counts.percentages();
        assert!((comp.au + comp.gc + comp.gu - 100.0).abs() < EPS);
    }

    #[test]
    fn test_paired_composition_percentages() {
        // Three pairs: G-C, G-U, A-U.
        let comp = paired_composition("GGAAAAUUC", "(((...)))");
        assert!((comp.gc - 100.0 / 3.0).abs() < EPS);
        assert!((comp.gu - 100.0 / 3.0).abs() < EPS);
        assert!((comp.au - 100.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_paired_composition_non_canonical_pairs_count_in_total() {
        // A-A pair is non-canonical but still a pair.
        let comp = paired_composition("GAACAC", "((..))");
        assert_eq!(comp.gc, 50.0);
        assert_eq!(comp.au, 0.0);
    }

    #[test]
    fn test_paired_composition_skips_unmatched_close() {
        let comp = paired_composition("AGAACC", ")(..).");
        assert_eq!(comp.gc, 100.0);
    }

    #[test]
    fn test_raw_composition_counts_overlap() {
        let comp = raw_composition("GGUU");
        assert_eq!(comp.au, 50.0);
        assert_eq!(comp.gc, 50.0);
        assert_eq!(comp.gu, 100.0);
    }

    #[test]
    fn test_raw_composition_rounds_to_two_decimals() {
        let comp = raw_composition("AAG");
        assert_eq!(comp.au, 66.67);
        assert_eq!(comp.gc, 33.33);
        assert_eq!(comp.gu, 33.33);

        // 29.996 % would pass a 0-29.99 range unrounded; rounded it does not.
        let range = crate::config::RangeSetting::new(0.0, 29.99).unwrap();
        let seq = format!("{}{}", "G".repeat(7499), "A".repeat(17501));
        let comp = raw_composition(&seq);
        assert_eq!(comp.gc, 30.0);
        assert!(!range.contains(comp.gc));
    }

    #[test]
    fn test_raw_composition_empty_sequence() {
        assert_eq!(raw_composition(""), CompositionTriple::default());
    }

    #[test]
    fn test_raw_composition_lowercase() {
        assert_eq!(raw_composition("acgu"), raw_composition("ACGU"));
    }

    #[test]
    fn test_nucleotide_counts() {
        let counts = NucleotideCounts::count("AACGUUU");
        assert_eq!(
            counts,
            NucleotideCounts {
                a: 2,
                c: 1,
                g: 1,
                u: 3,
                length: 7
            }
        );
    }
}
