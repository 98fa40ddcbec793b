//! Dot-bracket structure analysis.
//!
//! Locates the terminal (3'-most) hairpin of a folded sequence, strips its
//! unpaired tail and enumerates base pairs. All functions operate on plain
//! dot-bracket strings as returned by the structure predictor.
//!
//! ## Examples
//!
//! ```rust
//! use thermofinder_core::structure::{terminal_hairpin, trim_trailing_unpaired};
//!
//! let sequence = "AAGGGCAAAGCCCUUU";
//! let structure = "..(((....)))....";
//!
//! let hairpin = terminal_hairpin(sequence, structure).unwrap();
//! assert_eq!((hairpin.start, hairpin.end), (2, 15));
//! assert_eq!(hairpin.structure, "(((....)))....");
//!
//! let trimmed = trim_trailing_unpaired(&hairpin.sequence, &hairpin.structure);
//! assert_eq!(trimmed, "GGGCAAAGCC");
//! ```

use crate::types::HairpinRegion;

/// Extracts the rightmost hairpin together with its trailing unpaired tail.
///
/// The hairpin starts at the opening bracket matching the last `)` and ends
/// after the run of `.` that follows it. Returns `None` when the structure
/// has no closing bracket or the last closing bracket has no partner.
///
/// `sequence` and `structure` must be of equal length.
#[must_use]
pub fn terminal_hairpin(sequence: &str, structure: &str) -> Option<HairpinRegion> {
    let bytes = structure.as_bytes();
    let last_close = bytes.iter().rposition(|&c| c == b')')?;

    let mut depth = 0usize;
    let mut start = None;
    for i in (0..=last_close).rev() {
        match bytes[i] {
            b')' => depth += 1,
            b'(' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    start = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let start = start?;

    let mut end = last_close;
    while end + 1 < bytes.len() && bytes[end + 1] == b'.' {
        end += 1;
    }

    Some(HairpinRegion {
        start,
        end,
        sequence: sequence.get(start..=end)?.to_string(),
        structure: structure[start..=end].to_string(),
    })
}

/// Number of `.` characters at the 3' end of `structure`.
#[must_use]
pub fn trailing_unpaired(structure: &str) -> usize {
    structure.bytes().rev().take_while(|&c| c == b'.').count()
}

/// Removes the nucleotides under the trailing unpaired run of `structure`
/// from the end of `sequence`.
///
/// Only the sequence is shortened; callers keep the original structure for
/// pairing analysis.
#[must_use]
pub fn trim_trailing_unpaired<'a>(sequence: &'a str, structure: &str) -> &'a str {
    let keep = sequence.len().saturating_sub(trailing_unpaired(structure));
    &sequence[..keep]
}

/// Lists base pairs `(i, j)` with `i < j` in order of their closing bracket.
///
/// A `)` without an open partner is skipped instead of aborting the walk.
#[must_use]
pub fn base_pairs(structure: &str) -> Vec<(usize, usize)> {
    let mut stack = Vec::new();
    let mut pairs = Vec::new();
    for (j, c) in structure.bytes().enumerate() {
        match c {
            b'(' => stack.push(j),
            b')' => {
                if let Some(i) = stack.pop() {
                    pairs.push((i, j));
                }
            }
            _ => {}
        }
    }
    pairs
}

/// Percentage of paired positions (`(` or `)`) in a structure slice.
///
/// Returns `0.0` for an empty slice.
#[must_use]
pub fn paired_percent(structure: &str) -> f64 {
    if structure.is_empty() {
        return 0.0;
    }
    let paired = structure.bytes().filter(|&c| c == b'(' || c == b')').count();
    paired as f64 / structure.len() as f64 * 100.0
}
