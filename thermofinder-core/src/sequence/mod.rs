//! Sequence input and normalization.
//!
//! Readers turn FASTA files and delimited exports into [`SequenceRecord`]s
//! ready for screening. Every sequence is normalized the same way:
//!
//! - upper-cased
//! - `T` converted to `U`
//! - spaces, tabs and `|` separators removed
//!
//! Records whose sequence is empty after cleaning are dropped. No further
//! alphabet check happens here; the structure predictor rejects anything it
//! cannot fold.
//!
//! ## Modules
//!
//! - [`io`]: FASTA and CSV/TSV readers, FASTA writer
//!
//! ## Examples
//!
//! ```rust
//! use thermofinder_core::sequence::{SequenceStats, clean_sequence};
//! use thermofinder_core::types::SequenceRecord;
//!
//! assert_eq!(clean_sequence("acg t|tt"), "ACGUUU");
//!
//! let stats = SequenceStats::from_records(&[
//!     SequenceRecord::new("a", "ACGU"),
//!     SequenceRecord::new("b", "ACGUACGU"),
//! ]);
//! assert_eq!(stats.count, 2);
//! assert_eq!(stats.mean_length, 6.0);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::types::{SequenceRecord, ThermoError};

pub mod io;

pub use io::{DelimitedLayout, read_delimited_sequences, read_fasta_sequences, write_fasta};

/// Normalizes raw sequence text to the RNA alphabet convention.
#[must_use]
pub fn clean_sequence(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '|' | '\r' | '\n'))
        .map(|c| match c.to_ascii_uppercase() {
            'T' => 'U',
            other => other,
        })
        .collect()
}

/// Summary of a batch of sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceStats {
    pub count: usize,
    pub total_length: usize,
    pub mean_length: f64,
    pub min_length: usize,
    pub max_length: usize,
}

impl SequenceStats {
    /// Computes length statistics; all zero for an empty batch.
    #[must_use]
    pub fn from_records(records: &[SequenceRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let lengths = records.iter().map(SequenceRecord::len);
        let total_length: usize = lengths.clone().sum();
        Self {
            count: records.len(),
            total_length,
            mean_length: total_length as f64 / records.len() as f64,
            min_length: lengths.clone().min().unwrap_or(0),
            max_length: lengths.max().unwrap_or(0),
        }
    }
}

impl fmt::Display for SequenceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sequences, {} nt total, length {}-{} (mean {:.1})",
            self.count, self.total_length, self.min_length, self.max_length, self.mean_length
        )
    }
}

/// Layout of a sequence input file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    /// Chosen from the file extension: `.csv` and `.tsv` are delimited,
    /// everything else is FASTA.
    #[default]
    Auto,
    Fasta,
    Csv,
    Tsv,
}

impl InputFormat {
    /// Resolves [`InputFormat::Auto`] against the extension of `path`.
    #[must_use]
    pub fn resolve(self, path: &Path) -> Self {
        if self != Self::Auto {
            return self;
        }
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Self::Csv,
            Some("tsv" | "tab") => Self::Tsv,
            _ => Self::Fasta,
        }
    }
}

impl FromStr for InputFormat {
    type Err = ThermoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "fasta" | "fa" | "fna" => Ok(Self::Fasta),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            other => Err(ThermoError::InvalidConfig(format!(
                "unknown input format '{other}'"
            ))),
        }
    }
}

/// Reads sequences from `path` with the default delimited layout.
///
/// # Errors
///
/// Returns [`ThermoError::EmptyInput`] when the file holds no usable
/// sequence, or the reader's I/O or parse error.
pub fn read_sequences(path: &Path, format: InputFormat) -> Result<Vec<SequenceRecord>, ThermoError> {
    read_sequences_with_layout(path, format, DelimitedLayout::default())
}

/// Reads sequences from `path`, using `layout` for delimited files.
///
/// The layout's delimiter is replaced by the one implied by the format.
///
/// # Errors
///
/// See [`read_sequences`].
pub fn read_sequences_with_layout(
    path: &Path,
    format: InputFormat,
    layout: DelimitedLayout,
) -> Result<Vec<SequenceRecord>, ThermoError> {
    match format.resolve(path) {
        InputFormat::Csv => read_delimited_sequences(
            path,
            DelimitedLayout {
                delimiter: b',',
                ..layout
            },
        ),
        InputFormat::Tsv => read_delimited_sequences(
            path,
            DelimitedLayout {
                delimiter: b'\t',
                ..layout
            },
        ),
        InputFormat::Fasta | InputFormat::Auto => read_fasta_sequences(path),
    }
}
