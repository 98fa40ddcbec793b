use std::fmt;

use thiserror::Error;

use crate::constants::RNA_ALPHABET;

/// A named RNA sequence as produced by the sequence readers.
///
/// Sequences are expected to be upper-case and restricted to `A`, `C`, `G`
/// and `U`. The readers normalize input to this form; the structure predictor
/// rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Identifier taken from the FASTA header or the name column.
    pub name: String,
    /// Nucleotide string.
    pub sequence: String,
}

impl SequenceRecord {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }

    /// Sequence length in nucleotides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Returns `true` if every character of `sequence` is one of `A`, `C`, `G`, `U`.
#[must_use]
pub fn is_rna(sequence: &str) -> bool {
    sequence.bytes().all(|b| RNA_ALPHABET.contains(&b))
}

/// Structure and free energy returned by a [`StructurePredictor`](crate::predictor::StructurePredictor).
#[derive(Debug, Clone, PartialEq)]
pub struct Folding {
    /// Dot-bracket structure, one character per nucleotide.
    pub structure: String,
    /// Minimum free energy in kcal/mol.
    pub mfe: f64,
}

impl Folding {
    pub fn new(structure: impl Into<String>, mfe: f64) -> Self {
        Self {
            structure: structure.into(),
            mfe,
        }
    }

    /// Checks the predictor contract for a fold of `sequence`.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::MalformedStructure`] if the structure length
    /// differs from the sequence length or contains characters other than
    /// `.`, `(` and `)`, and [`ThermoError::Predictor`] for a non-finite energy.
    pub fn validate_for(&self, sequence: &str) -> Result<(), ThermoError> {
        if self.structure.len() != sequence.len() {
            return Err(ThermoError::MalformedStructure(format!(
                "structure length {} does not match sequence length {}",
                self.structure.len(),
                sequence.len()
            )));
        }
        if let Some(c) = self
            .structure
            .chars()
            .find(|c| !matches!(c, '.' | '(' | ')'))
        {
            return Err(ThermoError::MalformedStructure(format!(
                "unexpected character '{c}' in dot-bracket string"
            )));
        }
        if !self.mfe.is_finite() {
            return Err(ThermoError::Predictor(format!(
                "non-finite free energy {}",
                self.mfe
            )));
        }
        Ok(())
    }
}

/// The terminal hairpin of a folded sequence, including its unpaired 3' tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HairpinRegion {
    /// 0-based index of the opening bracket of the outermost pair.
    pub start: usize,
    /// 0-based inclusive index of the last nucleotide of the trailing tail.
    pub end: usize,
    /// Nucleotides over `start..=end`.
    pub sequence: String,
    /// Dot-bracket structure over `start..=end`.
    pub structure: String,
}

impl HairpinRegion {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Outcome of the Shine-Dalgarno search inside a hairpin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RbsCandidate {
    /// Index of the last `AUG` in the hairpin, if any.
    pub start_codon_index: Option<usize>,
    /// First G-rich 6-mer upstream of the start codon.
    pub motif: Option<String>,
    /// Upstream window that was scanned.
    pub scanned_region: Option<String>,
    /// Hairpin index at which `scanned_region` begins.
    pub scan_start: Option<usize>,
}

impl RbsCandidate {
    /// Whether a motif was accepted.
    #[must_use]
    pub const fn found(&self) -> bool {
        self.motif.is_some()
    }
}

/// Three overlapping composition percentages.
///
/// The values are not a partition of anything: `au` and `gu` both count
/// uracil, `gc` and `gu` both count guanine.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompositionTriple {
    pub au: f64,
    pub gc: f64,
    pub gu: f64,
}

impl fmt::Display for CompositionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AU={:.1}% GC={:.1}% GU={:.1}%",
            self.au, self.gc, self.gu
        )
    }
}

/// Error types raised by the screen and its adapters.
#[derive(Error, Debug)]
pub enum ThermoError {
    /// Sequence content the predictor cannot fold
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),
    /// No sequences were available for screening
    #[error("No sequences found in {0}")]
    EmptyInput(String),
    /// File I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing input data
    #[error("Parse error: {0}")]
    ParseError(String),
    /// The external structure predictor failed
    #[error("Structure prediction failed: {0}")]
    Predictor(String),
    /// A dot-bracket string broke the predictor contract
    #[error("Malformed structure: {0}")]
    MalformedStructure(String),
    /// A `[min, max]` bound that is empty or not finite
    #[error("Invalid range [{min}, {max}]: minimum must be below maximum")]
    InvalidRange { min: f64, max: f64 },
    /// Settings that cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Delimited input or output failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Settings file could not be (de)serialized
    #[error("Settings error: {0}")]
    Json(#[from] serde_json::Error),
    /// Processing of a sequence panicked
    #[error("Internal error: {0}")]
    Internal(String),
}
