//! Secondary-structure prediction backends.
//!
//! The screen never folds RNA itself. It asks a [`StructurePredictor`] for
//! the minimum free energy structure of a sequence under a [`ModelConfig`].
//! [`RnaFold`] drives the ViennaRNA `RNAfold` executable; any closure with a
//! matching signature works as well, which is how tests supply deterministic
//! folds.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::ModelConfig;
use crate::constants::DEFAULT_RNAFOLD_PROGRAM;
use crate::scoring::parse_numeric;
use crate::types::{Folding, ThermoError, is_rna};

/// Folds a sequence into a dot-bracket structure with its free energy.
///
/// Implementations must be deterministic for identical inputs and must fail
/// on sequences outside the `ACGU` alphabet.
pub trait StructurePredictor {
    /// # Errors
    ///
    /// Returns an error when the sequence cannot be folded.
    fn fold(&self, sequence: &str, model: &ModelConfig) -> Result<Folding, ThermoError>;
}

impl<F> StructurePredictor for F
where
    F: Fn(&str, &ModelConfig) -> Result<Folding, ThermoError>,
{
    fn fold(&self, sequence: &str, model: &ModelConfig) -> Result<Folding, ThermoError> {
        self(sequence, model)
    }
}

/// Predictor backed by the ViennaRNA `RNAfold` program.
///
/// Every call spawns one child process, writes the sequence to its stdin and
/// reads the two-line result:
///
/// ```text
/// GGGAAACCC
/// (((...))) ( -1.20)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RnaFold {
    program: PathBuf,
}

impl Default for RnaFold {
    fn default() -> Self {
        Self::new(DEFAULT_RNAFOLD_PROGRAM)
    }
}

impl RnaFold {
    /// Uses `program` as the `RNAfold` executable, resolved through `PATH`
    /// when it is a bare name.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Whether the executable can be started at all.
    #[must_use]
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    /// Command-line flags for one fold under `model`.
    #[must_use]
    pub fn arguments(model: &ModelConfig) -> Vec<String> {
        let mut args = vec![
            "--noPS".to_string(),
            format!("--temp={}", model.temperature),
            format!("--dangles={}", model.dangles.as_flag()),
        ];
        if model.no_lonely_pairs {
            args.push("--noLP".to_string());
        }
        if !model.allow_gu_pairs {
            args.push("--noGU".to_string());
        }
        args
    }
}

impl StructurePredictor for RnaFold {
    fn fold(&self, sequence: &str, model: &ModelConfig) -> Result<Folding, ThermoError> {
        if sequence.is_empty() || !is_rna(sequence) {
            return Err(ThermoError::InvalidSequence(format!(
                "cannot fold '{sequence}': only A, C, G and U are accepted"
            )));
        }

        let mut child = Command::new(&self.program)
            .args(Self::arguments(model))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ThermoError::Predictor(format!(
                    "could not start {}: {e}",
                    self.program.display()
                ))
            })?;

        let written = match child.stdin.take() {
            Some(mut stdin) => stdin
                .write_all(sequence.as_bytes())
                .and_then(|()| stdin.write_all(b"\n"))
                .map_err(|e| ThermoError::Predictor(format!("could not write to RNAfold: {e}"))),
            None => Err(ThermoError::Predictor("stdin of RNAfold unavailable".to_string())),
        };

        // stdin is closed by now; the child is reaped before any write error surfaces.
        let output = child.wait_with_output()?;
        written?;
        if !output.status.success() {
            return Err(ThermoError::Predictor(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_rnafold_output(&String::from_utf8_lossy(&output.stdout), sequence)
    }
}

/// Parses `RNAfold` standard output for a single sequence.
///
/// # Errors
///
/// Returns [`ThermoError::Predictor`] for truncated output or an unreadable
/// energy, and [`ThermoError::MalformedStructure`] when the structure does
/// not fit `sequence`.
pub fn parse_rnafold_output(stdout: &str, sequence: &str) -> Result<Folding, ThermoError> {
    let mut lines = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('>'));
    let (Some(_echo), Some(result)) = (lines.next(), lines.next()) else {
        return Err(ThermoError::Predictor(format!(
            "unexpected RNAfold output: '{}'",
            stdout.trim()
        )));
    };

    let (structure, energy) = result.split_once(char::is_whitespace).ok_or_else(|| {
        ThermoError::Predictor(format!("no free energy in RNAfold line '{result}'"))
    })?;
    let mfe = parse_numeric(energy)
        .ok_or_else(|| ThermoError::Predictor(format!("unreadable free energy '{energy}'")))?;

    let folding = Folding::new(structure, mfe);
    folding.validate_for(sequence)?;
    Ok(folding)
}
