use std::fs::File;
use std::io::Write;
use std::path::Path;

use bio::io::fasta;
use tracing::{debug, warn};

use crate::constants::{DEFAULT_NAME_COLUMN, DEFAULT_SEQUENCE_COLUMN, DEFAULT_SKIP_ROWS};
use crate::sequence::clean_sequence;
use crate::types::{SequenceRecord, ThermoError};

/// Reads every record of a FASTA file.
///
/// The record name is the full header line: identifier plus description.
/// Records that are empty after cleaning are dropped with a warning.
///
/// # Errors
///
/// Returns [`ThermoError::IoError`] for an unreadable file,
/// [`ThermoError::ParseError`] for malformed FASTA and
/// [`ThermoError::EmptyInput`] when no sequence remains.
pub fn read_fasta_sequences(path: &Path) -> Result<Vec<SequenceRecord>, ThermoError> {
    let file = File::open(path)?;
    let reader = fasta::Reader::new(file);
    let mut sequences = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| ThermoError::ParseError(e.to_string()))?;
        let name = match record.desc() {
            Some(desc) => format!("{} {}", record.id(), desc),
            None => record.id().to_string(),
        };
        let sequence = clean_sequence(&String::from_utf8_lossy(record.seq()));
        if sequence.is_empty() {
            warn!(%name, "Empty sequence, skipping");
            continue;
        }
        sequences.push(SequenceRecord::new(name, sequence));
    }

    if sequences.is_empty() {
        return Err(ThermoError::EmptyInput(path.display().to_string()));
    }
    debug!(path = %path.display(), count = sequences.len(), "Read FASTA sequences");
    Ok(sequences)
}

/// Column layout of a delimited sequence export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedLayout {
    /// Metadata rows before the first data row.
    ///
    /// **Default**: 30
    pub skip_rows: usize,
    /// 0-based column of the sequence name.
    ///
    /// **Default**: 0
    pub name_column: usize,
    /// 0-based column of the nucleotide sequence.
    ///
    /// **Default**: 10
    pub sequence_column: usize,
    /// Field separator.
    ///
    /// **Default**: `,`
    pub delimiter: u8,
}

impl Default for DelimitedLayout {
    fn default() -> Self {
        Self {
            skip_rows: DEFAULT_SKIP_ROWS,
            name_column: DEFAULT_NAME_COLUMN,
            sequence_column: DEFAULT_SEQUENCE_COLUMN,
            delimiter: b',',
        }
    }
}

/// Reads named sequences from a CSV or TSV export.
///
/// Rows too short to reach both columns are skipped, as are rows whose name
/// or cleaned sequence is empty.
///
/// # Errors
///
/// Returns [`ThermoError::Csv`] for unreadable rows and
/// [`ThermoError::EmptyInput`] when no sequence was found.
pub fn read_delimited_sequences(
    path: &Path,
    layout: DelimitedLayout,
) -> Result<Vec<SequenceRecord>, ThermoError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(layout.delimiter)
        .from_path(path)?;
    let needed = layout.name_column.max(layout.sequence_column);

    let mut sequences = Vec::new();
    for (row, result) in reader.records().enumerate().skip(layout.skip_rows) {
        let record = result?;
        if record.len() <= needed {
            debug!(row = row + 1, fields = record.len(), "Incomplete row, skipping");
            continue;
        }
        let name = record.get(layout.name_column).unwrap_or_default().trim();
        let sequence = clean_sequence(record.get(layout.sequence_column).unwrap_or_default());
        if name.is_empty() || sequence.is_empty() {
            continue;
        }
        sequences.push(SequenceRecord::new(name, sequence));
    }

    if sequences.is_empty() {
        return Err(ThermoError::EmptyInput(path.display().to_string()));
    }
    debug!(path = %path.display(), count = sequences.len(), "Read delimited sequences");
    Ok(sequences)
}

/// Writes records as FASTA, wrapping sequence lines at `line_width`.
///
/// # Errors
///
/// Returns any write error.
pub fn write_fasta<W: Write>(
    writer: &mut W,
    records: &[SequenceRecord],
    line_width: usize,
) -> Result<(), ThermoError> {
    let width = line_width.max(1);
    for record in records {
        writeln!(writer, ">{}", record.name)?;
        for chunk in record.sequence.as_bytes().chunks(width) {
            writer.write_all(chunk)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}
