//! Tabular output of screening results.
//!
//! A [`ResultSerializer`] maps each [`ResultRecord`] to a row holding the
//! enabled [`Column`]s in canonical order. [`write_csv`] writes the header and
//! all rows with the `csv` crate.
//!
//! ## Cell formatting
//!
//! - energies and percentages: two decimals
//! - range flags: `In Range` / `Not in Range`
//! - full-sequence values that were not computed: `0.00`
//! - RBS motif: `Not Found` when the search found nothing
//! - RBS structure and paired percentage: `N/A` without a motif
//!
//! ## Examples
//!
//! ```rust
//! use thermofinder_core::config::ColumnSelection;
//! use thermofinder_core::output::write_csv;
//!
//! let mut out = Vec::new();
//! write_csv(&mut out, &[], &ColumnSelection::default())?;
//!
//! let header = String::from_utf8(out).unwrap();
//! assert!(header.starts_with("Name,Sequence,Structure,Hairpin_Sequence"));
//! # Ok::<(), thermofinder_core::types::ThermoError>(())
//! ```

use std::io::Write;

use crate::config::{Column, ColumnSelection};
use crate::results::ResultRecord;
use crate::scoring::range_label;
use crate::types::ThermoError;

const NOT_FOUND: &str = "Not Found";
const NOT_AVAILABLE: &str = "N/A";

fn decimal(value: f64) -> String {
    format!("{value:.2}")
}

/// Formats records as rows of the selected columns.
#[derive(Debug, Clone, Default)]
pub struct ResultSerializer {
    columns: Vec<Column>,
}

impl ResultSerializer {
    #[must_use]
    pub fn new(selection: &ColumnSelection) -> Self {
        Self {
            columns: selection.columns().collect(),
        }
    }

    /// Columns written, in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn header(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header()).collect()
    }

    #[must_use]
    pub fn row(&self, record: &ResultRecord) -> Vec<String> {
        self.columns.iter().map(|&c| Self::cell(c, record)).collect()
    }

    /// Formats a single cell.
    #[must_use]
    pub fn cell(column: Column, record: &ResultRecord) -> String {
        let original = &record.original_assessment;
        let hairpin = &record.hairpin_assessment;
        match column {
            Column::Name => record.name.clone(),
            Column::OriginalSequence => record.original_sequence.clone(),
            Column::OriginalStructure => record.original_structure.clone(),
            Column::OriginalMfe25 => decimal(original.mfe.0[0]),
            Column::OriginalMfe37 => decimal(original.mfe.0[1]),
            Column::OriginalMfe42 => decimal(original.mfe.0[2]),
            Column::OriginalAuPercent => decimal(original.composition.au),
            Column::OriginalGcPercent => decimal(original.composition.gc),
            Column::OriginalGuPercent => decimal(original.composition.gu),
            Column::OriginalMfe25InRange => range_label(original.flags.mfe[0]).to_string(),
            Column::OriginalMfe37InRange => range_label(original.flags.mfe[1]).to_string(),
            Column::OriginalMfe42InRange => range_label(original.flags.mfe[2]).to_string(),
            Column::OriginalAuInRange => range_label(original.flags.au).to_string(),
            Column::OriginalGcInRange => range_label(original.flags.gc).to_string(),
            Column::OriginalGuInRange => range_label(original.flags.gu).to_string(),
            Column::HairpinSequence => record.hairpin.sequence.clone(),
            Column::HairpinStructure => record.hairpin.structure.clone(),
            Column::HairpinAuPercent => decimal(hairpin.composition.au),
            Column::HairpinGcPercent => decimal(hairpin.composition.gc),
            Column::HairpinGuPercent => decimal(hairpin.composition.gu),
            Column::HairpinMfe25 => decimal(hairpin.mfe.0[0]),
            Column::HairpinMfe37 => decimal(hairpin.mfe.0[1]),
            Column::HairpinMfe42 => decimal(hairpin.mfe.0[2]),
            Column::HairpinMfe25InRange => range_label(hairpin.flags.mfe[0]).to_string(),
            Column::HairpinMfe37InRange => range_label(hairpin.flags.mfe[1]).to_string(),
            Column::HairpinMfe42InRange => range_label(hairpin.flags.mfe[2]).to_string(),
            Column::HairpinAuInRange => range_label(hairpin.flags.au).to_string(),
            Column::HairpinGcInRange => range_label(hairpin.flags.gc).to_string(),
            Column::HairpinGuInRange => range_label(hairpin.flags.gu).to_string(),
            // An empty cell means the search was switched off.
            Column::RbsSequence => record.rbs.as_ref().map_or_else(String::new, |rbs| {
                rbs.candidate
                    .motif
                    .clone()
                    .unwrap_or_else(|| NOT_FOUND.to_string())
            }),
            Column::RbsStructure => record.rbs.as_ref().map_or_else(String::new, |rbs| {
                rbs.structure
                    .clone()
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string())
            }),
            Column::RbsPairedPercent => record.rbs.as_ref().map_or_else(String::new, |rbs| {
                rbs.paired_percent
                    .map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("{p:.2}"))
            }),
            Column::QualityScoreHairpin => record.hairpin_score().to_string(),
            Column::QualityScoreOriginal => record.original_score().to_string(),
        }
    }
}

/// Writes a header row and one row per record.
///
/// # Errors
///
/// Returns [`ThermoError::Csv`] or [`ThermoError::IoError`] if writing fails.
pub fn write_csv<W: Write>(
    writer: W,
    records: &[ResultRecord],
    selection: &ColumnSelection,
) -> Result<(), ThermoError> {
    let serializer = ResultSerializer::new(selection);
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(serializer.header())?;
    for record in records {
        csv_writer.write_record(serializer.row(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}
