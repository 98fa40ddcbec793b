//! # ThermoFinder CLI - RNA thermometer screen
//!
//! Screens the sequences of a FASTA, CSV or TSV file for RNA thermometer
//! candidates and writes one ranked CSV row per hairpin found.
//!
//! ## Usage
//!
//! ```bash
//! # Screen a FASTA file, CSV to stdout
//! thermofinder -i utrs.fasta
//!
//! # Use (and create if missing) a settings file, write to a file
//! thermofinder -i utrs.fasta -s thermofinder.json -o candidates.csv
//!
//! # Delimited export: data starts after 30 rows, sequence in column 10
//! thermofinder -i export.csv --skip-rows 30 --sequence-column 10
//!
//! # Fold every sequence with a start codon appended
//! thermofinder -i utrs.fasta --append AUG --append-position end
//! ```
//!
//! ## Options
//!
//! - `-i, --input <FILE>`: Input sequences
//! - `-o, --output <FILE>`: Output CSV (default: stdout)
//! - `-s, --settings <FILE>`: JSON settings, created with defaults if missing
//! - `-f, --format <FORMAT>`: Input format: auto, fasta, csv, tsv (default: auto)
//! - `--skip-rows <N>`: Metadata rows before the data in CSV/TSV input
//! - `--name-column <N>`: 0-based name column in CSV/TSV input
//! - `--sequence-column <N>`: 0-based sequence column in CSV/TSV input
//! - `--rnafold <PATH>`: RNAfold executable (default: `RNAfold` on `PATH`)
//! - `--append <MOTIF>`: Motif attached to every sequence before folding
//! - `--append-position <POS>`: Where the motif goes: start or end
//! - `-q, --quiet`: Only log warnings and errors
//!
//! Logging goes to stderr; `RUST_LOG` overrides the level.

use clap::{Arg, ArgAction, Command, value_parser};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thermofinder_core::ThermometerScreen;
use thermofinder_core::config::{AppendPosition, ScreenConfig, ScreenSettings, SequencePreprocessing};
use thermofinder_core::events::TracingSink;
use thermofinder_core::output::write_csv;
use thermofinder_core::predictor::RnaFold;
use thermofinder_core::sequence::{DelimitedLayout, InputFormat, read_sequences_with_layout};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("thermofinder")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Screens bacterial 5' UTRs for RNA thermometer candidates")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .required(true)
                .help("Input FASTA, CSV or TSV file"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output CSV file (default: stdout)"),
        )
        .arg(
            Arg::new("settings")
                .short('s')
                .long("settings")
                .value_name("FILE")
                .help("JSON settings file, created with defaults if missing"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Input format: auto, fasta, csv, tsv")
                .default_value("auto"),
        )
        .arg(
            Arg::new("skip-rows")
                .long("skip-rows")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Metadata rows before the data in CSV/TSV input (default: 30)"),
        )
        .arg(
            Arg::new("name-column")
                .long("name-column")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("0-based name column in CSV/TSV input (default: 0)"),
        )
        .arg(
            Arg::new("sequence-column")
                .long("sequence-column")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("0-based sequence column in CSV/TSV input (default: 10)"),
        )
        .arg(
            Arg::new("rnafold")
                .long("rnafold")
                .value_name("PATH")
                .help("RNAfold executable")
                .default_value("RNAfold"),
        )
        .arg(
            Arg::new("append")
                .long("append")
                .value_name("MOTIF")
                .help("Motif attached to every sequence before folding"),
        )
        .arg(
            Arg::new("append-position")
                .long("append-position")
                .value_name("POS")
                .help("Where the appended motif goes: start or end"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Only log warnings and errors"),
        )
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Main entry point for the ThermoFinder CLI.
///
/// Loads settings, reads the input sequences, screens them with `RNAfold`
/// and writes the ranked records as CSV.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("quiet"));

    let mut settings = match matches.get_one::<String>("settings") {
        Some(path) => ScreenSettings::load_or_create(Path::new(path))?,
        None => ScreenSettings::default(),
    };

    if let Some(position) = matches.get_one::<String>("append-position") {
        settings.sequence_processing.position = position.parse::<AppendPosition>()?;
    }
    if let Some(motif) = matches.get_one::<String>("append") {
        settings.sequence_processing =
            SequencePreprocessing::new(motif, settings.sequence_processing.position)?;
    }

    let defaults = DelimitedLayout::default();
    let layout = DelimitedLayout {
        skip_rows: matches
            .get_one::<usize>("skip-rows")
            .copied()
            .unwrap_or(defaults.skip_rows),
        name_column: matches
            .get_one::<usize>("name-column")
            .copied()
            .unwrap_or(defaults.name_column),
        sequence_column: matches
            .get_one::<usize>("sequence-column")
            .copied()
            .unwrap_or(defaults.sequence_column),
        ..defaults
    };

    let format = matches
        .get_one::<String>("format")
        .map_or(Ok(InputFormat::Auto), |f| f.parse::<InputFormat>())?;

    let rnafold = RnaFold::new(
        matches
            .get_one::<String>("rnafold")
            .map_or("RNAfold", String::as_str),
    );
    if !rnafold.is_available() {
        return Err(format!(
            "RNAfold executable '{}' not found or not runnable",
            rnafold.program().display()
        )
        .into());
    }

    let input = matches
        .get_one::<String>("input")
        .ok_or("an input file is required")?;
    let sequences = read_sequences_with_layout(Path::new(input), format, layout)?;

    let screen = ThermometerScreen::new(rnafold, ScreenConfig::from(&settings));
    let report = screen.screen(&sequences, &mut TracingSink)?;

    let mut writer: Box<dyn Write> = if let Some(output_file) = matches.get_one::<String>("output")
    {
        Box::new(BufWriter::new(File::create(output_file)?))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };
    write_csv(&mut writer, &report.records, &settings.csv_output_columns)?;
    writer.flush()?;

    info!(
        records = report.records.len(),
        top_candidates = report.top_candidates().count(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Screen complete"
    );

    Ok(())
}
