//! # ThermoFinder - RNA thermometer screening
//!
//! Screens bacterial RNA sequences, typically 5' untranslated regions, for
//! RNA thermometer candidates: structures that melt with temperature in a way
//! that could expose a ribosome binding site.
//!
//! ## Overview
//!
//! For every sequence the screen
//!
//! 1. folds the full sequence at 25 °C and extracts its terminal (3'-most)
//!    hairpin with the trailing unpaired tail,
//! 2. strips the tail and refolds the hairpin at 25, 37 and 42 °C,
//! 3. measures base-pair composition of the hairpin and looks for a G-rich
//!    Shine-Dalgarno motif upstream of its last `AUG`,
//! 4. scores the hairpin (and optionally the full sequence) by counting how
//!    many of six metrics fall inside configurable ranges.
//!
//! Records are ranked by hairpin score; scores of four and above mark top
//! candidates.
//!
//! Folding itself is delegated to a [`StructurePredictor`](predictor::StructurePredictor),
//! by default the ViennaRNA `RNAfold` executable.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use thermofinder_core::config::{ScreenConfig, ScreenSettings};
//! use thermofinder_core::events::TracingSink;
//! use thermofinder_core::output::write_csv;
//! use thermofinder_core::predictor::RnaFold;
//! use thermofinder_core::sequence::InputFormat;
//! use thermofinder_core::ThermometerScreen;
//!
//! let settings = ScreenSettings::load_or_create(std::path::Path::new("thermofinder.json"))?;
//! let screen = ThermometerScreen::new(RnaFold::default(), ScreenConfig::from(&settings));
//!
//! let report = screen.screen_file("utrs.fasta", InputFormat::Auto, &mut TracingSink)?;
//! println!("{} top candidates", report.top_candidates().count());
//!
//! write_csv(std::io::stdout(), &report.records, &settings.csv_output_columns)?;
//! # Ok::<(), thermofinder_core::types::ThermoError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`structure`]: terminal hairpin extraction and dot-bracket helpers
//! - [`rbs`]: Shine-Dalgarno motif search
//! - [`composition`]: paired and raw composition
//! - [`scoring`]: range classification and quality scores
//! - [`engine`]: per-sequence pipeline and batch screening
//! - [`results`]: result records, ranking and the batch report
//! - [`predictor`]: folding backends
//! - [`events`]: progress events and sinks
//! - [`config`]: thresholds, toggles, model parameters and settings file
//! - [`sequence`]: sequence readers
//! - [`output`]: CSV output
//! - [`types`]: core data types and [`ThermoError`](types::ThermoError)
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, ThermoError>`](types::ThermoError).
//! Only an unreadable or empty input aborts a batch; a sequence that cannot be
//! folded is recorded as failed and screening continues.

pub mod composition;
pub mod config;
pub mod constants;
pub mod engine;
pub mod events;
pub mod output;
pub mod predictor;
pub mod rbs;
pub mod results;
pub mod scoring;
pub mod sequence;
pub mod structure;
pub mod types;

pub use engine::ThermometerScreen;
pub use types::ThermoError;
