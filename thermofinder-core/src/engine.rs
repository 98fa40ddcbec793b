use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use thiserror::Error;

use crate::composition::{paired_composition, raw_composition};
use crate::config::{ModelConfig, ScreenConfig};
use crate::constants::MAX_SKIPPED_LENGTH;
use crate::events::{EventSink, ScreenEvent};
use crate::predictor::StructurePredictor;
use crate::rbs::RbsReport;
use crate::results::{
    FailedSequence, ResultRecord, ScopeAssessment, ScreenReport, SkipReason, SkippedSequence,
    rank_records,
};
use crate::scoring::MfeProfile;
use crate::sequence::{InputFormat, SequenceStats, read_sequences};
use crate::structure::{terminal_hairpin, trim_trailing_unpaired};
use crate::types::{CompositionTriple, Folding, SequenceRecord, ThermoError};

/// Step of the per-sequence pipeline, recorded when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Folding the full sequence at the base temperature.
    OriginalFold,
    /// Folding the full sequence at the remaining temperatures.
    OriginalSweep,
    /// Locating and trimming the terminal hairpin and the RBS search.
    HairpinExtraction,
    /// Refolding the trimmed hairpin at every temperature.
    HairpinSweep,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OriginalFold => "original fold",
            Self::OriginalSweep => "original temperature sweep",
            Self::HairpinExtraction => "hairpin extraction",
            Self::HairpinSweep => "hairpin temperature sweep",
        };
        f.write_str(name)
    }
}

/// Error raised while processing a single sequence.
#[derive(Error, Debug)]
#[error("{stage} failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: ThermoError,
}

impl StageError {
    const fn new(stage: Stage, source: ThermoError) -> Self {
        Self { stage, source }
    }
}

/// Terminal state of one sequence that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceOutcome {
    Scored(Box<ResultRecord>),
    Skipped(SkipReason),
}

/// RNA thermometer screen over a batch of sequences.
///
/// Each sequence is folded at the base temperature, its terminal hairpin is
/// extracted and trimmed, the trimmed hairpin is refolded at every target
/// temperature and both the full sequence and the hairpin are scored against
/// the configured ranges. Sequences are processed strictly one after the
/// other; a failure in one sequence, including a panic, is recorded and the
/// batch continues.
///
/// # Type Parameters
///
/// * `P` - The folding backend, see [`StructurePredictor`]
///
/// # Examples
///
/// ```rust,no_run
/// use thermofinder_core::config::ScreenConfig;
/// use thermofinder_core::engine::ThermometerScreen;
/// use thermofinder_core::events::TracingSink;
/// use thermofinder_core::predictor::RnaFold;
/// use thermofinder_core::sequence::InputFormat;
///
/// let screen = ThermometerScreen::new(RnaFold::default(), ScreenConfig::default());
/// let report = screen.screen_file("utrs.fasta", InputFormat::Auto, &mut TracingSink)?;
///
/// for record in report.top_candidates() {
///     println!("{}: {}/6", record.name, record.hairpin_score());
/// }
/// # Ok::<(), thermofinder_core::types::ThermoError>(())
/// ```
#[derive(Debug)]
pub struct ThermometerScreen<P> {
    predictor: P,
    config: ScreenConfig,
}

impl<P: StructurePredictor> ThermometerScreen<P> {
    pub const fn new(predictor: P, config: ScreenConfig) -> Self {
        Self { predictor, config }
    }

    #[must_use]
    pub const fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Reads sequences from `path` and screens them.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError`] if the file cannot be read or holds no sequences.
    pub fn screen_file<Q: AsRef<Path>, S: EventSink + ?Sized>(
        &self,
        path: Q,
        format: InputFormat,
        sink: &mut S,
    ) -> Result<ScreenReport, ThermoError> {
        let sequences = read_sequences(path.as_ref(), format)?;
        self.screen(&sequences, sink)
    }

    /// Screens a batch and returns the ranked report.
    ///
    /// Skips and per-sequence failures are recorded in the report and
    /// emitted as events; they never abort the batch.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::EmptyInput`] for an empty batch.
    pub fn screen<S: EventSink + ?Sized>(
        &self,
        sequences: &[SequenceRecord],
        sink: &mut S,
    ) -> Result<ScreenReport, ThermoError> {
        if sequences.is_empty() {
            return Err(ThermoError::EmptyInput("input batch".to_string()));
        }
        self.config.preprocessing.validate()?;

        sink.emit(ScreenEvent::BatchStarted {
            stats: SequenceStats::from_records(sequences),
        });

        let mut report = ScreenReport::default();
        for (index, record) in sequences.iter().enumerate() {
            sink.emit(ScreenEvent::SequenceStarted {
                index,
                total: sequences.len(),
                name: record.name.clone(),
                length: record.len(),
            });

            let stage = Cell::new(Stage::OriginalFold);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                self.process_tracked(record, &mut *sink, &stage)
            }))
            .unwrap_or_else(|payload| {
                Err(StageError::new(
                    stage.get(),
                    ThermoError::Internal(panic_message(&*payload)),
                ))
            });

            match outcome {
                Ok(SequenceOutcome::Scored(result)) => {
                    sink.emit(ScreenEvent::SequenceScored {
                        name: result.name.clone(),
                        hairpin_score: result.hairpin_score(),
                        original_score: result.original_score(),
                    });
                    report.records.push(*result);
                }
                Ok(SequenceOutcome::Skipped(reason)) => {
                    sink.emit(ScreenEvent::SequenceSkipped {
                        name: record.name.clone(),
                        reason,
                    });
                    report.skipped.push(SkippedSequence {
                        name: record.name.clone(),
                        reason,
                    });
                }
                Err(err) => {
                    let failure = FailedSequence {
                        name: record.name.clone(),
                        stage: err.stage,
                        message: err.source.to_string(),
                    };
                    sink.emit(ScreenEvent::SequenceFailed {
                        name: failure.name.clone(),
                        stage: failure.stage,
                        message: failure.message.clone(),
                    });
                    report.failed.push(failure);
                }
            }
        }

        rank_records(&mut report.records);
        sink.emit(ScreenEvent::BatchFinished {
            records: report.records.len(),
            skipped: report.skipped.len(),
            failed: report.failed.len(),
            top_candidates: report.top_candidates().count(),
        });
        Ok(report)
    }

    /// Runs the per-sequence pipeline for one record.
    ///
    /// # Errors
    ///
    /// Returns a [`StageError`] naming the step at which the predictor failed
    /// or returned an unusable structure.
    pub fn process_sequence<S: EventSink + ?Sized>(
        &self,
        record: &SequenceRecord,
        sink: &mut S,
    ) -> Result<SequenceOutcome, StageError> {
        self.process_tracked(record, sink, &Cell::new(Stage::OriginalFold))
    }

    /// Pipeline body; `stage` always names the step in progress so a panic
    /// can be attributed.
    fn process_tracked<S: EventSink + ?Sized>(
        &self,
        record: &SequenceRecord,
        sink: &mut S,
        stage: &Cell<Stage>,
    ) -> Result<SequenceOutcome, StageError> {
        stage.set(Stage::OriginalFold);
        let length = record.len();
        if length <= MAX_SKIPPED_LENGTH {
            return Ok(SequenceOutcome::Skipped(SkipReason::TooShort { length }));
        }

        let sequence = self.config.preprocessing.apply(&record.sequence);

        let [base_temp, sweep_temps @ ..] = self.config.temperatures;
        let base = self.fold(&sequence, self.config.base_model.at(base_temp), Stage::OriginalFold)?;

        // Energies and composition that are switched off stay zero and are
        // still scored against their ranges.
        let mut original_mfe = MfeProfile([base.mfe, 0.0, 0.0]);
        if self.config.toggles.original_mfe_sweep {
            stage.set(Stage::OriginalSweep);
            for (slot, temp) in original_mfe.0[1..].iter_mut().zip(sweep_temps) {
                *slot = self
                    .fold(&sequence, self.config.sweep_model.at(temp), Stage::OriginalSweep)?
                    .mfe;
            }
        }
        let original_composition = if self.config.toggles.original_composition {
            raw_composition(&sequence)
        } else {
            CompositionTriple::default()
        };
        let original_assessment = ScopeAssessment::assess(
            original_mfe,
            original_composition,
            &self.config.ranges.original,
        );

        stage.set(Stage::HairpinExtraction);
        let Some(hairpin) = terminal_hairpin(&sequence, &base.structure) else {
            return Ok(SequenceOutcome::Skipped(SkipReason::NoHairpin));
        };
        let trimmed = trim_trailing_unpaired(&hairpin.sequence, &hairpin.structure).to_string();
        sink.emit(ScreenEvent::HairpinExtracted {
            name: record.name.clone(),
            start: hairpin.start,
            end: hairpin.end,
            trimmed_length: trimmed.len(),
        });

        let rbs = self.config.toggles.rbs.then(|| {
            let report = RbsReport::analyze(&hairpin.sequence, &hairpin.structure);
            sink.emit(ScreenEvent::RbsSearched {
                name: record.name.clone(),
                motif: report.candidate.motif.clone(),
                start_codon_index: report.candidate.start_codon_index,
            });
            report
        });

        stage.set(Stage::HairpinSweep);
        let mut hairpin_mfe = [0.0; 3];
        for (slot, temp) in hairpin_mfe.iter_mut().zip(self.config.temperatures) {
            *slot = self
                .fold(&trimmed, self.config.sweep_model.at(temp), Stage::HairpinSweep)?
                .mfe;
        }
        let hairpin_composition = paired_composition(&hairpin.sequence, &hairpin.structure);
        let hairpin_assessment = ScopeAssessment::assess(
            MfeProfile(hairpin_mfe),
            hairpin_composition,
            &self.config.ranges.hairpin,
        );

        Ok(SequenceOutcome::Scored(Box::new(ResultRecord {
            name: record.name.clone(),
            original_sequence: sequence,
            original_structure: base.structure,
            original_assessment,
            hairpin,
            trimmed_hairpin: trimmed,
            hairpin_assessment,
            rbs,
        })))
    }

    fn fold(&self, sequence: &str, model: ModelConfig, stage: Stage) -> Result<Folding, StageError> {
        let folding = self
            .predictor
            .fold(sequence, &model)
            .map_err(|e| StageError::new(stage, e))?;
        folding
            .validate_for(sequence)
            .map_err(|e| StageError::new(stage, e))?;
        Ok(folding)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppendPosition, CalculationToggles, RangeSetting, SequencePreprocessing};
    use crate::events::NullSink;
    use crate::scoring::RangeFlags;
    use std::cell::RefCell;

    /// Folds the outer three and last three positions into a stem, leaving
    /// the middle unpaired; sequences shorter than eight stay unpaired.
    fn stem_predictor(seq: &str, model: &ModelConfig) -> Result<Folding, ThermoError> {
        let n = seq.len();
        let structure = if n >= 8 {
            format!("((({})))", ".".repeat(n - 6))
        } else {
            ".".repeat(n)
        };
        Ok(Folding::new(structure, -(model.temperature / 5.0)))
    }

    #[test]
    fn test_short_sequence_is_skipped_before_folding() {
        let calls = RefCell::new(0);
        let predictor = |seq: &str, model: &ModelConfig| {
            *calls.borrow_mut() += 1;
            stem_predictor(seq, model)
        };
        let screen = ThermometerScreen::new(predictor, ScreenConfig::default());
        let outcome = screen
            .process_sequence(&SequenceRecord::new("s", "ACGU"), &mut NullSink)
            .unwrap();
        assert_eq!(outcome, SequenceOutcome::Skipped(SkipReason::TooShort { length: 4 }));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_unpaired_structure_is_skipped() {
        let screen = ThermometerScreen::new(stem_predictor, ScreenConfig::default());
        let outcome = screen
            .process_sequence(&SequenceRecord::new("s", "ACGUA"), &mut NullSink)
            .unwrap();
        assert_eq!(outcome, SequenceOutcome::Skipped(SkipReason::NoHairpin));
    }

    #[test]
    fn test_hairpin_is_refolded_trimmed_at_each_temperature() {
        let seen = RefCell::new(Vec::new());
        let predictor = |seq: &str, model: &ModelConfig| -> Result<Folding, ThermoError> {
            seen.borrow_mut().push((seq.to_string(), model.temperature));
            if seq.len() == 14 {
                Ok(Folding::new("..(((....)))..", -8.0))
            } else {
                stem_predictor(seq, model)
            }
        };
        let screen = ThermometerScreen::new(predictor, ScreenConfig::default());
        let outcome = screen
            .process_sequence(&SequenceRecord::new("s", "AAGGGAAAACCCUU"), &mut NullSink)
            .unwrap();
        let SequenceOutcome::Scored(record) = outcome else {
            panic!("expected a record");
        };

        assert_eq!(record.hairpin.sequence, "GGGAAAACCCUU");
        assert_eq!(record.hairpin.structure, "(((....)))..");
        assert_eq!(record.trimmed_hairpin, "GGGAAAACCC");

        let calls = seen.borrow();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], ("AAGGGAAAACCCUU".to_string(), 25.0));
        let sweep: Vec<f64> = calls[1..].iter().map(|(_, t)| *t).collect();
        assert_eq!(sweep, vec![25.0, 37.0, 42.0]);
        assert!(calls[1..].iter().all(|(s, _)| s == "GGGAAAACCC"));

        // Pair composition uses the untrimmed hairpin: three G-C pairs.
        let comp = record.hairpin_assessment.composition;
        assert_eq!(comp.gc, 100.0);
        assert_eq!(record.hairpin_assessment.mfe, MfeProfile([-5.0, -7.4, -8.4]));
    }

    #[test]
    fn test_original_sweep_and_composition_follow_toggles() {
        let config = ScreenConfig {
            toggles: CalculationToggles {
                original_mfe_sweep: true,
                original_composition: true,
                rbs: false,
            },
            ..Default::default()
        };
        let screen = ThermometerScreen::new(stem_predictor, config);
        let SequenceOutcome::Scored(record) = screen
            .process_sequence(&SequenceRecord::new("s", "GGGAAAAUCCC"), &mut NullSink)
            .unwrap()
        else {
            panic!("expected a record");
        };
        assert_eq!(
            record.original_assessment.mfe,
            MfeProfile([-5.0, -7.4, -8.4])
        );
        assert_ne!(record.original_assessment.composition, CompositionTriple::default());
        assert!(record.rbs.is_none());
    }

    #[test]
    fn test_original_metrics_absent_by_default() {
        let screen = ThermometerScreen::new(stem_predictor, ScreenConfig::default());
        let SequenceOutcome::Scored(record) = screen
            .process_sequence(&SequenceRecord::new("s", "GGGAAAAUCCC"), &mut NullSink)
            .unwrap()
        else {
            panic!("expected a record");
        };
        assert_eq!(record.original_assessment.mfe, MfeProfile([-5.0, 0.0, 0.0]));
        assert_eq!(record.original_assessment.composition, CompositionTriple::default());
        assert!(record.rbs.is_some());
    }

    #[test]
    fn test_disabled_original_metrics_score_as_zero() {
        let predictor = |seq: &str, model: &ModelConfig| -> Result<Folding, ThermoError> {
            let folding = stem_predictor(seq, model)?;
            Ok(Folding::new(folding.structure, -12.0))
        };
        let screen = ThermometerScreen::new(predictor, ScreenConfig::default());
        let SequenceOutcome::Scored(record) = screen
            .process_sequence(&SequenceRecord::new("s", "GGGAAAAUCCC"), &mut NullSink)
            .unwrap()
        else {
            panic!("expected a record");
        };

        // -12 at 25 °C is inside [-30, -10]; the zero energies miss their
        // ranges while zero composition sits inside the default [0, 100].
        let flags = record.original_assessment.flags;
        assert_eq!(flags.mfe, [true, false, false]);
        assert!(flags.au && flags.gc && flags.gu);
        assert_eq!(record.original_score(), 4);
    }

    #[test]
    fn test_original_score_from_sweep_and_raw_composition() {
        let mut config = ScreenConfig {
            toggles: CalculationToggles {
                original_mfe_sweep: true,
                original_composition: true,
                rbs: false,
            },
            ..Default::default()
        };
        let original = &mut config.ranges.original;
        original.mfe_25 = RangeSetting::new(-6.0, -4.0).unwrap();
        original.mfe_37 = RangeSetting::new(-7.0, -6.0).unwrap();
        original.mfe_42 = RangeSetting::new(-9.0, -8.0).unwrap();
        original.au = RangeSetting::new(40.0, 50.0).unwrap();
        original.gc = RangeSetting::new(0.0, 50.0).unwrap();
        original.gu = RangeSetting::new(30.0, 40.0).unwrap();

        let screen = ThermometerScreen::new(stem_predictor, config);
        let SequenceOutcome::Scored(record) = screen
            .process_sequence(&SequenceRecord::new("s", "GGGAAAAUCCC"), &mut NullSink)
            .unwrap()
        else {
            panic!("expected a record");
        };

        // G3 A4 U1 C3 over 11 nt.
        assert_eq!(
            record.original_assessment.composition,
            CompositionTriple {
                au: 45.45,
                gc: 54.55,
                gu: 36.36,
            }
        );
        assert_eq!(
            record.original_assessment.flags,
            RangeFlags {
                mfe: [true, false, true],
                au: true,
                gc: false,
                gu: true,
            }
        );
        assert_eq!(record.original_score(), 4);
    }

    #[test]
    fn test_panicking_sequence_does_not_abort_batch() {
        let predictor = |seq: &str, model: &ModelConfig| -> Result<Folding, ThermoError> {
            if seq.starts_with('C') {
                panic!("folding backend crashed");
            }
            stem_predictor(seq, model)
        };
        let screen = ThermometerScreen::new(predictor, ScreenConfig::default());
        let batch = vec![
            SequenceRecord::new("crash", "CCCAAAAUGGG"),
            SequenceRecord::new("stem", "GGGAAAAUCCC"),
        ];
        let mut events: Vec<ScreenEvent> = Vec::new();
        let report = screen.screen(&batch, &mut events).unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "stem");
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "crash");
        assert_eq!(report.failed[0].stage, Stage::OriginalFold);
        assert!(report.failed[0].message.contains("folding backend crashed"));
        assert!(matches!(
            events.last(),
            Some(ScreenEvent::BatchFinished { records: 1, failed: 1, .. })
        ));
    }

    #[test]
    fn test_panic_during_hairpin_sweep_names_stage() {
        let predictor = |seq: &str, model: &ModelConfig| -> Result<Folding, ThermoError> {
            if model.temperature > 40.0 {
                panic!("no parameters for {} °C", model.temperature);
            }
            stem_predictor(seq, model)
        };
        let screen = ThermometerScreen::new(predictor, ScreenConfig::default());
        let report = screen
            .screen(&[SequenceRecord::new("s", "GGGAAAAUCCC")], &mut NullSink)
            .unwrap();
        assert_eq!(report.failed[0].stage, Stage::HairpinSweep);
        assert!(report.failed[0].message.contains("no parameters for 42"));
    }

    #[test]
    fn test_preprocessing_motif_is_folded() {
        let config = ScreenConfig {
            preprocessing: SequencePreprocessing::new("AUG", AppendPosition::End).unwrap(),
            ..Default::default()
        };
        let screen = ThermometerScreen::new(stem_predictor, config);
        let SequenceOutcome::Scored(record) = screen
            .process_sequence(&SequenceRecord::new("s", "GGGAAAAUCCC"), &mut NullSink)
            .unwrap()
        else {
            panic!("expected a record");
        };
        assert_eq!(record.original_sequence, "GGGAAAAUCCCAUG");
    }

    #[test]
    fn test_predictor_error_names_stage() {
        let predictor = |seq: &str, model: &ModelConfig| {
            if model.temperature > 40.0 {
                Err(ThermoError::Predictor("too hot".to_string()))
            } else {
                stem_predictor(seq, model)
            }
        };
        let screen = ThermometerScreen::new(predictor, ScreenConfig::default());
        let err = screen
            .process_sequence(&SequenceRecord::new("s", "GGGAAAAUCCC"), &mut NullSink)
            .unwrap_err();
        assert_eq!(err.stage, Stage::HairpinSweep);
        assert!(err.to_string().contains("too hot"));
    }

    #[test]
    fn test_malformed_fold_is_rejected() {
        let predictor = |_: &str, _: &ModelConfig| -> Result<Folding, ThermoError> {
            Ok(Folding::new("((..))", -1.0))
        };
        let screen = ThermometerScreen::new(predictor, ScreenConfig::default());
        let err = screen
            .process_sequence(&SequenceRecord::new("s", "GGGAAAAUCCC"), &mut NullSink)
            .unwrap_err();
        assert_eq!(err.stage, Stage::OriginalFold);
        assert!(matches!(err.source, ThermoError::MalformedStructure(_)));
    }

    #[test]
    fn test_screen_emits_ordered_events() {
        let screen = ThermometerScreen::new(stem_predictor, ScreenConfig::default());
        let batch = vec![
            SequenceRecord::new("short", "ACG"),
            SequenceRecord::new("stem", "GGGAAAAUCCC"),
        ];
        let mut events: Vec<ScreenEvent> = Vec::new();
        let report = screen.screen(&batch, &mut events).unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(events.first(), Some(ScreenEvent::BatchStarted { .. })));
        assert!(matches!(
            events.last(),
            Some(ScreenEvent::BatchFinished { records: 1, skipped: 1, failed: 0, .. })
        ));
        assert!(events.iter().any(|e| matches!(
            e,
            ScreenEvent::SequenceSkipped { reason: SkipReason::TooShort { length: 3 }, .. }
        )));
    }

    #[test]
    fn test_screen_rejects_empty_batch() {
        let screen = ThermometerScreen::new(stem_predictor, ScreenConfig::default());
        assert!(matches!(
            screen.screen(&[], &mut NullSink),
            Err(ThermoError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::HairpinSweep.to_string(), "hairpin temperature sweep");
    }
}
