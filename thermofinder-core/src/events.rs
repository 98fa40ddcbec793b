//! Progress reporting for a screening run.
//!
//! The screen reports what it does through a one-way stream of
//! [`ScreenEvent`]s delivered synchronously, in order, to an [`EventSink`].
//! Hosts decide how to present them: [`TracingSink`] forwards to `tracing`,
//! a `Vec<ScreenEvent>` records them, [`NullSink`] drops them.

use tracing::{debug, info, warn};

use crate::engine::Stage;
use crate::results::SkipReason;
use crate::sequence::SequenceStats;

/// One step of a screening run.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenEvent {
    /// The batch is about to be screened.
    BatchStarted { stats: SequenceStats },
    /// Processing of one sequence begins.
    SequenceStarted {
        index: usize,
        total: usize,
        name: String,
        length: usize,
    },
    /// The terminal hairpin of the base-temperature structure was located.
    HairpinExtracted {
        name: String,
        start: usize,
        end: usize,
        trimmed_length: usize,
    },
    /// The RBS search finished.
    RbsSearched {
        name: String,
        motif: Option<String>,
        start_codon_index: Option<usize>,
    },
    /// A record was assembled.
    SequenceScored {
        name: String,
        hairpin_score: u8,
        original_score: u8,
    },
    /// A sequence produced no record for an expected reason.
    SequenceSkipped { name: String, reason: SkipReason },
    /// A sequence produced no record because a step failed.
    SequenceFailed {
        name: String,
        stage: Stage,
        message: String,
    },
    /// Every sequence has been handled.
    BatchFinished {
        records: usize,
        skipped: usize,
        failed: usize,
        top_candidates: usize,
    },
}

/// Receiver of [`ScreenEvent`]s.
pub trait EventSink {
    fn emit(&mut self, event: ScreenEvent);
}

impl EventSink for Vec<ScreenEvent> {
    fn emit(&mut self, event: ScreenEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: ScreenEvent) {
        (**self).emit(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: ScreenEvent) {}
}

/// Logs events through `tracing` with structured fields.
///
/// Batch boundaries and per-sequence scores are logged at `info`, skips and
/// failures at `warn`, intermediate steps at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: ScreenEvent) {
        match event {
            ScreenEvent::BatchStarted { stats } => info!(
                sequences = stats.count,
                total_length = stats.total_length,
                mean_length = stats.mean_length,
                min_length = stats.min_length,
                max_length = stats.max_length,
                "Screening batch"
            ),
            ScreenEvent::SequenceStarted {
                index,
                total,
                name,
                length,
            } => debug!(%name, length, "Processing sequence {}/{}", index + 1, total),
            ScreenEvent::HairpinExtracted {
                name,
                start,
                end,
                trimmed_length,
            } => debug!(%name, start, end, trimmed_length, "Terminal hairpin extracted"),
            ScreenEvent::RbsSearched {
                name,
                motif,
                start_codon_index,
            } => match motif {
                Some(motif) => debug!(%name, %motif, ?start_codon_index, "RBS motif found"),
                None => debug!(%name, ?start_codon_index, "No RBS motif"),
            },
            ScreenEvent::SequenceScored {
                name,
                hairpin_score,
                original_score,
            } => info!(
                %name,
                hairpin_score,
                original_score,
                "Hairpin quality score {hairpin_score}/6"
            ),
            ScreenEvent::SequenceSkipped { name, reason } => {
                warn!(%name, %reason, "Skipping sequence");
            }
            ScreenEvent::SequenceFailed {
                name,
                stage,
                message,
            } => warn!(%name, %stage, error = %message, "Sequence failed"),
            ScreenEvent::BatchFinished {
                records,
                skipped,
                failed,
                top_candidates,
            } => info!(records, skipped, failed, top_candidates, "Screening complete"),
        }
    }
}
