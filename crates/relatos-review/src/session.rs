use relatos_core::timefmt::now_rfc3339;
use relatos_core::{Classification, SegmentationResult, StorySpan};
use serde::Serialize;

use crate::draft::ClassificationDraft;
use crate::error::{Result, ReviewError};
use crate::machine::{is_valid_transition, ReviewStatus};

/// Receives every terminal transition as it happens.
pub trait ReviewSink {
    /// `result` already holds the span's new classification.
    fn span_reviewed(&mut self, result: &SegmentationResult, span: &StorySpan) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewCommand {
    /// Start classifying the current span.
    Classify,
    /// Mark the current span as not a story.
    Discard,
    /// Leave the current span for a later session.
    Skip,
    /// Accept a classification for the span being classified.
    Confirm(ClassificationDraft),
    /// Abandon classification and return the span to pending.
    Cancel,
    /// End the session.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Finished,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ReviewSummary {
    pub transcript_id: String,
    pub total: usize,
    pub verified: usize,
    pub confirmed: usize,
    pub discarded: usize,
    pub skipped: usize,
}

impl ReviewSummary {
    pub fn pending(&self) -> usize {
        self.total - self.verified
    }
}

/// One reviewer pass over a transcript's spans.
///
/// Spans verified in an earlier session start out terminal and are never
/// presented again. The cursor only stops on pending spans.
pub struct ReviewSession<'s> {
    result: SegmentationResult,
    statuses: Vec<ReviewStatus>,
    cursor: Option<usize>,
    sink: &'s mut dyn ReviewSink,
    confirmed: usize,
    discarded: usize,
    skipped: usize,
}

impl<'s> ReviewSession<'s> {
    pub fn new(result: SegmentationResult, sink: &'s mut dyn ReviewSink) -> Self {
        let statuses = result
            .spans
            .iter()
            .map(|span| match &span.classification {
                Some(c) if c.human_verified && c.is_story => ReviewStatus::Confirmed,
                Some(c) if c.human_verified => ReviewStatus::Discarded,
                _ => ReviewStatus::Pending,
            })
            .collect();
        let mut session = Self {
            result,
            statuses,
            cursor: None,
            sink,
            confirmed: 0,
            discarded: 0,
            skipped: 0,
        };
        session.cursor = session.next_pending(0);
        session
    }

    pub fn result(&self) -> &SegmentationResult {
        &self.result
    }

    pub fn statuses(&self) -> &[ReviewStatus] {
        &self.statuses
    }

    pub fn state(&self) -> SessionState {
        if self.cursor.is_some() {
            SessionState::Active
        } else {
            SessionState::Finished
        }
    }

    /// The span under review and its status.
    pub fn current(&self) -> Option<(&StorySpan, ReviewStatus)> {
        self.cursor.map(|i| (&self.result.spans[i], self.statuses[i]))
    }

    /// Zero-based position of the current span and the total span count.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.cursor.map(|i| (i, self.result.spans.len()))
    }

    pub fn apply(&mut self, command: ReviewCommand) -> Result<SessionState> {
        let Some(index) = self.cursor else {
            return Err(ReviewError::NoCurrentSpan);
        };
        match command {
            ReviewCommand::Classify => {
                self.transition(index, ReviewStatus::Classifying)?;
            }
            ReviewCommand::Cancel => {
                self.transition(index, ReviewStatus::Pending)?;
            }
            ReviewCommand::Skip => {
                self.transition(index, ReviewStatus::Skipped)?;
                self.skipped += 1;
                self.advance(index);
            }
            ReviewCommand::Discard => {
                self.check(index, ReviewStatus::Discarded)?;
                let classification = Classification::discarded(now_rfc3339());
                self.commit(index, ReviewStatus::Discarded, classification)?;
                self.discarded += 1;
                self.advance(index);
            }
            ReviewCommand::Confirm(draft) => {
                self.check(index, ReviewStatus::Confirmed)?;
                let classification =
                    draft.finalize(&self.result.spans[index].text, &now_rfc3339())?;
                self.commit(index, ReviewStatus::Confirmed, classification)?;
                self.confirmed += 1;
                self.advance(index);
            }
            ReviewCommand::Quit => {
                if self.statuses[index] == ReviewStatus::Classifying {
                    self.transition(index, ReviewStatus::Pending)?;
                }
                self.cursor = None;
            }
        }
        Ok(self.state())
    }

    /// Close the session. Skipped spans go back to pending for next time.
    pub fn finish(mut self) -> (SegmentationResult, ReviewSummary) {
        for status in self.statuses.iter_mut() {
            if *status == ReviewStatus::Skipped {
                *status = ReviewStatus::Pending;
            }
        }
        let summary = ReviewSummary {
            transcript_id: self.result.transcript_id.clone(),
            total: self.result.spans.len(),
            verified: self.result.verified_count(),
            confirmed: self.confirmed,
            discarded: self.discarded,
            skipped: self.skipped,
        };
        tracing::info!(
            id = %summary.transcript_id,
            confirmed = summary.confirmed,
            discarded = summary.discarded,
            skipped = summary.skipped,
            pending = summary.pending(),
            "review session finished"
        );
        (self.result, summary)
    }

    fn check(&self, index: usize, to: ReviewStatus) -> Result<()> {
        let from = self.statuses[index];
        if !is_valid_transition(from, to) {
            return Err(ReviewError::InvalidTransition {
                sequence_id: self.result.spans[index].sequence_id,
                from,
                to,
            });
        }
        Ok(())
    }

    fn transition(&mut self, index: usize, to: ReviewStatus) -> Result<()> {
        self.check(index, to)?;
        self.statuses[index] = to;
        Ok(())
    }

    /// Apply a terminal transition and hand it to the sink; undo it if the
    /// sink fails so nothing claims to be saved that is not.
    fn commit(&mut self, index: usize, to: ReviewStatus, classification: Classification) -> Result<()> {
        let previous = self.result.spans[index].classification.replace(classification);
        let from = std::mem::replace(&mut self.statuses[index], to);
        if let Err(e) = self.sink.span_reviewed(&self.result, &self.result.spans[index]) {
            self.result.spans[index].classification = previous;
            self.statuses[index] = from;
            return Err(ReviewError::Sink {
                sequence_id: self.result.spans[index].sequence_id,
                message: format!("{e:#}"),
            });
        }
        Ok(())
    }

    fn advance(&mut self, index: usize) {
        self.cursor = self.next_pending(index + 1);
    }

    fn next_pending(&self, from: usize) -> Option<usize> {
        (from..self.statuses.len()).find(|&i| self.statuses[i] == ReviewStatus::Pending)
    }
}
