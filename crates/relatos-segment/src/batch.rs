use relatos_core::{SegmentationResult, Stage, TranscriptSource};
use serde::Serialize;

use crate::Segmenter;

/// Outcome for one transcript in a batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Passed {
        id: String,
        spans: usize,
    },
    Failed {
        id: String,
        stage: String,
        message: String,
    },
}

impl BatchOutcome {
    pub fn id(&self) -> &str {
        match self {
            BatchOutcome::Passed { id, .. } | BatchOutcome::Failed { id, .. } => id,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, BatchOutcome::Passed { .. })
    }
}

/// Per-transcript pass/fail summary, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn total_spans(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                BatchOutcome::Passed { spans, .. } => *spans,
                BatchOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    fn fail(&mut self, id: &str, stage: Stage, message: String) {
        tracing::warn!(id, %stage, error = %message, "transcript failed");
        self.outcomes.push(BatchOutcome::Failed {
            id: id.to_string(),
            stage: stage.to_string(),
            message,
        });
    }
}

/// Segment every id in order. A failure in any stage is recorded against
/// that id and the batch moves on; `persist` only ever sees complete results.
pub fn segment_batch<S>(
    ids: &[String],
    source: &dyn TranscriptSource,
    segmenter: &Segmenter,
    mut persist: S,
) -> BatchReport
where
    S: FnMut(&SegmentationResult) -> anyhow::Result<()>,
{
    let mut report = BatchReport::default();
    for id in ids {
        let transcript = match source.load(id) {
            Ok(t) => t,
            Err(e) => {
                report.fail(id, Stage::Load, e.to_string());
                continue;
            }
        };
        let result = match segmenter.run(&transcript) {
            Ok(r) => r,
            Err(e) => {
                report.fail(id, Stage::Segment, e.to_string());
                continue;
            }
        };
        if let Err(e) = persist(&result) {
            report.fail(id, Stage::Persist, format!("{e:#}"));
            continue;
        }
        report.outcomes.push(BatchOutcome::Passed {
            id: id.clone(),
            spans: result.total_spans,
        });
    }
    report
}
