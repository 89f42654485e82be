use relatos_core::SegmentationResult;
use relatos_segment::{segment_batch, BatchOutcome};
use relatos_store::{DataPaths, PipelineStatus};
use std::path::Path;

use crate::workspace::{self, ConfigOverrides};

/// `relatos segment [ids...]`
pub fn execute(
    repo_root: &Path,
    ids: &[String],
    json: bool,
    catalog: Option<&Path>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<()> {
    segment(&workspace::paths(repo_root), ids, json, catalog, overrides)
}

fn segment(
    paths: &DataPaths,
    ids: &[String],
    json: bool,
    catalog: Option<&Path>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<()> {
    paths.ensure_layout()?;
    let segmenter = workspace::segmenter(paths, catalog, overrides)?;
    let source = workspace::transcripts(paths);
    let store = paths.results();
    let policy = segmenter.config().reclassify;

    let ids = if ids.is_empty() {
        source.available_ids()?
    } else {
        ids.to_vec()
    };
    if ids.is_empty() {
        println!(
            "No transcripts found in {}",
            paths.display(&paths.subtitles_dir)
        );
        return Ok(());
    }

    let mut produced: Vec<SegmentationResult> = Vec::new();
    let report = segment_batch(&ids, &source, &segmenter, |result| {
        store.save_segmentation(result, policy)?;
        let stored = store.load(&result.transcript_id)?;
        let reviewed = stored.as_ref().map_or(0, SegmentationResult::verified_count);
        PipelineStatus::update(&paths.status_json, &paths.lock_file, |status| {
            status.record_segmentation(&result.transcript_id, result.total_spans, reviewed)
        })?;
        if json {
            produced.push(stored.unwrap_or_else(|| result.clone()));
        }
        Ok(())
    });
    PipelineStatus::update(&paths.status_json, &paths.lock_file, |status| {
        for outcome in &report.outcomes {
            if let BatchOutcome::Failed { id, stage, message } = outcome {
                status.record_segmentation_error(id, &format!("{stage}: {message}"));
            }
        }
    })?;

    if json {
        let out = serde_json::json!({
            "report": report,
            "results": produced,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for outcome in &report.outcomes {
            match outcome {
                BatchOutcome::Passed { id, spans } => println!("  ok    {id}: {spans} spans"),
                BatchOutcome::Failed { id, stage, message } => {
                    println!("  FAIL  {id} [{stage}]: {message}")
                }
            }
        }
        println!(
            "\n{} passed, {} failed, {} spans",
            report.passed(),
            report.failed(),
            report.total_spans()
        );
    }

    if report.passed() == 0 {
        anyhow::bail!("no transcript was segmented");
    }
    Ok(())
}
