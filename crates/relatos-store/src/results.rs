use anyhow::Context;
use relatos_core::{ReclassifyPolicy, SegmentationResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{lock_file, write_atomic};

/// Segmentation results, one JSON document per transcript.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
    lock_path: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>, lock_path: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock_path: lock_path.into(),
        }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    /// Load a result. Returns None if none has been written yet.
    pub fn load(&self, id: &str) -> anyhow::Result<Option<SegmentationResult>> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading segmentation: {}", path.display()))?;
        let result = serde_json::from_str(&content)
            .with_context(|| format!("parsing segmentation: {}", path.display()))?;
        Ok(Some(result))
    }

    /// Ids with a stored result, sorted.
    pub fn ids(&self) -> anyhow::Result<Vec<String>> {
        json_stems(&self.dir)
    }

    /// Store a fresh segmentation, replacing any prior one.
    ///
    /// With [`ReclassifyPolicy::MergeByStart`], classifications from the
    /// prior result are carried onto new spans with the same start. Returns
    /// how many were carried.
    pub fn save_segmentation(
        &self,
        result: &SegmentationResult,
        policy: ReclassifyPolicy,
    ) -> anyhow::Result<usize> {
        let _lock = lock_file(&self.lock_path)?;
        let mut result = result.clone();
        let carried = match policy {
            ReclassifyPolicy::Reset => 0,
            ReclassifyPolicy::MergeByStart => match self.load(&result.transcript_id)? {
                Some(prior) => merge_by_start(&mut result, &prior),
                None => 0,
            },
        };
        self.write(&result)?;
        if carried > 0 {
            tracing::info!(id = %result.transcript_id, carried, "prior classifications carried forward");
        }
        Ok(carried)
    }

    /// Overwrite the stored result as-is (review updates).
    pub fn save(&self, result: &SegmentationResult) -> anyhow::Result<()> {
        let _lock = lock_file(&self.lock_path)?;
        self.write(result)
    }

    fn write(&self, result: &SegmentationResult) -> anyhow::Result<()> {
        let path = self.path_for(&result.transcript_id);
        let data = serde_json::to_string_pretty(result)?;
        write_atomic(&path, data.as_bytes())
            .with_context(|| format!("saving segmentation: {}", path.display()))
    }
}

/// Start time at 0.1 s resolution.
fn start_key(start: f64) -> i64 {
    (start * 10.0).round() as i64
}

/// Copy prior classifications onto spans of `result` that start at the
/// same time. Spans that already carry a classification are left alone.
pub fn merge_by_start(result: &mut SegmentationResult, prior: &SegmentationResult) -> usize {
    let by_start: HashMap<i64, _> = prior
        .spans
        .iter()
        .filter_map(|s| s.classification.as_ref().map(|c| (start_key(s.start), c)))
        .collect();
    let mut carried = 0;
    for span in result.spans.iter_mut().filter(|s| s.classification.is_none()) {
        if let Some(c) = by_start.get(&start_key(span.start)) {
            span.classification = Some((*c).clone());
            carried += 1;
        }
    }
    carried
}

/// File stems of `*.json` files directly under `dir`, sorted.
pub(crate) fn json_stems(dir: &Path) -> anyhow::Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut ids = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            ids.push(stem.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relatos_core::{
        Classification, SegmentationConfig, StorySpan, METHOD_HEURISTICS_V1,
    };

    fn span(seq: u32, start: f64) -> StorySpan {
        StorySpan {
            sequence_id: seq,
            start,
            end: start + 100.0,
            duration: 100.0,
            matched_pattern: "writes-to-me".into(),
            text: "texto".into(),
            classification: None,
        }
    }

    fn result(id: &str, starts: &[f64]) -> SegmentationResult {
        let spans: Vec<StorySpan> = starts
            .iter()
            .enumerate()
            .map(|(i, s)| span(i as u32 + 1, *s))
            .collect();
        SegmentationResult {
            transcript_id: id.into(),
            generated_at: "2026-01-01T00:00:00Z".into(),
            method: METHOD_HEURISTICS_V1.into(),
            catalog_digest: String::new(),
            config: SegmentationConfig::default(),
            total_spans: spans.len(),
            spans,
        }
    }

    fn store(tmp: &Path) -> ResultStore {
        ResultStore::new(tmp.join("segmentacion"), tmp.join("LOCK"))
    }

    #[test]
    fn load_missing_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(store(tmp.path()).load("nope").unwrap().is_none());
    }

    #[test]
    fn reset_policy_drops_prior_labels() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());
        let mut prior = result("v", &[10.0, 200.0]);
        prior.spans[0].classification = Some(Classification::discarded("t"));
        s.save(&prior).unwrap();

        let carried = s
            .save_segmentation(&result("v", &[10.0, 200.0]), ReclassifyPolicy::Reset)
            .unwrap();
        assert_eq!(carried, 0);
        let loaded = s.load("v").unwrap().unwrap();
        assert!(loaded.spans[0].classification.is_none());
    }

    #[test]
    fn merge_policy_carries_labels_by_start() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());
        let mut prior = result("v", &[10.0, 200.0]);
        prior.spans[0].classification = Some(Classification::discarded("t"));
        prior.spans[1].classification = Some(Classification::discarded("t"));
        s.save(&prior).unwrap();

        // 10.04 rounds to the same 0.1 s bucket, 250 has no counterpart.
        let carried = s
            .save_segmentation(&result("v", &[10.04, 250.0]), ReclassifyPolicy::MergeByStart)
            .unwrap();
        assert_eq!(carried, 1);
        let loaded = s.load("v").unwrap().unwrap();
        assert!(loaded.spans[0].is_verified());
        assert!(loaded.spans[1].classification.is_none());
    }

    #[test]
    fn ids_lists_json_files_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());
        s.save(&result("b", &[])).unwrap();
        s.save(&result("a", &[])).unwrap();
        std::fs::write(tmp.path().join("segmentacion").join("notes.txt"), "x").unwrap();
        assert_eq!(s.ids().unwrap(), vec!["a", "b"]);
        assert!(s.exists("a"));
    }

    #[test]
    fn corrupt_file_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());
        std::fs::create_dir_all(tmp.path().join("segmentacion")).unwrap();
        std::fs::write(s.path_for("bad"), "{").unwrap();
        let err = s.load("bad").unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
    }
}
