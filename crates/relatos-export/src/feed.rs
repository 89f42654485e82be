use anyhow::Context;
use relatos_core::timefmt::{format_timestamp, now_rfc3339};
use relatos_core::{youtube_url, Category, Narrator, SegmentationResult, StorySpan};
use relatos_store::{write_atomic, DataPaths, PipelineStatus};
use relatos_transcript::VideosInput;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TITLE: &str = "Historia sin título";
pub const DEFAULT_SUBCATEGORY: &str = "general";
pub const DEFAULT_WTF_SCORE: f64 = 0.5;

/// One story as the web front-end reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebStory {
    pub id: usize,
    pub video_id: String,
    #[serde(rename = "video_titulo")]
    pub video_title: String,
    #[serde(rename = "timestamp_inicio")]
    pub start: f64,
    #[serde(rename = "timestamp_fin")]
    pub end: f64,
    #[serde(rename = "timestamp_fmt")]
    pub start_fmt: String,
    #[serde(rename = "titulo_inferido")]
    pub title: String,
    #[serde(rename = "resumen")]
    pub summary: String,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "subcategoria")]
    pub subcategory: String,
    #[serde(rename = "tipo_narrador")]
    pub narrator: Narrator,
    pub wtf_score: f64,
    #[serde(rename = "verificado_humano")]
    pub human_verified: bool,
    #[serde(rename = "fecha_emision")]
    pub broadcast_date: String,
    pub youtube_url: String,
}

/// `web/data/historias.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebFeed {
    pub generated_at: String,
    pub total: usize,
    #[serde(rename = "historias")]
    pub stories: Vec<WebStory>,
}

/// Title and broadcast date shown next to a video's stories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoMeta {
    pub title: String,
    pub broadcast_date: String,
}

impl VideoMeta {
    /// Pipeline status first, then the input list.
    pub fn lookup(video_id: &str, status: &PipelineStatus, videos: &VideosInput) -> Self {
        let tracked = status.video(video_id);
        let listed = videos.find(video_id);
        let title = tracked
            .and_then(|v| v.title.clone())
            .or_else(|| listed.and_then(|v| v.title.clone()))
            .unwrap_or_default();
        let broadcast_date = tracked
            .and_then(|v| v.broadcast_date.clone())
            .or_else(|| listed.and_then(|v| v.date.clone()))
            .unwrap_or_default();
        Self {
            title,
            broadcast_date,
        }
    }
}

/// Feed entry for a verified story span; `None` for anything else.
pub fn web_story(id: usize, video_id: &str, meta: &VideoMeta, span: &StorySpan) -> Option<WebStory> {
    if !span.is_verified_story() {
        return None;
    }
    let c = span.classification.as_ref()?;
    Some(WebStory {
        id,
        video_id: video_id.to_string(),
        video_title: meta.title.clone(),
        start: span.start,
        end: span.end,
        start_fmt: format_timestamp(span.start),
        title: c.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        summary: c.summary.clone().unwrap_or_default(),
        category: c.category.unwrap_or(Category::Other),
        subcategory: c
            .subcategory
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBCATEGORY.to_string()),
        narrator: c.narrator.unwrap_or(Narrator::Listener),
        wtf_score: c.wtf_score.unwrap_or(DEFAULT_WTF_SCORE),
        human_verified: true,
        broadcast_date: meta.broadcast_date.clone(),
        youtube_url: youtube_url(video_id, span.start),
    })
}

/// Build the feed from results in the given order.
///
/// Ids are assigned in collection order; the list is then sorted by wtf
/// score, highest first, keeping collection order among ties.
pub fn build_feed<'a, I, M>(results: I, mut meta: M, generated_at: String) -> WebFeed
where
    I: IntoIterator<Item = &'a SegmentationResult>,
    M: FnMut(&str) -> VideoMeta,
{
    let mut stories = Vec::new();
    for result in results {
        let video_meta = meta(&result.transcript_id);
        for span in &result.spans {
            if let Some(story) = web_story(stories.len() + 1, &result.transcript_id, &video_meta, span) {
                stories.push(story);
            }
        }
    }
    stories.sort_by(|a, b| b.wtf_score.total_cmp(&a.wtf_score));
    WebFeed {
        generated_at,
        total: stories.len(),
        stories,
    }
}

pub fn write_feed(path: &Path, feed: &WebFeed) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(feed)?;
    write_atomic(path, data.as_bytes()).with_context(|| format!("writing feed: {}", path.display()))
}

pub fn load_feed(path: &Path) -> anyhow::Result<Option<WebFeed>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading feed: {}", path.display()))?;
    let feed = serde_json::from_str(&content)
        .with_context(|| format!("parsing feed: {}", path.display()))?;
    Ok(Some(feed))
}

/// Export every stored result to the web feed and mark the export stage.
pub fn export_web(paths: &DataPaths) -> anyhow::Result<WebFeed> {
    let store = paths.results();
    let status = PipelineStatus::load(&paths.status_json)?;
    let videos = VideosInput::load(&paths.videos_input_json)?;

    let mut results = Vec::new();
    for id in store.ids()? {
        if let Some(result) = store.load(&id)? {
            results.push(result);
        }
    }
    let feed = build_feed(
        &results,
        |id| VideoMeta::lookup(id, &status, &videos),
        now_rfc3339(),
    );
    write_feed(&paths.web_export_json, &feed)?;
    tracing::info!(
        stories = feed.total,
        path = %paths.web_export_json.display(),
        "web feed exported"
    );

    PipelineStatus::update(&paths.status_json, &paths.lock_file, |status| {
        for result in &results {
            status.video_mut(&result.transcript_id);
        }
        status.record_export();
    })?;
    Ok(feed)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use relatos_core::{Classification, SegmentationConfig, METHOD_HEURISTICS_V1};

    pub(crate) fn span(seq: u32, start: f64, classification: Option<Classification>) -> StorySpan {
        StorySpan {
            sequence_id: seq,
            start,
            end: start + 120.0,
            duration: 120.0,
            matched_pattern: "writes-to-me".into(),
            text: format!("historia {seq}"),
            classification,
        }
    }

    pub(crate) fn story(category: Category, wtf: f64, title: &str) -> Classification {
        Classification {
            is_story: true,
            category: Some(category),
            subcategory: Some("general".into()),
            narrator: Some(Narrator::Listener),
            wtf_score: Some(wtf),
            title: Some(title.into()),
            human_verified: true,
            ..Classification::default()
        }
    }

    pub(crate) fn result(id: &str, spans: Vec<StorySpan>) -> SegmentationResult {
        SegmentationResult {
            transcript_id: id.into(),
            generated_at: "2024-01-01T00:00:00Z".into(),
            method: METHOD_HEURISTICS_V1.into(),
            catalog_digest: String::new(),
            config: SegmentationConfig::default(),
            total_spans: spans.len(),
            spans,
        }
    }

    #[test]
    fn only_verified_stories_are_exported() {
        let r = result(
            "v1",
            vec![
                span(1, 30.0, Some(story(Category::Ghosts, 0.4, "La casa"))),
                span(2, 300.0, None),
                span(3, 600.0, Some(Classification::discarded("2024-01-01T00:00:00Z"))),
                span(
                    4,
                    900.0,
                    Some(Classification {
                        is_story: true,
                        ..Classification::default()
                    }),
                ),
            ],
        );
        let feed = build_feed([&r], |_| VideoMeta::default(), "now".into());
        assert_eq!(feed.total, 1);
        assert_eq!(feed.stories[0].title, "La casa");
        assert_eq!(feed.stories[0].youtube_url, "https://www.youtube.com/watch?v=v1&t=30s");
    }

    #[test]
    fn missing_labels_get_defaults() {
        let bare = Classification {
            is_story: true,
            human_verified: true,
            ..Classification::default()
        };
        let s = web_story(7, "v1", &VideoMeta::default(), &span(1, 65.5, Some(bare))).unwrap();
        assert_eq!(s.id, 7);
        assert_eq!(s.title, DEFAULT_TITLE);
        assert_eq!(s.category, Category::Other);
        assert_eq!(s.subcategory, "general");
        assert_eq!(s.narrator, Narrator::Listener);
        assert_eq!(s.wtf_score, 0.5);
        assert_eq!(s.start_fmt, "01:05");
    }

    #[test]
    fn sorted_by_score_with_stable_ties_and_collection_ids() {
        let a = result(
            "a",
            vec![
                span(1, 10.0, Some(story(Category::Ufos, 0.5, "a1"))),
                span(2, 200.0, Some(story(Category::Ufos, 0.9, "a2"))),
            ],
        );
        let b = result("b", vec![span(1, 10.0, Some(story(Category::Ghosts, 0.5, "b1")))]);
        let feed = build_feed([&a, &b], |_| VideoMeta::default(), "now".into());
        let order: Vec<(&str, usize)> = feed.stories.iter().map(|s| (s.title.as_str(), s.id)).collect();
        assert_eq!(order, vec![("a2", 2), ("a1", 1), ("b1", 3)]);
    }

    #[test]
    fn feed_uses_spanish_field_names() {
        let r = result("v1", vec![span(1, 30.0, Some(story(Category::Ufos, 0.8, "Luz")))]);
        let meta = VideoMeta {
            title: "Programa 12".into(),
            broadcast_date: "2023-05-02".into(),
        };
        let feed = build_feed([&r], |_| meta.clone(), "now".into());
        let json = serde_json::to_value(&feed).unwrap();
        let entry = &json["historias"][0];
        assert_eq!(entry["titulo_inferido"], "Luz");
        assert_eq!(entry["categoria"], "ovnis");
        assert_eq!(entry["tipo_narrador"], "oyente");
        assert_eq!(entry["video_titulo"], "Programa 12");
        assert_eq!(entry["fecha_emision"], "2023-05-02");
        assert_eq!(json["total"], 1);
    }

    #[test]
    fn export_writes_feed_and_marks_status() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = DataPaths::with_data_dir(tmp.path(), tmp.path().join("data"));
        paths.ensure_layout().unwrap();
        std::fs::write(
            &paths.videos_input_json,
            r#"{"videos":[{"id":"v1","url":"","titulo":"Programa 1","fecha":"2024-02-02"}]}"#,
        )
        .unwrap();
        let r = result("v1", vec![span(1, 30.0, Some(story(Category::Witchcraft, 0.7, "Gualicho")))]);
        paths.results().save(&r).unwrap();

        let feed = export_web(&paths).unwrap();
        assert_eq!(feed.total, 1);
        assert_eq!(feed.stories[0].video_title, "Programa 1");

        let stored = load_feed(&paths.web_export_json).unwrap().unwrap();
        assert_eq!(stored, feed);
        let status = PipelineStatus::load(&paths.status_json).unwrap();
        let video = status.video("v1").unwrap();
        assert_eq!(video.stages.export, relatos_store::StageState::Completed);
        assert!(video.timestamps.exported_at.is_some());
    }

    #[test]
    fn missing_feed_loads_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_feed(&tmp.path().join("historias.json")).unwrap().is_none());
    }
}
