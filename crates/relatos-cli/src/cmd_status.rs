use relatos_store::{PipelineStatus, VideoStatus};
use std::path::Path;

use crate::workspace;

/// `relatos status`
pub fn execute(repo_root: &Path) -> anyhow::Result<()> {
    let paths = workspace::paths(repo_root);
    let mut status = PipelineStatus::load(&paths.status_json)?;
    status.refresh_summary();
    print!("{}", render(&status));
    Ok(())
}

fn render(status: &PipelineStatus) -> String {
    if status.videos.is_empty() {
        return "No videos tracked yet. Run `relatos segment` first.\n".to_string();
    }
    let mut out = String::new();
    for video in &status.videos {
        out.push_str(&render_video(video));
    }
    out.push_str(&format!(
        "\n{} videos, {} spans detected, {} reviewed\n",
        status.summary.total_videos, status.summary.total_detected, status.summary.total_reviewed
    ));
    if let Some(at) = &status.updated_at {
        out.push_str(&format!("Last update: {at}\n"));
    }
    out
}

fn render_video(video: &VideoStatus) -> String {
    let mut out = match &video.title {
        Some(title) => format!("{} ({title})\n", video.video_id),
        None => format!("{}\n", video.video_id),
    };
    let s = &video.stages;
    out.push_str(&format!(
        "  subtitles: {}  segmentation: {}  review: {}  export: {}\n",
        s.subtitles, s.segmentation, s.review, s.export
    ));
    let m = &video.metrics;
    out.push_str(&format!(
        "  spans: {} detected, {} reviewed, {} pending\n",
        m.detected, m.reviewed, m.pending
    ));
    if let Some(err) = &video.last_error {
        out.push_str(&format!("  last error: {err}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_status_hints_next_step() {
        assert!(render(&PipelineStatus::default()).contains("relatos segment"));
    }

    #[test]
    fn renders_stages_and_metrics() {
        let mut status = PipelineStatus::default();
        status.record_segmentation("v1", 4, 1);
        status.record_segmentation_error("v2", "load: missing");
        status.refresh_summary();
        let text = render(&status);
        assert!(text.contains("segmentation: completed  review: in_progress"));
        assert!(text.contains("4 detected, 1 reviewed, 3 pending"));
        assert!(text.contains("last error: load: missing"));
        assert!(text.contains("2 videos, 4 spans detected, 1 reviewed"));
    }
}
