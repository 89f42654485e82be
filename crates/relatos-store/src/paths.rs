use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "RELATOS_DATA_DIR";

/// Every file and directory the pipeline reads or writes.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub subtitles_dir: PathBuf,
    pub segmentation_dir: PathBuf,
    pub status_json: PathBuf,
    pub gold_json: PathBuf,
    pub videos_input_json: PathBuf,
    pub config_json: PathBuf,
    pub catalog_yaml: PathBuf,
    pub db_file: PathBuf,
    pub lock_file: PathBuf,
    pub web_export_json: PathBuf,
}

impl DataPaths {
    /// Derive all paths from a project root, honoring `RELATOS_DATA_DIR`.
    pub fn discover(project_root: impl Into<PathBuf>) -> Self {
        let root = project_root.into();
        let data_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => root.join("data"),
        };
        Self::with_data_dir(root, data_dir)
    }

    /// Derive all paths with an explicit data directory. Pure computation.
    pub fn with_data_dir(root: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data_dir = data_dir.into();
        Self {
            subtitles_dir: data_dir.join("subtitulos"),
            segmentation_dir: data_dir.join("segmentacion"),
            status_json: data_dir.join("pipeline_status.json"),
            gold_json: data_dir.join("dataset_gold.json"),
            videos_input_json: data_dir.join("videos_input.json"),
            config_json: data_dir.join("config.json"),
            catalog_yaml: data_dir.join("catalog.yaml"),
            db_file: data_dir.join("historias.db"),
            lock_file: data_dir.join("LOCK"),
            web_export_json: root.join("web").join("data").join("historias.json"),
            data_dir,
            root,
        }
    }

    /// Create the data directories. Idempotent.
    pub fn ensure_layout(&self) -> anyhow::Result<()> {
        for dir in [&self.data_dir, &self.subtitles_dir, &self.segmentation_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn subtitle_file(&self, video_id: &str) -> PathBuf {
        self.subtitles_dir.join(format!("{video_id}.json"))
    }

    pub fn segmentation_file(&self, video_id: &str) -> PathBuf {
        self.segmentation_dir.join(format!("{video_id}.json"))
    }

    pub fn analysis_file(&self, video_id: &str, ext: &str) -> PathBuf {
        self.subtitles_dir.join(format!("{video_id}_analisis.{ext}"))
    }

    /// Path shown to the user, relative to the root when possible.
    pub fn display<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.root).unwrap_or(path).display()
    }
}
