use clap::Args;
use relatos_core::SegmentationConfig;
use relatos_segment::{PatternCatalog, Segmenter};
use relatos_store::config::{read_config, resolve_segmentation_config};
use relatos_store::DataPaths;
use relatos_transcript::FsTranscriptSource;
use std::path::Path;

/// Per-run overrides of the configured segmentation settings.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Window length in seconds
    #[arg(long)]
    pub window_size: Option<f64>,
    /// Minimum gap between story starts in seconds
    #[arg(long)]
    pub min_gap: Option<f64>,
    /// Length of the last and of clamped spans in seconds
    #[arg(long)]
    pub default_duration: Option<f64>,
    /// Longest span allowed in seconds
    #[arg(long)]
    pub max_duration: Option<f64>,
    /// Pull span ends in to the first closing phrase
    #[arg(long)]
    pub refine: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut SegmentationConfig) {
        let fields = [
            (&mut config.window_size, self.window_size),
            (&mut config.min_gap, self.min_gap),
            (&mut config.default_duration, self.default_duration),
            (&mut config.max_duration, self.max_duration),
        ];
        for (field, value) in fields {
            if let Some(v) = value {
                *field = v;
            }
        }
        if self.refine {
            config.refine_with_end_patterns = true;
        }
    }
}

pub fn paths(repo_root: &Path) -> DataPaths {
    DataPaths::discover(repo_root)
}

/// `--catalog` if given, else `data/catalog.yaml` if present, else the builtin.
pub fn load_catalog(paths: &DataPaths, catalog: Option<&Path>) -> anyhow::Result<PatternCatalog> {
    if let Some(path) = catalog {
        return Ok(PatternCatalog::load(path)?);
    }
    if paths.catalog_yaml.is_file() {
        tracing::debug!(path = %paths.catalog_yaml.display(), "using project catalog");
        return Ok(PatternCatalog::load(&paths.catalog_yaml)?);
    }
    Ok(PatternCatalog::builtin())
}

/// Config file settings, then `overrides`; validated by [`Segmenter::new`].
pub fn segmenter(
    paths: &DataPaths,
    catalog: Option<&Path>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<Segmenter> {
    let mut config = resolve_segmentation_config(&read_config(&paths.config_json)?)?;
    overrides.apply(&mut config);
    Ok(Segmenter::new(load_catalog(paths, catalog)?, config)?)
}

pub fn transcripts(paths: &DataPaths) -> FsTranscriptSource {
    FsTranscriptSource::new(&paths.subtitles_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_paths(tmp: &tempfile::TempDir) -> DataPaths {
        DataPaths::with_data_dir(tmp.path(), tmp.path().join("data"))
    }

    #[test]
    fn builtin_catalog_without_project_file() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = temp_paths(&tmp);
        let catalog = load_catalog(&paths, None).unwrap();
        assert_eq!(catalog.digest(), PatternCatalog::builtin().digest());
    }

    #[test]
    fn project_catalog_overrides_builtin() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = temp_paths(&tmp);
        paths.ensure_layout().unwrap();
        std::fs::write(
            &paths.catalog_yaml,
            "patterns:\n  - id: only\n    kind: start\n    regex: \"me escribe\"\n",
        )
        .unwrap();
        let catalog = load_catalog(&paths, None).unwrap();
        assert_eq!(catalog.patterns().len(), 1);
        assert_eq!(catalog.patterns()[0].id, "only");
    }

    #[test]
    fn segmenter_reads_config_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = temp_paths(&tmp);
        paths.ensure_layout().unwrap();
        std::fs::write(&paths.config_json, r#"{"min_gap": 45, "theme": "dark"}"#).unwrap();
        let seg = segmenter(&paths, None, &ConfigOverrides::default()).unwrap();
        assert_eq!(seg.config().min_gap, 45.0);
        assert_eq!(seg.config().window_size, 30.0);
    }

    #[test]
    fn flags_override_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = temp_paths(&tmp);
        paths.ensure_layout().unwrap();
        std::fs::write(&paths.config_json, r#"{"min_gap": 45}"#).unwrap();
        let overrides = ConfigOverrides {
            min_gap: Some(90.0),
            refine: true,
            ..ConfigOverrides::default()
        };
        let seg = segmenter(&paths, None, &overrides).unwrap();
        assert_eq!(seg.config().min_gap, 90.0);
        assert!(seg.config().refine_with_end_patterns);

        let bad = ConfigOverrides {
            default_duration: Some(2000.0),
            ..ConfigOverrides::default()
        };
        assert!(segmenter(&paths, None, &bad).is_err());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = temp_paths(&tmp);
        paths.ensure_layout().unwrap();
        std::fs::write(&paths.config_json, r#"{"window_size": 0}"#).unwrap();
        assert!(segmenter(&paths, None, &ConfigOverrides::default()).is_err());
    }
}
