use anyhow::Context;
use relatos_core::SegmentationConfig;
use serde_json::{Map, Value};
use std::path::Path;

use crate::write_atomic;

pub type ConfigMap = Map<String, Value>;

/// Read `config.json`. Returns an empty map if the file doesn't exist.
pub fn read_config(path: &Path) -> anyhow::Result<ConfigMap> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config: {}", path.display()))?;
    let val: Value = serde_json::from_str(&content)
        .with_context(|| format!("parsing config: {}", path.display()))?;
    match val {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

pub fn write_config(path: &Path, config: &ConfigMap) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    write_atomic(path, json.as_bytes())
}

/// Parse a command-line value into bool, number or string.
pub fn parse_value(s: &str) -> Value {
    match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<i64>() {
                Value::Number(n.into())
            } else if let Ok(f) = s.parse::<f64>() {
                serde_json::json!(f)
            } else {
                Value::String(s.to_string())
            }
        }
    }
}

/// Keys of `config.json` that feed [`SegmentationConfig`].
pub const SEGMENTATION_KEYS: &[&str] = &[
    "window_size",
    "min_gap",
    "default_duration",
    "max_duration",
    "refine_with_end_patterns",
    "reclassify",
];

/// Defaults overridden by any segmentation keys present in `config`.
/// Other keys are ignored. The result is validated.
pub fn resolve_segmentation_config(config: &ConfigMap) -> anyhow::Result<SegmentationConfig> {
    let mut merged = match serde_json::to_value(SegmentationConfig::default())? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for key in SEGMENTATION_KEYS {
        if let Some(v) = config.get(*key) {
            merged.insert((*key).to_string(), v.clone());
        }
    }
    let resolved: SegmentationConfig = serde_json::from_value(Value::Object(merged))
        .context("invalid segmentation settings in config")?;
    resolved.validate()?;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relatos_core::ReclassifyPolicy;

    #[test]
    fn parse_value_types() {
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("45"), serde_json::json!(45));
        assert_eq!(parse_value("2.5"), serde_json::json!(2.5));
        assert_eq!(parse_value("merge_by_start"), serde_json::json!("merge_by_start"));
    }

    #[test]
    fn missing_config_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(read_config(&tmp.path().join("config.json")).unwrap().is_empty());
    }

    #[test]
    fn write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data").join("config.json");
        let mut map = Map::new();
        map.insert("min_gap".into(), parse_value("45"));
        write_config(&path, &map).unwrap();
        assert_eq!(read_config(&path).unwrap(), map);
    }

    #[test]
    fn resolve_overrides_known_keys() {
        let mut map = Map::new();
        map.insert("min_gap".into(), parse_value("45"));
        map.insert("refine_with_end_patterns".into(), parse_value("true"));
        map.insert("reclassify".into(), parse_value("merge_by_start"));
        map.insert("unrelated".into(), parse_value("x"));
        let cfg = resolve_segmentation_config(&map).unwrap();
        assert_eq!(cfg.min_gap, 45.0);
        assert_eq!(cfg.window_size, 30.0);
        assert!(cfg.refine_with_end_patterns);
        assert_eq!(cfg.reclassify, ReclassifyPolicy::MergeByStart);
    }

    #[test]
    fn resolve_rejects_bad_values() {
        let mut map = Map::new();
        map.insert("window_size".into(), parse_value("0"));
        assert!(resolve_segmentation_config(&map).is_err());

        let mut map = Map::new();
        map.insert("reclassify".into(), parse_value("sometimes"));
        assert!(resolve_segmentation_config(&map).is_err());
    }
}
