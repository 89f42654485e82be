//! Ordered, tagged regular expressions that mark story boundaries.
//!
//! Order is part of the contract: within a window the first matching
//! pattern wins, so reordering a catalog changes which `matched_pattern`
//! is reported (and nothing else).

use regex::{Regex, RegexBuilder};
use relatos_core::{Result, SegmentError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Greeting, introduction, hand-off or transition into a new story.
    Start,
    /// Closing phrase.
    End,
}

/// Uncompiled catalog entry, as written in a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternSpec {
    pub id: String,
    pub kind: PatternKind,
    pub regex: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogDocument {
    patterns: Vec<PatternSpec>,
}

#[derive(Debug, Clone)]
pub struct CatalogPattern {
    pub id: String,
    pub kind: PatternKind,
    pub source: String,
    regex: Regex,
}

impl CatalogPattern {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

#[derive(Debug, Clone)]
pub struct PatternCatalog {
    patterns: Vec<CatalogPattern>,
}

const BUILTIN: &[(&str, PatternKind, &str)] = &[
    // Live callers greeted on air
    ("live-greeting", PatternKind::Start, r"hola,?\s+\w+[,.]?\s*(cómo|como)\s+(te va|estás|andás)"),
    ("evening-welcome", PatternKind::Start, r"buenas noches.*bienvenid"),
    ("hello-good-evening", PatternKind::Start, r"hola.*buenas noches"),
    ("we-hear-you", PatternKind::Start, r"te escuchamos"),
    ("tell-us-story", PatternKind::Start, r"contanos.*historia"),
    ("hear-your-story", PatternKind::Start, r"escuchamos tu historia"),
    // Written stories and voice notes read on air
    ("writes-to-me", PatternKind::Start, r"me escribe\s+\w+"),
    ("writes-to-us", PatternKind::Start, r"nos escribe\s+\w+"),
    ("self-intro-from", PatternKind::Start, r"soy\s+\w+\s+de\s+\w+"),
    ("speaking-is", PatternKind::Start, r"te habla\s+\w+"),
    ("my-name-is", PatternKind::Start, r"mi nombre es\s+\w+"),
    ("wanted-to-tell", PatternKind::Start, r"hola.*quería contar"),
    ("wanted-to-share", PatternKind::Start, r"quería compartir"),
    ("let-me-tell-story", PatternKind::Start, r"te cuento.*historia"),
    ("going-to-tell", PatternKind::Start, r"voy a contar"),
    // Host transitions
    ("next-one", PatternKind::Start, r"vamos con otra"),
    ("next-story", PatternKind::Start, r"la siguiente historia"),
    ("more-stories", PatternKind::Start, r"hay más historias"),
    ("caller-live", PatternKind::Start, r"tengo.*que está.*vivo"),
    ("live-with-us", PatternKind::Start, r"está.*en vivo.*nosotros"),
    ("lets-greet", PatternKind::Start, r"vamos a saludar"),
    // Voice note openers addressed to the hosts
    ("hello-hector", PatternKind::Start, r"hola\s+héctor"),
    ("evening-hector", PatternKind::Start, r"buenas noches\s+héctor"),
    ("hello-folks", PatternKind::Start, r"hola\s+chicos"),
    // Closings
    ("thanks-for-sharing", PatternKind::End, r"gracias por (contar|compartir|llamar)"),
    ("big-hug", PatternKind::End, r"un abrazo"),
    ("take-care", PatternKind::End, r"cuídate"),
    ("bye", PatternKind::End, r"chao"),
    ("moving-on", PatternKind::End, r"seguimos con"),
    ("going-to-break", PatternKind::End, r"vamos a (una pausa|corte)"),
    ("back-soon", PatternKind::End, r"ya (volvemos|regresamos)"),
];

impl PatternCatalog {
    /// The catalog tuned for the program's Spanish-language transcripts.
    pub fn builtin() -> Self {
        let specs = BUILTIN
            .iter()
            .map(|(id, kind, regex)| PatternSpec {
                id: (*id).to_string(),
                kind: *kind,
                regex: (*regex).to_string(),
            })
            .collect();
        Self::from_specs(specs).expect("builtin catalog compiles")
    }

    /// Compile specs in order. Any invalid regex or duplicate id is fatal.
    pub fn from_specs(specs: Vec<PatternSpec>) -> Result<Self> {
        if specs.is_empty() {
            return Err(SegmentError::InvalidCatalog("catalog has no patterns".into()));
        }
        let mut seen = HashSet::new();
        let mut patterns = Vec::with_capacity(specs.len());
        for spec in specs {
            if spec.id.trim().is_empty() {
                return Err(SegmentError::InvalidCatalog("pattern with empty id".into()));
            }
            if !seen.insert(spec.id.clone()) {
                return Err(SegmentError::InvalidCatalog(format!(
                    "duplicate pattern id '{}'",
                    spec.id
                )));
            }
            let regex = RegexBuilder::new(&spec.regex)
                .case_insensitive(true)
                .build()
                .map_err(|e| SegmentError::PatternCompilation {
                    id: spec.id.clone(),
                    reason: e.to_string(),
                })?;
            patterns.push(CatalogPattern {
                id: spec.id,
                kind: spec.kind,
                source: spec.regex,
                regex,
            });
        }
        Ok(Self { patterns })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let doc: CatalogDocument = serde_yaml::from_str(yaml)
            .map_err(|e| SegmentError::InvalidCatalog(e.to_string()))?;
        Self::from_specs(doc.patterns)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: CatalogDocument = serde_json::from_str(json)
            .map_err(|e| SegmentError::InvalidCatalog(e.to_string()))?;
        Self::from_specs(doc.patterns)
    }

    /// Load a catalog file; `.json` is read as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SegmentError::InvalidCatalog(format!("reading {}: {e}", path.display()))
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        let doc = CatalogDocument {
            patterns: self.specs(),
        };
        Ok(serde_yaml::to_string(&doc)?)
    }

    pub fn specs(&self) -> Vec<PatternSpec> {
        self.patterns
            .iter()
            .map(|p| PatternSpec {
                id: p.id.clone(),
                kind: p.kind,
                regex: p.source.clone(),
            })
            .collect()
    }

    pub fn patterns(&self) -> &[CatalogPattern] {
        &self.patterns
    }

    pub fn of_kind(&self, kind: PatternKind) -> impl Iterator<Item = &CatalogPattern> {
        self.patterns.iter().filter(move |p| p.kind == kind)
    }

    /// First pattern of `kind`, in catalog order, found anywhere in `text`.
    pub fn first_match(&self, kind: PatternKind, text: &str) -> Option<&CatalogPattern> {
        self.of_kind(kind).find(|p| p.is_match(text))
    }

    /// Fingerprint of ids, kinds, regexes and their order.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for p in &self.patterns {
            let kind = match p.kind {
                PatternKind::Start => "start",
                PatternKind::End => "end",
            };
            hasher.update(format!("{kind}\t{}\t{}\n", p.id, p.source).as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_both_groups_in_order() {
        let cat = PatternCatalog::builtin();
        assert_eq!(cat.of_kind(PatternKind::Start).count(), 24);
        assert_eq!(cat.of_kind(PatternKind::End).count(), 7);
        assert_eq!(cat.patterns()[0].id, "live-greeting");
        assert_eq!(cat.patterns()[6].id, "writes-to-me");
    }

    #[test]
    fn first_match_follows_catalog_order() {
        let cat = PatternCatalog::builtin();
        // Both "writes-to-me" and "next-one" match; the earlier entry wins.
        let hit = cat
            .first_match(PatternKind::Start, "vamos con otra historia me escribe maria")
            .unwrap();
        assert_eq!(hit.id, "writes-to-me");
        assert!(cat.first_match(PatternKind::Start, "hola gente").is_none());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let cat = PatternCatalog::builtin();
        let hit = cat.first_match(PatternKind::Start, "Hola Héctor, qué tal").unwrap();
        assert_eq!(hit.id, "hello-hector");
        let end = cat.first_match(PatternKind::End, "Gracias Por Compartir").unwrap();
        assert_eq!(end.id, "thanks-for-sharing");
    }

    #[test]
    fn invalid_regex_is_fatal() {
        let err = PatternCatalog::from_specs(vec![PatternSpec {
            id: "broken".into(),
            kind: PatternKind::Start,
            regex: "me escribe (".into(),
        }])
        .unwrap_err();
        assert!(matches!(err, SegmentError::PatternCompilation { ref id, .. } if id == "broken"));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let spec = PatternSpec {
            id: "a".into(),
            kind: PatternKind::Start,
            regex: "x".into(),
        };
        let err = PatternCatalog::from_specs(vec![spec.clone(), spec]).unwrap_err();
        assert!(err.to_string().contains("duplicate pattern id 'a'"));
    }

    #[test]
    fn yaml_roundtrip_preserves_order_and_digest() {
        let cat = PatternCatalog::builtin();
        let yaml = cat.to_yaml().unwrap();
        let reloaded = PatternCatalog::from_yaml_str(&yaml).unwrap();
        assert_eq!(reloaded.specs(), cat.specs());
        assert_eq!(reloaded.digest(), cat.digest());
    }

    #[test]
    fn digest_changes_with_order() {
        let a = PatternSpec {
            id: "a".into(),
            kind: PatternKind::Start,
            regex: "uno".into(),
        };
        let b = PatternSpec {
            id: "b".into(),
            kind: PatternKind::Start,
            regex: "dos".into(),
        };
        let ab = PatternCatalog::from_specs(vec![a.clone(), b.clone()]).unwrap();
        let ba = PatternCatalog::from_specs(vec![b, a]).unwrap();
        assert_ne!(ab.digest(), ba.digest());
    }

    #[test]
    fn load_json_catalog_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"patterns":[{"id":"hi","kind":"start","regex":"hola\\s+amigos"},
                {"id":"bye","kind":"end","regex":"chau"}]}"#,
        )
        .unwrap();
        let cat = PatternCatalog::load(&path).unwrap();
        assert_eq!(cat.patterns().len(), 2);
        assert!(cat.first_match(PatternKind::Start, "hola  amigos").is_some());
    }

    #[test]
    fn empty_catalog_rejected() {
        assert!(PatternCatalog::from_yaml_str("patterns: []").is_err());
    }
}
