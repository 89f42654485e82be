use relatos_core::{Category, Classification, Narrator};

use crate::error::{Result, ReviewError};

pub const TITLE_MAX_CHARS: usize = 100;
pub const SUMMARY_MAX_CHARS: usize = 500;
const TITLE_SUGGEST_WORDS: usize = 10;
const TITLE_SUGGEST_CHARS: usize = 50;
const SUMMARY_SUGGEST_CHARS: usize = 200;

/// Reviewer input for one span, before defaults and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationDraft {
    pub category: Category,
    /// `None` means `general`.
    pub subcategory: Option<String>,
    pub narrator: Narrator,
    pub wtf_score: f64,
    pub title: Option<String>,
    pub summary: Option<String>,
}

impl ClassificationDraft {
    pub fn new(category: Category, narrator: Narrator, wtf_score: f64) -> Self {
        Self {
            category,
            subcategory: None,
            narrator,
            wtf_score,
            title: None,
            summary: None,
        }
    }

    /// Validate and fill defaults from the span text.
    pub fn finalize(self, span_text: &str, reviewed_at: &str) -> Result<Classification> {
        let wtf_score = validate_score(self.wtf_score)?;

        let subcategory = match non_blank(self.subcategory) {
            Some(sub) if self.category.has_subcategory(&sub) => sub,
            Some(sub) => {
                return Err(ReviewError::UnknownSubcategory {
                    category: self.category.to_string(),
                    subcategory: sub,
                })
            }
            None => "general".to_string(),
        };

        let title = non_blank(self.title).unwrap_or_else(|| suggest_title(span_text));
        let summary = non_blank(self.summary).unwrap_or_else(|| suggest_summary(span_text));

        Ok(Classification {
            is_story: true,
            category: Some(self.category),
            subcategory: Some(subcategory),
            narrator: Some(self.narrator),
            wtf_score: Some(wtf_score),
            title: Some(truncate_chars(&title, TITLE_MAX_CHARS)),
            summary: Some(truncate_chars(&summary, SUMMARY_MAX_CHARS)),
            human_verified: true,
            reviewed_at: Some(reviewed_at.to_string()),
        })
    }
}

/// Accept a score in `[0, 1]`, rounded to two decimals.
pub fn validate_score(score: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&score) {
        return Err(ReviewError::InvalidScore(score));
    }
    Ok((score * 100.0).round() / 100.0)
}

/// First ten words, cut to 50 characters, with a trailing ellipsis.
pub fn suggest_title(text: &str) -> String {
    let words = text
        .split_whitespace()
        .take(TITLE_SUGGEST_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}...", truncate_chars(&words, TITLE_SUGGEST_CHARS))
}

pub fn suggest_summary(text: &str) -> String {
    let head: String = text.chars().take(SUMMARY_SUGGEST_CHARS).collect();
    format!("{}...", head.replace('\n', " "))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "me escribe juan desde cordoba y me cuenta que una noche en la ruta vio una luz";

    #[test]
    fn defaults_fill_title_summary_and_subcategory() {
        let c = ClassificationDraft::new(Category::Ufos, Narrator::Listener, 0.8)
            .finalize(TEXT, "2026-01-01T00:00:00Z")
            .unwrap();
        assert!(c.is_story && c.human_verified);
        assert_eq!(c.subcategory.as_deref(), Some("general"));
        assert_eq!(
            c.title.as_deref(),
            Some("me escribe juan desde cordoba y me cuenta que una...")
        );
        assert_eq!(c.summary.as_deref(), Some(format!("{TEXT}...").as_str()));
        assert_eq!(c.reviewed_at.as_deref(), Some("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn score_is_validated_and_rounded() {
        assert_eq!(validate_score(0.456).unwrap(), 0.46);
        assert_eq!(validate_score(1.0).unwrap(), 1.0);
        assert!(matches!(validate_score(1.2), Err(ReviewError::InvalidScore(_))));
        assert!(validate_score(-0.1).is_err());
        assert!(validate_score(f64::NAN).is_err());
    }

    #[test]
    fn subcategory_must_belong_to_category() {
        let mut draft = ClassificationDraft::new(Category::Ghosts, Narrator::Host, 0.5);
        draft.subcategory = Some("abducciones".into());
        assert!(matches!(
            draft.finalize(TEXT, "t"),
            Err(ReviewError::UnknownSubcategory { .. })
        ));

        let mut draft = ClassificationDraft::new(Category::Ghosts, Narrator::Host, 0.5);
        draft.subcategory = Some("cementerios".into());
        let c = draft.finalize(TEXT, "t").unwrap();
        assert_eq!(c.subcategory.as_deref(), Some("cementerios"));
    }

    #[test]
    fn explicit_title_is_capped() {
        let mut draft = ClassificationDraft::new(Category::Other, Narrator::Guest, 0.1);
        draft.title = Some("x".repeat(150));
        draft.summary = Some("   ".into());
        let c = draft.finalize("texto corto", "t").unwrap();
        assert_eq!(c.title.unwrap().chars().count(), TITLE_MAX_CHARS);
        assert_eq!(c.summary.as_deref(), Some("texto corto..."));
    }

    #[test]
    fn summary_suggestion_flattens_newlines() {
        assert_eq!(suggest_summary("uno\ndos"), "uno dos...");
        assert_eq!(suggest_summary(&"a".repeat(300)).chars().count(), 203);
    }
}
