use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentError};

pub const DEFAULT_WINDOW_SIZE: f64 = 30.0;
pub const DEFAULT_MIN_GAP: f64 = 60.0;
pub const DEFAULT_STORY_DURATION: f64 = 600.0;
pub const DEFAULT_MAX_DURATION: f64 = 900.0;

/// What happens to prior classifications when a transcript is segmented again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReclassifyPolicy {
    /// Overwrite the previous result; prior labels are dropped.
    #[default]
    Reset,
    /// Carry a prior label onto the new span with the same start time.
    MergeByStart,
}

/// The numbers that fully determine segmentation for a fixed input and catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Window length in seconds used to group text for matching.
    pub window_size: f64,
    /// Boundaries closer than this (seconds) collapse into the first one.
    pub min_gap: f64,
    /// Span length used for the last span and for clamped spans.
    pub default_duration: f64,
    /// Longest span allowed before it is clamped to `default_duration`.
    pub max_duration: f64,
    /// Pull span ends in to the first closing phrase inside the span.
    pub refine_with_end_patterns: bool,
    pub reclassify: ReclassifyPolicy,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_gap: DEFAULT_MIN_GAP,
            default_duration: DEFAULT_STORY_DURATION,
            max_duration: DEFAULT_MAX_DURATION,
            refine_with_end_patterns: false,
            reclassify: ReclassifyPolicy::Reset,
        }
    }
}

impl SegmentationConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("window_size", self.window_size),
            ("min_gap", self.min_gap),
            ("default_duration", self.default_duration),
            ("max_duration", self.max_duration),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SegmentError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.default_duration > self.max_duration {
            return Err(SegmentError::InvalidConfig(format!(
                "default_duration ({}) exceeds max_duration ({})",
                self.default_duration, self.max_duration
            )));
        }
        Ok(())
    }
}
