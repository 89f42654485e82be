use relatos_core::{SegmentError, TimedSegment, Transcript};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// On-disk subtitle document, one per video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubtitleFile {
    pub video_id: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub total_segments: usize,
    pub segments: Vec<TimedSegment>,
}

impl SubtitleFile {
    /// Build a document from fetched segments, rounding times to centiseconds.
    pub fn new(video_id: impl Into<String>, language: impl Into<String>, segments: Vec<TimedSegment>) -> Self {
        let segments: Vec<TimedSegment> = segments
            .into_iter()
            .map(|s| TimedSegment::new(round2(s.start), round2(s.duration), s.text))
            .collect();
        Self {
            video_id: video_id.into(),
            language: language.into(),
            total_segments: segments.len(),
            segments,
        }
    }

    pub fn into_transcript(self) -> Transcript {
        let language = (!self.language.is_empty()).then_some(self.language);
        Transcript {
            id: self.video_id,
            language,
            segments: self.segments,
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordAction {
    Keep(TimedSegment),
    Drop(String),
}

/// Decide whether one raw subtitle record is usable.
pub fn classify_record(record: &Value) -> RecordAction {
    let Some(obj) = record.as_object() else {
        return RecordAction::Drop("record is not an object".into());
    };
    let start = match obj.get("start") {
        None | Some(Value::Null) => return RecordAction::Drop("missing start".into()),
        Some(v) => match v.as_f64() {
            Some(s) if s.is_finite() && s >= 0.0 => s,
            _ => return RecordAction::Drop(format!("invalid start {v}")),
        },
    };
    let duration = match obj.get("duration") {
        None | Some(Value::Null) => 0.0,
        Some(v) => match v.as_f64() {
            Some(d) if d.is_finite() && d >= 0.0 => d,
            _ => return RecordAction::Drop(format!("invalid duration {v}")),
        },
    };
    let text = match obj.get("text").and_then(Value::as_str) {
        Some(t) => t,
        None => return RecordAction::Drop("missing text".into()),
    };
    RecordAction::Keep(TimedSegment::new(start, duration, text))
}

/// A transcript plus the records that were skipped on the way in.
#[derive(Debug)]
pub struct ParsedTranscript {
    pub transcript: Transcript,
    pub records_read: usize,
    pub skipped: Vec<SegmentError>,
}

/// Parse a subtitle document leniently.
///
/// Accepts either a [`SubtitleFile`] object or a bare array of records.
/// Unusable records, and records starting before the previous kept one, are
/// skipped and reported in [`ParsedTranscript::skipped`]; only a document
/// that is not JSON, or has no segment list at all, is an error.
pub fn parse_subtitles(id: &str, content: &str) -> Result<ParsedTranscript, SegmentError> {
    let doc: Value = serde_json::from_str(content).map_err(|e| SegmentError::InvalidTranscript {
        id: id.to_string(),
        message: e.to_string(),
    })?;

    let (records, language) = match &doc {
        Value::Array(items) => (items.as_slice(), None),
        Value::Object(obj) => {
            let records = obj
                .get("segments")
                .and_then(Value::as_array)
                .ok_or_else(|| SegmentError::InvalidTranscript {
                    id: id.to_string(),
                    message: "no `segments` array".into(),
                })?;
            let language = obj
                .get("language")
                .and_then(Value::as_str)
                .filter(|l| !l.is_empty())
                .map(str::to_string);
            (records.as_slice(), language)
        }
        _ => {
            return Err(SegmentError::InvalidTranscript {
                id: id.to_string(),
                message: "expected an object or an array".into(),
            })
        }
    };

    let mut segments = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();
    let mut last_start = f64::NEG_INFINITY;
    for (index, record) in records.iter().enumerate() {
        let reason = match classify_record(record) {
            RecordAction::Keep(seg) if seg.start >= last_start => {
                last_start = seg.start;
                segments.push(seg);
                continue;
            }
            RecordAction::Keep(seg) => {
                format!("start {} is before previous start {last_start}", seg.start)
            }
            RecordAction::Drop(reason) => reason,
        };
        skipped.push(SegmentError::MalformedSegment {
            transcript_id: id.to_string(),
            index,
            reason,
        });
    }

    Ok(ParsedTranscript {
        transcript: Transcript {
            id: id.to_string(),
            language,
            segments,
        },
        records_read: records.len(),
        skipped,
    })
}
