use relatos_core::TimedSegment;
use std::collections::BTreeMap;

/// Segments whose `start` falls in one fixed-size time bucket.
#[derive(Debug, Clone)]
pub struct Window<'a> {
    pub index: u64,
    pub segments: Vec<&'a TimedSegment>,
}

impl Window<'_> {
    /// Start of the first segment in the window (not the bucket boundary).
    pub fn first_start(&self) -> f64 {
        self.segments.first().map(|s| s.start).unwrap_or(0.0)
    }

    /// Latest segment end in the window.
    pub fn last_end(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| s.end())
            .fold(self.first_start(), f64::max)
    }

    /// Space-joined, lower-cased text used for matching.
    pub fn combined_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Sparse mapping window_index → segments, iterated in ascending index order.
#[derive(Debug, Clone)]
pub struct WindowIndex<'a> {
    window_size: f64,
    windows: BTreeMap<u64, Window<'a>>,
}

impl<'a> WindowIndex<'a> {
    pub fn window_size(&self) -> f64 {
        self.window_size
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, index: u64) -> Option<&Window<'a>> {
        self.windows.get(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window<'a>> {
        self.windows.values()
    }

    /// Windows with index strictly greater than `index`.
    pub fn after(&self, index: u64) -> impl Iterator<Item = &Window<'a>> {
        self.windows
            .range((std::ops::Bound::Excluded(index), std::ops::Bound::Unbounded))
            .map(|(_, w)| w)
    }

    pub fn index_of(&self, time: f64) -> u64 {
        window_of(time, self.window_size)
    }
}

fn window_of(start: f64, window_size: f64) -> u64 {
    (start.max(0.0) / window_size).floor() as u64
}

/// Bucket segments by `floor(start / window_size)`, keeping input order
/// inside each bucket. Every segment lands in exactly one window.
pub fn index_windows(segments: &[TimedSegment], window_size: f64) -> WindowIndex<'_> {
    let mut windows: BTreeMap<u64, Window<'_>> = BTreeMap::new();
    for seg in segments {
        let index = window_of(seg.start, window_size);
        windows
            .entry(index)
            .or_insert_with(|| Window {
                index,
                segments: Vec::new(),
            })
            .segments
            .push(seg);
    }
    WindowIndex {
        window_size,
        windows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(items: &[(f64, &str)]) -> Vec<TimedSegment> {
        items
            .iter()
            .map(|(start, text)| TimedSegment::new(*start, 2.0, *text))
            .collect()
    }

    #[test]
    fn groups_by_floor_of_start() {
        let segments = segs(&[(0.0, "a"), (29.9, "b"), (30.0, "c"), (95.0, "d")]);
        let idx = index_windows(&segments, 30.0);
        let keys: Vec<u64> = idx.iter().map(|w| w.index).collect();
        assert_eq!(keys, vec![0, 1, 3]);
        assert_eq!(idx.get(0).unwrap().segments.len(), 2);
        assert!(idx.get(2).is_none(), "empty windows are absent");
    }

    #[test]
    fn no_segment_dropped_or_duplicated() {
        let segments = segs(&[(1.0, "a"), (2.0, "b"), (61.0, "c"), (62.0, "d"), (300.0, "e")]);
        let idx = index_windows(&segments, 30.0);
        let total: usize = idx.iter().map(|w| w.segments.len()).sum();
        assert_eq!(total, segments.len());
    }

    #[test]
    fn combined_text_is_joined_and_lowercased() {
        let segments = segs(&[(0.0, "Me Escribe"), (5.0, "JUAN")]);
        let idx = index_windows(&segments, 30.0);
        assert_eq!(idx.get(0).unwrap().combined_text(), "me escribe juan");
    }

    #[test]
    fn window_bounds() {
        let segments = vec![
            TimedSegment::new(31.0, 4.0, "a"),
            TimedSegment::new(40.0, 10.0, "b"),
        ];
        let idx = index_windows(&segments, 30.0);
        let w = idx.get(1).unwrap();
        assert_eq!(w.first_start(), 31.0);
        assert_eq!(w.last_end(), 50.0);
    }

    #[test]
    fn after_skips_earlier_windows() {
        let segments = segs(&[(0.0, "a"), (35.0, "b"), (70.0, "c")]);
        let idx = index_windows(&segments, 30.0);
        let later: Vec<u64> = idx.after(1).map(|w| w.index).collect();
        assert_eq!(later, vec![2]);
    }

    #[test]
    fn empty_input_gives_empty_index() {
        let idx = index_windows(&[], 30.0);
        assert!(idx.is_empty());
    }
}
