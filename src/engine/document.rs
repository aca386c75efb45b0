//! Core data model for lyric documents.

/// A single lyric line. `time_ms` is `None` when no timing is known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricLine {
    pub text: String,
    pub time_ms: Option<u64>,
}

impl LyricLine {
    pub fn new(text: impl Into<String>, time_ms: Option<u64>) -> Self {
        Self { text: text.into(), time_ms }
    }
}

/// Overall synchronization status of the display. Exactly one is active at a
/// time; `Synced` and `Unsynced` imply a current document, `Loading` and
/// `Unavailable` imply none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncStatus {
    Loading,
    Synced,
    Unsynced,
    #[default]
    Unavailable,
}

/// An ordered set of lyric lines plus the sync classification computed once
/// at construction. A new document is built on every successful load; the
/// classification never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricDocument {
    lines: Vec<LyricLine>,
    is_synced: bool,
}

impl LyricDocument {
    pub fn new(lines: Vec<LyricLine>) -> Self {
        let is_synced = classify(&lines);
        Self { lines, is_synced }
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_synced(&self) -> bool {
        self.is_synced
    }
}

/// A document is synced iff it has at least one timed line with a strictly
/// positive timestamp and the *last* timed line is strictly positive too.
/// Placeholder payloads that stamp every line with zero count as unsynced.
pub fn classify(lines: &[LyricLine]) -> bool {
    let mut any_positive = false;
    let mut last_timed = None;
    for line in lines {
        if let Some(t) = line.time_ms {
            any_positive |= t > 0;
            last_timed = Some(t);
        }
    }
    matches!(last_timed, Some(t) if t > 0) && any_positive
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(times: &[Option<u64>]) -> Vec<LyricLine> {
        times
            .iter()
            .map(|t| LyricLine::new("la", *t))
            .collect()
    }

    #[test]
    fn all_zero_timing_is_unsynced() {
        assert!(!classify(&timed(&[Some(0), Some(0)])));
    }

    #[test]
    fn zero_then_positive_is_synced() {
        assert!(classify(&timed(&[Some(0), Some(1200)])));
    }

    #[test]
    fn untimed_lines_are_unsynced() {
        assert!(!classify(&timed(&[None, None])));
        assert!(!classify(&[]));
    }

    #[test]
    fn trailing_zero_after_positive_is_unsynced() {
        // The last timed line decides; a zero tail marks degenerate timing.
        assert!(!classify(&timed(&[Some(500), Some(0)])));
    }

    #[test]
    fn untimed_tail_does_not_break_classification() {
        assert!(classify(&timed(&[Some(500), Some(900), None])));
    }

    #[test]
    fn classification_is_fixed_at_construction() {
        let doc = LyricDocument::new(timed(&[Some(0), Some(1200)]));
        assert!(doc.is_synced());
        assert_eq!(doc.len(), 2);
    }
}
