//! Active-line tracking against the playback position.

use crate::engine::document::LyricLine;

/// Find the line currently relevant to `position_ms`.
///
/// Ordered scan with last-match-wins: the greatest index whose timestamp is
/// at or before the position. Untimed lines neither advance nor reset the
/// candidate; the scan stops at the first timed line in the future (timed
/// lines are assumed non-decreasing). `None` when no timed line has started
/// yet.
pub fn locate(lines: &[LyricLine], position_ms: i64) -> Option<usize> {
    // Hosts occasionally report slightly negative positions around seeks;
    // treat those as the start of the track.
    let position = position_ms.max(0) as u64;
    let mut active = None;
    for (idx, line) in lines.iter().enumerate() {
        let Some(t) = line.time_ms else { continue };
        if t <= position {
            active = Some(idx);
        } else {
            break;
        }
    }
    active
}
