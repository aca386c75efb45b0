//! Per-line visual layout centered on the active lyric.
//!
//! Everything here is a pure function of (active index, measured heights,
//! viewport metrics): recomputing with the same inputs produces the same
//! transforms bit for bit. Surfaces decide how to apply the result; the
//! animated/snap distinction travels with the frame.

/// Duration of an animated transition toward a new active line.
pub const TRANSITION_DURATION_MS: f32 = 520.0;

/// Fraction of the viewport height at which the active line is centered.
const CENTER_FRACTION: f32 = 0.38;

/// Viewport metrics the layout derives its spacing from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Usable height of the rendering surface, in surface units.
    pub viewport_height: f32,
    /// Current font size of the surface, in the same units.
    pub font_size: f32,
}

impl LayoutParams {
    /// Gap inserted between neighboring lines, derived from font metrics.
    fn base_gap(&self) -> f32 {
        (self.font_size * 1.35).clamp(28.0, 72.0)
    }

    /// Largest lateral indent, applied at the active line and decaying
    /// outward.
    fn base_indent(&self) -> f32 {
        (self.font_size * 0.8).clamp(12.0, 36.0)
    }

    fn center_y(&self) -> f32 {
        self.viewport_height.max(1.0) * CENTER_FRACTION
    }
}

/// Easing curve a surface should use when animating a line into place.
/// Lines above the active one settle differently from lines below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Lines before the active line (moving up and away).
    EaseOut,
    /// The active line itself.
    Ease,
    /// Lines after the active line (queued below).
    EaseIn,
}

/// Whether a frame should animate into place or apply instantaneously.
/// Snap is used to correct geometry after a remeasurement; stagger delays
/// are dropped along with the duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Animate,
    Snap,
}

impl Transition {
    pub fn duration_ms(self) -> f32 {
        match self {
            Transition::Animate => TRANSITION_DURATION_MS,
            Transition::Snap => 0.0,
        }
    }
}

/// Computed visual transform for one line. Ephemeral; rebuilt whenever the
/// active line or the surface geometry changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout {
    /// Top edge of the line, in surface units from the viewport top.
    pub top: f32,
    pub scale: f32,
    pub blur: f32,
    pub opacity: f32,
    /// Lateral shift toward the reading edge.
    pub indent: f32,
    /// Stagger delay before this line starts animating.
    pub delay_ms: f32,
    pub easing: Easing,
}

/// Scrollbar-thumb mapping for the current active line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollThumb {
    pub height: f32,
    pub top: f32,
    /// False for single-line documents, where scrolling is meaningless.
    pub scrollable: bool,
}

fn scale_at(offset: usize) -> f32 {
    (1.0 - 0.12 * offset as f32).max(0.72)
}

fn blur_at(offset: usize) -> f32 {
    (offset as f32 * 0.9).min(4.5)
}

fn opacity_at(offset: usize) -> f32 {
    (1.0 - offset.saturating_sub(1) as f32 * 0.22).max(0.32)
}

fn indent_at(offset: usize, params: &LayoutParams) -> f32 {
    (params.base_indent() - offset as f32 * 6.0).max(0.0)
}

fn delay_at(offset: usize) -> f32 {
    (offset.min(6)) as f32 * 45.0
}

fn height_at(heights: &[f32], idx: usize, fallback: f32) -> f32 {
    match heights.get(idx) {
        Some(&h) if h > 0.0 => h,
        _ => fallback,
    }
}

/// Compute a transform for every line, stacked outward from the active line.
///
/// With no active line the whole document is parked below the center using
/// offsets counted from a virtual line zero, so unstarted synced lyrics get
/// the same receding profile without any line highlighted.
pub fn compute_layout(
    active: Option<usize>,
    heights: &[f32],
    params: &LayoutParams,
) -> Vec<LineLayout> {
    let count = heights.len();
    let mut layouts = Vec::with_capacity(count);
    if count == 0 {
        return layouts;
    }

    let base_gap = params.base_gap();
    let center_y = params.center_y();

    match active {
        None => {
            let first_height = height_at(heights, 0, params.font_size * 1.1);
            let mut running_top = center_y + (first_height * scale_at(1)) / 2.0 + base_gap;
            for idx in 0..count {
                let offset = idx + 1;
                let scale = scale_at(offset);
                layouts.push(LineLayout {
                    top: running_top,
                    scale,
                    blur: blur_at(offset),
                    opacity: opacity_at(offset),
                    indent: indent_at(offset, params),
                    delay_ms: 0.0,
                    easing: Easing::EaseIn,
                });
                running_top += height_at(heights, idx, params.font_size) * scale + base_gap;
            }
        }
        Some(active) => {
            let active = active.min(count - 1);
            layouts.resize(
                count,
                LineLayout {
                    top: 0.0,
                    scale: 1.0,
                    blur: 0.0,
                    opacity: 1.0,
                    indent: 0.0,
                    delay_ms: 0.0,
                    easing: Easing::Ease,
                },
            );
            layouts[active] = LineLayout {
                top: center_y - height_at(heights, active, params.font_size) / 2.0,
                scale: 1.0,
                blur: 0.0,
                opacity: 1.0,
                indent: indent_at(0, params),
                delay_ms: delay_at(0),
                easing: Easing::Ease,
            };

            // Above the active line, each neighbor's *scaled* height feeds
            // the next top, so lines compress as they recede.
            for idx in (0..active).rev() {
                let offset = active - idx;
                let scale = scale_at(offset);
                let height = height_at(heights, idx, params.font_size) * scale;
                layouts[idx] = LineLayout {
                    top: layouts[idx + 1].top - height - base_gap,
                    scale,
                    blur: blur_at(offset),
                    opacity: opacity_at(offset),
                    indent: indent_at(offset, params),
                    delay_ms: delay_at(offset),
                    easing: Easing::EaseOut,
                };
            }

            for idx in active + 1..count {
                let offset = idx - active;
                let prev_height =
                    height_at(heights, idx - 1, params.font_size) * layouts[idx - 1].scale;
                layouts[idx] = LineLayout {
                    top: layouts[idx - 1].top + prev_height + base_gap,
                    scale: scale_at(offset),
                    blur: blur_at(offset),
                    opacity: opacity_at(offset),
                    indent: indent_at(offset, params),
                    delay_ms: delay_at(offset),
                    easing: Easing::EaseIn,
                };
            }
        }
    }

    layouts
}

/// Map the active index onto the companion scrollbar thumb.
pub fn scroll_thumb(active: Option<usize>, count: usize, track_height: f32) -> ScrollThumb {
    let total = count.max(1);
    let height = (track_height / total as f32).max(28.0);
    let track = track_height - height;
    let per_step = if total > 1 { track / (total - 1) as f32 } else { 0.0 };
    let current = active.unwrap_or(0).min(total - 1) as f32;
    ScrollThumb {
        height,
        top: (per_step * current).clamp(0.0, track.max(0.0)),
        scrollable: total > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: LayoutParams = LayoutParams {
        viewport_height: 800.0,
        font_size: 24.0,
    };

    fn heights(n: usize) -> Vec<f32> {
        vec![30.0; n]
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn active_line_is_centered_and_unstyled() {
        let layouts = compute_layout(Some(1), &heights(3), &PARAMS);
        let active = &layouts[1];
        assert!(close(active.top, 800.0 * 0.38 - 15.0));
        assert_eq!(active.scale, 1.0);
        assert_eq!(active.blur, 0.0);
        assert_eq!(active.opacity, 1.0);
        assert_eq!(active.delay_ms, 0.0);
        assert_eq!(active.easing, Easing::Ease);
    }

    #[test]
    fn immediate_neighbors_share_the_offset_profile() {
        let layouts = compute_layout(Some(1), &heights(3), &PARAMS);
        for idx in [0, 2] {
            assert!(close(layouts[idx].scale, 0.88));
            assert!(close(layouts[idx].blur, 0.9));
            assert_eq!(layouts[idx].opacity, 1.0);
            assert_eq!(layouts[idx].delay_ms, 45.0);
        }
        // Same numbers, different easing on each side of the active line.
        assert_eq!(layouts[0].easing, Easing::EaseOut);
        assert_eq!(layouts[2].easing, Easing::EaseIn);
    }

    #[test]
    fn profile_decays_and_clamps_with_distance() {
        let layouts = compute_layout(Some(0), &heights(12), &PARAMS);
        assert!(close(layouts[2].scale, 0.76));
        assert!(close(layouts[2].opacity, 0.78));
        // Far lines bottom out at the floors.
        let far = &layouts[11];
        assert_eq!(far.scale, 0.72);
        assert_eq!(far.blur, 4.5);
        assert_eq!(far.opacity, 0.32);
        assert_eq!(far.delay_ms, 6.0 * 45.0);
    }

    #[test]
    fn stacking_uses_scaled_heights() {
        let layouts = compute_layout(Some(1), &heights(3), &PARAMS);
        let base_gap = (24.0 * 1.35_f32).clamp(28.0, 72.0);
        // Below: previous line is the active one at full scale.
        assert!(close(layouts[2].top, layouts[1].top + 30.0 + base_gap));
        // Above: the neighbor's own scaled height.
        assert!(close(
            layouts[0].top,
            layouts[1].top - 30.0 * layouts[0].scale - base_gap
        ));
    }

    #[test]
    fn no_active_line_parks_everything_below_center() {
        let layouts = compute_layout(None, &heights(4), &PARAMS);
        let center = 800.0 * 0.38;
        assert!(layouts.iter().all(|l| l.top > center));
        // Offsets count from a virtual line zero: first line is offset 1.
        assert!(close(layouts[0].scale, 0.88));
        assert!(close(layouts[0].blur, 0.9));
        assert!(layouts.iter().all(|l| l.delay_ms == 0.0));
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let h = vec![30.0, 44.0, 30.0, 61.0];
        let a = compute_layout(Some(2), &h, &PARAMS);
        let b = compute_layout(Some(2), &h, &PARAMS);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_documents_produce_no_layout() {
        assert!(compute_layout(Some(0), &[], &PARAMS).is_empty());
        assert!(compute_layout(None, &[], &PARAMS).is_empty());
    }

    #[test]
    fn thumb_tracks_the_active_line() {
        let thumb = scroll_thumb(Some(0), 10, 500.0);
        assert_eq!(thumb.height, 50.0);
        assert_eq!(thumb.top, 0.0);
        assert!(thumb.scrollable);

        let last = scroll_thumb(Some(9), 10, 500.0);
        assert_eq!(last.top, 450.0);

        let mid = scroll_thumb(Some(4), 10, 500.0);
        assert!(mid.top > 0.0 && mid.top < 450.0);
    }

    #[test]
    fn thumb_has_a_minimum_height() {
        let thumb = scroll_thumb(Some(0), 100, 500.0);
        assert_eq!(thumb.height, 28.0);
    }

    #[test]
    fn single_line_collapses_the_thumb() {
        let thumb = scroll_thumb(Some(0), 1, 500.0);
        assert_eq!(thumb.height, 500.0);
        assert_eq!(thumb.top, 0.0);
        assert!(!thumb.scrollable);
    }

    #[test]
    fn snap_drops_the_duration() {
        assert_eq!(Transition::Snap.duration_ms(), 0.0);
        assert_eq!(Transition::Animate.duration_ms(), TRANSITION_DURATION_MS);
    }
}
