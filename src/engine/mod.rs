//! Lyric synchronization and layout engine.
//!
//! Owns the current lyric document and sync status, tracks the active line
//! against playback position, and computes the per-line visual layout. All
//! host I/O (provider fetches, position queries, refresh cadence) lives
//! outside; the engine is synchronous and single-owner, driven by explicit
//! calls from the UI loop.

pub mod document;
pub mod layout;
pub mod normalize;
pub mod scheduler;
pub mod tracker;

pub use document::{LyricDocument, LyricLine, SyncStatus};
pub use layout::{LayoutParams, LineLayout, ScrollThumb, Transition};

use scheduler::FrameScheduler;
use serde_json::Value;

/// Where a lyric payload came from. Pushed updates carry their origin so a
/// weaker signal from one source cannot clobber another source's document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOrigin {
    /// The configured lyric provider (our own fetch).
    Provider,
    /// The host player's published lyrics.
    Player,
}

/// One fully computed layout pass, handed to the surface as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutFrame {
    pub lines: Vec<LineLayout>,
    pub thumb: ScrollThumb,
    pub transition: Transition,
    pub active: Option<usize>,
}

/// Rendering surface the engine is attached to. The engine only measures
/// and pushes frames; how a surface realizes scale/blur/easing is its own
/// business.
pub trait Surface {
    /// Measure the rendered height of every line, in surface units. Takes
    /// `&mut self` so the surface may retain what it laid out (wrapped
    /// text, node handles) for the frames that follow.
    fn measure_heights(&mut self, lines: &[LyricLine]) -> Vec<f32>;
    fn viewport_height(&self) -> f32;
    fn font_size(&self) -> f32;
    fn apply_frame(&mut self, frame: &LayoutFrame);
    fn show_status(&mut self, status: SyncStatus);
}

/// Read-only diagnostics snapshot. Safe to call at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugInfo {
    pub status: SyncStatus,
    pub is_synced: bool,
    pub lines: Vec<LyricLine>,
}

pub struct LyricEngine<S: Surface> {
    surface: Option<S>,
    status: SyncStatus,
    document: Option<LyricDocument>,
    origin: Option<UpdateOrigin>,
    active: Option<usize>,
    heights: Vec<f32>,
    viewport_height: f32,
    font_size: f32,
    scheduler: FrameScheduler,
}

impl<S: Surface> Default for LyricEngine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> LyricEngine<S> {
    pub fn new() -> Self {
        Self {
            surface: None,
            status: SyncStatus::Unavailable,
            document: None,
            origin: None,
            active: None,
            heights: Vec::new(),
            viewport_height: 0.0,
            font_size: 0.0,
            scheduler: FrameScheduler::new(),
        }
    }

    /// Bind the engine to a rendering surface. The engine starts out (and
    /// re-starts after teardown) as `Unavailable` with no document.
    pub fn attach(&mut self, mut surface: S) {
        surface.show_status(self.status);
        self.surface = Some(surface);
    }

    /// Hard reset: stop the frame loop, drop the document and the surface.
    /// Idempotent; no tick or resize arriving afterwards does anything.
    pub fn teardown(&mut self) {
        self.scheduler.stop();
        self.document = None;
        self.origin = None;
        self.active = None;
        self.heights.clear();
        self.viewport_height = 0.0;
        self.font_size = 0.0;
        self.status = SyncStatus::Unavailable;
        self.surface = None;
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn is_loop_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn debug_info(&self) -> DebugInfo {
        DebugInfo {
            status: self.status,
            is_synced: self.document.as_ref().is_some_and(LyricDocument::is_synced),
            lines: self
                .document
                .as_ref()
                .map(|d| d.lines().to_vec())
                .unwrap_or_default(),
        }
    }

    /// Start a load. Returns whether a fetch should actually happen: with no
    /// track identifier the display goes straight to `Unavailable`.
    pub fn begin_load(&mut self, track: Option<&str>) -> bool {
        match track {
            None => {
                self.set_unavailable();
                false
            }
            Some(_) => {
                self.set_loading();
                true
            }
        }
    }

    /// Resolve a load started with [`begin_load`]. `None` covers both fetch
    /// failures and an explicit "no lyrics" answer; any raw payload goes
    /// through normalization and classification. A "no lyrics" outcome will
    /// not displace a document another source delivered in the meantime.
    pub fn complete_load(&mut self, payload: Option<&Value>) {
        let lines = payload.map(normalize::normalize).unwrap_or_default();
        if lines.is_empty() {
            if !self.shielded_from(UpdateOrigin::Provider) {
                self.set_unavailable();
            }
        } else {
            self.apply_lines(lines, UpdateOrigin::Provider);
        }
    }

    /// Pushed lyric update from a collaborator. The payload either flags an
    /// in-flight load or carries raw lines plus an availability flag; it
    /// runs through the same normalize → classify → transition pipeline as
    /// a load, except that a weak signal (loading / unavailable / empty)
    /// from a different origin never discards a synced document currently
    /// on display.
    pub fn handle_update(&mut self, origin: UpdateOrigin, payload: &Value) {
        let is_loading = payload
            .get("isLoading")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if is_loading {
            if !self.shielded_from(origin) {
                self.set_loading();
            }
            return;
        }

        let raw = ["synced", "lines", "lyrics"]
            .iter()
            .find_map(|f| payload.get(f))
            .filter(|v| !v.is_null())
            .unwrap_or(payload);
        let lines = normalize::normalize(raw);
        let available = payload
            .get("available")
            .and_then(Value::as_bool)
            .unwrap_or(!lines.is_empty());

        if !available || lines.is_empty() {
            if !self.shielded_from(origin) {
                self.set_unavailable();
            }
            return;
        }
        self.apply_lines(lines, origin);
    }

    /// One frame of the synchronization loop. Returns whether the layout
    /// was recomputed; steady playback within the same line does no work.
    pub fn tick(&mut self, position_ms: i64) -> bool {
        if !self.scheduler.is_running() || self.status != SyncStatus::Synced {
            return false;
        }
        let Some(doc) = self.document.as_ref() else {
            return false;
        };
        let next = tracker::locate(doc.lines(), position_ms);
        if next == self.active {
            return false;
        }
        self.active = next;
        self.apply_layout(Transition::Animate);
        true
    }

    /// The rendering surface changed size or font metrics: re-measure and
    /// re-apply the current layout instantaneously. Active index and status
    /// are left untouched.
    pub fn handle_resize(&mut self) {
        if self.document.is_none() {
            return;
        }
        self.remeasure();
        self.apply_layout(Transition::Snap);
    }

    /// A document currently on display is shielded against weak signals
    /// (loading / unavailable / empty) from any *other* origin; a source may
    /// always withdraw or replace its own contribution.
    fn shielded_from(&self, origin: UpdateOrigin) -> bool {
        matches!(self.status, SyncStatus::Synced | SyncStatus::Unsynced)
            && self.document.is_some()
            && self.origin.is_some_and(|current| current != origin)
    }

    fn apply_lines(&mut self, lines: Vec<LyricLine>, origin: UpdateOrigin) {
        // The old loop must be fully stopped before the new document is in
        // place; no tick ever observes a half-updated document.
        self.scheduler.stop();
        let doc = LyricDocument::new(lines);
        let synced = doc.is_synced();
        self.status = if synced {
            SyncStatus::Synced
        } else {
            SyncStatus::Unsynced
        };
        // Unsynced content gets a single static pass with the first line
        // highlighted; synced content starts with nothing active until the
        // first timed line arrives.
        self.active = if synced { None } else { Some(0) };
        self.document = Some(doc);
        self.origin = Some(origin);
        self.remeasure();
        self.apply_layout(Transition::Snap);
        if synced {
            self.scheduler.start();
        }
    }

    fn set_loading(&mut self) {
        self.reset_to(SyncStatus::Loading);
    }

    fn set_unavailable(&mut self) {
        self.reset_to(SyncStatus::Unavailable);
    }

    fn reset_to(&mut self, status: SyncStatus) {
        self.scheduler.stop();
        self.document = None;
        self.origin = None;
        self.active = None;
        self.heights.clear();
        self.status = status;
        if let Some(surface) = self.surface.as_mut() {
            surface.show_status(status);
        }
    }

    fn remeasure(&mut self) {
        let (Some(doc), Some(surface)) = (self.document.as_ref(), self.surface.as_mut()) else {
            return;
        };
        self.heights = surface.measure_heights(doc.lines());
        self.viewport_height = surface.viewport_height();
        self.font_size = surface.font_size();
    }

    fn apply_layout(&mut self, transition: Transition) {
        let Some(count) = self.document.as_ref().map(LyricDocument::len) else {
            return;
        };
        if self.heights.len() != count {
            self.remeasure();
        }
        // Font changes (zoom, theme switch) invalidate the measurements.
        if let Some(font_size) = self.surface.as_ref().map(|s| s.font_size())
            && (font_size - self.font_size).abs() > 0.5
        {
            self.remeasure();
        }
        let params = LayoutParams {
            viewport_height: self.viewport_height,
            font_size: self.font_size,
        };
        let frame = LayoutFrame {
            lines: layout::compute_layout(self.active, &self.heights, &params),
            thumb: layout::scroll_thumb(self.active, count, self.viewport_height),
            transition,
            active: self.active,
        };
        if let Some(surface) = self.surface.as_mut() {
            surface.apply_frame(&frame);
        }
    }
}
