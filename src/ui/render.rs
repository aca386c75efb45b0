//! Terminal rendering surface.
//!
//! The layout engine thinks in a continuous pixel space; a terminal is a
//! cell grid. The surface runs the layout in a virtual space of
//! [`CELL_PX`] pixels per row, then projects the resulting tops back onto
//! rows. Scale and blur have no cell-grid equivalent, so they fold into the
//! style choice instead; stagger delays and easing apply instantaneously
//! (a terminal repaint has no transitions to drive).

use crate::engine::{LayoutFrame, LineLayout, LyricLine, Surface, SyncStatus};
use crate::ui::styles::LyricStyles;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

/// Virtual pixel height of one terminal row.
pub const CELL_PX: f32 = 16.0;
/// Approximate virtual pixel width of one terminal column.
const CELL_W_PX: f32 = 8.0;

pub struct TermSurface {
    cols: u16,
    rows: u16,
    /// Width-wrapped text per lyric line, cached at measure time.
    wrapped: Vec<Vec<String>>,
    frame: Option<LayoutFrame>,
    status: SyncStatus,
    hidden: bool,
    styles: LyricStyles,
}

impl TermSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            wrapped: Vec::new(),
            frame: None,
            status: SyncStatus::Unavailable,
            hidden: false,
            styles: LyricStyles::default(),
        }
    }

    pub fn set_size(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Hide/show the overlay without touching engine state.
    pub fn toggle_hidden(&mut self) {
        self.hidden = !self.hidden;
    }

    fn text_width(&self) -> usize {
        // Leave room for the scrollbar column and a margin on each side.
        (self.cols.saturating_sub(6) as usize).max(10)
    }

    fn line_style(&self, idx: usize, layout: &LineLayout, active: Option<usize>) -> ratatui::style::Style {
        match active {
            Some(a) if idx == a => self.styles.current,
            _ if layout.opacity <= 0.4 || layout.blur > 2.6 => self.styles.faded,
            Some(a) if idx < a => self.styles.before,
            _ => self.styles.after,
        }
    }

    pub fn render(&self, f: &mut Frame) {
        if self.hidden {
            return;
        }
        let area = f.area();
        match &self.frame {
            Some(frame) => {
                self.render_lines(f, area, frame);
                self.render_scrollbar(f, area, frame);
            }
            None => self.render_status(f, area),
        }
    }

    fn render_lines(&self, f: &mut Frame, area: Rect, frame: &LayoutFrame) {
        let text_width = area.width.saturating_sub(2);
        for (idx, layout) in frame.lines.iter().enumerate() {
            let Some(block) = self.wrapped.get(idx) else {
                continue;
            };
            let row = (layout.top / CELL_PX).round() as i64;
            let height = block.len().max(1) as i64;
            if row < 0 || row >= area.height as i64 {
                continue;
            }
            let height = height.min(area.height as i64 - row) as u16;
            let shift = (layout.indent / CELL_W_PX).round() as u16;
            let rect = Rect {
                x: area.x + shift.min(area.width / 4),
                y: area.y + row as u16,
                width: text_width.saturating_sub(shift).max(1),
                height,
            };
            let style = self.line_style(idx, layout, frame.active);
            let lines: Vec<Line> = block.iter().map(|l| Line::from(l.clone())).collect();
            let paragraph = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(style);
            f.render_widget(paragraph, rect);
        }
    }

    fn render_scrollbar(&self, f: &mut Frame, area: Rect, frame: &LayoutFrame) {
        if !frame.thumb.scrollable || area.width == 0 {
            return;
        }
        let top = (frame.thumb.top / CELL_PX).round() as u16;
        let height = ((frame.thumb.height / CELL_PX).round() as u16).max(1);
        if top >= area.height {
            return;
        }
        let rect = Rect {
            x: area.x + area.width - 1,
            y: area.y + top,
            width: 1,
            height: height.min(area.height - top),
        };
        let bar: Vec<Line> = (0..rect.height).map(|_| Line::from("┃")).collect();
        f.render_widget(Paragraph::new(bar).style(self.styles.scrollbar), rect);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let message = match self.status {
            SyncStatus::Loading => "Loading lyrics…",
            SyncStatus::Unavailable => "Lyrics unavailable",
            _ => return,
        };
        let rect = Rect {
            x: area.x,
            y: area.y + area.height / 2,
            width: area.width,
            height: 1.min(area.height),
        };
        let paragraph = Paragraph::new(Line::from(message))
            .alignment(Alignment::Center)
            .style(self.styles.status);
        f.render_widget(paragraph, rect);
    }
}

impl Surface for TermSurface {
    fn measure_heights(&mut self, lines: &[LyricLine]) -> Vec<f32> {
        let width = self.text_width();
        self.wrapped = lines
            .iter()
            .map(|line| {
                textwrap::wrap(&line.text, width)
                    .into_iter()
                    .map(|cow| cow.into_owned())
                    .collect::<Vec<_>>()
            })
            .collect();
        self.wrapped
            .iter()
            .map(|block| block.len().max(1) as f32 * CELL_PX)
            .collect()
    }

    fn viewport_height(&self) -> f32 {
        self.rows as f32 * CELL_PX
    }

    fn font_size(&self) -> f32 {
        CELL_PX
    }

    fn apply_frame(&mut self, frame: &LayoutFrame) {
        self.frame = Some(frame.clone());
    }

    fn show_status(&mut self, status: SyncStatus) {
        self.status = status;
        self.frame = None;
        self.wrapped.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<LyricLine> {
        texts.iter().map(|t| LyricLine::new(*t, None)).collect()
    }

    #[test]
    fn heights_follow_wrapped_row_counts() {
        let mut surface = TermSurface::new(26, 20);
        let heights = surface.measure_heights(&lines(&[
            "short",
            "a line long enough that it must wrap onto a second row",
        ]));
        assert_eq!(heights[0], CELL_PX);
        assert!(heights[1] >= 2.0 * CELL_PX);
    }

    #[test]
    fn viewport_tracks_terminal_size() {
        let mut surface = TermSurface::new(80, 24);
        assert_eq!(surface.viewport_height(), 24.0 * CELL_PX);
        surface.set_size(80, 40);
        assert_eq!(surface.viewport_height(), 40.0 * CELL_PX);
    }

    #[test]
    fn status_clears_any_applied_frame() {
        let mut surface = TermSurface::new(80, 24);
        surface.measure_heights(&lines(&["one"]));
        surface.apply_frame(&LayoutFrame {
            lines: Vec::new(),
            thumb: crate::engine::layout::scroll_thumb(None, 1, 100.0),
            transition: crate::engine::Transition::Snap,
            active: None,
        });
        assert!(surface.frame.is_some());
        surface.show_status(SyncStatus::Loading);
        assert!(surface.frame.is_none());
        assert!(surface.wrapped.is_empty());
    }
}
