//! Windowed list rendering: computes which contiguous slice of a long filtered
//! list must be materialized for the current scroll position, plus the spacer
//! extents that preserve the full scrollable height.

use serde::{Deserialize, Serialize};

/// Rows rendered outside the strict viewport on each side, to mask scroll
/// jank.
const DEFAULT_OVERSCAN: usize = 10;

/// Fixed per-row and viewport geometry, in pixels.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    row_height: u32,
    height: u32,
    overscan: usize,
}

impl Viewport {
    pub fn new(row_height: u32, height: u32) -> Self {
        Self {
            row_height,
            height,
            overscan: DEFAULT_OVERSCAN,
        }
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    /// Total scrollable content height for `row_count` rows, independent of
    /// which slice is materialized.
    pub fn content_height(&self, row_count: usize) -> u64 {
        row_count as u64 * self.row_height as u64
    }

    /// The materialized range and spacer extents for the given list length and
    /// scroll offset. `pad_top + materialized + pad_bottom` always equals
    /// `content_height(row_count)`.
    pub fn window(&self, row_count: usize, scroll: u32) -> Window {
        if row_count == 0 || self.row_height == 0 {
            return Window::default();
        }
        let h = self.row_height as u64;
        let scroll = scroll as u64;

        // Rows intersecting [scroll, scroll + height), rounded up.
        let last_visible = (scroll + self.height as u64).div_ceil(h) as usize;
        let end = row_count.min(last_visible + self.overscan);

        // A stale scroll offset can point past a freshly shortened list;
        // clamp so the range stays well-formed.
        let first_visible = (scroll / h) as usize;
        let start = end.min(first_visible.saturating_sub(self.overscan));

        Window {
            start,
            end,
            pad_top: start as u64 * h,
            pad_bottom: (row_count - end) as u64 * h,
        }
    }
}

/// A materialized slice `[start, end)` of the filtered list, with the spacer
/// heights above and below it.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Window {
    start: usize,
    end: usize,
    pad_top: u64,
    pad_bottom: u64,
}

impl Window {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn pad_top(&self) -> u64 {
        self.pad_top
    }

    pub fn pad_bottom(&self) -> u64 {
        self.pad_bottom
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Scroll state for a windowed list. The offset is only meaningful against
/// the current filtered sequence, so a filter change snaps it back to the top.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ListView {
    scroll: u32,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll(&self) -> u32 {
        self.scroll
    }

    pub fn set_scroll(&mut self, scroll: u32) {
        self.scroll = scroll;
    }

    /// Indices against the old sequence are meaningless after a filter edit.
    pub fn on_filter_change(&mut self) {
        self.scroll = 0;
    }

    pub fn window(&self, viewport: &Viewport, row_count: usize) -> Window {
        viewport.window(row_count, self.scroll)
    }
}
