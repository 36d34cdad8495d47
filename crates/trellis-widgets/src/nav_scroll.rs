//! Horizontal scroll state of a tab strip.
//!
//! Offsets are logical: zero is the strip's start edge, which is the right
//! edge in right-to-left layouts. Rendering maps them to columns.

use crate::indicator::approach;

/// How a scroll request moves the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Jump immediately.
    #[default]
    Auto,
    /// Slide over the next frames.
    Smooth,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavScroll {
    offset: u16,
    target: u16,
    max: u16,
}

impl NavScroll {
    /// Current offset from the start edge.
    pub fn offset(&self) -> u16 {
        self.offset
    }

    /// Where a smooth scroll is heading.
    pub fn target(&self) -> u16 {
        self.target
    }

    /// Largest reachable offset.
    pub fn max(&self) -> u16 {
        self.max
    }

    pub fn at_start(&self) -> bool {
        self.offset == 0
    }

    pub fn at_end(&self) -> bool {
        self.offset >= self.max
    }

    pub(crate) fn set_bounds(&mut self, content: u16, viewport: u16) {
        self.max = content.saturating_sub(viewport);
        self.offset = self.offset.min(self.max);
        self.target = self.target.min(self.max);
    }

    pub(crate) fn scroll_to(&mut self, to: i32, behavior: ScrollBehavior) {
        let to = u16::try_from(to.clamp(0, i32::from(self.max))).unwrap_or(self.max);
        self.target = to;
        if behavior == ScrollBehavior::Auto {
            self.offset = to;
        }
    }

    /// Scroll relative to the current offset.
    pub(crate) fn scroll_by(&mut self, delta: i32, behavior: ScrollBehavior) {
        self.scroll_to(i32::from(self.offset) + delta, behavior);
    }

    /// Scroll the least amount that brings `[start, start + extent)` into a
    /// viewport of `viewport` cells.
    pub(crate) fn scroll_into_view(
        &mut self,
        start: u16,
        extent: u16,
        viewport: u16,
        behavior: ScrollBehavior,
    ) {
        let end = i32::from(start) + i32::from(extent);
        let visible_end = i32::from(self.offset) + i32::from(viewport);
        if start < self.offset {
            self.scroll_to(i32::from(start), behavior);
        } else if end > visible_end {
            self.scroll_to(end - i32::from(viewport), behavior);
        }
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.offset != self.target
    }

    pub(crate) fn step(&mut self) {
        let next = approach(i32::from(self.offset), i32::from(self.target));
        self.offset = u16::try_from(next).unwrap_or(self.target);
    }
}
