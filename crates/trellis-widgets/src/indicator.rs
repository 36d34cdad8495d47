//! The bar under (or beside) the active tab.

use crate::tab_group::Axis;

/// Position of the active-tab indicator along the navigation strip.
///
/// The target geometry is set whenever the active tab moves; the displayed
/// geometry slides toward it one frame at a time while transitions are
/// enabled, and snaps otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    axis: Axis,
    extent: u16,
    translate: i32,
    hidden: bool,
    transitions: bool,
    shown_extent: u16,
    shown_translate: i32,
}

impl Indicator {
    pub(crate) fn new() -> Self {
        Self {
            axis: Axis::Horizontal,
            extent: 0,
            translate: 0,
            hidden: true,
            transitions: true,
            shown_extent: 0,
            shown_translate: 0,
        }
    }

    /// Width (horizontal) or height (vertical) of the active tab.
    pub fn extent(&self) -> u16 {
        self.extent
    }

    /// Offset from the strip's start. Negative in right-to-left horizontal
    /// layouts.
    pub fn translate(&self) -> i32 {
        self.translate
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn transitions_enabled(&self) -> bool {
        self.transitions
    }

    /// The geometry currently on screen, as `(translate, extent)`.
    pub fn displayed(&self) -> (i32, u16) {
        (self.shown_translate, self.shown_extent)
    }

    pub(crate) fn set(&mut self, axis: Axis, extent: u16, translate: i32) {
        let snap = self.hidden || !self.transitions || axis != self.axis;
        self.axis = axis;
        self.extent = extent;
        self.translate = translate;
        if snap {
            self.snap();
        }
    }

    pub(crate) fn show(&mut self) {
        if self.hidden {
            self.hidden = false;
            self.snap();
        }
    }

    pub(crate) fn hide(&mut self) {
        self.hidden = true;
    }

    pub(crate) fn suppress_transitions(&mut self) {
        self.transitions = false;
        self.snap();
    }

    pub(crate) fn restore_transitions(&mut self) {
        self.transitions = true;
    }

    pub(crate) fn is_animating(&self) -> bool {
        !self.hidden
            && (self.shown_translate != self.translate || self.shown_extent != self.extent)
    }

    /// Advance the displayed geometry one frame toward the target.
    pub(crate) fn step(&mut self) {
        self.shown_translate = approach(self.shown_translate, self.translate);
        let extent = approach(i32::from(self.shown_extent), i32::from(self.extent));
        self.shown_extent = u16::try_from(extent).unwrap_or(self.extent);
    }

    fn snap(&mut self) {
        self.shown_translate = self.translate;
        self.shown_extent = self.extent;
    }
}

/// Move a third of the remaining distance, at least one cell.
pub(crate) fn approach(current: i32, target: i32) -> i32 {
    let delta = target - current;
    if delta == 0 {
        return current;
    }
    let step = (delta.abs() / 3).max(1);
    current + step * delta.signum()
}
