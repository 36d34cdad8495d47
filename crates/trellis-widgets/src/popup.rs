//! Anchor-relative placement for floating surfaces.
//!
//! A [`Popup`] positions a box of a given size next to an anchor rect:
//! on one of four sides, aligned to the anchor's start, center or end, pushed
//! away by `distance` and slid along the anchor by `skidding`. When the
//! preferred side does not fit inside the boundary it flips to the opposite
//! side, and the box is shifted along the anchor to stay inside.

use ratatui::layout::{Rect, Size};
use ratatui::widgets::{Block, Clear};
use ratatui::Frame;
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;
use trellis_core::ElementId;

/// Where a popup sits relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    #[default]
    Top,
    TopStart,
    TopEnd,
    Bottom,
    BottomStart,
    BottomEnd,
    Right,
    RightStart,
    RightEnd,
    Left,
    LeftStart,
    LeftEnd,
}

/// The anchor side a placement uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Alignment along the anchor edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

impl Placement {
    /// Every placement, in declaration order.
    pub const ALL: [Placement; 12] = [
        Placement::Top,
        Placement::TopStart,
        Placement::TopEnd,
        Placement::Bottom,
        Placement::BottomStart,
        Placement::BottomEnd,
        Placement::Right,
        Placement::RightStart,
        Placement::RightEnd,
        Placement::Left,
        Placement::LeftStart,
        Placement::LeftEnd,
    ];

    /// The anchor side this placement uses.
    pub fn side(self) -> Side {
        match self {
            Placement::Top | Placement::TopStart | Placement::TopEnd => Side::Top,
            Placement::Bottom | Placement::BottomStart | Placement::BottomEnd => Side::Bottom,
            Placement::Right | Placement::RightStart | Placement::RightEnd => Side::Right,
            Placement::Left | Placement::LeftStart | Placement::LeftEnd => Side::Left,
        }
    }

    /// The alignment along the anchor edge.
    pub fn align(self) -> Align {
        match self {
            Placement::TopStart
            | Placement::BottomStart
            | Placement::RightStart
            | Placement::LeftStart => Align::Start,
            Placement::TopEnd | Placement::BottomEnd | Placement::RightEnd | Placement::LeftEnd => {
                Align::End
            }
            _ => Align::Center,
        }
    }

    /// The same alignment on the opposite side.
    pub fn flipped(self) -> Placement {
        match self {
            Placement::Top => Placement::Bottom,
            Placement::TopStart => Placement::BottomStart,
            Placement::TopEnd => Placement::BottomEnd,
            Placement::Bottom => Placement::Top,
            Placement::BottomStart => Placement::TopStart,
            Placement::BottomEnd => Placement::TopEnd,
            Placement::Right => Placement::Left,
            Placement::RightStart => Placement::LeftStart,
            Placement::RightEnd => Placement::LeftEnd,
            Placement::Left => Placement::Right,
            Placement::LeftStart => Placement::RightStart,
            Placement::LeftEnd => Placement::RightEnd,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Placement::Top => "top",
            Placement::TopStart => "top-start",
            Placement::TopEnd => "top-end",
            Placement::Bottom => "bottom",
            Placement::BottomStart => "bottom-start",
            Placement::BottomEnd => "bottom-end",
            Placement::Right => "right",
            Placement::RightStart => "right-start",
            Placement::RightEnd => "right-end",
            Placement::Left => "left",
            Placement::LeftStart => "left-start",
            Placement::LeftEnd => "left-end",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown placement name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown placement: {0:?}")]
pub struct ParsePlacementError(pub String);

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Placement::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParsePlacementError(s.to_string()))
    }
}

/// The outcome of placing a popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placed {
    /// The area the popup occupies, clipped to the boundary.
    pub rect: Rect,
    /// The placement actually used, after flipping.
    pub placement: Placement,
}

/// Positioning options for [`place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceOptions {
    pub placement: Placement,
    pub distance: u16,
    pub skidding: i16,
    pub flip: bool,
    pub shift: bool,
}

/// Place a box of `size` next to `anchor`, staying inside `boundary`.
pub fn place(options: PlaceOptions, anchor: Rect, size: Size, boundary: Rect) -> Placed {
    let mut placement = options.placement;
    let mut origin = origin_for(placement, options, anchor, size);

    if options.flip && !fits_main_axis(placement.side(), origin, size, boundary) {
        let alternative = placement.flipped();
        let alt_origin = origin_for(alternative, options, anchor, size);
        if fits_main_axis(alternative.side(), alt_origin, size, boundary) {
            placement = alternative;
            origin = alt_origin;
        }
    }

    if options.shift {
        origin = shift_cross_axis(placement.side(), origin, size, boundary);
    }

    Placed {
        rect: clip(origin, size, boundary),
        placement,
    }
}

fn origin_for(placement: Placement, options: PlaceOptions, anchor: Rect, size: Size) -> (i32, i32) {
    let (ax, ay) = (i32::from(anchor.x), i32::from(anchor.y));
    let (aw, ah) = (i32::from(anchor.width), i32::from(anchor.height));
    let (w, h) = (i32::from(size.width), i32::from(size.height));
    let distance = i32::from(options.distance);
    let skidding = i32::from(options.skidding);

    let cross = |start: i32, len: i32, extent: i32| -> i32 {
        let aligned = match placement.align() {
            Align::Start => start,
            Align::Center => start + (len - extent) / 2,
            Align::End => start + len - extent,
        };
        aligned + skidding
    };

    match placement.side() {
        Side::Top => (cross(ax, aw, w), ay - distance - h),
        Side::Bottom => (cross(ax, aw, w), ay + ah + distance),
        Side::Left => (ax - distance - w, cross(ay, ah, h)),
        Side::Right => (ax + aw + distance, cross(ay, ah, h)),
    }
}

fn fits_main_axis(side: Side, (x, y): (i32, i32), size: Size, boundary: Rect) -> bool {
    match side {
        Side::Top => y >= i32::from(boundary.y),
        Side::Bottom => y + i32::from(size.height) <= i32::from(boundary.bottom()),
        Side::Left => x >= i32::from(boundary.x),
        Side::Right => x + i32::from(size.width) <= i32::from(boundary.right()),
    }
}

fn shift_cross_axis(side: Side, (x, y): (i32, i32), size: Size, boundary: Rect) -> (i32, i32) {
    let clamp = |value: i32, start: u16, end: u16, extent: u16| -> i32 {
        let max = i32::from(end) - i32::from(extent);
        value.min(max).max(i32::from(start))
    };
    match side {
        Side::Top | Side::Bottom => (
            clamp(x, boundary.x, boundary.right(), size.width),
            y,
        ),
        Side::Left | Side::Right => (
            x,
            clamp(y, boundary.y, boundary.bottom(), size.height),
        ),
    }
}

fn clip((x, y): (i32, i32), size: Size, boundary: Rect) -> Rect {
    let left = x.max(i32::from(boundary.x));
    let top = y.max(i32::from(boundary.y));
    let right = (x + i32::from(size.width)).min(i32::from(boundary.right()));
    let bottom = (y + i32::from(size.height)).min(i32::from(boundary.bottom()));
    let to_u16 = |v: i32| u16::try_from(v.max(0)).unwrap_or(u16::MAX);
    Rect::new(
        to_u16(left),
        to_u16(top),
        to_u16(right - left),
        to_u16(bottom - top),
    )
}

/// The positioning surface of a floating widget.
///
/// The popup remembers the anchor and frame it was last rendered against, so
/// [`reposition`](Popup::reposition) can run outside of a render pass. It only
/// computes a placement while [`active`](Popup::is_active).
#[derive(Debug)]
pub struct Popup {
    surface: ElementId,
    placement: Placement,
    distance: u16,
    skidding: i16,
    hoist: bool,
    flip: bool,
    shift: bool,
    active: bool,
    boundary: Option<Rect>,
    anchor: Cell<Option<Rect>>,
    frame: Cell<Rect>,
    placed: Option<Placed>,
}

impl Popup {
    /// A detached, inactive popup placed on top of its anchor.
    pub fn new() -> Self {
        Self {
            surface: ElementId::new(),
            placement: Placement::Top,
            distance: 0,
            skidding: 0,
            hoist: false,
            flip: true,
            shift: true,
            active: false,
            boundary: None,
            anchor: Cell::new(None),
            frame: Cell::new(Rect::default()),
            placed: None,
        }
    }

    /// Handle of the popup's visual container, used as an animation target.
    pub fn surface(&self) -> ElementId {
        self.surface
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    pub fn distance(&self) -> u16 {
        self.distance
    }

    pub fn set_distance(&mut self, distance: u16) {
        self.distance = distance;
    }

    pub fn skidding(&self) -> i16 {
        self.skidding
    }

    pub fn set_skidding(&mut self, skidding: i16) {
        self.skidding = skidding;
    }

    pub fn hoist(&self) -> bool {
        self.hoist
    }

    /// When hoisted, the popup is bounded by the whole frame instead of the
    /// configured boundary.
    pub fn set_hoist(&mut self, hoist: bool) {
        self.hoist = hoist;
    }

    /// Disable or enable flipping to the opposite side.
    pub fn set_flip(&mut self, flip: bool) {
        self.flip = flip;
    }

    /// Disable or enable shifting along the anchor to stay in bounds.
    pub fn set_shift(&mut self, shift: bool) {
        self.shift = shift;
    }

    /// Restrict placement to `boundary` (intersected with the frame).
    pub fn set_boundary(&mut self, boundary: Option<Rect>) {
        self.boundary = boundary;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate or deactivate positioning. Deactivating forgets the last
    /// placement.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.placed = None;
        }
    }

    /// The anchor area recorded by the last render, if any.
    pub fn anchor(&self) -> Option<Rect> {
        self.anchor.get()
    }

    /// Record the anchor and frame the owner is rendering against.
    pub fn track(&self, anchor: Rect, frame: Rect) {
        self.anchor.set(Some(anchor));
        self.frame.set(frame);
    }

    /// The area the popup must stay inside.
    pub fn bounds(&self) -> Rect {
        let frame = self.frame.get();
        match self.boundary {
            Some(boundary) if !self.hoist => boundary.intersection(frame),
            _ => frame,
        }
    }

    /// The last placement computed by [`reposition`](Popup::reposition).
    pub fn placed(&self) -> Option<Placed> {
        self.placed
    }

    /// Compute a placement for a body of `size` against `anchor` without
    /// storing it.
    pub fn compute(&self, anchor: Rect, size: Size) -> Placed {
        place(
            PlaceOptions {
                placement: self.placement,
                distance: self.distance,
                skidding: self.skidding,
                flip: self.flip,
                shift: self.shift,
            },
            anchor,
            size,
            self.bounds(),
        )
    }

    /// Recompute and store the placement for a body of `size` against the
    /// last recorded anchor. No-op while inactive or before the first render.
    pub fn reposition(&mut self, size: Size) -> Option<Placed> {
        if !self.active {
            return None;
        }
        let anchor = self.anchor.get()?;
        let placed = self.compute(anchor, size);
        self.placed = Some(placed);
        Some(placed)
    }
}

impl Default for Popup {
    fn default() -> Self {
        Self::new()
    }
}

/// Clear the surface area and draw `block` around it, returning the inner
/// area to render content into.
pub fn render_surface(frame: &mut Frame, area: Rect, block: &Block) -> Rect {
    frame.render_widget(Clear, area);
    let inner = block.inner(area);
    frame.render_widget(block.clone(), area);
    inner
}
