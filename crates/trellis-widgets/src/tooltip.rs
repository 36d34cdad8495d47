//! Tooltip: a short text body shown next to an anchor element.
//!
//! The tooltip does not draw its anchor. The parent renders the anchor and
//! then calls [`Tooltip::view`] with the anchor's area, which records it for
//! positioning and mouse hit-testing and draws the body when visible.
//!
//! Opening and closing are animated and can overlap: every transition bumps a
//! generation counter, and completions from a superseded transition are
//! dropped. Outward notifications arrive as [`Message::Event`], which the
//! parent intercepts when it forwards messages.
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis_widgets::tooltip::{Child, Tooltip, Trigger};
//!
//! let button = ElementId::new();
//! let tooltip = Tooltip::new("Saves the file", [Child::element(button)])?
//!     .with_trigger(Trigger::HOVER | Trigger::FOCUS);
//! ```

use crate::animation::{
    Animation, AnimationRegistry, Animator, TimedAnimator, TOOLTIP_HIDE, TOOLTIP_SHOW,
};
use crate::popup::{render_surface, Placed, Placement, Popup};
use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use futures::future::BoxFuture;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Padding, Paragraph};
use ratatui::Frame;
use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::watch;
use trellis_core::{
    parse_duration, Command, Component, Debounce, DurationError, ElementId, Locale, Localize,
    Token,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

bitflags! {
    /// Interactions that open and close the tooltip.
    ///
    /// `MANUAL` is exclusive in practice: it carries no interaction of its
    /// own, so a tooltip triggered only manually opens through
    /// [`Tooltip::show`] and the `open` property alone.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Trigger: u8 {
        const HOVER = 1;
        const FOCUS = 1 << 1;
        const CLICK = 1 << 2;
        const MANUAL = 1 << 3;
    }
}

impl Trigger {
    /// Parse a space-separated token list such as `"hover focus"`. Unknown
    /// tokens are ignored.
    pub fn parse(tokens: &str) -> Self {
        tokens
            .split_whitespace()
            .fold(Trigger::empty(), |acc, token| match token {
                "hover" => acc | Trigger::HOVER,
                "focus" => acc | Trigger::FOCUS,
                "click" => acc | Trigger::CLICK,
                "manual" => acc | Trigger::MANUAL,
                other => {
                    tracing::debug!(token = other, "ignoring unknown tooltip trigger");
                    acc
                }
            })
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::HOVER | Trigger::FOCUS
    }
}

/// Where the tooltip is in its open/close cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Notifications the tooltip emits to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipEvent {
    /// Opening started.
    ShowBegun,
    /// The show animation finished.
    Shown,
    /// Closing started.
    HideBegun,
    /// The hide animation finished and the body is hidden.
    Hidden,
}

/// Errors from building or configuring a tooltip.
#[derive(Debug, thiserror::Error)]
pub enum TooltipError {
    /// None of the children can serve as the anchor.
    #[error("invalid tooltip target: no element child outside the content slot")]
    InvalidTarget,
    /// A style property had an unusable value.
    #[error("invalid value {value:?} for {property}")]
    InvalidProperty { property: String, value: String },
    /// A delay property was not a valid time.
    #[error(transparent)]
    Duration(#[from] DurationError),
}

/// What kind of node a tooltip child is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Element,
    Style,
}

/// A child of the tooltip, candidate for its anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub id: ElementId,
    pub kind: ChildKind,
    pub slot: Option<String>,
}

impl Child {
    pub fn element(id: ElementId) -> Self {
        Self {
            id,
            kind: ChildKind::Element,
            slot: None,
        }
    }

    pub fn style() -> Self {
        Self {
            id: ElementId::new(),
            kind: ChildKind::Style,
            slot: None,
        }
    }

    /// Assign the child to a named slot.
    pub fn in_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    fn can_anchor(&self) -> bool {
        self.kind == ChildKind::Element && self.slot.as_deref() != Some("content")
    }
}

/// Visual configuration and timing for [`Tooltip`].
#[derive(Debug, Clone)]
pub struct TooltipStyle {
    pub body: Style,
    pub border: Style,
    /// Widest the body may grow, borders included.
    pub max_width: u16,
    pub show_delay: Duration,
    pub hide_delay: Duration,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            body: Style::default().fg(Color::Black).bg(Color::Gray),
            border: Style::default().fg(Color::DarkGray).bg(Color::Gray),
            max_width: 40,
            show_delay: Duration::from_millis(150),
            hide_delay: Duration::ZERO,
        }
    }
}

impl TooltipStyle {
    /// Read `--show-delay`, `--hide-delay` and `--max-width` from a list of
    /// style properties. Other properties are ignored.
    pub fn from_properties<'a>(
        properties: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, TooltipError> {
        let mut style = Self::default();
        for (property, value) in properties {
            match property {
                "--show-delay" => style.show_delay = parse_duration(value)?,
                "--hide-delay" => style.hide_delay = parse_duration(value)?,
                "--max-width" => {
                    style.max_width = value.trim().parse().map_err(|_| {
                        TooltipError::InvalidProperty {
                            property: property.to_string(),
                            value: value.to_string(),
                        }
                    })?;
                }
                _ => {}
            }
        }
        Ok(style)
    }
}

/// Resolves when a [`Tooltip::show`] or [`Tooltip::hide`] has fully settled.
///
/// Settling means the matching `Shown`/`Hidden` notification has been queued.
/// If the tooltip is dropped first, the future resolves anyway.
pub struct Settled {
    inner: BoxFuture<'static, ()>,
}

impl Settled {
    fn ready() -> Self {
        Self {
            inner: Box::pin(async {}),
        }
    }

    fn when(mut phase: watch::Receiver<Phase>, target: Phase) -> Self {
        Self {
            inner: Box::pin(async move {
                let _ = phase.wait_for(|p| *p == target).await;
            }),
        }
    }
}

impl Future for Settled {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.get_mut().inner.as_mut().poll(cx)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoverAction {
    Show,
    Hide,
}

/// Messages for [`Tooltip`].
#[derive(Debug, Clone)]
pub enum Message {
    /// Open, as [`Tooltip::show`].
    Show,
    /// Close, as [`Tooltip::hide`].
    Hide,
    /// The pointer entered the anchor.
    PointerOver,
    /// The pointer left the anchor.
    PointerOut,
    /// The anchor was clicked.
    Click,
    /// The anchor gained focus.
    Focus,
    /// The anchor lost focus.
    Blur,
    /// A key press while the anchor is focused.
    Key(KeyEvent),
    /// A raw mouse event, hit-tested against the rendered anchor.
    Mouse(MouseEvent),
    #[doc(hidden)]
    HoverElapsed(Token),
    #[doc(hidden)]
    AnimationsStopped(u64),
    #[doc(hidden)]
    AnimationFinished(u64),
    /// Recompute the body placement.
    Reposition,
    /// Outward notification for the parent.
    Event(TooltipEvent),
}

/// A tooltip attached to one anchor element.
pub struct Tooltip {
    content: String,
    target: ElementId,
    popup: Popup,
    trigger: Trigger,
    open: bool,
    disabled: bool,
    phase: Phase,
    phase_tx: watch::Sender<Phase>,
    body_hidden: bool,
    generation: u64,
    hover: Debounce<HoverAction>,
    pointer_inside: bool,
    target_focused: bool,
    rendered: Cell<bool>,
    animator: Arc<dyn Animator>,
    animations: AnimationRegistry,
    localize: Arc<dyn Localize>,
    style: TooltipStyle,
}

impl Tooltip {
    /// Create a closed tooltip. The anchor is the first child that is an
    /// element and not assigned to the `content` slot.
    pub fn new(
        content: impl Into<String>,
        children: impl IntoIterator<Item = Child>,
    ) -> Result<Self, TooltipError> {
        let target = children
            .into_iter()
            .find(Child::can_anchor)
            .map(|child| child.id)
            .ok_or(TooltipError::InvalidTarget)?;
        let (phase_tx, _) = watch::channel(Phase::Closed);
        let mut popup = Popup::new();
        popup.set_distance(1);
        Ok(Self {
            content: content.into(),
            target,
            popup,
            trigger: Trigger::default(),
            open: false,
            disabled: false,
            phase: Phase::Closed,
            phase_tx,
            body_hidden: true,
            generation: 0,
            hover: Debounce::new(),
            pointer_inside: false,
            target_focused: false,
            rendered: Cell::new(false),
            animator: Arc::new(TimedAnimator::new()),
            animations: AnimationRegistry::with_defaults(),
            localize: Arc::new(Locale::new()),
            style: TooltipStyle::default(),
        })
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.popup.set_placement(placement);
        self
    }

    pub fn with_distance(mut self, distance: u16) -> Self {
        self.popup.set_distance(distance);
        self
    }

    pub fn with_skidding(mut self, skidding: i16) -> Self {
        self.popup.set_skidding(skidding);
        self
    }

    pub fn with_hoist(mut self, hoist: bool) -> Self {
        self.popup.set_hoist(hoist);
        self
    }

    /// Confine the body to `boundary` unless hoisted.
    pub fn with_boundary(mut self, boundary: Rect) -> Self {
        self.popup.set_boundary(Some(boundary));
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Start open. The body is visible from the first render, without
    /// animation or events.
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self.apply_settled();
        self
    }

    pub fn with_style(mut self, style: TooltipStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_animator(mut self, animator: Arc<dyn Animator>) -> Self {
        self.animator = animator;
        self
    }

    /// Override the animation registered under `key` for this tooltip.
    pub fn with_animation(mut self, key: &str, animation: Animation) -> Self {
        self.animations.set_animation(key, animation);
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.animations.set_reduced_motion(reduced);
        self
    }

    pub fn with_localize(mut self, localize: Arc<dyn Localize>) -> Self {
        self.localize = localize;
        self
    }

    /// The anchor element.
    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the body is currently hidden.
    pub fn is_body_hidden(&self) -> bool {
        self.body_hidden
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    /// Last computed body placement.
    pub fn placed(&self) -> Option<Placed> {
        self.popup.placed()
    }

    /// Open the tooltip. Resolves immediately if it is already open.
    pub fn show(&mut self) -> (Command<Message>, Settled) {
        if self.open {
            return (Command::none(), Settled::ready());
        }
        let settled = Settled::when(self.phase_tx.subscribe(), Phase::Open);
        (self.set_open(true), settled)
    }

    /// Close the tooltip. Resolves immediately if it is already closed.
    pub fn hide(&mut self) -> (Command<Message>, Settled) {
        if !self.open {
            return (Command::none(), Settled::ready());
        }
        let settled = Settled::when(self.phase_tx.subscribe(), Phase::Closed);
        (self.set_open(false), settled)
    }

    /// Set the `open` property, starting a transition when it changes.
    pub fn set_open(&mut self, open: bool) -> Command<Message> {
        if self.open == open {
            return Command::none();
        }
        self.open = open;
        if !self.rendered.get() {
            self.apply_settled();
            return Command::none();
        }
        self.handle_open_change()
    }

    /// Disabling an open tooltip closes it.
    pub fn set_disabled(&mut self, disabled: bool) -> Command<Message> {
        self.disabled = disabled;
        if disabled && self.open {
            self.hide().0
        } else {
            Command::none()
        }
    }

    pub fn set_trigger(&mut self, trigger: Trigger) {
        self.trigger = trigger;
        if !trigger.contains(Trigger::HOVER) {
            self.hover.cancel();
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> Command<Message> {
        self.content = content.into();
        self.request_reposition()
    }

    pub fn set_placement(&mut self, placement: Placement) -> Command<Message> {
        self.popup.set_placement(placement);
        self.request_reposition()
    }

    pub fn set_distance(&mut self, distance: u16) -> Command<Message> {
        self.popup.set_distance(distance);
        self.request_reposition()
    }

    pub fn set_skidding(&mut self, skidding: i16) -> Command<Message> {
        self.popup.set_skidding(skidding);
        self.request_reposition()
    }

    pub fn set_hoist(&mut self, hoist: bool) -> Command<Message> {
        self.popup.set_hoist(hoist);
        self.request_reposition()
    }

    /// Handle a key press on the anchor. Returns `Some` when the tooltip
    /// consumed the key and it must not propagate further.
    pub fn on_key(&mut self, key: KeyEvent) -> Option<Command<Message>> {
        if key.code == KeyCode::Esc && self.open && self.target_focused {
            return Some(self.hide().0);
        }
        None
    }

    /// Recompute the body placement against the last rendered anchor.
    pub fn reposition(&mut self) -> Option<Placed> {
        let size = body_size(&self.lines());
        self.popup.reposition(size)
    }

    fn request_reposition(&self) -> Command<Message> {
        if self.rendered.get() {
            Command::message(Message::Reposition)
        } else {
            Command::none()
        }
    }

    fn pointer_over(&mut self) -> Command<Message> {
        if !self.trigger.contains(Trigger::HOVER) {
            return Command::none();
        }
        self.hover
            .schedule(HoverAction::Show, self.style.show_delay, Message::HoverElapsed)
    }

    fn pointer_out(&mut self) -> Command<Message> {
        if !self.trigger.contains(Trigger::HOVER) {
            return Command::none();
        }
        self.hover
            .schedule(HoverAction::Hide, self.style.hide_delay, Message::HoverElapsed)
    }

    fn click(&mut self) -> Command<Message> {
        if !self.trigger.contains(Trigger::CLICK) {
            return Command::none();
        }
        if self.open {
            self.hide().0
        } else {
            self.show().0
        }
    }

    fn focus(&mut self) -> Command<Message> {
        self.target_focused = true;
        if self.trigger.contains(Trigger::FOCUS) {
            self.show().0
        } else {
            Command::none()
        }
    }

    fn blur(&mut self) -> Command<Message> {
        self.target_focused = false;
        if self.trigger.contains(Trigger::FOCUS) {
            self.hide().0
        } else {
            Command::none()
        }
    }

    fn on_mouse(&mut self, event: MouseEvent) -> Command<Message> {
        let Some(anchor) = self.popup.anchor() else {
            return Command::none();
        };
        let inside = anchor.contains(Position::new(event.column, event.row));
        match event.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) if inside != self.pointer_inside => {
                self.pointer_inside = inside;
                if inside {
                    self.pointer_over()
                } else {
                    self.pointer_out()
                }
            }
            MouseEventKind::Down(MouseButton::Left) if inside => self.click(),
            _ => Command::none(),
        }
    }

    /// Jump straight to the state `open` implies, with no animation or events.
    fn apply_settled(&mut self) {
        self.generation += 1;
        self.body_hidden = !self.open;
        self.popup.set_active(self.open);
        self.set_phase(if self.open { Phase::Open } else { Phase::Closed });
    }

    fn set_phase(&mut self, phase: Phase) {
        tracing::trace!(element = %self.target, from = ?self.phase, to = ?phase, "tooltip phase");
        self.phase = phase;
        self.phase_tx.send_replace(phase);
    }

    fn handle_open_change(&mut self) -> Command<Message> {
        if self.open && self.disabled {
            // open stays true: the property and the visible state diverge
            tracing::debug!(element = %self.target, "tooltip disabled, not opening");
            return Command::none();
        }
        self.generation += 1;
        let generation = self.generation;
        let stop = self.animator.stop_animations(self.popup.surface());

        if self.open {
            self.set_phase(Phase::Opening);
            Command::batch([
                Command::message(Message::Event(TooltipEvent::ShowBegun)),
                Command::perform(stop, move |()| Message::AnimationsStopped(generation)),
            ])
        } else {
            self.set_phase(Phase::Closing);
            Command::batch([
                Command::message(Message::Event(TooltipEvent::HideBegun)),
                Command::perform(stop, move |()| Message::AnimationsStopped(generation)),
            ])
        }
    }

    fn animations_stopped(&mut self, generation: u64) -> Command<Message> {
        if generation != self.generation {
            tracing::trace!(generation, current = self.generation, "stale tooltip transition");
            return Command::none();
        }
        let dir = self.localize.dir();
        let surface = self.popup.surface();
        let animation = match self.phase {
            Phase::Opening => {
                self.body_hidden = false;
                self.popup.set_active(true);
                self.reposition();
                self.animations.get_animation(TOOLTIP_SHOW, dir)
            }
            Phase::Closing => self.animations.get_animation(TOOLTIP_HIDE, dir),
            Phase::Open | Phase::Closed => return Command::none(),
        };
        Command::perform(self.animator.animate_to(surface, animation), move |()| {
            Message::AnimationFinished(generation)
        })
    }

    fn animation_finished(&mut self, generation: u64) -> Command<Message> {
        if generation != self.generation {
            return Command::none();
        }
        match self.phase {
            Phase::Opening => {
                self.set_phase(Phase::Open);
                Command::message(Message::Event(TooltipEvent::Shown))
            }
            Phase::Closing => {
                self.popup.set_active(false);
                self.body_hidden = true;
                self.set_phase(Phase::Closed);
                Command::message(Message::Event(TooltipEvent::Hidden))
            }
            Phase::Open | Phase::Closed => Command::none(),
        }
    }

    fn lines(&self) -> Vec<String> {
        let inner = usize::from(self.style.max_width.saturating_sub(4)).max(1);
        wrap_text(&self.content, inner)
    }
}

impl Component for Tooltip {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Show => self.show().0,
            Message::Hide => self.hide().0,
            Message::PointerOver => self.pointer_over(),
            Message::PointerOut => self.pointer_out(),
            Message::Click => self.click(),
            Message::Focus => self.focus(),
            Message::Blur => self.blur(),
            Message::Key(key) => self.on_key(key).unwrap_or_else(Command::none),
            Message::Mouse(event) => self.on_mouse(event),
            Message::HoverElapsed(token) => match self.hover.fire(token) {
                Some(HoverAction::Show) => self.show().0,
                Some(HoverAction::Hide) => self.hide().0,
                None => Command::none(),
            },
            Message::AnimationsStopped(generation) => self.animations_stopped(generation),
            Message::AnimationFinished(generation) => self.animation_finished(generation),
            Message::Reposition => {
                self.reposition();
                Command::none()
            }
            Message::Event(_) => Command::none(),
        }
    }

    /// `area` is the anchor's area.
    fn view(&self, frame: &mut Frame, area: Rect) {
        self.popup.track(area, frame.area());
        self.rendered.set(true);
        if self.body_hidden {
            return;
        }

        let lines = self.lines();
        let placed = self.popup.compute(area, body_size(&lines));
        if placed.rect.is_empty() {
            return;
        }
        let block = Block::bordered()
            .border_style(self.style.border)
            .padding(Padding::horizontal(1))
            .style(self.style.body);
        let inner = render_surface(frame, placed.rect, &block);
        let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
        frame.render_widget(Paragraph::new(text).style(self.style.body), inner);
    }

    fn focused(&self) -> bool {
        self.target_focused
    }
}

fn body_size(lines: &[String]) -> Size {
    let widest = lines.iter().map(|line| line.width()).max().unwrap_or(0);
    let width = u16::try_from(widest).unwrap_or(u16::MAX).saturating_add(4);
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    Size::new(width, height)
}

/// Greedy word wrap by display width. Words wider than `width` are broken.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;
        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            if line_width > 0 && line_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if word_width > width {
                for ch in word.chars() {
                    let ch_width = ch.width().unwrap_or(0);
                    if line_width > 0 && line_width + ch_width > width {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0;
                    }
                    line.push(ch);
                    line_width += ch_width;
                }
                continue;
            }
            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += word_width;
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Mutex;
    use trellis_core::testing::TestComponent;
    use trellis_core::Driver;

    const ANCHOR: Rect = Rect::new(10, 6, 6, 1);

    fn tooltip() -> Tooltip {
        Tooltip::new("Hi", [Child::element(ElementId::new())]).expect("has an element child")
    }

    fn render(tooltip: &Tooltip) -> String {
        let mut terminal = Terminal::new(TestBackend::new(30, 10)).expect("test backend");
        terminal
            .draw(|frame| tooltip.view(frame, ANCHOR))
            .expect("test backend");
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn recording_driver(tooltip: Tooltip) -> (Driver<Tooltip>, Arc<Mutex<Vec<TooltipEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let driver = Driver::new(tooltip).with_inspector(move |msg| {
            if let Message::Event(event) = msg {
                sink.lock().unwrap().push(*event);
            }
        });
        (driver, events)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn trigger_parsing() {
        assert_eq!(Trigger::parse("hover focus"), Trigger::default());
        assert_eq!(Trigger::parse(" click  manual "), Trigger::CLICK | Trigger::MANUAL);
        assert_eq!(Trigger::parse("hover wiggle"), Trigger::HOVER);
        assert_eq!(Trigger::parse(""), Trigger::empty());
    }

    #[test]
    fn anchor_skips_style_and_content_slot() {
        let anchor = ElementId::new();
        let tooltip = Tooltip::new(
            "tip",
            [
                Child::style(),
                Child::element(ElementId::new()).in_slot("content"),
                Child::element(anchor),
            ],
        )
        .expect("anchor present");
        assert_eq!(tooltip.target(), anchor);
    }

    #[test]
    fn no_anchor_is_invalid_target() {
        let result = Tooltip::new("tip", [Child::style()]);
        assert!(matches!(result, Err(TooltipError::InvalidTarget)));
    }

    #[test]
    fn style_properties() {
        let style = TooltipStyle::from_properties([
            ("--show-delay", "0.3s"),
            ("--hide-delay", "20ms"),
            ("--max-width", "24"),
            ("color", "red"),
        ])
        .expect("valid properties");
        assert_eq!(style.show_delay, Duration::from_millis(300));
        assert_eq!(style.hide_delay, Duration::from_millis(20));
        assert_eq!(style.max_width, 24);

        assert!(matches!(
            TooltipStyle::from_properties([("--max-width", "wide")]),
            Err(TooltipError::InvalidProperty { .. })
        ));
        assert!(matches!(
            TooltipStyle::from_properties([("--show-delay", "later")]),
            Err(TooltipError::Duration(_))
        ));
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap_text("save the file now", 8), vec!["save the", "file now"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("one\ntwo", 10), vec!["one", "two"]);
    }

    #[test]
    fn open_before_first_render_applies_directly() {
        let mut harness = TestComponent::new(tooltip());
        harness.send(Message::Show);
        assert!(harness.pending().is_empty());
        assert!(harness.component().is_open());
        assert_eq!(harness.component().phase(), Phase::Open);
        assert!(!harness.component().is_body_hidden());
    }

    #[test]
    fn renders_body_above_anchor() {
        let tooltip = tooltip().with_open(true);
        let screen = render(&tooltip);
        let rows: Vec<&str> = screen.lines().collect();
        // body is 6 wide and 3 tall, one row clear of the anchor
        assert!(rows[2].starts_with("          ┌────┐"));
        assert!(rows[3].contains("│ Hi │"));
        assert!(rows[4].contains("└────┘"));
        assert!(rows[5].trim().is_empty());
        assert_eq!(
            tooltip.popup().anchor(),
            Some(ANCHOR),
            "view records the anchor"
        );
    }

    #[test]
    fn hidden_body_renders_nothing() {
        let screen = render(&tooltip());
        assert!(!screen.contains("Hi"));
    }

    fn pointer_messages() -> Vec<Message> {
        let moved = |column, row| {
            Message::Mouse(MouseEvent {
                kind: MouseEventKind::Moved,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };
        vec![
            Message::PointerOver,
            Message::PointerOut,
            moved(ANCHOR.x + 1, ANCHOR.y),
            moved(0, 0),
        ]
    }

    #[test]
    fn hover_ignored_without_hover_trigger() {
        let triggers = [
            Trigger::CLICK,
            Trigger::FOCUS,
            Trigger::MANUAL,
            Trigger::CLICK | Trigger::FOCUS,
        ];
        for trigger in triggers {
            for open in [false, true] {
                let mut tooltip = tooltip().with_trigger(trigger).with_open(open);
                render(&tooltip);
                let phase = tooltip.phase();
                for msg in pointer_messages() {
                    assert!(tooltip.update(msg).is_none(), "{trigger:?} open={open}");
                    assert_eq!(tooltip.is_open(), open);
                    assert_eq!(tooltip.phase(), phase);
                }
            }
        }

        let mut hover = tooltip();
        assert!(!hover.update(Message::PointerOver).is_none());
    }

    #[test]
    fn escape_hides_only_when_focused() {
        let mut tooltip = tooltip().with_open(true).with_trigger(Trigger::MANUAL);
        assert!(tooltip.on_key(key(KeyCode::Esc)).is_none());
        let _ = tooltip.update(Message::Focus);
        assert!(tooltip.on_key(key(KeyCode::Enter)).is_none());
        assert!(tooltip.on_key(key(KeyCode::Esc)).is_some());
        assert!(!tooltip.is_open());
    }

    #[test]
    fn disabled_tooltip_does_not_open() {
        let mut tooltip = tooltip().with_disabled(true);
        render(&tooltip);
        let cmd = tooltip.set_open(true);
        assert!(cmd.is_none());
        assert!(tooltip.is_open());
        assert_eq!(tooltip.phase(), Phase::Closed);
        assert!(tooltip.is_body_hidden());
    }

    #[test]
    fn setters_request_reposition_once_rendered() {
        let mut tooltip = tooltip();
        assert!(tooltip.set_placement(Placement::Bottom).is_none());
        render(&tooltip);
        assert!(!tooltip.set_content("longer text").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn click_trigger_emits_show_events_in_order() {
        let tooltip = tooltip().with_trigger(Trigger::CLICK);
        render(&tooltip);
        let (mut driver, events) = recording_driver(tooltip);

        driver.dispatch(Message::Click);
        driver.run_until(|t| t.phase() == Phase::Open).await;
        driver.drain();

        assert!(driver.component().is_open());
        assert!(!driver.component().is_body_hidden());
        assert!(driver.component().placed().is_some());
        assert_eq!(
            *events.lock().unwrap(),
            vec![TooltipEvent::ShowBegun, TooltipEvent::Shown]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn double_show_emits_shown_once() {
        let tooltip = tooltip();
        render(&tooltip);
        let (mut driver, events) = recording_driver(tooltip);

        let (first, settled) = driver.component_mut().show();
        driver.execute(first);
        let (second, again) = driver.component_mut().show();
        assert!(second.is_none());
        again.await;
        driver.run_until_settled(settled).await;

        let shown = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| **e == TooltipEvent::Shown)
            .count();
        assert_eq!(shown, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_open_tooltip_hides_it() {
        let tooltip = tooltip();
        render(&tooltip);
        let (mut driver, events) = recording_driver(tooltip);
        let (cmd, settled) = driver.component_mut().show();
        driver.execute(cmd);
        driver.run_until_settled(settled).await;

        let cmd = driver.component_mut().set_disabled(true);
        driver.execute(cmd);
        driver.run_until(|t| t.phase() == Phase::Closed).await;
        driver.drain();

        assert!(!driver.component().is_open());
        assert!(driver.component().is_body_hidden());
        assert_eq!(events.lock().unwrap().last(), Some(&TooltipEvent::Hidden));
    }

    #[tokio::test(start_paused = true)]
    async fn hide_during_show_wins() {
        let tooltip = tooltip();
        render(&tooltip);
        let (mut driver, events) = recording_driver(tooltip);
        let (cmd, _) = driver.component_mut().show();
        driver.execute(cmd);
        let (cmd, settled) = driver.component_mut().hide();
        driver.execute(cmd);
        driver.run_until_settled(settled).await;

        assert_eq!(driver.component().phase(), Phase::Closed);
        let events = events.lock().unwrap();
        assert!(!events.contains(&TooltipEvent::Shown));
        assert_eq!(events.last(), Some(&TooltipEvent::Hidden));
    }

    #[tokio::test(start_paused = true)]
    async fn hover_out_before_delay_cancels_show() {
        let tooltip = tooltip();
        render(&tooltip);
        let (mut driver, events) = recording_driver(tooltip);

        driver.dispatch(Message::PointerOver);
        tokio::time::advance(Duration::from_millis(50)).await;
        driver.dispatch(Message::PointerOut);
        driver
            .run_until_settled(tokio::time::sleep(Duration::from_millis(300)))
            .await;

        assert!(!driver.component().is_open());
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn pointer_leaving_keeps_focus_tooltip_open() {
        let tooltip = tooltip().with_trigger(Trigger::FOCUS).with_open(true);
        render(&tooltip);
        let (mut driver, events) = recording_driver(tooltip);

        for msg in pointer_messages() {
            driver.dispatch(msg);
        }
        driver
            .run_until_settled(tokio::time::sleep(Duration::from_secs(1)))
            .await;

        assert!(driver.component().is_open());
        assert_eq!(driver.component().phase(), Phase::Open);
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn mouse_over_anchor_opens_after_delay() {
        let tooltip = tooltip().with_animation(TOOLTIP_SHOW, Animation::none());
        render(&tooltip);
        let (mut driver, events) = recording_driver(tooltip);

        driver.dispatch(Message::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: ANCHOR.x + 1,
            row: ANCHOR.y,
            modifiers: KeyModifiers::NONE,
        }));
        driver.run_until(|t| t.phase() == Phase::Open).await;
        driver.drain();

        assert_eq!(
            *events.lock().unwrap(),
            vec![TooltipEvent::ShowBegun, TooltipEvent::Shown]
        );
    }
}
