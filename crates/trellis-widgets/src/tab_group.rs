//! Tab group: a strip of tabs that switches between panels.
//!
//! The group owns its [`Tab`]s and [`TabPanel`]s and keeps exactly one tab and
//! its panel active. It draws the navigation strip (labels, the sliding active
//! indicator, scroll buttons when the strip overflows) and leaves the panel
//! area to the parent: render the [`active_panel`](TabGroup::active_panel)'s
//! content into [`panel_area`](TabGroup::panel_area).
//!
//! Editing the tabs or panels after construction goes through methods such as
//! [`push_tab`](TabGroup::push_tab). While attached to a host, each edit is
//! recorded and the records are processed together on the next turn, which is
//! when the cached tab lists catch up.
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis_widgets::tab::{Tab, TabPanel};
//! use trellis_widgets::tab_group::{TabGroup, TabGroupHost};
//!
//! let mut group = TabGroup::new()
//!     .with_tab(Tab::new("general", "General").with_active(true))
//!     .with_tab(Tab::new("advanced", "Advanced"))
//!     .with_panel(TabPanel::new("general"))
//!     .with_panel(TabPanel::new("advanced"));
//! let host = TabGroupHost::new(Size::new(80, 2), true);
//! driver.execute(group.attach(host.clone()));
//! ```

use crate::indicator::Indicator;
use crate::nav_scroll::{NavScroll, ScrollBehavior};
use crate::tab::{Tab, TabPanel};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::Frame;
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use trellis_core::{
    subscribe, Command, Component, Every, ElementId, IntersectionObserver, Locale, Localize,
    ResizeObserver, Signal, Subscription, FRAME,
};
use unicode_width::UnicodeWidthChar;

const SCROLL_BUTTON_WIDTH: u16 = 2;

/// Which edge of the group the navigation strip sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabPlacement {
    #[default]
    Top,
    Bottom,
    /// The inline-start edge: left, or right in right-to-left layouts.
    Start,
    /// The inline-end edge.
    End,
}

impl TabPlacement {
    pub fn axis(self) -> Axis {
        match self {
            TabPlacement::Top | TabPlacement::Bottom => Axis::Horizontal,
            TabPlacement::Start | TabPlacement::End => Axis::Vertical,
        }
    }
}

impl fmt::Display for TabPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TabPlacement::Top => "top",
            TabPlacement::Bottom => "bottom",
            TabPlacement::Start => "start",
            TabPlacement::End => "end",
        })
    }
}

/// Error returned when parsing an unknown tab placement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tab placement: {0:?}")]
pub struct ParseTabPlacementError(pub String);

impl FromStr for TabPlacement {
    type Err = ParseTabPlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top" => Ok(TabPlacement::Top),
            "bottom" => Ok(TabPlacement::Bottom),
            "start" => Ok(TabPlacement::Start),
            "end" => Ok(TabPlacement::End),
            other => Err(ParseTabPlacementError(other.to_string())),
        }
    }
}

/// Direction the tabs run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Whether moving keyboard focus also activates the tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// Arrow keys activate the tab they move to.
    #[default]
    Auto,
    /// Arrow keys only move focus; Enter or Space activates.
    Manual,
}

/// Options for [`TabGroup::set_active_tab`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivateOptions {
    /// Emit `TabHidden`/`TabShown` for the change.
    pub emit_events: bool,
    /// How to scroll the new tab into view.
    pub scroll_behavior: ScrollBehavior,
}

impl Default for ActivateOptions {
    fn default() -> Self {
        Self {
            emit_events: true,
            scroll_behavior: ScrollBehavior::Auto,
        }
    }
}

/// Notifications the group emits to its parent, carrying panel names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabGroupEvent {
    TabShown { name: String },
    TabHidden { name: String },
    /// A tab's close button was pressed. The group does not remove the tab.
    CloseRequested { name: String },
}

/// What the embedding application reports about the group's placement.
///
/// `nav_size` is the size of the navigation strip's box; `visible` turns true
/// once the group is on screen.
#[derive(Debug, Clone)]
pub struct TabGroupHost {
    pub nav_size: Signal<Size>,
    pub visible: Signal<bool>,
}

impl TabGroupHost {
    pub fn new(nav_size: Size, visible: bool) -> Self {
        Self {
            nav_size: Signal::new(nav_size),
            visible: Signal::new(visible),
        }
    }
}

/// Visual style for [`TabGroup`].
#[derive(Debug, Clone)]
pub struct TabGroupStyle {
    pub tab: Style,
    pub active: Style,
    pub focused: Style,
    pub disabled: Style,
    pub track: Style,
    pub indicator: Style,
    pub scroll_button: Style,
    pub scroll_button_disabled: Style,
}

impl Default for TabGroupStyle {
    fn default() -> Self {
        Self {
            tab: Style::default().fg(Color::Gray),
            active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            focused: Style::default().add_modifier(Modifier::UNDERLINED),
            disabled: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
            track: Style::default().fg(Color::DarkGray),
            indicator: Style::default().fg(Color::Cyan),
            scroll_button: Style::default().fg(Color::Gray),
            scroll_button_disabled: Style::default().fg(Color::DarkGray),
        }
    }
}

/// Messages for [`TabGroup`].
#[derive(Debug, Clone)]
pub enum Message {
    /// A tab was clicked.
    Click { target: ElementId },
    /// A tab's close button was pressed.
    Close { target: ElementId },
    /// A key press while `target` has focus.
    Key { target: ElementId, key: KeyEvent },
    /// Focus moved onto `target`.
    Focus { target: ElementId },
    /// Focus left the group.
    Blur,
    /// A raw mouse event, hit-tested against the rendered strip.
    Mouse(MouseEvent),
    ScrollToStart,
    ScrollToEnd,
    /// The navigation strip's box changed size.
    Resized(Size),
    /// The group became visible for the first time.
    Intersected,
    #[doc(hidden)]
    FlushMutations,
    #[doc(hidden)]
    SetAriaLabels,
    #[doc(hidden)]
    RestoreTransition,
    #[doc(hidden)]
    Frame,
    /// Outward notification for the parent.
    Event(TabGroupEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Active,
    Disabled,
    AriaControls,
    AriaLabelledBy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationKind {
    ChildList,
    Attribute(Attribute),
}

#[derive(Debug, Clone, Copy)]
struct Mutation {
    target: ElementId,
    kind: MutationKind,
}

impl Mutation {
    fn child_list(target: ElementId) -> Self {
        Self {
            target,
            kind: MutationKind::ChildList,
        }
    }

    fn attribute(target: ElementId, attribute: Attribute) -> Self {
        Self {
            target,
            kind: MutationKind::Attribute(attribute),
        }
    }

    fn is_aria(&self) -> bool {
        matches!(
            self.kind,
            MutationKind::Attribute(Attribute::AriaControls | Attribute::AriaLabelledBy)
        )
    }
}

#[derive(Debug, Clone)]
struct ActiveTab {
    id: ElementId,
    panel: String,
}

/// A tab on screen: its visible cells and how many leading text columns
/// were scrolled off.
#[derive(Debug, Clone, Copy)]
struct TabSlot {
    id: ElementId,
    rect: Rect,
    skip: u16,
    close: Option<Rect>,
}

#[derive(Debug, Default)]
struct NavLayout {
    tabs: Vec<TabSlot>,
    start_button: Option<Rect>,
    end_button: Option<Rect>,
    track: Option<Rect>,
    indicator: Option<Rect>,
}

/// Maps logical strip offsets to columns.
struct Strip {
    x: u16,
    width: u16,
    offset: u16,
    rtl: bool,
}

impl Strip {
    /// The visible part of `[start, start + len)` as `(x, width, skip)`.
    fn map(&self, start: i32, len: u16) -> Option<(u16, u16, u16)> {
        let scroll = i32::from(self.offset);
        let viewport = i32::from(self.width);
        let end = start + i32::from(len);
        let visible_start = start.max(scroll);
        let visible_end = end.min(scroll + viewport);
        if visible_start >= visible_end {
            return None;
        }
        let (x, skip) = if self.rtl {
            (viewport - (visible_end - scroll), end - visible_end)
        } else {
            (visible_start - scroll, visible_start - start)
        };
        let to_u16 = |v: i32| u16::try_from(v).unwrap_or(0);
        Some((
            self.x + to_u16(x),
            to_u16(visible_end - visible_start),
            to_u16(skip),
        ))
    }
}

/// A tab group.
pub struct TabGroup {
    id: ElementId,
    nav: Vec<Tab>,
    body: Vec<TabPanel>,
    tabs: Vec<ElementId>,
    focusable: Vec<ElementId>,
    panels: Vec<ElementId>,
    active: Option<ActiveTab>,
    focused: Option<ElementId>,
    placement: TabPlacement,
    activation: Activation,
    no_scroll_controls: bool,
    has_scroll_controls: bool,
    container: Size,
    indicator: Indicator,
    scroll: NavScroll,
    host: Option<TabGroupHost>,
    initialized: bool,
    mutations: Vec<Mutation>,
    localize: Arc<dyn Localize>,
    style: TabGroupStyle,
    nav_rect: Cell<Rect>,
}

impl TabGroup {
    pub fn new() -> Self {
        Self {
            id: ElementId::new(),
            nav: Vec::new(),
            body: Vec::new(),
            tabs: Vec::new(),
            focusable: Vec::new(),
            panels: Vec::new(),
            active: None,
            focused: None,
            placement: TabPlacement::Top,
            activation: Activation::Auto,
            no_scroll_controls: false,
            has_scroll_controls: false,
            container: Size::default(),
            indicator: Indicator::new(),
            scroll: NavScroll::default(),
            host: None,
            initialized: false,
            mutations: Vec::new(),
            localize: Arc::new(Locale::new()),
            style: TabGroupStyle::default(),
            nav_rect: Cell::new(Rect::default()),
        }
    }

    pub fn with_tab(mut self, tab: Tab) -> Self {
        self.nav.push(tab);
        self
    }

    pub fn with_panel(mut self, panel: TabPanel) -> Self {
        self.body.push(panel);
        self
    }

    pub fn with_placement(mut self, placement: TabPlacement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Never show scroll buttons, even when the strip overflows.
    pub fn with_no_scroll_controls(mut self, no_scroll_controls: bool) -> Self {
        self.no_scroll_controls = no_scroll_controls;
        self
    }

    pub fn with_localize(mut self, localize: Arc<dyn Localize>) -> Self {
        self.localize = localize;
        self
    }

    pub fn with_style(mut self, style: TabGroupStyle) -> Self {
        self.style = style;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Every tab, in order, including disabled ones.
    pub fn all_tabs(&self) -> impl Iterator<Item = &Tab> {
        self.nav.iter()
    }

    pub fn all_panels(&self) -> impl Iterator<Item = &TabPanel> {
        self.body.iter()
    }

    pub fn tab(&self, id: ElementId) -> Option<&Tab> {
        self.nav.iter().find(|tab| tab.id == id)
    }

    pub fn panel(&self, id: ElementId) -> Option<&TabPanel> {
        self.body.iter().find(|panel| panel.id == id)
    }

    /// The tab controlling the panel named `name`.
    pub fn tab_for_panel(&self, name: &str) -> Option<&Tab> {
        self.nav.iter().find(|tab| tab.panel == name)
    }

    /// The tab the group last activated.
    pub fn active_tab(&self) -> Option<ElementId> {
        self.active.as_ref().map(|active| active.id)
    }

    /// The panel currently marked active.
    pub fn active_panel(&self) -> Option<&TabPanel> {
        self.body.iter().find(|panel| panel.active)
    }

    pub fn focused_tab(&self) -> Option<ElementId> {
        self.focused
    }

    pub fn placement(&self) -> TabPlacement {
        self.placement
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    pub fn scroll(&self) -> &NavScroll {
        &self.scroll
    }

    pub fn has_scroll_controls(&self) -> bool {
        self.has_scroll_controls
    }

    pub fn is_attached(&self) -> bool {
        self.host.is_some()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Accessible names of the start and end scroll buttons.
    pub fn scroll_button_labels(&self) -> (String, String) {
        (
            self.localize.term("scrollToStart"),
            self.localize.term("scrollToEnd"),
        )
    }

    /// Accessible name of a tab's close button.
    pub fn close_button_label(&self) -> String {
        self.localize.term("close")
    }

    pub fn set_placement(&mut self, placement: TabPlacement) {
        self.placement = placement;
        self.sync_indicator();
        self.update_scroll_controls();
    }

    pub fn set_activation(&mut self, activation: Activation) {
        self.activation = activation;
    }

    pub fn set_no_scroll_controls(&mut self, no_scroll_controls: bool) {
        self.no_scroll_controls = no_scroll_controls;
        self.update_scroll_controls();
    }

    /// Connect to a host. Observers start with the next subscription pass.
    pub fn attach(&mut self, host: TabGroupHost) -> Command<Message> {
        self.container = host.nav_size.get();
        self.host = Some(host);
        self.sync_tabs_and_panels();
        Command::none()
    }

    /// Disconnect from the host, dropping every observer and unprocessed
    /// edit record.
    pub fn detach(&mut self) -> Command<Message> {
        self.host = None;
        self.initialized = false;
        self.mutations.clear();
        Command::none()
    }

    /// Activate the tab whose panel is named `panel`, scrolling smoothly.
    pub fn show(&mut self, panel: &str) -> Command<Message> {
        let Some(tab) = self
            .tabs
            .iter()
            .copied()
            .find(|id| self.tab(*id).is_some_and(|tab| tab.panel == panel))
        else {
            tracing::trace!(panel, "no tab for panel");
            return Command::none();
        };
        self.set_active_tab(
            tab,
            ActivateOptions {
                scroll_behavior: ScrollBehavior::Smooth,
                ..ActivateOptions::default()
            },
        )
    }

    /// Make `tab` the active tab. Does nothing for the current or a disabled
    /// tab.
    pub fn set_active_tab(&mut self, tab: ElementId, options: ActivateOptions) -> Command<Message> {
        let Some(candidate) = self.tab(tab) else {
            return Command::none();
        };
        if self.active_tab() == Some(tab) || candidate.disabled {
            return Command::none();
        }
        let panel_name = candidate.panel.clone();
        let previous = self.active.replace(ActiveTab {
            id: tab,
            panel: panel_name.clone(),
        });

        let tabs = &self.tabs;
        for t in self.nav.iter_mut().filter(|t| tabs.contains(&t.id)) {
            t.active = t.id == tab;
        }
        let panels = &self.panels;
        for p in self.body.iter_mut().filter(|p| panels.contains(&p.id)) {
            p.active = p.name == panel_name;
        }

        self.sync_indicator();
        if self.placement.axis() == Axis::Horizontal {
            self.scroll_tab_into_view(tab, options.scroll_behavior);
        }
        tracing::debug!(group = %self.id, panel = %panel_name, "tab activated");

        if !options.emit_events {
            return Command::none();
        }
        let hidden = previous.map(|previous| {
            Command::message(Message::Event(TabGroupEvent::TabHidden {
                name: previous.panel,
            }))
        });
        Command::batch(hidden.into_iter().chain([Command::message(Message::Event(
            TabGroupEvent::TabShown { name: panel_name },
        ))]))
    }

    /// Rebuild the cached tab and panel lists from the current content.
    pub fn sync_tabs_and_panels(&mut self) {
        self.tabs = self.nav.iter().map(|tab| tab.id).collect();
        self.focusable = self
            .nav
            .iter()
            .filter(|tab| !tab.disabled)
            .map(|tab| tab.id)
            .collect();
        self.panels = self.body.iter().map(|panel| panel.id).collect();
        if self.focused.is_some_and(|id| !self.tabs.contains(&id)) {
            self.focused = None;
        }
        self.sync_indicator();
        self.update_scroll_controls();
        tracing::debug!(
            group = %self.id,
            tabs = self.tabs.len(),
            focusable = self.focusable.len(),
            panels = self.panels.len(),
            "synced tabs and panels"
        );
    }

    /// Append a tab.
    pub fn push_tab(&mut self, tab: Tab) -> Command<Message> {
        let id = tab.id;
        self.nav.push(tab);
        self.record(Mutation::child_list(id))
    }

    /// Insert a tab at `index`, clamped to the end.
    pub fn insert_tab(&mut self, index: usize, tab: Tab) -> Command<Message> {
        let id = tab.id;
        self.nav.insert(index.min(self.nav.len()), tab);
        self.record(Mutation::child_list(id))
    }

    pub fn remove_tab(&mut self, id: ElementId) -> Command<Message> {
        let before = self.nav.len();
        self.nav.retain(|tab| tab.id != id);
        if self.nav.len() == before {
            return Command::none();
        }
        self.record(Mutation::child_list(id))
    }

    pub fn push_panel(&mut self, panel: TabPanel) -> Command<Message> {
        let id = panel.id;
        self.body.push(panel);
        self.record(Mutation::child_list(id))
    }

    pub fn remove_panel(&mut self, id: ElementId) -> Command<Message> {
        let before = self.body.len();
        self.body.retain(|panel| panel.id != id);
        if self.body.len() == before {
            return Command::none();
        }
        self.record(Mutation::child_list(id))
    }

    pub fn set_tab_disabled(&mut self, id: ElementId, disabled: bool) -> Command<Message> {
        let Some(tab) = self.nav.iter_mut().find(|tab| tab.id == id) else {
            return Command::none();
        };
        tab.disabled = disabled;
        self.record(Mutation::attribute(id, Attribute::Disabled))
    }

    /// Mark a tab active from outside. The group follows on the next turn.
    pub fn set_tab_active(&mut self, id: ElementId, active: bool) -> Command<Message> {
        let Some(tab) = self.nav.iter_mut().find(|tab| tab.id == id) else {
            return Command::none();
        };
        tab.active = active;
        self.record(Mutation::attribute(id, Attribute::Active))
    }

    /// Handle a key press on `target`. Returns `Some` when the key was
    /// consumed and must not propagate.
    pub fn handle_key(&mut self, target: ElementId, key: KeyEvent) -> Option<Command<Message>> {
        if !self.tabs.contains(&target) {
            tracing::trace!(group = %self.id, element = %target, "key from outside the group");
            return None;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(self.set_active_tab(
                target,
                ActivateOptions {
                    scroll_behavior: ScrollBehavior::Smooth,
                    ..ActivateOptions::default()
                },
            )),
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Home
            | KeyCode::End => self.move_focus(target, key.code),
            _ => None,
        }
    }

    /// Where the navigation strip goes inside `area`.
    pub fn nav_area(&self, area: Rect) -> Rect {
        self.split(area).0
    }

    /// Where the active panel goes inside `area`.
    pub fn panel_area(&self, area: Rect) -> Rect {
        self.split(area).1
    }

    fn move_focus(&mut self, from: ElementId, code: KeyCode) -> Option<Command<Message>> {
        self.focusable = self
            .nav
            .iter()
            .filter(|tab| self.tabs.contains(&tab.id) && !tab.disabled)
            .map(|tab| tab.id)
            .collect();
        let len = self.focusable.len();
        if len == 0 {
            return None;
        }
        let horizontal = self.placement.axis() == Axis::Horizontal;
        let (previous_key, next_key) = if self.localize.dir().is_rtl() {
            (KeyCode::Right, KeyCode::Left)
        } else {
            (KeyCode::Left, KeyCode::Right)
        };

        let last = len as isize - 1;
        let current = self
            .focusable
            .iter()
            .position(|id| *id == from)
            .map_or(-1, |index| index as isize);
        let index = match code {
            KeyCode::Home => 0,
            KeyCode::End => last,
            code if (horizontal && code == previous_key) || (!horizontal && code == KeyCode::Up) => {
                current - 1
            }
            code if (horizontal && code == next_key) || (!horizontal && code == KeyCode::Down) => {
                current + 1
            }
            _ => current,
        };
        let index = if index < 0 {
            last
        } else if index > last {
            0
        } else {
            index
        };

        let next = self.focusable[index as usize];
        self.focused = Some(next);
        let cmd = match self.activation {
            Activation::Auto => self.set_active_tab(
                next,
                ActivateOptions {
                    scroll_behavior: ScrollBehavior::Smooth,
                    ..ActivateOptions::default()
                },
            ),
            Activation::Manual => Command::none(),
        };
        if horizontal {
            self.scroll_tab_into_view(next, ScrollBehavior::Smooth);
        }
        Some(cmd)
    }

    fn click(&mut self, target: ElementId) -> Command<Message> {
        let disabled = match self.tab(target) {
            Some(tab) if self.tabs.contains(&target) => tab.disabled,
            _ => {
                tracing::trace!(group = %self.id, element = %target, "click from outside the group");
                return Command::none();
            }
        };
        if !disabled {
            self.focused = Some(target);
        }
        self.set_active_tab(
            target,
            ActivateOptions {
                scroll_behavior: ScrollBehavior::Smooth,
                ..ActivateOptions::default()
            },
        )
    }

    fn close(&mut self, target: ElementId) -> Command<Message> {
        match self.tab(target) {
            Some(tab) if tab.closable && !tab.disabled && self.tabs.contains(&target) => {
                Command::message(Message::Event(TabGroupEvent::CloseRequested {
                    name: tab.panel.clone(),
                }))
            }
            _ => Command::none(),
        }
    }

    fn on_mouse(&mut self, event: MouseEvent) -> Command<Message> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return Command::none();
        }
        let layout = self.layout(self.nav_rect.get());
        let at = Position::new(event.column, event.row);
        if layout.start_button.is_some_and(|r| r.contains(at)) {
            return self.update(Message::ScrollToStart);
        }
        if layout.end_button.is_some_and(|r| r.contains(at)) {
            return self.update(Message::ScrollToEnd);
        }
        for slot in &layout.tabs {
            if slot.close.is_some_and(|r| r.contains(at)) {
                return self.close(slot.id);
            }
            if slot.rect.contains(at) {
                return self.click(slot.id);
            }
        }
        Command::none()
    }

    fn intersected(&mut self) -> Command<Message> {
        if self.initialized {
            return Command::none();
        }
        self.initialized = true;
        let labels = self.set_aria_labels();
        let target = self.dom_active_tab().or_else(|| self.tabs.first().copied());
        let activate = match target {
            Some(tab) => self.set_active_tab(
                tab,
                ActivateOptions {
                    emit_events: false,
                    ..ActivateOptions::default()
                },
            ),
            None => Command::none(),
        };
        Command::batch([labels, activate])
    }

    fn resized(&mut self, size: Size) -> Command<Message> {
        self.container = size;
        self.indicator.suppress_transitions();
        self.reposition_indicator();
        self.update_scroll_controls();
        Command::tick(FRAME, |_| Message::RestoreTransition)
    }

    fn flush_mutations(&mut self) -> Command<Message> {
        let mutations = std::mem::take(&mut self.mutations);
        if self.host.is_none() || mutations.is_empty() {
            return Command::none();
        }

        let mut cmds = Vec::new();
        if mutations.iter().any(|m| !m.is_aria()) {
            cmds.push(Command::message(Message::SetAriaLabels));
        }
        let structural = mutations.iter().any(|m| {
            matches!(
                m.kind,
                MutationKind::ChildList | MutationKind::Attribute(Attribute::Disabled)
            )
        });
        if structural {
            self.sync_tabs_and_panels();
        } else {
            let newly_active = mutations
                .iter()
                .filter(|m| m.kind == MutationKind::Attribute(Attribute::Active))
                .map(|m| m.target)
                .find(|id| self.tab(*id).is_some_and(|tab| tab.active));
            if let Some(tab) = newly_active {
                cmds.push(self.set_active_tab(tab, ActivateOptions::default()));
            }
        }
        Command::batch(cmds)
    }

    /// Link every tab to its panel both ways.
    fn set_aria_labels(&mut self) -> Command<Message> {
        let mut records = Vec::new();
        let tabs = &self.tabs;
        let panels = &self.panels;
        for tab in self.nav.iter_mut().filter(|t| tabs.contains(&t.id)) {
            let panel = self
                .body
                .iter_mut()
                .find(|p| panels.contains(&p.id) && p.name == tab.panel);
            if let Some(panel) = panel {
                tab.controls = Some(panel.id);
                panel.labelled_by = Some(tab.id);
                records.push(Mutation::attribute(tab.id, Attribute::AriaControls));
                records.push(Mutation::attribute(panel.id, Attribute::AriaLabelledBy));
            }
        }
        let cmds: Vec<_> = records.into_iter().map(|m| self.record(m)).collect();
        Command::batch(cmds)
    }

    fn record(&mut self, mutation: Mutation) -> Command<Message> {
        if self.host.is_none() {
            return Command::none();
        }
        let first = self.mutations.is_empty();
        self.mutations.push(mutation);
        if first {
            Command::message(Message::FlushMutations)
        } else {
            Command::none()
        }
    }

    /// The first cached tab whose own flag says it is active.
    fn dom_active_tab(&self) -> Option<ElementId> {
        self.tabs
            .iter()
            .copied()
            .find(|id| self.tab(*id).is_some_and(|tab| tab.active))
    }

    fn sync_indicator(&mut self) {
        if self.dom_active_tab().is_some() {
            self.reposition_indicator();
            self.indicator.show();
        } else {
            self.indicator.hide();
        }
    }

    fn reposition_indicator(&mut self) {
        let Some(current) = self.dom_active_tab() else {
            return;
        };
        let Some(index) = self.nav.iter().position(|tab| tab.id == current) else {
            return;
        };
        let size = self.nav[index].measure();
        let preceding = &self.nav[..index];
        let axis = self.placement.axis();
        match axis {
            Axis::Horizontal => {
                let offset: i32 = preceding
                    .iter()
                    .map(|tab| i32::from(tab.measure().width))
                    .sum();
                let translate = if self.localize.dir().is_rtl() {
                    -offset
                } else {
                    offset
                };
                self.indicator.set(axis, size.width, translate);
            }
            Axis::Vertical => {
                let offset: i32 = preceding
                    .iter()
                    .map(|tab| i32::from(tab.measure().height))
                    .sum();
                self.indicator.set(axis, size.height, offset);
            }
        }
    }

    fn update_scroll_controls(&mut self) {
        let content = self.content_width();
        self.has_scroll_controls = !self.no_scroll_controls
            && self.placement.axis() == Axis::Horizontal
            && content > self.container.width;
        self.scroll.set_bounds(content, self.nav_width());
    }

    fn content_width(&self) -> u16 {
        self.nav
            .iter()
            .fold(0u16, |sum, tab| sum.saturating_add(tab.measure().width))
    }

    /// Width of the scrollable part of the strip.
    fn nav_width(&self) -> u16 {
        if self.has_scroll_controls {
            self.container
                .width
                .saturating_sub(2 * SCROLL_BUTTON_WIDTH)
        } else {
            self.container.width
        }
    }

    fn tab_start(&self, id: ElementId) -> Option<(u16, u16)> {
        let index = self.nav.iter().position(|tab| tab.id == id)?;
        let start = self.nav[..index]
            .iter()
            .fold(0u16, |sum, tab| sum.saturating_add(tab.measure().width));
        Some((start, self.nav[index].measure().width))
    }

    fn scroll_tab_into_view(&mut self, id: ElementId, behavior: ScrollBehavior) {
        if let Some((start, width)) = self.tab_start(id) {
            let viewport = self.nav_width();
            self.scroll.scroll_into_view(start, width, viewport, behavior);
        }
    }

    fn scroll_by_page(&mut self, forward: bool) -> Command<Message> {
        let page = i32::from(self.nav_width());
        self.scroll.scroll_by(
            if forward { page } else { -page },
            ScrollBehavior::Smooth,
        );
        Command::none()
    }

    fn is_rtl(&self) -> bool {
        self.localize.dir().is_rtl()
    }

    fn nav_on_left(&self) -> bool {
        match self.placement {
            TabPlacement::Start => !self.is_rtl(),
            TabPlacement::End => self.is_rtl(),
            TabPlacement::Top | TabPlacement::Bottom => true,
        }
    }

    fn split(&self, area: Rect) -> (Rect, Rect) {
        match self.placement {
            TabPlacement::Top => {
                let [nav, panel] =
                    Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);
                (nav, panel)
            }
            TabPlacement::Bottom => {
                let [panel, nav] =
                    Layout::vertical([Constraint::Min(0), Constraint::Length(2)]).areas(area);
                (nav, panel)
            }
            TabPlacement::Start | TabPlacement::End => {
                let widest = self
                    .nav
                    .iter()
                    .map(|tab| tab.measure().width)
                    .max()
                    .unwrap_or(0);
                let nav_width = Constraint::Length(widest.saturating_add(1));
                if self.nav_on_left() {
                    let [nav, panel] =
                        Layout::horizontal([nav_width, Constraint::Min(0)]).areas(area);
                    (nav, panel)
                } else {
                    let [panel, nav] =
                        Layout::horizontal([Constraint::Min(0), nav_width]).areas(area);
                    (nav, panel)
                }
            }
        }
    }

    fn layout(&self, nav: Rect) -> NavLayout {
        if nav.is_empty() {
            return NavLayout::default();
        }
        match self.placement.axis() {
            Axis::Horizontal => self.layout_horizontal(nav),
            Axis::Vertical => self.layout_vertical(nav),
        }
    }

    fn layout_horizontal(&self, nav: Rect) -> NavLayout {
        let rtl = self.is_rtl();
        let (label_y, track_y) = match self.placement {
            TabPlacement::Bottom if nav.height > 1 => (nav.y + 1, Some(nav.y)),
            _ if nav.height > 1 => (nav.y, Some(nav.y + 1)),
            _ => (nav.y, None),
        };

        let mut layout = NavLayout::default();
        let (strip_x, strip_width) = if self.has_scroll_controls {
            let button = SCROLL_BUTTON_WIDTH.min(nav.width / 2);
            let left = Rect::new(nav.x, label_y, button, 1);
            let right = Rect::new(nav.right() - button, label_y, button, 1);
            let (start, end) = if rtl { (right, left) } else { (left, right) };
            layout.start_button = Some(start);
            layout.end_button = Some(end);
            (nav.x + button, nav.width - 2 * button)
        } else {
            (nav.x, nav.width)
        };
        let strip = Strip {
            x: strip_x,
            width: strip_width,
            offset: self.scroll.offset(),
            rtl,
        };

        let mut start = 0i32;
        for tab in &self.nav {
            let width = tab.measure().width;
            if let Some((x, visible, skip)) = strip.map(start, width) {
                let close = tab.closable.then(|| {
                    let glyph = if rtl {
                        start + 1
                    } else {
                        start + i32::from(width) - 2
                    };
                    strip
                        .map(glyph, 1)
                        .map(|(x, w, _)| Rect::new(x, label_y, w, 1))
                });
                layout.tabs.push(TabSlot {
                    id: tab.id,
                    rect: Rect::new(x, label_y, visible, 1),
                    skip,
                    close: close.flatten(),
                });
            }
            start += i32::from(width);
        }

        if let Some(track_y) = track_y {
            layout.track = Some(Rect::new(strip_x, track_y, strip_width, 1));
            if !self.indicator.is_hidden() {
                let (translate, extent) = self.indicator.displayed();
                let logical = if rtl { -translate } else { translate };
                layout.indicator = strip
                    .map(logical, extent)
                    .map(|(x, w, _)| Rect::new(x, track_y, w, 1));
            }
        }
        layout
    }

    fn layout_vertical(&self, nav: Rect) -> NavLayout {
        let on_left = self.nav_on_left();
        let track_x = if on_left { nav.right() - 1 } else { nav.x };
        let label_x = if on_left { nav.x } else { nav.x + 1 };
        let label_width = nav.width.saturating_sub(1);

        let mut layout = NavLayout {
            track: Some(Rect::new(track_x, nav.y, 1, nav.height)),
            ..NavLayout::default()
        };
        let mut y = 0u16;
        for tab in &self.nav {
            let size = tab.measure();
            if y >= nav.height {
                break;
            }
            let close = (tab.closable && size.width >= 2 && size.width - 2 < label_width)
                .then(|| Rect::new(label_x + size.width - 2, nav.y + y, 1, 1));
            layout.tabs.push(TabSlot {
                id: tab.id,
                rect: Rect::new(label_x, nav.y + y, label_width, 1),
                skip: 0,
                close,
            });
            y = y.saturating_add(size.height);
        }

        if !self.indicator.is_hidden() {
            let (translate, extent) = self.indicator.displayed();
            let top = u16::try_from(translate.max(0)).unwrap_or(0);
            if top < nav.height {
                let height = extent.min(nav.height - top);
                layout.indicator = Some(Rect::new(track_x, nav.y + top, 1, height));
            }
        }
        layout
    }

    fn tab_style(&self, tab: &Tab) -> Style {
        let mut style = if tab.disabled {
            self.style.disabled
        } else if tab.active {
            self.style.active
        } else {
            self.style.tab
        };
        if self.focused == Some(tab.id) {
            style = style.patch(self.style.focused);
        }
        style
    }
}

impl Default for TabGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for TabGroup {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Click { target } => self.click(target),
            Message::Close { target } => self.close(target),
            Message::Key { target, key } => {
                self.handle_key(target, key).unwrap_or_else(Command::none)
            }
            Message::Focus { target } => {
                if self.tabs.contains(&target) {
                    self.focused = Some(target);
                }
                Command::none()
            }
            Message::Blur => {
                self.focused = None;
                Command::none()
            }
            Message::Mouse(event) => self.on_mouse(event),
            Message::ScrollToStart => self.scroll_by_page(false),
            Message::ScrollToEnd => self.scroll_by_page(true),
            Message::Resized(size) => self.resized(size),
            Message::Intersected => self.intersected(),
            Message::FlushMutations => self.flush_mutations(),
            Message::SetAriaLabels => self.set_aria_labels(),
            Message::RestoreTransition => {
                self.indicator.restore_transitions();
                Command::none()
            }
            Message::Frame => {
                self.indicator.step();
                self.scroll.step();
                Command::none()
            }
            Message::Event(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let nav = self.nav_area(area);
        self.nav_rect.set(nav);
        let layout = self.layout(nav);
        let horizontal = self.placement.axis() == Axis::Horizontal;
        let buf = frame.buffer_mut();

        let (track_symbol, bar_symbol) = if horizontal {
            ("─", "━")
        } else {
            ("│", "┃")
        };
        for (rect, symbol, style) in [
            (layout.track, track_symbol, self.style.track),
            (layout.indicator, bar_symbol, self.style.indicator),
        ] {
            let Some(rect) = rect else { continue };
            for y in rect.top()..rect.bottom() {
                for x in rect.left()..rect.right() {
                    buf[(x, y)].set_symbol(symbol).set_style(style);
                }
            }
        }

        for slot in &layout.tabs {
            let Some(tab) = self.tab(slot.id) else {
                continue;
            };
            let text = slice_columns(&tab.text(), slot.skip, slot.rect.width);
            frame.render_widget(Span::styled(text, self.tab_style(tab)), slot.rect);
        }

        let rtl = self.is_rtl();
        let buttons = [
            (layout.start_button, self.scroll.at_start(), if rtl { "›" } else { "‹" }),
            (layout.end_button, self.scroll.at_end(), if rtl { "‹" } else { "›" }),
        ];
        for (rect, disabled, glyph) in buttons {
            let Some(rect) = rect else { continue };
            let style = if disabled {
                self.style.scroll_button_disabled
            } else {
                self.style.scroll_button
            };
            let text = if rect.x == nav.x {
                format!("{glyph} ")
            } else {
                format!(" {glyph}")
            };
            frame.render_widget(Span::styled(text, style), rect);
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        let mut subs = Vec::new();
        if let Some(host) = &self.host {
            subs.push(subscribe(ResizeObserver::new(self.id, &host.nav_size)).map(Message::Resized));
            if !self.initialized {
                subs.push(
                    subscribe(IntersectionObserver::new(self.id, &host.visible))
                        .map(|()| Message::Intersected),
                );
            }
        }
        if self.indicator.is_animating() || self.scroll.is_animating() {
            subs.push(
                subscribe(Every::new(FRAME, "tab-group-frame").owned_by(self.id))
                    .map(|_| Message::Frame),
            );
        }
        subs
    }

    fn focused(&self) -> bool {
        self.focused.is_some()
    }
}

/// `take` display columns of `text` after skipping `skip` columns. Wide
/// characters cut by either edge become spaces.
fn slice_columns(text: &str, skip: u16, take: u16) -> String {
    let (skip, end) = (usize::from(skip), usize::from(skip) + usize::from(take));
    let mut out = String::new();
    let mut column = 0;
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0);
        let next = column + width;
        if next <= skip {
            column = next;
            continue;
        }
        if column >= end {
            break;
        }
        if column < skip || next > end {
            let visible = next.min(end) - column.max(skip);
            out.extend(std::iter::repeat(' ').take(visible));
        } else {
            out.push(ch);
        }
        column = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::sync::Mutex;
    use trellis_core::testing::TestComponent;
    use trellis_core::{Direction, Driver};

    struct Fixture {
        group: TabGroup,
        general: ElementId,
        custom: ElementId,
        advanced: ElementId,
    }

    fn fixture(build: impl FnOnce(TabGroup) -> TabGroup) -> Fixture {
        let general = Tab::new("general", "General").with_active(true);
        let custom = Tab::new("custom", "Custom");
        let advanced = Tab::new("advanced", "Advanced");
        let ids = (general.id(), custom.id(), advanced.id());
        let group = build(
            TabGroup::new()
                .with_tab(general)
                .with_tab(custom)
                .with_tab(advanced)
                .with_panel(TabPanel::new("general"))
                .with_panel(TabPanel::new("custom"))
                .with_panel(TabPanel::new("advanced")),
        );
        Fixture {
            group,
            general: ids.0,
            custom: ids.1,
            advanced: ids.2,
        }
    }

    /// A synced, initialized group inside an 80-column strip.
    fn harness(group: TabGroup) -> TestComponent<TabGroup> {
        let mut group = group;
        group.sync_tabs_and_panels();
        let mut harness = TestComponent::new(group).recording();
        harness.send(Message::Resized(Size::new(80, 2)));
        harness.send(Message::Intersected);
        harness.drain_messages();
        harness
    }

    fn key(target: ElementId, code: KeyCode) -> Message {
        Message::Key {
            target,
            key: KeyEvent::new(code, KeyModifiers::NONE),
        }
    }

    fn events(harness: &TestComponent<TabGroup>) -> Vec<TabGroupEvent> {
        harness
            .delivered()
            .iter()
            .filter_map(|msg| match msg {
                Message::Event(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    fn assert_single_active(group: &TabGroup) {
        assert_eq!(group.all_tabs().filter(|t| t.is_active()).count(), 1);
        assert_eq!(group.all_panels().filter(|p| p.is_active()).count(), 1);
        let tab = group.active_tab().and_then(|id| group.tab(id)).map(|t| t.panel());
        assert_eq!(tab, group.active_panel().map(|p| p.name()));
    }

    #[test]
    fn intersection_activates_marked_tab_silently() {
        let f = fixture(|g| g);
        let harness = harness(f.group);
        let group = harness.component();
        assert!(group.is_initialized());
        assert_eq!(group.active_tab(), Some(f.general));
        assert!(events(&harness).is_empty());
        assert_single_active(group);
    }

    #[test]
    fn first_tab_wins_when_none_marked() {
        let mut group = TabGroup::new()
            .with_tab(Tab::new("a", "A"))
            .with_tab(Tab::new("b", "B"))
            .with_panel(TabPanel::new("a"))
            .with_panel(TabPanel::new("b"));
        let first = group.all_tabs().next().map(|t| t.id());
        group.sync_tabs_and_panels();
        let harness = harness(group);
        assert_eq!(harness.component().active_tab(), first);
    }

    #[test]
    fn show_emits_hidden_then_shown_and_moves_indicator() {
        let f = fixture(|g| g);
        let mut harness = harness(f.group);
        let cmd = harness.component_mut().show("advanced");
        harness.collect(cmd);
        harness.drain_messages();

        assert_eq!(
            events(&harness),
            vec![
                TabGroupEvent::TabHidden {
                    name: "general".into()
                },
                TabGroupEvent::TabShown {
                    name: "advanced".into()
                },
            ]
        );
        let group = harness.component();
        assert_eq!(group.active_tab(), Some(f.advanced));
        // " General " + " Custom "
        assert_eq!(group.indicator().translate(), 17);
        assert_eq!(group.indicator().extent(), 10);
        assert_single_active(group);
    }

    #[test]
    fn show_unknown_panel_is_noop() {
        let f = fixture(|g| g);
        let mut harness = harness(f.group);
        assert!(harness.component_mut().show("missing").is_none());
        assert_eq!(harness.component().active_tab(), Some(f.general));
    }

    #[test]
    fn home_and_end_jump_and_activate() {
        let f = fixture(|g| g);
        let mut harness = harness(f.group);
        harness.send(key(f.custom, KeyCode::End));
        assert_eq!(harness.component().focused_tab(), Some(f.advanced));
        assert_eq!(harness.component().active_tab(), Some(f.advanced));
        harness.send(key(f.advanced, KeyCode::Home));
        assert_eq!(harness.component().active_tab(), Some(f.general));
    }

    #[test]
    fn arrows_wrap_around() {
        let f = fixture(|g| g);
        let mut harness = harness(f.group);
        harness.send(key(f.advanced, KeyCode::Right));
        assert_eq!(harness.component().active_tab(), Some(f.general));
        harness.send(key(f.general, KeyCode::Left));
        assert_eq!(harness.component().active_tab(), Some(f.advanced));
    }

    #[test]
    fn rtl_swaps_left_and_right() {
        let f = fixture(|g| g.with_localize(Arc::new(Locale::new().with_dir(Direction::Rtl))));
        let mut harness = harness(f.group);
        harness.send(key(f.general, KeyCode::Left));
        assert_eq!(harness.component().active_tab(), Some(f.custom));
        assert_eq!(harness.component().indicator().translate(), -9);
    }

    #[test]
    fn vertical_uses_up_and_down_only() {
        let f = fixture(|g| g.with_placement(TabPlacement::Start));
        let mut harness = harness(f.group);
        harness.send(key(f.general, KeyCode::Down));
        assert_eq!(harness.component().active_tab(), Some(f.custom));
        harness.send(key(f.custom, KeyCode::Right));
        assert_eq!(harness.component().active_tab(), Some(f.custom));
        harness.send(key(f.custom, KeyCode::Up));
        assert_eq!(harness.component().active_tab(), Some(f.general));

        let cmd = harness.component_mut().show("advanced");
        harness.collect(cmd);
        assert_eq!(harness.component().indicator().translate(), 2);
        assert_eq!(harness.component().indicator().extent(), 1);
    }

    #[test]
    fn manual_activation_waits_for_enter() {
        let f = fixture(|g| g.with_activation(Activation::Manual));
        let mut harness = harness(f.group);
        harness.send(key(f.general, KeyCode::Right));
        assert_eq!(harness.component().focused_tab(), Some(f.custom));
        assert_eq!(harness.component().active_tab(), Some(f.general));
        harness.send(key(f.custom, KeyCode::Enter));
        assert_eq!(harness.component().active_tab(), Some(f.custom));
    }

    #[test]
    fn disabled_tabs_are_skipped_and_unclickable() {
        let mut f = fixture(|g| g);
        if let Some(tab) = f.group.nav.iter_mut().find(|t| t.id == f.custom) {
            tab.disabled = true;
        }
        let mut harness = harness(f.group);
        harness.send(key(f.general, KeyCode::Right));
        assert_eq!(harness.component().active_tab(), Some(f.advanced));
        harness.send(Message::Click { target: f.custom });
        assert_eq!(harness.component().active_tab(), Some(f.advanced));
    }

    #[test]
    fn home_skips_a_disabled_first_tab() {
        let mut f = fixture(|g| g);
        if let Some(tab) = f.group.nav.iter_mut().find(|t| t.id == f.general) {
            tab.disabled = true;
            tab.active = false;
        }
        let mut harness = harness(f.group);
        harness.send(key(f.advanced, KeyCode::Home));
        assert_eq!(harness.component().focused_tab(), Some(f.custom));
        assert_eq!(harness.component().active_tab(), Some(f.custom));
        harness.send(key(f.custom, KeyCode::Left));
        assert_eq!(harness.component().focused_tab(), Some(f.advanced));
    }

    #[test]
    fn end_and_wrap_skip_a_disabled_last_tab() {
        let mut f = fixture(|g| g);
        if let Some(tab) = f.group.nav.iter_mut().find(|t| t.id == f.advanced) {
            tab.disabled = true;
        }
        let mut harness = harness(f.group);
        harness.send(key(f.general, KeyCode::End));
        assert_eq!(harness.component().focused_tab(), Some(f.custom));
        harness.send(key(f.custom, KeyCode::Right));
        assert_eq!(harness.component().focused_tab(), Some(f.general));
        harness.send(key(f.general, KeyCode::Left));
        assert_eq!(harness.component().focused_tab(), Some(f.custom));
        assert_ne!(harness.component().active_tab(), Some(f.advanced));
    }

    #[test]
    fn freshly_disabled_tab_is_not_navigable_before_flush() {
        let f = fixture(|g| g);
        let mut group = f.group;
        let _ = group.attach(TabGroupHost::new(Size::new(80, 2), false));
        let mut harness = harness(group);
        let cmd = harness.component_mut().set_tab_disabled(f.advanced, true);
        harness.collect(cmd);
        assert!(!harness.pending().is_empty(), "flush still queued");
        harness.send(key(f.general, KeyCode::End));
        assert_eq!(harness.component().focused_tab(), Some(f.custom));
        assert_eq!(harness.component().active_tab(), Some(f.custom));
    }

    #[test]
    fn disabling_while_detached_still_skips_the_tab() {
        let f = fixture(|g| g);
        let mut harness = harness(f.group);
        let cmd = harness.component_mut().set_tab_disabled(f.advanced, true);
        assert!(cmd.is_none());
        harness.send(key(f.general, KeyCode::End));
        assert_eq!(harness.component().focused_tab(), Some(f.custom));
        harness.send(key(f.custom, KeyCode::Right));
        assert_eq!(harness.component().focused_tab(), Some(f.general));
    }

    #[test]
    fn foreign_targets_are_ignored() {
        let f = fixture(|g| g);
        let mut harness = harness(f.group);
        let stranger = ElementId::new();
        let consumed = harness.component_mut().handle_key(
            stranger,
            KeyEvent::new(KeyCode::Right, KeyModifiers::NONE),
        );
        assert!(consumed.is_none());
        harness.send(Message::Click { target: stranger });
        assert_eq!(harness.component().active_tab(), Some(f.general));
    }

    #[test]
    fn keys_report_consumption() {
        let f = fixture(|g| g);
        let mut harness = harness(f.group);
        let group = harness.component_mut();
        assert!(group
            .handle_key(f.general, KeyEvent::new(KeyCode::End, KeyModifiers::NONE))
            .is_some());
        assert!(group
            .handle_key(f.general, KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE))
            .is_none());
    }

    #[test]
    fn close_requests_name_the_panel() {
        let closable = Tab::new("notes", "Notes").with_closable(true);
        let id = closable.id();
        let f = fixture(|g| g.with_tab(closable).with_panel(TabPanel::new("notes")));
        let mut harness = harness(f.group);
        harness.send(Message::Close { target: id });
        harness.send(Message::Close { target: f.general });
        harness.drain_messages();
        assert_eq!(
            events(&harness),
            vec![TabGroupEvent::CloseRequested {
                name: "notes".into()
            }]
        );
    }

    #[test]
    fn edits_flush_on_next_turn_and_relabel_once() {
        let f = fixture(|g| g);
        let mut group = f.group;
        let _ = group.attach(TabGroupHost::new(Size::new(80, 2), false));
        let mut harness = harness(group);

        let extra = Tab::new("extra", "Extra");
        let extra_id = extra.id();
        let first = harness.component_mut().push_tab(extra);
        let second = harness.component_mut().push_panel(TabPanel::new("extra"));
        assert!(!first.is_none());
        assert!(second.is_none(), "one flush per batch of edits");
        assert_eq!(harness.component().tabs.len(), 3, "caches lag until flush");

        harness.collect(first);
        harness.drain_messages();

        let group = harness.component();
        assert_eq!(group.tabs.len(), 4);
        assert_eq!(group.panels.len(), 4);
        let panel = group.all_panels().find(|p| p.name() == "extra").map(|p| p.id());
        assert_eq!(group.tab(extra_id).and_then(|t| t.controls()), panel);
        let relabels = harness
            .delivered()
            .iter()
            .filter(|m| matches!(m, Message::SetAriaLabels))
            .count();
        assert_eq!(relabels, 1, "aria-only records do not relabel again");
    }

    #[test]
    fn external_active_flag_is_followed() {
        let f = fixture(|g| g);
        let mut group = f.group;
        let _ = group.attach(TabGroupHost::new(Size::new(80, 2), false));
        let mut harness = harness(group);

        let cmd = harness.component_mut().set_tab_active(f.custom, true);
        harness.collect(cmd);
        harness.drain_messages();

        assert_eq!(harness.component().active_tab(), Some(f.custom));
        assert_single_active(harness.component());
        assert_eq!(
            events(&harness).last(),
            Some(&TabGroupEvent::TabShown {
                name: "custom".into()
            })
        );
    }

    #[test]
    fn disabling_refreshes_focusable_tabs() {
        let f = fixture(|g| g);
        let mut group = f.group;
        let _ = group.attach(TabGroupHost::new(Size::new(80, 2), false));
        let mut harness = harness(group);
        let cmd = harness.component_mut().set_tab_disabled(f.custom, true);
        harness.collect(cmd);
        harness.drain_messages();
        assert_eq!(harness.component().focusable, vec![f.general, f.advanced]);
    }

    #[test]
    fn edits_while_detached_are_not_recorded() {
        let f = fixture(|g| g);
        let mut harness = harness(f.group);
        let cmd = harness.component_mut().push_tab(Tab::new("x", "X"));
        assert!(cmd.is_none());
        assert!(harness.component().mutations.is_empty());
    }

    #[test]
    fn indicator_appears_in_place_on_first_sync() {
        let f = fixture(|g| g);
        let mut group = f.group;
        let _ = group.attach(TabGroupHost::new(Size::new(80, 2), false));
        assert!(!group.indicator().is_hidden());
        assert_eq!(group.indicator().displayed(), (0, 9));
        assert!(!group.indicator().is_animating());
    }

    #[test]
    fn removing_active_tab_hides_indicator() {
        let f = fixture(|g| g);
        let mut group = f.group;
        let _ = group.attach(TabGroupHost::new(Size::new(80, 2), false));
        let mut harness = harness(group);
        let cmd = harness.component_mut().remove_tab(f.general);
        harness.collect(cmd);
        harness.drain_messages();
        assert!(harness.component().indicator().is_hidden());

        let cmd = harness.component_mut().show("custom");
        harness.collect(cmd);
        harness.drain_messages();
        // " Custom " now leads the strip
        assert_eq!(harness.component().indicator().displayed(), (0, 8));
        assert!(!harness.component().indicator().is_animating());
        assert_eq!(
            events(&harness),
            vec![
                TabGroupEvent::TabHidden {
                    name: "general".into()
                },
                TabGroupEvent::TabShown {
                    name: "custom".into()
                },
            ]
        );
    }

    #[test]
    fn overflow_shows_scroll_controls() {
        let f = fixture(|g| g);
        let mut harness = harness(f.group);
        assert!(!harness.component().has_scroll_controls());

        harness.send(Message::Resized(Size::new(20, 2)));
        assert!(harness.component().has_scroll_controls());
        assert!(!harness.component().indicator().transitions_enabled());

        harness.send(Message::ScrollToEnd);
        while harness.component().scroll().is_animating() {
            harness.send(Message::Frame);
        }
        assert_eq!(harness.component().scroll().offset(), 11);
        harness.send(Message::ScrollToStart);
        while harness.component().scroll().is_animating() {
            harness.send(Message::Frame);
        }
        assert!(harness.component().scroll().at_start());
    }

    #[test]
    fn no_scroll_controls_or_vertical_never_scrolls() {
        let f = fixture(|g| g.with_no_scroll_controls(true));
        let mut suppressed = harness(f.group);
        suppressed.send(Message::Resized(Size::new(10, 2)));
        assert!(!suppressed.component().has_scroll_controls());

        let f = fixture(|g| g.with_placement(TabPlacement::End));
        let mut vertical = harness(f.group);
        vertical.send(Message::Resized(Size::new(3, 10)));
        assert!(!vertical.component().has_scroll_controls());
    }

    #[test]
    fn renders_labels_and_indicator() {
        let f = fixture(|g| g);
        let harness = harness(f.group);
        let screen = harness.render_string(40, 4);
        let rows: Vec<&str> = screen.lines().collect();
        assert!(rows[0].starts_with(" General  Custom  Advanced "));
        assert!(rows[1].starts_with("━━━━━━━━━─"));
    }

    #[test]
    fn renders_mirrored_in_rtl() {
        let f = fixture(|g| g.with_localize(Arc::new(Locale::new().with_dir(Direction::Rtl))));
        let harness = harness(f.group);
        let screen = harness.render_string(40, 4);
        let rows: Vec<&str> = screen.lines().collect();
        assert!(rows[0].ends_with(" Advanced  Custom  General "));
        assert!(rows[1].ends_with("─━━━━━━━━━"));
    }

    #[test]
    fn click_on_rendered_tab() {
        let f = fixture(|g| g);
        let mut harness = harness(f.group);
        harness.render(40, 4);
        harness.send(Message::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 11,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }));
        assert_eq!(harness.component().active_tab(), Some(f.custom));
        assert_eq!(harness.component().focused_tab(), Some(f.custom));
    }

    #[test]
    fn panel_area_leaves_room_for_the_strip() {
        let group = TabGroup::new().with_tab(Tab::new("a", "Alpha"));
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(group.panel_area(area), Rect::new(0, 2, 40, 8));
        let group = group.with_placement(TabPlacement::Start);
        assert_eq!(group.nav_area(area), Rect::new(0, 0, 8, 10));
        assert_eq!(group.panel_area(area), Rect::new(8, 0, 32, 10));
    }

    #[test]
    fn slices_by_display_columns() {
        assert_eq!(slice_columns(" General ", 3, 4), "nera");
        assert_eq!(slice_columns("a設b", 0, 2), "a ");
        assert_eq!(slice_columns("a設b", 2, 2), " b");
    }

    #[tokio::test(start_paused = true)]
    async fn host_observers_follow_attachment() {
        let f = fixture(|g| g);
        let host = TabGroupHost::new(Size::new(80, 2), false);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut driver = Driver::new(f.group).with_inspector(move |msg| {
            if let Message::Event(event) = msg {
                sink.lock().unwrap().push(event.clone());
            }
        });
        assert_eq!(driver.active_subscriptions(), 0);

        let cmd = driver.component_mut().attach(host.clone());
        driver.execute(cmd);
        assert_eq!(driver.active_subscriptions(), 2);

        host.visible.set(true);
        driver.run_until(|g| g.is_initialized()).await;
        assert_eq!(driver.component().active_tab(), Some(f.general));
        assert!(events.lock().unwrap().is_empty());

        host.nav_size.set(Size::new(12, 2));
        driver.run_until(|g| g.has_scroll_controls()).await;
        driver
            .run_until(|g| g.indicator().transitions_enabled())
            .await;

        let cmd = driver.component_mut().detach();
        driver.execute(cmd);
        assert_eq!(driver.active_subscriptions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn indicator_slides_on_frames() {
        let f = fixture(|g| g);
        let host = TabGroupHost::new(Size::new(80, 2), true);
        let mut driver = Driver::new(f.group);
        let cmd = driver.component_mut().attach(host);
        driver.execute(cmd);
        driver.run_until(|g| g.is_initialized()).await;
        driver
            .run_until(|g| g.indicator().transitions_enabled())
            .await;

        let cmd = driver.component_mut().show("advanced");
        driver.execute(cmd);
        assert!(driver.component().indicator().displayed().0 < 17);
        driver
            .run_until(|g| g.indicator().displayed() == (17, 10))
            .await;
    }
}
