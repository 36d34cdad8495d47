use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable interactive widget that renders into a given [`Rect`] area.
///
/// A component owns its state, reacts to messages in
/// [`update`](Component::update), and pushes side effects (timers, animations,
/// deferred messages) out through the returned [`Command`]. Long-lived event
/// sources such as resize or visibility observers are declared in
/// [`subscriptions`](Component::subscriptions); the runtime starts and stops
/// them by diffing the returned list after every update, so a component that
/// stops returning a subscription has it torn down.
///
/// # Composition pattern
///
/// To embed a component inside a parent, wrap the component's message type in
/// a variant of the parent message and use [`Command::map`] to translate
/// commands. Outward notifications (for example a tab being shown) travel the
/// same way: the child returns `Command::message(Message::Event(..))` and the
/// parent matches on it before forwarding.
///
/// ```rust,ignore
/// use trellis_core::{Command, Component};
/// use trellis_widgets::tab_group::{self, TabGroup, TabGroupEvent};
///
/// struct App { tabs: TabGroup, log: Vec<String> }
///
/// enum AppMsg { Tabs(tab_group::Message) }
///
/// impl App {
///     fn update(&mut self, msg: AppMsg) -> Command<AppMsg> {
///         match msg {
///             AppMsg::Tabs(tab_group::Message::Event(TabGroupEvent::TabShown { name })) => {
///                 self.log.push(name);
///                 Command::none()
///             }
///             AppMsg::Tabs(m) => self.tabs.update(m).map(AppMsg::Tabs),
///         }
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    ///
    /// Parent models typically wrap this in one of their own message variants
    /// so that events can be routed to the correct child.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into a specific `area` of the [`Frame`].
    ///
    /// Implementations should confine all rendering to the given rectangle,
    /// except for overlays (such as a tooltip body) that are placed relative
    /// to it.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Declare active subscriptions for this component.
    ///
    /// The default implementation returns an empty list (no subscriptions).
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently has focus.
    ///
    /// This is a hint for input routing. The default implementation returns
    /// `false`.
    fn focused(&self) -> bool {
        false
    }
}
