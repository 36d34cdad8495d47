use crate::command::Command;
use crate::component::Component;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// A synchronous test harness that drives a [`Component`] without a runtime.
///
/// `TestComponent` exercises update and view in a plain `#[test]` function --
/// no tokio runtime or TTY required. Messages produced by
/// [`Command::message`] are queued and can be flushed with
/// [`drain_messages`](TestComponent::drain_messages); futures (timers,
/// animations) are dropped. Use [`Driver`](crate::Driver) under
/// `#[tokio::test]` when the async half matters.
///
/// # Example
///
/// ```rust,ignore
/// use trellis_core::testing::TestComponent;
///
/// let mut harness = TestComponent::new(tab_group);
/// harness.send(Message::Click { target: second });
/// harness.drain_messages();
/// assert_eq!(harness.component().active_tab(), Some(second));
/// ```
pub struct TestComponent<C: Component> {
    component: C,
    pending: Vec<C::Message>,
    delivered: Vec<C::Message>,
    record: bool,
}

impl<C: Component> TestComponent<C> {
    /// Wrap a component.
    pub fn new(component: C) -> Self {
        Self {
            component,
            pending: Vec::new(),
            delivered: Vec::new(),
            record: false,
        }
    }

    /// Keep a copy of every message the harness delivers, for ordering
    /// assertions through [`delivered`](TestComponent::delivered).
    pub fn recording(mut self) -> Self
    where
        C::Message: Clone,
    {
        self.record = true;
        self
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: C::Message) {
        let cmd = self.component.update(msg);
        self.collect(cmd);
    }

    /// Queue the synchronous messages of a command returned by a direct
    /// method call.
    pub fn collect(&mut self, cmd: Command<C::Message>) {
        cmd.into_sync_messages(&mut self.pending);
    }

    /// Process all pending synchronous messages, including those produced
    /// while processing, until none remain.
    pub fn drain_messages(&mut self)
    where
        C::Message: Clone,
    {
        while !self.pending.is_empty() {
            let messages: Vec<_> = self.pending.drain(..).collect();
            for msg in messages {
                if self.record {
                    self.delivered.push(msg.clone());
                }
                self.send(msg);
            }
        }
    }

    /// Messages delivered by [`drain_messages`](TestComponent::drain_messages)
    /// so far, in order. Empty unless [`recording`](TestComponent::recording).
    pub fn delivered(&self) -> &[C::Message] {
        &self.delivered
    }

    /// Messages queued but not yet delivered.
    pub fn pending(&self) -> &[C::Message] {
        &self.pending
    }

    /// Shared reference to the component for assertions.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Mutable reference for direct test setup.
    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Render the component into `area` of a `width` x `height` buffer.
    pub fn render_in(&self, width: u16, height: u16, area: Rect) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("test backend never fails");
        terminal
            .draw(|frame| self.component.view(frame, area))
            .expect("test backend never fails");
        terminal.backend().buffer().clone()
    }

    /// Render the component filling a `width` x `height` buffer.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        self.render_in(width, height, Rect::new(0, 0, width, height))
    }

    /// Render into `area` and return the buffer as newline-separated rows.
    pub fn render_string_in(&self, width: u16, height: u16, area: Rect) -> String {
        buffer_to_string(&self.render_in(width, height, area))
    }

    /// Render filling the buffer and return it as newline-separated rows.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }
}

fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}
