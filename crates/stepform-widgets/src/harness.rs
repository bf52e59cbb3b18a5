use crate::command::Command;
use crate::component::Component;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// A headless test harness that drives a [`Component`] without a terminal.
///
/// Messages returned from [`Component::update`] are queued rather than
/// delivered, so a test can inspect what the component emitted with
/// [`pending`](Harness::pending) before choosing to feed them back with
/// [`drain_messages`](Harness::drain_messages).
///
/// # Example
///
/// ```rust,ignore
/// use stepform_widgets::harness::Harness;
///
/// let mut h = Harness::new(FormView::new(form));
/// h.send(form_view::Message::KeyPress(key(KeyCode::Enter)));
/// assert!(h.pending().iter().any(|m| matches!(m, Message::Submitted(_))));
///
/// let screen = h.render_string(60, 20);
/// assert!(screen.contains("Step 1/2"));
/// ```
pub struct Harness<C: Component> {
    component: C,
    pending: Vec<C::Message>,
}

impl<C: Component> Harness<C> {
    /// Wrap a component.
    pub fn new(component: C) -> Self {
        Self {
            component,
            pending: Vec::new(),
        }
    }

    /// Send a message, triggering a single update.
    ///
    /// Emitted messages are queued; see [`pending`](Harness::pending).
    pub fn send(&mut self, msg: C::Message) {
        let cmd = self.component.update(msg);
        self.collect(cmd);
    }

    /// Messages emitted but not yet delivered back to the component.
    pub fn pending(&self) -> &[C::Message] {
        &self.pending
    }

    /// Remove and return the queued messages without delivering them.
    pub fn take_pending(&mut self) -> Vec<C::Message> {
        std::mem::take(&mut self.pending)
    }

    /// Deliver queued messages back to the component until none remain.
    pub fn drain_messages(&mut self) {
        while !self.pending.is_empty() {
            let messages: Vec<_> = self.pending.drain(..).collect();
            for msg in messages {
                let cmd = self.component.update(msg);
                self.collect(cmd);
            }
        }
    }

    /// Shared access to the component for assertions.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Mutable access for direct test setup.
    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Render the component over the full area of a `width` x `height` buffer.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                self.component.view(frame, area);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    /// Render and return the visible content, one line per row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        let buf = self.render(width, height);
        let area = Rect::new(0, 0, width, height);
        let mut output = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                output.push_str(buf[(x, y)].symbol());
            }
            if y < area.bottom() - 1 {
                output.push('\n');
            }
        }
        output
    }

    fn collect(&mut self, cmd: Command<C::Message>) {
        self.pending.extend(cmd.into_messages());
    }
}
