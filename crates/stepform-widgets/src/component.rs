use crate::command::Command;
use ratatui::{layout::Rect, Frame};

/// A widget with its own state that renders into a given [`Rect`].
///
/// Every widget in this crate follows the same update/view cycle: input
/// arrives as a message, [`update`](Component::update) mutates state and
/// returns a [`Command`] carrying any messages for the parent, and
/// [`view`](Component::view) draws the current state.
///
/// # Composition pattern
///
/// Wrap the child's message type in a variant of the parent's message and
/// use [`Command::map`] to lift the child's command:
///
/// ```rust,ignore
/// use stepform_widgets::{Command, Component};
/// use stepform_widgets::text_field::{self, TextField};
///
/// struct Comment { body: TextField }
///
/// enum Msg { Body(text_field::Message) }
///
/// impl Component for Comment {
///     type Message = Msg;
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Body(m) => self.body.update(m).map(Msg::Body),
///         }
///     }
///
///     fn view(&self, frame: &mut Frame, area: Rect) {
///         self.body.view(frame, area);
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return messages for the parent.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations must confine drawing to it.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently has keyboard focus.
    ///
    /// A hint for input routing; the default is `false`.
    fn focused(&self) -> bool {
        false
    }
}
