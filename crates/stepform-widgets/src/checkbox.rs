//! A boolean toggle with an inline label.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::command::Command;
use crate::component::Component;

/// Messages for the checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    KeyPress(KeyEvent),
    /// Emitted after every toggle with the new state.
    Changed(bool),
    /// Emitted on Enter.
    Submit,
}

/// A checkbox rendered as `[x] label`.
pub struct Checkbox {
    label: String,
    checked: bool,
    focus: bool,
}

impl Checkbox {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: false,
            focus: false,
        }
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    /// Flip the state and report it.
    pub fn toggle(&mut self) -> Command<Message> {
        self.checked = !self.checked;
        Command::message(Message::Changed(self.checked))
    }
}

impl Component for Checkbox {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => match key.code {
                KeyCode::Char(' ') | KeyCode::Char('x') => self.toggle(),
                KeyCode::Enter => Command::message(Message::Submit),
                _ => Command::none(),
            },
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let mark = if self.checked { "[x] " } else { "[ ] " };
        let mark_style = if self.focus {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let line = Line::from(vec![
            Span::styled(mark, mark_style),
            Span::raw(self.label.as_str()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
