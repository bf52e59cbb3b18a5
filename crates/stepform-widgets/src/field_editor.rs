//! One editor per [`FieldKind`], behind a single message type.

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;
use stepform_core::{FieldDefinition, FieldKind, FieldValue};

use crate::checkbox::{self, Checkbox};
use crate::choice::{self, ChoiceField, SELECT_PLACEHOLDER};
use crate::command::Command;
use crate::component::Component;
use crate::text_field::{self, EchoMode, TextField};

/// Character that stands in for each hidden password character.
pub const PASSWORD_MASK: char = '•';

/// Rows a multiline editor occupies, without borders.
pub const MULTILINE_ROWS: u16 = 4;

/// Messages for [`FieldEditor`].
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    KeyPress(KeyEvent),
    Paste(String),
    /// Show or hide a password.
    ToggleReveal,
    /// Emitted when the edited value changes.
    Changed(FieldValue),
    /// Emitted when the user asks to move on (Enter outside a multiline
    /// editor or an open list).
    Submit,
}

/// The input widget for one field.
pub enum FieldEditor {
    Text(TextField),
    Choice(ChoiceField),
    Checkbox(Checkbox),
}

impl FieldEditor {
    /// Build the editor matching `field`'s kind, showing `value`.
    pub fn for_field(field: &FieldDefinition, value: Option<&FieldValue>) -> Self {
        let placeholder = field.placeholder().unwrap_or_default();
        let mut editor = match field.kind() {
            FieldKind::Text | FieldKind::Email => FieldEditor::Text(TextField::new(placeholder)),
            FieldKind::Password => FieldEditor::Text(
                TextField::new(placeholder).with_echo_mode(EchoMode::Masked(PASSWORD_MASK)),
            ),
            FieldKind::Multiline => FieldEditor::Text(TextField::new(placeholder).multiline()),
            FieldKind::SingleSelect => FieldEditor::Choice(
                ChoiceField::select(field.options().to_vec())
                    .with_placeholder(field.placeholder().unwrap_or(SELECT_PLACEHOLDER)),
            ),
            FieldKind::Radio => FieldEditor::Choice(ChoiceField::radio(field.options().to_vec())),
            FieldKind::Checkbox => FieldEditor::Checkbox(Checkbox::new(field.label())),
        };
        if let Some(value) = value {
            editor.sync(value);
        }
        editor
    }

    /// Show `value` without emitting a change.
    pub fn sync(&mut self, value: &FieldValue) {
        match self {
            FieldEditor::Text(t) => t.set_value(value.as_str().unwrap_or_default()),
            FieldEditor::Choice(c) => c.set_value(value.as_str().unwrap_or_default()),
            FieldEditor::Checkbox(c) => c.set_checked(value.is_truthy()),
        }
    }

    pub fn focus(&mut self) {
        match self {
            FieldEditor::Text(t) => t.focus(),
            FieldEditor::Choice(c) => c.focus(),
            FieldEditor::Checkbox(c) => c.focus(),
        }
    }

    pub fn blur(&mut self) {
        match self {
            FieldEditor::Text(t) => t.blur(),
            FieldEditor::Choice(c) => c.blur(),
            FieldEditor::Checkbox(c) => c.blur(),
        }
    }

    /// Rows needed for the current state, without borders.
    pub fn height(&self) -> u16 {
        match self {
            FieldEditor::Text(t) if t.is_multiline() => MULTILINE_ROWS,
            FieldEditor::Text(_) | FieldEditor::Checkbox(_) => 1,
            FieldEditor::Choice(c) => c.height(),
        }
    }

    /// Whether the editor is holding Esc for itself (an expanded list).
    pub fn captures_escape(&self) -> bool {
        matches!(self, FieldEditor::Choice(c) if c.is_open())
    }
}

fn from_text(msg: text_field::Message) -> Message {
    match msg {
        text_field::Message::KeyPress(k) => Message::KeyPress(k),
        text_field::Message::Paste(p) => Message::Paste(p),
        text_field::Message::ToggleReveal => Message::ToggleReveal,
        text_field::Message::Changed(s) => Message::Changed(FieldValue::Text(s)),
        text_field::Message::Submit => Message::Submit,
    }
}

fn from_choice(msg: choice::Message) -> Message {
    match msg {
        choice::Message::KeyPress(k) => Message::KeyPress(k),
        choice::Message::Changed(s) => Message::Changed(FieldValue::Text(s)),
        choice::Message::Submit => Message::Submit,
    }
}

fn from_checkbox(msg: checkbox::Message) -> Message {
    match msg {
        checkbox::Message::KeyPress(k) => Message::KeyPress(k),
        checkbox::Message::Changed(b) => Message::Changed(FieldValue::Bool(b)),
        checkbox::Message::Submit => Message::Submit,
    }
}

impl Component for FieldEditor {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match (self, msg) {
            (FieldEditor::Text(t), Message::KeyPress(k)) => {
                t.update(text_field::Message::KeyPress(k)).map(from_text)
            }
            (FieldEditor::Text(t), Message::Paste(p)) => {
                t.update(text_field::Message::Paste(p)).map(from_text)
            }
            (FieldEditor::Text(t), Message::ToggleReveal) => {
                t.update(text_field::Message::ToggleReveal).map(from_text)
            }
            (FieldEditor::Choice(c), Message::KeyPress(k)) => {
                c.update(choice::Message::KeyPress(k)).map(from_choice)
            }
            (FieldEditor::Checkbox(c), Message::KeyPress(k)) => {
                c.update(checkbox::Message::KeyPress(k)).map(from_checkbox)
            }
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        match self {
            FieldEditor::Text(t) => t.view(frame, area),
            FieldEditor::Choice(c) => c.view(frame, area),
            FieldEditor::Checkbox(c) => c.view(frame, area),
        }
    }

    fn focused(&self) -> bool {
        match self {
            FieldEditor::Text(t) => t.focused(),
            FieldEditor::Choice(c) => c.focused(),
            FieldEditor::Checkbox(c) => c.focused(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::Harness;
    use crossterm::event::{KeyCode, KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn kinds_map_to_editors() {
        let text = FieldDefinition::new("n", FieldKind::Text, "Name");
        let select =
            FieldDefinition::new("r", FieldKind::SingleSelect, "Role").with_options(["a", "b"]);
        let check = FieldDefinition::new("t", FieldKind::Checkbox, "Terms");
        assert!(matches!(FieldEditor::for_field(&text, None), FieldEditor::Text(_)));
        assert!(matches!(FieldEditor::for_field(&select, None), FieldEditor::Choice(_)));
        assert!(matches!(FieldEditor::for_field(&check, None), FieldEditor::Checkbox(_)));
    }

    #[test]
    fn text_changes_become_field_values() {
        let def = FieldDefinition::new("n", FieldKind::Text, "Name");
        let mut editor = FieldEditor::for_field(&def, None);
        editor.focus();
        let cmd = editor.update(Message::KeyPress(key(KeyCode::Char('a'))));
        assert_eq!(cmd.into_message(), Some(Message::Changed(FieldValue::from("a"))));
    }

    #[test]
    fn checkbox_changes_become_bools() {
        let def = FieldDefinition::new("t", FieldKind::Checkbox, "Terms");
        let mut editor = FieldEditor::for_field(&def, None);
        editor.focus();
        let cmd = editor.update(Message::KeyPress(key(KeyCode::Char(' '))));
        assert_eq!(cmd.into_message(), Some(Message::Changed(FieldValue::Bool(true))));
    }

    #[test]
    fn initial_value_is_shown() {
        let def = FieldDefinition::new("r", FieldKind::Radio, "Plan").with_options(["Free", "Pro"]);
        let editor = FieldEditor::for_field(&def, Some(&FieldValue::from("Pro")));
        let h = Harness::new(editor);
        assert!(h.render_string(30, 1).contains("(•) Pro"));
    }

    #[test]
    fn password_is_masked() {
        let def = FieldDefinition::new("p", FieldKind::Password, "Password");
        let editor = FieldEditor::for_field(&def, Some(&FieldValue::from("abc")));
        let h = Harness::new(editor);
        assert!(h.render_string(10, 1).starts_with("•••"));
    }

    #[test]
    fn multiline_is_taller() {
        let def = FieldDefinition::new("b", FieldKind::Multiline, "Bio");
        let editor = FieldEditor::for_field(&def, None);
        assert_eq!(editor.height(), MULTILINE_ROWS);
    }

    #[test]
    fn select_placeholder_defaults() {
        let def =
            FieldDefinition::new("r", FieldKind::SingleSelect, "Role").with_options(["a", "b"]);
        let h = Harness::new(FieldEditor::for_field(&def, None));
        assert!(h.render_string(30, 1).contains(SELECT_PLACEHOLDER));
    }
}
