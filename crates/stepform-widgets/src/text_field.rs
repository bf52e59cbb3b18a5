//! Text entry for text, email, password, and multiline fields.
//!
//! Single-line fields emit [`Message::Submit`] on Enter so the form can move
//! on; multiline fields insert a newline instead.  Masked fields can be
//! revealed with Ctrl+R.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::command::Command;
use crate::component::Component;

/// Controls how the value is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EchoMode {
    /// Display characters as typed.
    #[default]
    Normal,
    /// Display each character as the given mask until revealed.
    Masked(char),
}

/// Style configuration for the text field.
#[derive(Debug, Clone)]
pub struct TextFieldStyle {
    /// Style applied to the value.
    pub text: Style,
    /// Style applied to the placeholder.
    pub placeholder: Style,
    /// Style applied to the cursor cell.
    pub cursor: Style,
}

impl Default for TextFieldStyle {
    fn default() -> Self {
        Self {
            text: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

/// Messages for the text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A keyboard event to process.
    KeyPress(KeyEvent),
    /// Insert pasted text at the cursor.
    Paste(String),
    /// Show or hide a masked value.
    ToggleReveal,
    /// Emitted when the value changes.
    Changed(String),
    /// Emitted when Enter is pressed in a single-line field.
    Submit,
}

/// A single- or multi-line text entry.
pub struct TextField {
    value: Vec<char>,
    cursor: usize,
    focus: bool,
    placeholder: String,
    multiline: bool,
    echo_mode: EchoMode,
    revealed: bool,
    char_limit: Option<usize>,
    style: TextFieldStyle,
}

impl TextField {
    /// Create an empty single-line field with the given placeholder.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            value: Vec::new(),
            cursor: 0,
            focus: false,
            placeholder: placeholder.into(),
            multiline: false,
            echo_mode: EchoMode::default(),
            revealed: false,
            char_limit: None,
            style: TextFieldStyle::default(),
        }
    }

    /// Make Enter insert a newline instead of submitting.
    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// Set the echo mode.
    pub fn with_echo_mode(mut self, mode: EchoMode) -> Self {
        self.echo_mode = mode;
        self
    }

    /// Refuse input beyond `limit` characters.
    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = Some(limit);
        self
    }

    /// Set custom styles.
    pub fn with_style(mut self, style: TextFieldStyle) -> Self {
        self.style = style;
        self
    }

    /// Give this field keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// The current value.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Replace the value and move the cursor to the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().collect();
        self.cursor = self.value.len();
    }

    /// The cursor position as a character index.
    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Whether the value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The number of characters in the value.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether Enter inserts a newline.
    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// Whether a masked value is currently shown in clear.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    fn changed(&self) -> Command<Message> {
        Command::message(Message::Changed(self.value()))
    }

    fn insert(&mut self, chars: &[char]) -> Command<Message> {
        let available = match self.char_limit {
            Some(limit) => limit.saturating_sub(self.value.len()),
            None => chars.len(),
        };
        let chars = &chars[..available.min(chars.len())];
        if chars.is_empty() {
            return Command::none();
        }
        for (i, &c) in chars.iter().enumerate() {
            self.value.insert(self.cursor + i, c);
        }
        self.cursor += chars.len();
        self.changed()
    }

    fn delete_backward(&mut self) -> Command<Message> {
        if self.cursor == 0 {
            return Command::none();
        }
        self.cursor -= 1;
        self.value.remove(self.cursor);
        self.changed()
    }

    fn delete_forward(&mut self) -> Command<Message> {
        if self.cursor >= self.value.len() {
            return Command::none();
        }
        self.value.remove(self.cursor);
        self.changed()
    }

    fn delete_word_backward(&mut self) -> Command<Message> {
        let start = self.cursor;
        while self.cursor > 0 && self.value[self.cursor - 1].is_whitespace() {
            self.cursor -= 1;
        }
        while self.cursor > 0 && !self.value[self.cursor - 1].is_whitespace() {
            self.cursor -= 1;
        }
        if self.cursor == start {
            return Command::none();
        }
        self.value.drain(self.cursor..start);
        self.changed()
    }

    fn line_start(&self, pos: usize) -> usize {
        self.value[..pos]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |i| i + 1)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.value[pos..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(self.value.len(), |i| pos + i)
    }

    fn move_vertical(&mut self, down: bool) {
        let start = self.line_start(self.cursor);
        let column = self.cursor - start;
        let target_start = if down {
            let end = self.line_end(self.cursor);
            if end >= self.value.len() {
                return;
            }
            end + 1
        } else {
            if start == 0 {
                return;
            }
            self.line_start(start - 1)
        };
        let target_end = self.line_end(target_start);
        self.cursor = (target_start + column).min(target_end);
    }

    fn display_chars(&self) -> Vec<char> {
        match self.echo_mode {
            EchoMode::Masked(mask) if !self.revealed => self
                .value
                .iter()
                .map(|&c| if c == '\n' { c } else { mask })
                .collect(),
            _ => self.value.clone(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('r'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.toggle_reveal();
                Command::none()
            }
            (KeyCode::Char('w'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.delete_word_backward()
            }
            (KeyCode::Backspace, m) if m.contains(KeyModifiers::ALT) => self.delete_word_backward(),
            (KeyCode::Char('u'), m) if m.contains(KeyModifiers::CONTROL) => {
                let start = self.line_start(self.cursor);
                if start == self.cursor {
                    return Command::none();
                }
                self.value.drain(start..self.cursor);
                self.cursor = start;
                self.changed()
            }
            (KeyCode::Char('k'), m) if m.contains(KeyModifiers::CONTROL) => {
                let end = self.line_end(self.cursor);
                if end == self.cursor {
                    return Command::none();
                }
                self.value.drain(self.cursor..end);
                self.changed()
            }
            (KeyCode::Char('a'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.cursor = self.line_start(self.cursor);
                Command::none()
            }
            (KeyCode::Char('e'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.cursor = self.line_end(self.cursor);
                Command::none()
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.insert(&[c]),
            (KeyCode::Backspace, _) => self.delete_backward(),
            (KeyCode::Delete, _) => self.delete_forward(),
            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                Command::none()
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.value.len());
                Command::none()
            }
            (KeyCode::Home, _) => {
                self.cursor = self.line_start(self.cursor);
                Command::none()
            }
            (KeyCode::End, _) => {
                self.cursor = self.line_end(self.cursor);
                Command::none()
            }
            (KeyCode::Up, _) if self.multiline => {
                self.move_vertical(false);
                Command::none()
            }
            (KeyCode::Down, _) if self.multiline => {
                self.move_vertical(true);
                Command::none()
            }
            (KeyCode::Enter, _) if self.multiline => self.insert(&['\n']),
            (KeyCode::Enter, _) => Command::message(Message::Submit),
            _ => Command::none(),
        }
    }

    /// Show or hide a masked value. No effect in [`EchoMode::Normal`].
    pub fn toggle_reveal(&mut self) {
        if matches!(self.echo_mode, EchoMode::Masked(_)) {
            self.revealed = !self.revealed;
        }
    }

    fn cursor_line<'a>(&self, chars: &[char], cursor: Option<usize>, width: usize) -> Line<'a> {
        let Some(cursor) = cursor else {
            return Line::styled(chars.iter().collect::<String>(), self.style.text);
        };

        // Scroll so the cursor cell fits in `width` columns.
        let mut start = cursor;
        let mut used = 1;
        while start > 0 {
            let w = chars[start - 1].width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            start -= 1;
        }

        let before: String = chars[start..cursor].iter().collect();
        let at = chars.get(cursor).map_or(" ".to_string(), |c| c.to_string());
        let after: String = chars.get(cursor + 1..).unwrap_or_default().iter().collect();
        let mut spans = Vec::new();
        if !before.is_empty() {
            spans.push(Span::styled(before, self.style.text));
        }
        spans.push(Span::styled(at, self.style.cursor));
        if !after.is_empty() {
            spans.push(Span::styled(after, self.style.text));
        }
        Line::from(spans)
    }
}

impl Component for TextField {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => self.handle_key(key),
            Message::Paste(text) if self.focus => {
                let chars: Vec<char> = if self.multiline {
                    text.chars().collect()
                } else {
                    text.chars()
                        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                        .collect()
                };
                self.insert(&chars)
            }
            Message::ToggleReveal => {
                self.toggle_reveal();
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        if self.value.is_empty() {
            let line = if self.focus {
                Line::from(vec![
                    Span::styled(" ", self.style.cursor),
                    Span::styled(self.placeholder.clone(), self.style.placeholder),
                ])
            } else {
                Line::styled(self.placeholder.clone(), self.style.placeholder)
            };
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let display = self.display_chars();
        let width = area.width as usize;
        let cursor = self.focus.then_some(self.cursor);

        if !self.multiline {
            let line = self.cursor_line(&display, cursor, width);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        // Split into lines, tracking which one holds the cursor.
        let mut lines: Vec<(usize, &[char])> = Vec::new();
        let mut start = 0;
        for (i, &c) in display.iter().enumerate() {
            if c == '\n' {
                lines.push((start, &display[start..i]));
                start = i + 1;
            }
        }
        lines.push((start, &display[start..]));

        let cursor_row = cursor.map_or(0, |pos| {
            lines
                .iter()
                .rposition(|(s, _)| *s <= pos)
                .unwrap_or(0)
        });
        let height = area.height as usize;
        let first = (cursor_row + 1).saturating_sub(height);

        let rendered: Vec<Line> = lines
            .iter()
            .enumerate()
            .skip(first)
            .take(height)
            .map(|(row, (s, chars))| {
                let col = cursor.filter(|_| row == cursor_row).map(|pos| pos - s);
                self.cursor_line(chars, col, width)
            })
            .collect();
        frame.render_widget(Paragraph::new(rendered), area);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::Harness;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn key_ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn typed(field: &mut TextField, text: &str) {
        for c in text.chars() {
            field.update(Message::KeyPress(key(KeyCode::Char(c))));
        }
    }

    #[test]
    fn new_field_is_empty() {
        let field = TextField::new("placeholder");
        assert_eq!(field.value(), "");
        assert!(field.is_empty());
    }

    #[test]
    fn typing_emits_changed() {
        let mut field = TextField::new("");
        field.focus();
        let cmd = field.update(Message::KeyPress(key(KeyCode::Char('h'))));
        assert_eq!(cmd.into_message(), Some(Message::Changed("h".into())));
    }

    #[test]
    fn unfocused_ignores_keys() {
        let mut field = TextField::new("");
        let cmd = field.update(Message::KeyPress(key(KeyCode::Char('h'))));
        assert!(cmd.is_none());
        assert!(field.is_empty());
    }

    #[test]
    fn cursor_movement_and_insert() {
        let mut field = TextField::new("");
        field.focus();
        typed(&mut field, "abc");
        field.update(Message::KeyPress(key(KeyCode::Left)));
        field.update(Message::KeyPress(key(KeyCode::Left)));
        typed(&mut field, "x");
        assert_eq!(field.value(), "axbc");
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut field = TextField::new("");
        field.focus();
        let cmd = field.update(Message::KeyPress(key(KeyCode::Backspace)));
        assert!(cmd.is_none());
    }

    #[test]
    fn ctrl_w_deletes_word() {
        let mut field = TextField::new("");
        field.focus();
        field.set_value("hello big world");
        field.update(Message::KeyPress(key_ctrl(KeyCode::Char('w'))));
        assert_eq!(field.value(), "hello big ");
    }

    #[test]
    fn ctrl_u_clears_to_line_start() {
        let mut field = TextField::new("");
        field.focus();
        field.set_value("hello world");
        field.update(Message::KeyPress(key_ctrl(KeyCode::Char('u'))));
        assert_eq!(field.value(), "");
        assert_eq!(field.cursor_position(), 0);
    }

    #[test]
    fn enter_submits_single_line() {
        let mut field = TextField::new("");
        field.focus();
        let cmd = field.update(Message::KeyPress(key(KeyCode::Enter)));
        assert_eq!(cmd.into_message(), Some(Message::Submit));
    }

    #[test]
    fn enter_inserts_newline_in_multiline() {
        let mut field = TextField::new("").multiline();
        field.focus();
        typed(&mut field, "ab");
        field.update(Message::KeyPress(key(KeyCode::Enter)));
        typed(&mut field, "c");
        assert_eq!(field.value(), "ab\nc");
    }

    #[test]
    fn vertical_movement_keeps_column() {
        let mut field = TextField::new("").multiline();
        field.focus();
        field.set_value("abcd\nxy");
        field.update(Message::KeyPress(key(KeyCode::Up)));
        assert_eq!(field.cursor_position(), 2);
        field.update(Message::KeyPress(key(KeyCode::Down)));
        assert_eq!(field.cursor_position(), 7);
    }

    #[test]
    fn paste_flattens_newlines_in_single_line() {
        let mut field = TextField::new("");
        field.focus();
        field.update(Message::Paste("a\nb".into()));
        assert_eq!(field.value(), "a b");
    }

    #[test]
    fn char_limit_truncates() {
        let mut field = TextField::new("").with_char_limit(3);
        field.focus();
        field.update(Message::Paste("abcdef".into()));
        assert_eq!(field.value(), "abc");
        let cmd = field.update(Message::KeyPress(key(KeyCode::Char('z'))));
        assert!(cmd.is_none());
    }

    #[test]
    fn masked_value_renders_hidden_until_revealed() {
        let mut field = TextField::new("").with_echo_mode(EchoMode::Masked('*'));
        field.set_value("secret");
        let mut h = Harness::new(field);
        assert!(h.render_string(10, 1).starts_with("******"));

        h.send(Message::ToggleReveal);
        assert!(h.component().is_revealed());
        assert!(h.render_string(10, 1).starts_with("secret"));
    }

    #[test]
    fn reveal_has_no_effect_when_unmasked() {
        let mut field = TextField::new("");
        field.toggle_reveal();
        assert!(!field.is_revealed());
    }

    #[test]
    fn placeholder_shown_when_empty() {
        let h = Harness::new(TextField::new("Enter your name"));
        assert!(h.render_string(20, 1).contains("Enter your name"));
    }

    #[test]
    fn long_value_scrolls_to_cursor() {
        let mut field = TextField::new("");
        field.focus();
        field.set_value("abcdefghijklmnop");
        let h = Harness::new(field);
        let screen = h.render_string(5, 1);
        assert!(screen.starts_with("mnop"));
    }
}
