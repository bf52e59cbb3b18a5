//! Pick-one fields: a collapsible select list and an inline radio group.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::command::Command;
use crate::component::Component;

/// Placeholder shown by a select with nothing chosen.
pub const SELECT_PLACEHOLDER: &str = "Select an option";

/// How the options are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMode {
    /// One trigger line that expands into a list.
    Select,
    /// All options on one line, exactly one marked.
    Radio,
}

/// Messages for the choice component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A key press forwarded to the component.
    KeyPress(KeyEvent),
    /// Emitted when the chosen option changes, carrying its value.
    Changed(String),
    /// Emitted when Enter is pressed while the list is closed.
    Submit,
}

/// Visual style for [`ChoiceField`].
#[derive(Debug, Clone)]
pub struct ChoiceStyle {
    pub normal: Style,
    pub highlighted: Style,
    pub placeholder: Style,
    pub highlight_symbol: String,
}

impl Default for ChoiceStyle {
    fn default() -> Self {
        Self {
            normal: Style::default(),
            highlighted: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            placeholder: Style::default().fg(Color::DarkGray),
            highlight_symbol: "▸ ".to_string(),
        }
    }
}

/// A single-choice field over a fixed option list.
pub struct ChoiceField {
    options: Vec<String>,
    selected: Option<usize>,
    highlighted: usize,
    mode: ChoiceMode,
    open: bool,
    focus: bool,
    placeholder: String,
    max_visible: usize,
    style: ChoiceStyle,
}

impl ChoiceField {
    /// A collapsible select list.
    pub fn select(options: Vec<String>) -> Self {
        Self::new(options, ChoiceMode::Select)
    }

    /// An inline radio group.
    pub fn radio(options: Vec<String>) -> Self {
        Self::new(options, ChoiceMode::Radio)
    }

    fn new(options: Vec<String>, mode: ChoiceMode) -> Self {
        Self {
            options,
            selected: None,
            highlighted: 0,
            mode,
            open: false,
            focus: false,
            placeholder: SELECT_PLACEHOLDER.to_string(),
            max_visible: 6,
            style: ChoiceStyle::default(),
        }
    }

    /// Set the text shown when nothing is chosen.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Limit how many options an open list shows at once.
    pub fn with_max_visible(mut self, max: usize) -> Self {
        self.max_visible = max.max(1);
        self
    }

    pub fn with_style(mut self, style: ChoiceStyle) -> Self {
        self.style = style;
        self
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove focus and collapse the list.
    pub fn blur(&mut self) {
        self.focus = false;
        self.open = false;
    }

    pub fn mode(&self) -> ChoiceMode {
        self.mode
    }

    /// Whether the select list is expanded.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i).map(String::as_str))
    }

    /// Choose the option equal to `value`, or clear the choice when no
    /// option matches.
    pub fn set_value(&mut self, value: &str) {
        self.selected = self.options.iter().position(|o| o == value);
        if let Some(i) = self.selected {
            self.highlighted = i;
        }
    }

    /// Rows needed to draw the current state, without borders.
    pub fn height(&self) -> u16 {
        match self.mode {
            ChoiceMode::Radio => 1,
            ChoiceMode::Select if self.open => {
                1 + self.options.len().min(self.max_visible) as u16
            }
            ChoiceMode::Select => 1,
        }
    }

    fn choose(&mut self, index: usize) -> Command<Message> {
        self.highlighted = index;
        if self.selected == Some(index) {
            return Command::none();
        }
        match self.options.get(index) {
            Some(value) => {
                self.selected = Some(index);
                Command::message(Message::Changed(value.clone()))
            }
            None => Command::none(),
        }
    }

    fn highlight_prev(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    fn highlight_next(&mut self) {
        if self.highlighted + 1 < self.options.len() {
            self.highlighted += 1;
        }
    }

    fn handle_select_key(&mut self, key: KeyEvent) -> Command<Message> {
        if self.open {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.highlight_prev(),
                KeyCode::Down | KeyCode::Char('j') => self.highlight_next(),
                KeyCode::Home => self.highlighted = 0,
                KeyCode::End => self.highlighted = self.options.len().saturating_sub(1),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.open = false;
                    return self.choose(self.highlighted);
                }
                KeyCode::Esc => self.open = false,
                _ => {}
            }
            return Command::none();
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Down if !self.options.is_empty() => {
                self.open = true;
                self.highlighted = self.selected.unwrap_or(0);
                Command::none()
            }
            KeyCode::Enter => Command::message(Message::Submit),
            _ => Command::none(),
        }
    }

    fn handle_radio_key(&mut self, key: KeyEvent) -> Command<Message> {
        if self.options.is_empty() {
            return match key.code {
                KeyCode::Enter => Command::message(Message::Submit),
                _ => Command::none(),
            };
        }
        match key.code {
            KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
                self.highlight_prev();
                self.choose(self.highlighted)
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => {
                self.highlight_next();
                self.choose(self.highlighted)
            }
            KeyCode::Char(' ') => self.choose(self.highlighted),
            KeyCode::Enter => Command::message(Message::Submit),
            _ => Command::none(),
        }
    }

    fn trigger_line(&self) -> Line<'_> {
        let text = match self.selected_value() {
            Some(value) => Span::styled(value, self.style.normal),
            None => Span::styled(self.placeholder.as_str(), self.style.placeholder),
        };
        let arrow = if self.open { " ▾" } else { " ▸" };
        Line::from(vec![text, Span::styled(arrow, self.style.placeholder)])
    }

    fn radio_line(&self) -> Line<'_> {
        let mut spans = Vec::with_capacity(self.options.len() * 2);
        for (i, option) in self.options.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            let mark = if self.selected == Some(i) { "(•) " } else { "( ) " };
            let style = if self.focus && i == self.highlighted {
                self.style.highlighted
            } else {
                self.style.normal
            };
            spans.push(Span::styled(format!("{mark}{option}"), style));
        }
        Line::from(spans)
    }
}

impl Component for ChoiceField {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => match self.mode {
                ChoiceMode::Select => self.handle_select_key(key),
                ChoiceMode::Radio => self.handle_radio_key(key),
            },
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        if self.mode == ChoiceMode::Radio {
            frame.render_widget(Paragraph::new(self.radio_line()), area);
            return;
        }

        let mut lines = vec![self.trigger_line()];
        if self.open {
            let visible = self.max_visible.min(area.height.saturating_sub(1) as usize);
            let offset = (self.highlighted + 1).saturating_sub(visible);
            let pad = " ".repeat(self.style.highlight_symbol.chars().count());
            for (i, option) in self.options.iter().enumerate().skip(offset).take(visible) {
                let line = if i == self.highlighted {
                    Line::styled(
                        format!("{}{option}", self.style.highlight_symbol),
                        self.style.highlighted,
                    )
                } else {
                    Line::styled(format!("{pad}{option}"), self.style.normal)
                };
                lines.push(line);
            }
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::Harness;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn opts() -> Vec<String> {
        vec!["User".into(), "Admin".into(), "Guest".into()]
    }

    #[test]
    fn select_starts_empty_with_placeholder() {
        let h = Harness::new(ChoiceField::select(opts()));
        assert_eq!(h.component().selected_value(), None);
        assert!(h.render_string(30, 1).contains(SELECT_PLACEHOLDER));
    }

    #[test]
    fn select_open_navigate_choose() {
        let mut field = ChoiceField::select(opts());
        field.focus();
        field.update(Message::KeyPress(key(KeyCode::Char(' '))));
        assert!(field.is_open());
        assert_eq!(field.height(), 4);

        field.update(Message::KeyPress(key(KeyCode::Down)));
        let cmd = field.update(Message::KeyPress(key(KeyCode::Enter)));
        assert_eq!(cmd.into_message(), Some(Message::Changed("Admin".into())));
        assert!(!field.is_open());
        assert_eq!(field.selected_value(), Some("Admin"));
    }

    #[test]
    fn esc_collapses_without_choosing() {
        let mut field = ChoiceField::select(opts());
        field.focus();
        field.update(Message::KeyPress(key(KeyCode::Down)));
        field.update(Message::KeyPress(key(KeyCode::Down)));
        let cmd = field.update(Message::KeyPress(key(KeyCode::Esc)));
        assert!(cmd.is_none());
        assert!(!field.is_open());
        assert_eq!(field.selected_index(), None);
    }

    #[test]
    fn enter_on_closed_select_submits() {
        let mut field = ChoiceField::select(opts());
        field.focus();
        let cmd = field.update(Message::KeyPress(key(KeyCode::Enter)));
        assert_eq!(cmd.into_message(), Some(Message::Submit));
    }

    #[test]
    fn rechoosing_same_option_is_silent() {
        let mut field = ChoiceField::select(opts());
        field.focus();
        field.set_value("User");
        field.update(Message::KeyPress(key(KeyCode::Char(' '))));
        let cmd = field.update(Message::KeyPress(key(KeyCode::Enter)));
        assert!(cmd.is_none());
    }

    #[test]
    fn set_value_unknown_clears() {
        let mut field = ChoiceField::select(opts());
        field.set_value("Guest");
        assert_eq!(field.selected_index(), Some(2));
        field.set_value("nobody");
        assert_eq!(field.selected_index(), None);
    }

    #[test]
    fn radio_arrows_choose_immediately() {
        let mut field = ChoiceField::radio(opts());
        field.focus();
        let cmd = field.update(Message::KeyPress(key(KeyCode::Right)));
        assert_eq!(cmd.into_message(), Some(Message::Changed("Admin".into())));
        let cmd = field.update(Message::KeyPress(key(KeyCode::Left)));
        assert_eq!(cmd.into_message(), Some(Message::Changed("User".into())));
    }

    #[test]
    fn radio_space_selects_highlighted() {
        let mut field = ChoiceField::radio(opts());
        field.focus();
        let cmd = field.update(Message::KeyPress(key(KeyCode::Char(' '))));
        assert_eq!(cmd.into_message(), Some(Message::Changed("User".into())));
    }

    #[test]
    fn radio_renders_marks() {
        let mut field = ChoiceField::radio(opts());
        field.set_value("Admin");
        let h = Harness::new(field);
        let screen = h.render_string(40, 1);
        assert!(screen.contains("( ) User"));
        assert!(screen.contains("(•) Admin"));
    }

    #[test]
    fn unfocused_ignores_keys() {
        let mut field = ChoiceField::radio(opts());
        let cmd = field.update(Message::KeyPress(key(KeyCode::Right)));
        assert!(cmd.is_none());
    }
}
