//! Interactive presentation of a [`Form`].
//!
//! [`FormView`] owns a form plus one [`FieldEditor`] per field.  It renders
//! the current step's fields with their validation messages, routes keys to
//! the focused editor, and turns editor output into engine calls:
//! value changes go to [`Form::set_value`], Enter goes to
//! [`Form::advance`] or, on the last step, [`Form::submit_with`].
//!
//! | Key | Action |
//! |-----|--------|
//! | Tab / Shift+Tab | Next / previous field on this step |
//! | Enter, Ctrl+S | Next step, or submit on the last step |
//! | Esc | Previous step, or cancel on the first step |
//! | Ctrl+R | Show or hide a password |
//! | Ctrl+C | Cancel |

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use stepform_core::{Form, FormState, Rule, StepOutcome, Submission};
use tracing::{debug, warn};

use crate::chrome::field_block;
use crate::command::Command;
use crate::component::Component;
use crate::field_editor::{self, FieldEditor};
use crate::toast::{self, Toasts};

/// Messages for [`FormView`].
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    KeyPress(KeyEvent),
    Paste(String),
    /// Periodic tick; expires notices.
    Tick(Instant),
    /// Emitted when the last step submitted cleanly.
    Submitted(FormState),
    /// Emitted when the user abandons the form.
    Cancelled,
}

/// Style configuration for the form view.
#[derive(Debug, Clone)]
pub struct FormStyle {
    pub border: Style,
    pub title: Style,
    pub description: Style,
    pub progress_filled: Style,
    pub progress_empty: Style,
    pub step_counter: Style,
    pub error: Style,
    pub nav_hint: Style,
}

impl Default for FormStyle {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::Cyan),
            title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            description: Style::default().fg(Color::Gray),
            progress_filled: Style::default().fg(Color::Cyan),
            progress_empty: Style::default().fg(Color::DarkGray),
            step_counter: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),
            nav_hint: Style::default().fg(Color::DarkGray),
        }
    }
}

/// A multi-step form rendered in the terminal.
pub struct FormView {
    form: Form,
    editors: Vec<FieldEditor>,
    /// Index into `form.fields()`; always inside the current step.
    focus: usize,
    toasts: Toasts,
    style: FormStyle,
}

impl FormView {
    /// Wrap `form`, focusing the first field of its current step.
    pub fn new(form: Form) -> Self {
        let editors = form
            .fields()
            .iter()
            .map(|f| FieldEditor::for_field(f, form.value(f.id())))
            .collect();
        let focus = form.navigator().current_range().start;
        let mut view = Self {
            form,
            editors,
            focus,
            toasts: Toasts::new(),
            style: FormStyle::default(),
        };
        view.focus_field(focus);
        view
    }

    pub fn with_style(mut self, style: FormStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the notice area (for a custom TTL or width).
    pub fn with_toasts(mut self, toasts: Toasts) -> Self {
        self.toasts = toasts;
        self
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn into_form(self) -> Form {
        self.form
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    /// Id of the focused field.
    pub fn focused_field(&self) -> Option<&str> {
        self.form.fields().get(self.focus).map(|f| f.id())
    }

    /// Reset the form to its defaults and rebuild the editors.
    pub fn reset(&mut self) {
        self.form.reset();
        for (editor, field) in self.editors.iter_mut().zip(self.form.fields()) {
            *editor = FieldEditor::for_field(field, self.form.value(field.id()));
        }
        self.focus_field(self.form.navigator().current_range().start);
    }

    fn focus_field(&mut self, index: usize) {
        if let Some(editor) = self.editors.get_mut(self.focus) {
            editor.blur();
        }
        self.focus = index;
        if let Some(editor) = self.editors.get_mut(index) {
            editor.focus();
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let range = self.form.navigator().current_range();
        if range.is_empty() {
            return;
        }
        let len = range.len();
        let offset = self.focus.saturating_sub(range.start);
        let next = if forward {
            (offset + 1) % len
        } else {
            (offset + len - 1) % len
        };
        self.focus_field(range.start + next);
    }

    /// Focus the first of `invalid` that lives on the current step.
    fn focus_first_invalid(&mut self, invalid: &[String]) {
        let step = self.form.current_step();
        let target = invalid
            .iter()
            .filter_map(|id| self.form.registry().position(id))
            .find(|&i| self.form.navigator().step_of(i) == step);
        if let Some(index) = target {
            self.focus_field(index);
        }
    }

    fn step_changed(&mut self) {
        self.focus_field(self.form.navigator().current_range().start);
    }

    fn advance_or_submit(&mut self) -> Command<Message> {
        if self.form.is_last_step() {
            return match self.form.submit_with(&mut self.toasts) {
                Submission::Completed(state) => Command::message(Message::Submitted(state)),
                Submission::Rejected { invalid } => {
                    self.focus_first_invalid(&invalid);
                    Command::none()
                }
                Submission::Unavailable { .. } => Command::none(),
            };
        }

        match self.form.advance() {
            StepOutcome::Moved { .. } => self.step_changed(),
            StepOutcome::Blocked { invalid } => self.focus_first_invalid(&invalid),
            StepOutcome::Unchanged => {}
        }
        Command::none()
    }

    fn retreat_or_cancel(&mut self) -> Command<Message> {
        if self.form.is_first_step() {
            return Command::message(Message::Cancelled);
        }
        if let StepOutcome::Moved { .. } = self.form.retreat() {
            self.step_changed();
        }
        Command::none()
    }

    fn route_to_editor(&mut self, msg: field_editor::Message) -> Command<Message> {
        let Some(editor) = self.editors.get_mut(self.focus) else {
            return Command::none();
        };
        let emitted = editor.update(msg).into_messages();
        let mut out = Vec::new();
        for msg in emitted {
            out.push(self.handle_editor_output(msg));
        }
        Command::batch(out)
    }

    fn handle_editor_output(&mut self, msg: field_editor::Message) -> Command<Message> {
        match msg {
            field_editor::Message::Changed(value) => {
                let Some(id) = self.focused_field().map(str::to_string) else {
                    return Command::none();
                };
                match self.form.set_value(&id, value) {
                    Ok(result) => debug!(field = %id, valid = result.valid, "field edited"),
                    Err(e) => warn!(field = %id, error = %e, "editor produced a rejected value"),
                }
                Command::none()
            }
            field_editor::Message::Submit => self.advance_or_submit(),
            _ => Command::none(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        let captures_escape = self
            .editors
            .get(self.focus)
            .is_some_and(FieldEditor::captures_escape);

        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
                Command::message(Message::Cancelled)
            }
            (KeyCode::Char('s'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.advance_or_submit()
            }
            (KeyCode::Esc, _) if !captures_escape => self.retreat_or_cancel(),
            (KeyCode::Tab, _) => {
                self.cycle_focus(true);
                Command::none()
            }
            (KeyCode::BackTab, _) => {
                self.cycle_focus(false);
                Command::none()
            }
            _ => self.route_to_editor(field_editor::Message::KeyPress(key)),
        }
    }

    fn field_height(&self, index: usize) -> u16 {
        let error = self.error_for(index).map_or(0, |_| 1);
        self.editors.get(index).map_or(1, FieldEditor::height) + 2 + error
    }

    fn error_for(&self, index: usize) -> Option<&str> {
        let field = self.form.fields().get(index)?;
        self.form
            .result(field.id())
            .filter(|r| !r.valid)
            .and_then(|r| r.message.as_deref())
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect) {
        if area.width < 10 {
            return;
        }
        let total = self.form.total_steps();
        let current = self.form.current_step() + 1;

        let bar_width = (area.width as usize).saturating_sub(12).min(20);
        let filled = (current * bar_width) / total.max(1);
        let empty = bar_width.saturating_sub(filled);

        let spans = vec![
            Span::raw("["),
            Span::styled("\u{2588}".repeat(filled), self.style.progress_filled),
            Span::styled("\u{2591}".repeat(empty), self.style.progress_empty),
            Span::raw("] "),
            Span::styled(format!("Step {current}/{total}"), self.style.step_counter),
        ];
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_fields(&self, frame: &mut Frame, area: Rect) {
        let range = self.form.navigator().current_range();
        let mut constraints: Vec<Constraint> = range
            .clone()
            .map(|i| Constraint::Length(self.field_height(i)))
            .collect();
        constraints.push(Constraint::Min(0));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (row, index) in rows.iter().zip(range) {
            let Some(field) = self.form.fields().get(index) else {
                continue;
            };
            let error = self.error_for(index);
            let required = field.rules().iter().any(|r| matches!(r.rule(), Rule::Required));
            let label = if required {
                format!("{} *", field.label())
            } else {
                field.label().to_string()
            };

            let box_height = row.height.saturating_sub(error.map_or(0, |_| 1));
            let box_area = Rect::new(row.x, row.y, row.width, box_height);
            let block = field_block(&label, index == self.focus, error.is_some());
            let inner = block.inner(box_area);
            frame.render_widget(block, box_area);
            self.editors[index].view(frame, inner);

            if let Some(message) = error {
                let line_area = Rect::new(row.x + 1, row.y + box_height, row.width.saturating_sub(1), 1);
                if line_area.bottom() <= row.bottom() {
                    frame.render_widget(
                        Paragraph::new(Span::styled(message, self.style.error)),
                        line_area,
                    );
                }
            }
        }
    }

    fn render_nav_hints(&self, frame: &mut Frame, area: Rect) {
        let mut hints = vec!["Tab: Next field"];
        if self.form.is_first_step() {
            hints.push("Esc: Cancel");
        } else {
            hints.push("Esc: Back");
        }
        if self.form.is_last_step() {
            hints.push("Enter: Submit");
        } else {
            hints.push("Enter: Next");
        }
        hints.push("Ctrl+C: Quit");

        let text = hints.join("  \u{2502}  ");
        let paragraph = Paragraph::new(Line::from(Span::styled(text, self.style.nav_hint)))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}

impl Component for FormView {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => self.handle_key(key),
            Message::Paste(text) => self.route_to_editor(field_editor::Message::Paste(text)),
            Message::Tick(now) => {
                self.toasts.update(toast::Message::Tick(now));
                Command::none()
            }
            Message::Submitted(_) | Message::Cancelled => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let config = self.form.config();
        let block = Block::default()
            .title(config.title.as_str())
            .title_style(self.style.title)
            .borders(Borders::ALL)
            .border_style(self.style.border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Description
                Constraint::Length(1), // Progress bar
                Constraint::Length(1), // Gap
                Constraint::Min(1),    // Fields
                Constraint::Length(1), // Navigation hints
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(config.description.as_str(), self.style.description)),
            chunks[0],
        );
        self.render_progress(frame, chunks[1]);
        self.render_fields(frame, chunks[3]);
        self.render_nav_hints(frame, chunks[4]);

        self.toasts.view(frame, area);
    }

    fn focused(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::Harness;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use stepform_core::{FieldDefinition, FieldKind, FieldValue, FormConfig, NoticeLevel};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(h: &mut Harness<FormView>, text: &str) {
        for c in text.chars() {
            h.send(Message::KeyPress(key(KeyCode::Char(c))));
        }
    }

    /// name + email on step 0, terms on step 1.
    fn signup() -> FormView {
        let form = Form::new(vec![
            FieldDefinition::new("name", FieldKind::Text, "Name").with_rule(Rule::Required),
            FieldDefinition::new("email", FieldKind::Email, "Email")
                .with_rule(Rule::Required)
                .with_rule(Rule::Email),
            FieldDefinition::new("terms", FieldKind::Checkbox, "I agree")
                .with_rule(Rule::Required),
        ])
        .unwrap();
        FormView::new(form)
    }

    #[test]
    fn starts_on_first_field() {
        let view = signup();
        assert_eq!(view.focused_field(), Some("name"));
        assert_eq!(view.form().current_step(), 0);
    }

    #[test]
    fn typing_sets_value_on_form() {
        let mut h = Harness::new(signup());
        type_text(&mut h, "Al");
        assert_eq!(
            h.component().form().value("name"),
            Some(&FieldValue::from("Al"))
        );
        assert!(h.pending().is_empty());
    }

    #[test]
    fn tab_cycles_within_step() {
        let mut h = Harness::new(signup());
        h.send(Message::KeyPress(key(KeyCode::Tab)));
        assert_eq!(h.component().focused_field(), Some("email"));
        h.send(Message::KeyPress(key(KeyCode::Tab)));
        assert_eq!(h.component().focused_field(), Some("name"));
        h.send(Message::KeyPress(key(KeyCode::BackTab)));
        assert_eq!(h.component().focused_field(), Some("email"));
    }

    #[test]
    fn enter_with_invalid_step_stays_and_shows_errors() {
        let mut h = Harness::new(signup());
        h.send(Message::KeyPress(key(KeyCode::Tab)));
        h.send(Message::KeyPress(key(KeyCode::Enter)));
        let view = h.component();
        assert_eq!(view.form().current_step(), 0);
        assert_eq!(view.focused_field(), Some("name"));

        let screen = h.render_string(60, 20);
        assert!(screen.contains("This field is required"));
    }

    #[test]
    fn enter_with_valid_step_advances() {
        let mut h = Harness::new(signup());
        type_text(&mut h, "Al");
        h.send(Message::KeyPress(key(KeyCode::Tab)));
        type_text(&mut h, "al@example.com");
        h.send(Message::KeyPress(key(KeyCode::Enter)));
        assert_eq!(h.component().form().current_step(), 1);
        assert_eq!(h.component().focused_field(), Some("terms"));
        assert!(h.render_string(60, 20).contains("Step 2/2"));
    }

    #[test]
    fn esc_goes_back_then_cancels() {
        let mut h = Harness::new(signup());
        type_text(&mut h, "Al");
        h.send(Message::KeyPress(key(KeyCode::Tab)));
        type_text(&mut h, "al@example.com");
        h.send(Message::KeyPress(key(KeyCode::Enter)));

        h.send(Message::KeyPress(key(KeyCode::Esc)));
        assert_eq!(h.component().form().current_step(), 0);
        assert_eq!(
            h.component().form().value("email"),
            Some(&FieldValue::from("al@example.com"))
        );
        assert!(h.pending().is_empty());

        h.send(Message::KeyPress(key(KeyCode::Esc)));
        assert_eq!(h.pending(), &[Message::Cancelled]);
    }

    #[test]
    fn ctrl_c_cancels() {
        let mut h = Harness::new(signup());
        h.send(Message::KeyPress(ctrl_key(KeyCode::Char('c'))));
        assert_eq!(h.pending(), &[Message::Cancelled]);
    }

    #[test]
    fn rejected_submit_focuses_invalid_field_on_last_step() {
        let form = Form::new(vec![
            FieldDefinition::new("name", FieldKind::Text, "Name"),
            FieldDefinition::new("email", FieldKind::Email, "Email"),
            FieldDefinition::new("city", FieldKind::Text, "City").with_rule(Rule::Required),
            FieldDefinition::new("zip", FieldKind::Text, "Zip").with_rule(Rule::Required),
        ])
        .unwrap();
        let mut h = Harness::new(FormView::new(form));
        h.send(Message::KeyPress(key(KeyCode::Enter)));
        assert_eq!(h.component().focused_field(), Some("city"));

        type_text(&mut h, "Oslo");
        h.send(Message::KeyPress(key(KeyCode::Enter)));
        assert!(h.pending().is_empty());
        assert_eq!(h.component().form().current_step(), 1);
        assert_eq!(h.component().focused_field(), Some("zip"));
    }

    #[test]
    fn submit_on_last_step_emits_state() {
        let mut h = Harness::new(signup());
        type_text(&mut h, "Al");
        h.send(Message::KeyPress(key(KeyCode::Tab)));
        type_text(&mut h, "al@example.com");
        h.send(Message::KeyPress(key(KeyCode::Enter)));

        h.send(Message::KeyPress(key(KeyCode::Enter)));
        assert!(h.pending().is_empty());
        let notice = h.component().toasts().notices().last().cloned();
        assert_eq!(notice.map(|n| n.level), Some(NoticeLevel::Error));

        h.send(Message::KeyPress(key(KeyCode::Char(' '))));
        h.send(Message::KeyPress(ctrl_key(KeyCode::Char('s'))));
        let expected: FormState = [
            ("name", FieldValue::from("Al")),
            ("email", FieldValue::from("al@example.com")),
            ("terms", FieldValue::Bool(true)),
        ]
        .into_iter()
        .collect();
        assert_eq!(h.pending(), &[Message::Submitted(expected)]);
        assert_eq!(
            h.component().toasts().notices().last().map(|n| n.text.as_str()),
            Some("Form submitted successfully")
        );
    }

    #[test]
    fn open_select_keeps_escape() {
        let form = Form::new(vec![
            FieldDefinition::new("role", FieldKind::SingleSelect, "Role")
                .with_options(["User", "Admin"]),
        ])
        .unwrap();
        let mut h = Harness::new(FormView::new(form));
        h.send(Message::KeyPress(key(KeyCode::Char(' '))));
        h.send(Message::KeyPress(key(KeyCode::Esc)));
        assert!(h.pending().is_empty());
        h.send(Message::KeyPress(key(KeyCode::Esc)));
        assert_eq!(h.pending(), &[Message::Cancelled]);
    }

    #[test]
    fn renders_header_and_required_marker() {
        let config = FormConfig {
            title: "Sign up".into(),
            description: "Tell us about yourself".into(),
            page_size: 2,
        };
        let form = Form::with_config(
            config,
            vec![FieldDefinition::new("name", FieldKind::Text, "Name").with_rule(Rule::Required)],
        )
        .unwrap();
        let h = Harness::new(FormView::new(form));
        let screen = h.render_string(80, 12);
        assert!(screen.contains("Sign up"));
        assert!(screen.contains("Tell us about yourself"));
        assert!(screen.contains("Name *"));
        assert!(screen.contains("Step 1/1"));
        assert!(screen.contains("Enter: Submit"));
    }

    #[test]
    fn reset_restores_defaults() {
        let form = Form::new(vec![
            FieldDefinition::new("plan", FieldKind::Radio, "Plan")
                .with_options(["Free", "Pro"])
                .with_default("Free"),
        ])
        .unwrap();
        let mut h = Harness::new(FormView::new(form));
        h.send(Message::KeyPress(key(KeyCode::Right)));
        assert_eq!(h.component().form().value("plan"), Some(&FieldValue::from("Pro")));

        h.component_mut().reset();
        assert_eq!(h.component().form().value("plan"), Some(&FieldValue::from("Free")));
        assert!(h.render_string(60, 12).contains("(•) Free"));
    }
}
