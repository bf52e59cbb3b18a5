use std::collections::VecDeque;
use std::io::{self, stderr, stdout, Stderr, Stdout, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use stepform_core::{ConfigError, Form, FormSchema, FormState, SchemaError};
use stepform_widgets::form_view::{self, FormView};
use stepform_widgets::Component;
use tracing::{debug, info};

/// Output target for the terminal UI.
///
/// Render to [`Stderr`](OutputTarget::Stderr) when stdout carries the
/// submitted record to another program.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
}

enum Output {
    Stdout(Stdout),
    Stderr(Stderr),
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(w) => w.write(buf),
            Output::Stderr(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(w) => w.flush(),
            Output::Stderr(w) => w.flush(),
        }
    }
}

impl Output {
    fn new(target: OutputTarget) -> Self {
        match target {
            OutputTarget::Stdout => Output::Stdout(stdout()),
            OutputTarget::Stderr => Output::Stderr(stderr()),
        }
    }
}

/// Errors from loading or running a form.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The form description could not be loaded.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The log subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl From<ConfigError> for ProgramError {
    fn from(e: ConfigError) -> Self {
        ProgramError::Schema(SchemaError::Config(e))
    }
}

/// Terminal options for [`run`].
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     output: OutputTarget::Stderr,
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Draw in the alternate screen (default: true).
    pub alt_screen: bool,
    /// Deliver pastes as one event (default: true).
    pub bracketed_paste: bool,
    /// Restore the terminal before a panic message prints (default: true).
    pub catch_panics: bool,
    /// How long to wait for input before a tick (default: 250ms).
    pub tick_rate: Duration,
    pub output: OutputTarget,
    /// Append `tracing` output to this file.
    pub log_file: Option<PathBuf>,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            alt_screen: true,
            bracketed_paste: true,
            catch_panics: true,
            tick_rate: Duration::from_millis(250),
            output: OutputTarget::default(),
            log_file: None,
        }
    }
}

/// How an interactive session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user submitted a valid form.
    Submitted(FormState),
    /// The user left without submitting.
    Cancelled,
}

/// Run `view` in the terminal until it is submitted or cancelled.
///
/// The terminal is restored before returning, on error as well.
pub fn run(mut view: FormView, options: ProgramOptions) -> Result<Outcome, ProgramError> {
    if let Some(path) = &options.log_file {
        crate::logging::init(path)?;
    }

    let mut terminal = init_terminal(&options)?;
    info!(title = %view.form().config().title, "form session started");
    let result = event_loop(&mut terminal, &mut view, &options);
    restore_terminal(&options)?;

    match &result {
        Ok(Outcome::Submitted(state)) => info!(fields = state.len(), "session submitted"),
        Ok(Outcome::Cancelled) => info!("session cancelled"),
        Err(e) => debug!(error = %e, "session failed"),
    }
    result
}

/// Load a TOML or JSON form description and [`run`] it.
pub fn run_file(path: impl AsRef<Path>, options: ProgramOptions) -> Result<Outcome, ProgramError> {
    let schema = FormSchema::from_path(path)?;
    let form = Form::from_schema(schema)?;
    run(FormView::new(form), options)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Output>>,
    view: &mut FormView,
    options: &ProgramOptions,
) -> Result<Outcome, ProgramError> {
    terminal.draw(|frame| {
        let area = frame.area();
        view.view(frame, area);
    })?;

    loop {
        let msg = if event::poll(options.tick_rate)? {
            match translate(event::read()?) {
                Some(msg) => msg,
                None => continue,
            }
        } else {
            form_view::Message::Tick(Instant::now())
        };

        if let Some(outcome) = dispatch(view, msg) {
            return Ok(outcome);
        }
        terminal.draw(|frame| {
            let area = frame.area();
            view.view(frame, area);
        })?;
    }
}

/// Map a terminal event to a form message. Resizes redraw on the next
/// loop pass and need no message.
fn translate(event: Event) -> Option<form_view::Message> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            Some(form_view::Message::KeyPress(key))
        }
        Event::Paste(text) => Some(form_view::Message::Paste(text)),
        _ => None,
    }
}

/// Feed `msg` and everything it emits through `view`, stopping at the first
/// terminal message.
fn dispatch(view: &mut FormView, msg: form_view::Message) -> Option<Outcome> {
    let mut queue = VecDeque::from([msg]);
    while let Some(msg) = queue.pop_front() {
        match msg {
            form_view::Message::Submitted(state) => return Some(Outcome::Submitted(state)),
            form_view::Message::Cancelled => return Some(Outcome::Cancelled),
            msg => queue.extend(view.update(msg).into_messages()),
        }
    }
    None
}

fn init_terminal(options: &ProgramOptions) -> Result<Terminal<CrosstermBackend<Output>>, ProgramError> {
    // Install once so repeated sessions don't stack hooks.
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let opts = options.clone();
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal(&opts);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = Output::new(options.output);
    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    if options.bracketed_paste {
        execute!(writer, EnableBracketedPaste)?;
    }
    execute!(writer, cursor::Hide)?;

    Ok(Terminal::new(CrosstermBackend::new(writer))?)
}

fn restore_terminal(options: &ProgramOptions) -> Result<(), ProgramError> {
    // Keep going past individual failures; report raw mode, which matters most.
    let raw = disable_raw_mode();
    let mut writer = Output::new(options.output);
    if options.bracketed_paste {
        execute!(writer, DisableBracketedPaste).ok();
    }
    execute!(writer, cursor::Show).ok();
    if options.alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};
    use stepform_core::{FieldDefinition, FieldKind, FieldValue, Rule};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn one_field_view() -> FormView {
        let form = Form::new(vec![
            FieldDefinition::new("name", FieldKind::Text, "Name").with_rule(Rule::Required)
        ])
        .unwrap();
        FormView::new(form)
    }

    #[test]
    fn translate_ignores_key_release() {
        let mut release = key(KeyCode::Char('a'));
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(Event::Key(release)), None);
        assert_eq!(translate(Event::Resize(80, 24)), None);
        assert_eq!(
            translate(Event::Paste("hi".into())),
            Some(form_view::Message::Paste("hi".into()))
        );
    }

    #[test]
    fn dispatch_returns_submitted_state() {
        let mut view = one_field_view();
        assert_eq!(
            dispatch(&mut view, form_view::Message::KeyPress(key(KeyCode::Char('A')))),
            None
        );
        let outcome = dispatch(&mut view, form_view::Message::KeyPress(key(KeyCode::Enter)));
        let expected: FormState = [("name", FieldValue::from("A"))].into_iter().collect();
        assert_eq!(outcome, Some(Outcome::Submitted(expected)));
    }

    #[test]
    fn dispatch_rejects_invalid_submit() {
        let mut view = one_field_view();
        let outcome = dispatch(&mut view, form_view::Message::KeyPress(key(KeyCode::Enter)));
        assert_eq!(outcome, None);
        assert_eq!(view.toasts().len(), 1);
    }

    #[test]
    fn dispatch_returns_cancelled_on_escape() {
        let mut view = one_field_view();
        let outcome = dispatch(&mut view, form_view::Message::KeyPress(key(KeyCode::Esc)));
        assert_eq!(outcome, Some(Outcome::Cancelled));
    }

    #[test]
    fn config_errors_convert() {
        let err: ProgramError = ConfigError::NoFields.into();
        assert!(matches!(err, ProgramError::Schema(SchemaError::Config(_))));
    }

    #[test]
    fn registration_demo_schema_builds() {
        let schema =
            FormSchema::from_toml_str(include_str!("../../../demos/registration.toml")).unwrap();
        let form = Form::from_schema(schema).unwrap();
        assert_eq!(form.config().title, "User Registration");
        assert_eq!(form.fields().len(), 5);
        assert_eq!(form.total_steps(), 3);
        assert_eq!(form.fields_for_step(2)[0].id(), "bio");
    }

    #[test]
    fn default_options() {
        let opts = ProgramOptions::default();
        assert!(opts.alt_screen);
        assert_eq!(opts.tick_rate, Duration::from_millis(250));
        assert_eq!(opts.output, OutputTarget::Stdout);
    }
}
