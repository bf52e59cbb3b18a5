//! **stepform** -- multi-step validated forms for [`ratatui`].
//!
//! This is the umbrella crate: one dependency gives you the engine, the
//! widgets, and a terminal runner.
//!
//! ```toml
//! [dependencies]
//! stepform = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * Everything from [`stepform_core`] is available at the crate root
//!   ([`Form`], [`FieldDefinition`], [`Rule`], [`FormSchema`], ...).
//! * The [`widgets`] module re-exports [`stepform_widgets`].
//! * [`ratatui`] and [`crossterm`] are re-exported for custom views.
//!
//! # Quick start
//!
//! ```ignore
//! use stepform::{FieldDefinition, FieldKind, Form, Outcome, ProgramOptions, Rule};
//! use stepform::widgets::FormView;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let form = Form::new(vec![
//!         FieldDefinition::new("name", FieldKind::Text, "Name").with_rule(Rule::Required),
//!         FieldDefinition::new("email", FieldKind::Email, "Email")
//!             .with_rule(Rule::Required)
//!             .with_rule(Rule::Email),
//!     ])?;
//!
//!     if let Outcome::Submitted(state) = stepform::run(FormView::new(form), ProgramOptions::default())? {
//!         println!("{:?}", state.get("name"));
//!     }
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod runtime;

pub use runtime::{run, run_file, Outcome, OutputTarget, ProgramError, ProgramOptions};
pub use stepform_core::*;

pub mod widgets {
    pub use stepform_widgets::*;
}

pub use crossterm;
pub use ratatui;
