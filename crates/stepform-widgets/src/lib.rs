//! Terminal widgets for **stepform** forms.
//!
//! Every widget implements [`Component`]: input arrives as a message,
//! [`Component::update`] returns a [`Command`] with messages for the parent,
//! and [`Component::view`] draws into a [`ratatui`] frame.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`form_view`] | The whole form: header, progress, current step, hints, notices |
//! | [`field_editor`] | The editor for one field, chosen by field kind |
//! | [`text_field`] | Single-line, masked, and multiline text entry |
//! | [`choice`] | Select list and radio group |
//! | [`checkbox`] | Boolean toggle |
//! | [`toast`] | Expiring notices; the form's [`Notifier`](stepform_core::Notifier) |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`chrome`] | Field border styling |
//! | [`harness`] | Headless driver for tests |

pub mod checkbox;
pub mod choice;
pub mod chrome;
pub mod command;
pub mod component;
pub mod field_editor;
pub mod form_view;
pub mod harness;
pub mod text_field;
pub mod toast;

pub use command::Command;
pub use component::Component;
pub use field_editor::FieldEditor;
pub use form_view::FormView;
pub use harness::Harness;
pub use toast::Toasts;
