//! Multi-step form validation engine for **stepform**.
//!
//! `stepform-core` owns the state of a form -- field values, per-field
//! validation results, and the current step -- and the rules that move it.
//! It renders nothing and performs no I/O beyond optional schema loading; a
//! presentation layer (such as `stepform-widgets`) feeds it input events and
//! reads snapshots back.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`FieldDefinition`] | Immutable description of one field (kind, label, rules, options, default) |
//! | [`Rule`] / [`ValidationRule`] | A named check plus an optional message override |
//! | [`FieldRegistry`] | Field list, [`FormState`], and recorded [`ValidationResult`]s |
//! | [`StepNavigator`] | Fixed-size step partitioning and the current-step cursor |
//! | [`Form`] | Registry + navigator: `set_value`, `advance`, `retreat`, `submit` |
//! | [`FormSchema`] | TOML/JSON form description |
//! | [`Notifier`] | Capability the form reports submission outcomes through |
//!
//! # Flow
//!
//! 1. **build** -- [`Form::new`] checks the definitions and seeds defaults.
//! 2. **edit** -- [`Form::set_value`] stores a value and revalidates that field.
//! 3. **advance** -- [`Form::advance`] validates the current step only and
//!    moves forward when it passes; [`Form::retreat`] always moves back.
//! 4. **submit** -- on the last step, [`Form::submit`] validates every field
//!    and returns [`Submission::Completed`] with the finished [`FormState`].

pub mod error;
pub mod field;
pub mod form;
pub mod navigator;
pub mod notify;
pub mod registry;
pub mod rule;
pub mod schema;

pub use error::{ConfigError, FormError, SchemaError};
pub use field::{FieldDefinition, FieldKind, FieldValue, ValueKind};
pub use form::{Form, Phase, StepOutcome, Submission};
pub use navigator::{StepNavigator, DEFAULT_PAGE_SIZE};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use registry::{FieldRegistry, FormState, ValidationMap};
pub use rule::{Rule, ValidationResult, ValidationRule};
pub use schema::{FieldSpec, FormConfig, FormSchema, RuleName, ValidationSpec};

/// Re-exported so callers can build [`Rule::Pattern`] without a direct
/// dependency.
pub use regex::Regex;
