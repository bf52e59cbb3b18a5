//! Error types for form construction, mutation, and schema loading.
//!
//! Validation failures are *not* errors: they are returned as
//! [`ValidationResult`](crate::rule::ValidationResult) values.  Everything in
//! this module signals a programmer or integration mistake.

use crate::field::ValueKind;

/// Errors raised by [`Form`](crate::Form) and
/// [`FieldRegistry`](crate::registry::FieldRegistry) operations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FormError {
    /// A mutation or validation targeted an id that is not registered.
    #[error("unknown field `{id}`")]
    UnknownField {
        /// The offending field id.
        id: String,
    },
    /// A value of the wrong type was set on a field.
    #[error("field `{id}` expects a {expected} value")]
    TypeMismatch {
        /// The field id.
        id: String,
        /// The value type the field's kind requires.
        expected: ValueKind,
    },
    /// A single-select or radio field was given a value outside its options.
    #[error("field `{id}` has no option `{value}`")]
    NotAnOption {
        /// The field id.
        id: String,
        /// The rejected value.
        value: String,
    },
    /// The form definition is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Construction-time configuration errors.
///
/// These are raised eagerly when a form is built so that a malformed
/// definition never reaches the user as a confusing validation message.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// The form has no fields, so no step can exist.
    #[error("a form needs at least one field")]
    NoFields,
    /// The page size must be at least one field per step.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    /// Two fields share the same id.
    #[error("duplicate field id `{0}`")]
    DuplicateId(String),
    /// A single-select or radio field has no options.
    #[error("field `{0}` needs a non-empty options list")]
    MissingOptions(String),
    /// `min_length` is greater than `max_length`.
    #[error("field `{id}`: min length {min} exceeds max length {max}")]
    LengthBounds {
        /// The field id.
        id: String,
        /// Configured lower bound.
        min: usize,
        /// Configured upper bound.
        max: usize,
    },
    /// A rule that needs a parameter was declared without one.
    #[error("field `{id}`: rule `{rule}` is missing its `{parameter}` parameter")]
    MissingParameter {
        /// The field id.
        id: String,
        /// The rule identifier.
        rule: &'static str,
        /// The missing parameter name.
        parameter: &'static str,
    },
    /// A pattern rule's regular expression failed to compile.
    #[error("field `{id}`: invalid pattern: {reason}")]
    InvalidPattern {
        /// The field id.
        id: String,
        /// The regex compiler's message.
        reason: String,
    },
    /// The default value does not match the field kind's value type.
    #[error("field `{id}`: default value must be a {expected} value")]
    DefaultTypeMismatch {
        /// The field id.
        id: String,
        /// The value type the field's kind requires.
        expected: ValueKind,
    },
    /// A single-select or radio default is not one of the field's options.
    #[error("field `{id}`: default `{value}` is not one of its options")]
    DefaultNotInOptions {
        /// The field id.
        id: String,
        /// The configured default.
        value: String,
    },
}

/// Errors that can occur while loading a [`FormSchema`](crate::schema::FormSchema).
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The TOML document is malformed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    /// The JSON document is malformed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported schema format `{0}`")]
    UnsupportedFormat(String),
    /// The schema parsed but describes an invalid form.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
