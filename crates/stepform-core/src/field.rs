//! Field definitions, kinds, and values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rule::{Rule, ValidationRule};

/// The kind of input a field collects.
///
/// Presentation layers match on this exhaustively to pick an editor, so a new
/// kind is a compile-time-checked addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    /// Single-line free text.
    Text,
    /// Single-line text expected to hold an email address.
    Email,
    /// Single-line text displayed masked.
    Password,
    /// Multi-line free text.
    Multiline,
    /// One choice out of `options`, shown as a picker.
    SingleSelect,
    /// A boolean toggle.
    Checkbox,
    /// One choice out of `options`, shown inline.
    Radio,
}

impl FieldKind {
    /// The value type a field of this kind holds.
    pub fn value_kind(self) -> ValueKind {
        match self {
            FieldKind::Checkbox => ValueKind::Boolean,
            FieldKind::Text
            | FieldKind::Email
            | FieldKind::Password
            | FieldKind::Multiline
            | FieldKind::SingleSelect
            | FieldKind::Radio => ValueKind::Text,
        }
    }

    /// Whether the kind chooses from an `options` list.
    pub fn has_options(self) -> bool {
        matches!(self, FieldKind::SingleSelect | FieldKind::Radio)
    }
}

/// The two value types a field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A string value.
    Text,
    /// A boolean value.
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Text => f.write_str("text"),
            ValueKind::Boolean => f.write_str("boolean"),
        }
    }
}

/// The current value of a field.
///
/// Serializes untagged, so a form record renders as plain JSON strings and
/// booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A string value (text-like kinds and choices).
    Text(String),
    /// A boolean value (checkboxes).
    Bool(bool),
}

impl FieldValue {
    /// The value type of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::Bool(_) => ValueKind::Boolean,
        }
    }

    /// `false` for an empty string or `false`.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Bool(b) => *b,
        }
    }

    /// The string contents, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Bool(_) => None,
        }
    }

    /// The boolean contents, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Bool(b) => Some(*b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// An immutable description of one form field.
///
/// # Example
///
/// ```
/// use stepform_core::{FieldDefinition, FieldKind, Rule, ValidationRule};
///
/// let password = FieldDefinition::new("password", FieldKind::Password, "Password")
///     .with_placeholder("Create a strong password")
///     .with_rule(Rule::Required)
///     .with_rule(
///         ValidationRule::new(Rule::MinLength(8))
///             .with_message("Password must be at least 8 characters"),
///     );
/// assert_eq!(password.rules().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    id: String,
    kind: FieldKind,
    label: String,
    placeholder: Option<String>,
    rules: Vec<ValidationRule>,
    options: Vec<String>,
    default_value: Option<FieldValue>,
}

impl FieldDefinition {
    /// Create a field with no rules, options, or default.
    pub fn new(id: impl Into<String>, kind: FieldKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            placeholder: None,
            rules: Vec::new(),
            options: Vec::new(),
            default_value: None,
        }
    }

    /// Set the placeholder text.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Append a validation rule. Rules are evaluated in the order added.
    pub fn with_rule(mut self, rule: impl Into<ValidationRule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Set the choices for single-select and radio fields.
    pub fn with_options(mut self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set the initial value.
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// The unique field id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The field kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The placeholder text, if any.
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// The validation rules in evaluation order.
    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// The choices for single-select and radio fields.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The initial value, if any.
    pub fn default_value(&self) -> Option<&FieldValue> {
        self.default_value.as_ref()
    }

    /// Whether `value` may be stored in this choice field: one of the
    /// options, or empty for "nothing chosen".
    pub(crate) fn accepts_option(&self, value: &str) -> bool {
        value.is_empty() || self.options.iter().any(|o| o == value)
    }

    /// Check the definition for configuration mistakes.
    pub(crate) fn check(&self) -> Result<(), ConfigError> {
        if self.kind.has_options() && self.options.is_empty() {
            return Err(ConfigError::MissingOptions(self.id.clone()));
        }

        let expected = self.kind.value_kind();
        if let Some(default) = &self.default_value {
            if default.kind() != expected {
                return Err(ConfigError::DefaultTypeMismatch {
                    id: self.id.clone(),
                    expected,
                });
            }
            if let Some(value) = default.as_str() {
                if self.kind.has_options() && !self.accepts_option(value) {
                    return Err(ConfigError::DefaultNotInOptions {
                        id: self.id.clone(),
                        value: value.to_string(),
                    });
                }
            }
        }

        // Every length rule applies, so the tightest pair decides.
        let min = self
            .rules
            .iter()
            .filter_map(|r| match r.rule() {
                Rule::MinLength(n) => Some(*n),
                _ => None,
            })
            .max();
        let max = self
            .rules
            .iter()
            .filter_map(|r| match r.rule() {
                Rule::MaxLength(n) => Some(*n),
                _ => None,
            })
            .min();
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ConfigError::LengthBounds {
                    id: self.id.clone(),
                    min,
                    max,
                });
            }
        }

        Ok(())
    }
}
