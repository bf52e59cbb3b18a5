//! Validation rules and rule evaluation.
//!
//! A field's rules are evaluated in declared order and evaluation stops at
//! the first failure, so a field with `[Required, MinLength(8)]` and an empty
//! value reports only the required message.

use std::sync::LazyLock;

use regex::Regex;

use crate::field::FieldValue;

// Constant literal; compiling it cannot fail.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// A named validation check with its parameters.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Fails on an absent value, an empty string, or `false`.
    Required,
    /// Fails on a non-empty string that is not shaped like `local@domain.tld`.
    Email,
    /// Fails on a string shorter than the bound (in characters).
    MinLength(usize),
    /// Fails on a string longer than the bound (in characters).
    MaxLength(usize),
    /// Fails on a string the expression does not match.
    Pattern(Regex),
}

impl Rule {
    /// The rule identifier used in schema files and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Email => "email",
            Rule::MinLength(_) => "min-length",
            Rule::MaxLength(_) => "max-length",
            Rule::Pattern(_) => "pattern",
        }
    }

    /// The message reported when no override is configured.
    pub fn default_message(&self) -> String {
        match self {
            Rule::Required => "This field is required".to_string(),
            Rule::Email => "Invalid email address".to_string(),
            Rule::MinLength(n) => format!("Minimum {n} characters required"),
            Rule::MaxLength(n) => format!("Maximum {n} characters allowed"),
            Rule::Pattern(_) => "Invalid format".to_string(),
        }
    }

    /// Whether `value` passes this rule.
    ///
    /// Only `Required` looks at absent and boolean values; the other rules
    /// apply to strings and pass anything else.
    pub fn passes(&self, value: Option<&FieldValue>) -> bool {
        match (self, value.and_then(FieldValue::as_str)) {
            (Rule::Required, _) => value.is_some_and(FieldValue::is_truthy),
            (_, None) => true,
            (Rule::Email, Some(text)) => text.is_empty() || EMAIL.is_match(text),
            (Rule::MinLength(n), Some(text)) => text.chars().count() >= *n,
            (Rule::MaxLength(n), Some(text)) => text.chars().count() <= *n,
            (Rule::Pattern(re), Some(text)) => re.is_match(text),
        }
    }
}

/// A [`Rule`] paired with an optional message override.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    rule: Rule,
    message: Option<String>,
}

impl ValidationRule {
    /// Wrap a rule with its built-in message.
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            message: None,
        }
    }

    /// Override the message reported when this rule fails.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The underlying rule.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// The override message, if configured.
    pub fn custom_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The message to report on failure: the override, else the default.
    pub fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.rule.default_message())
    }
}

impl From<Rule> for ValidationRule {
    fn from(rule: Rule) -> Self {
        ValidationRule::new(rule)
    }
}

/// The outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether every rule passed.
    pub valid: bool,
    /// The first failing rule's message.
    pub message: Option<String>,
}

impl ValidationResult {
    /// A passing result.
    pub fn pass() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    /// A failing result with the given message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }

    /// Whether the field is valid.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Evaluate `rules` against `value`, short-circuiting on the first failure.
pub fn evaluate(rules: &[ValidationRule], value: Option<&FieldValue>) -> ValidationResult {
    rules
        .iter()
        .find(|r| !r.rule().passes(value))
        .map(|r| ValidationResult::fail(r.message()))
        .unwrap_or_else(ValidationResult::pass)
}
