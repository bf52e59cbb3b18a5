//! Form configuration and declarative form schemas (TOML or JSON).
//!
//! A schema file describes the form header, the page size, and every field:
//!
//! ```toml
//! [form]
//! title = "User Registration"
//! page_size = 2
//!
//! [[fields]]
//! id = "password"
//! kind = "password"
//! label = "Password"
//! validation = { rules = ["required", "min-length"], min_length = 8 }
//! ```
//!
//! A field's `custom_message` replaces the built-in message of every rule on
//! that field.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, SchemaError};
use crate::field::{FieldDefinition, FieldKind, FieldValue};
use crate::navigator::DEFAULT_PAGE_SIZE;
use crate::rule::{Rule, ValidationRule};

/// Form-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Heading shown above the form.
    pub title: String,
    /// Text shown under the heading.
    pub description: String,
    /// Fields per step.
    pub page_size: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: "Dynamic Form".to_string(),
            description: "Please fill out the form below".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Rule identifiers accepted in schema files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleName {
    /// [`Rule::Required`].
    Required,
    /// [`Rule::Email`].
    Email,
    /// [`Rule::MinLength`], parameterised by `min_length`.
    MinLength,
    /// [`Rule::MaxLength`], parameterised by `max_length`.
    MaxLength,
    /// [`Rule::Pattern`], parameterised by `pattern`.
    Pattern,
}

/// The `validation` block of a [`FieldSpec`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationSpec {
    /// Rules in evaluation order.
    pub rules: Vec<RuleName>,
    /// Bound for `min-length`.
    pub min_length: Option<usize>,
    /// Bound for `max-length`.
    pub max_length: Option<usize>,
    /// Regular expression for `pattern`.
    pub pattern: Option<String>,
    /// Message override applied to every rule of the field.
    pub custom_message: Option<String>,
}

/// One field as written in a schema file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldSpec {
    /// Unique field id.
    pub id: String,
    /// Field kind (`type` is accepted as an alias).
    #[serde(alias = "type")]
    pub kind: FieldKind,
    /// Display label.
    pub label: String,
    /// Placeholder text.
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Choices for single-select and radio fields.
    #[serde(default)]
    pub options: Vec<String>,
    /// Initial value.
    #[serde(default)]
    pub default: Option<FieldValue>,
    /// Validation rules.
    #[serde(default)]
    pub validation: Option<ValidationSpec>,
}

impl FieldSpec {
    /// Convert into a typed [`FieldDefinition`].
    pub fn into_definition(self) -> Result<FieldDefinition, ConfigError> {
        let mut field = FieldDefinition::new(&self.id, self.kind, self.label);
        if let Some(placeholder) = self.placeholder {
            field = field.with_placeholder(placeholder);
        }
        if !self.options.is_empty() {
            field = field.with_options(self.options);
        }
        if let Some(default) = self.default {
            field = field.with_default(default);
        }

        let Some(validation) = self.validation else {
            return Ok(field);
        };
        for name in &validation.rules {
            let rule = build_rule(&self.id, *name, &validation)?;
            let rule = match &validation.custom_message {
                Some(message) => ValidationRule::new(rule).with_message(message),
                None => ValidationRule::new(rule),
            };
            field = field.with_rule(rule);
        }
        Ok(field)
    }
}

fn build_rule(id: &str, name: RuleName, spec: &ValidationSpec) -> Result<Rule, ConfigError> {
    let missing = |rule, parameter| ConfigError::MissingParameter {
        id: id.to_string(),
        rule,
        parameter,
    };
    Ok(match name {
        RuleName::Required => Rule::Required,
        RuleName::Email => Rule::Email,
        RuleName::MinLength => Rule::MinLength(
            spec.min_length
                .ok_or_else(|| missing("min-length", "min_length"))?,
        ),
        RuleName::MaxLength => Rule::MaxLength(
            spec.max_length
                .ok_or_else(|| missing("max-length", "max_length"))?,
        ),
        RuleName::Pattern => {
            let source = spec
                .pattern
                .as_deref()
                .ok_or_else(|| missing("pattern", "pattern"))?;
            Rule::Pattern(Regex::new(source).map_err(|e| ConfigError::InvalidPattern {
                id: id.to_string(),
                reason: e.to_string(),
            })?)
        }
    })
}

/// A complete form description: settings plus fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormSchema {
    /// Form-level settings.
    #[serde(default)]
    pub form: FormConfig,
    /// Fields in declared order.
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, SchemaError> {
        Ok(toml::from_str(source)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a `.toml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        debug!(path = %path.display(), "loading form schema");
        match extension {
            "toml" => Self::from_toml_str(&source),
            "json" => Self::from_json_str(&source),
            other => Err(SchemaError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Split into the form settings and typed field definitions.
    pub fn into_parts(self) -> Result<(FormConfig, Vec<FieldDefinition>), ConfigError> {
        let fields = self
            .fields
            .into_iter()
            .map(FieldSpec::into_definition)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((self.form, fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Form;

    const REGISTRATION: &str = r#"
        [form]
        title = "User Registration"
        description = "Create your account with just a few steps"

        [[fields]]
        id = "name"
        kind = "text"
        label = "Full Name"
        placeholder = "Enter your full name"
        validation = { rules = ["required", "min-length"], min_length = 2 }

        [[fields]]
        id = "password"
        kind = "password"
        label = "Password"
        validation = { rules = ["required", "min-length"], min_length = 8, custom_message = "Password must be at least 8 characters" }

        [[fields]]
        id = "role"
        type = "single-select"
        label = "Job Role"
        options = ["Developer", "Designer"]
        validation = { rules = ["required"] }

        [[fields]]
        id = "terms"
        kind = "checkbox"
        label = "Accept terms"
        default = false
    "#;

    #[test]
    fn parses_toml_schema() {
        let schema = FormSchema::from_toml_str(REGISTRATION).unwrap();
        assert_eq!(schema.form.title, "User Registration");
        assert_eq!(schema.form.page_size, 2);
        assert_eq!(schema.fields.len(), 4);
        assert_eq!(schema.fields[2].kind, FieldKind::SingleSelect);
        assert_eq!(schema.fields[3].default, Some(FieldValue::Bool(false)));
    }

    #[test]
    fn custom_message_applies_to_every_rule() {
        let schema = FormSchema::from_toml_str(REGISTRATION).unwrap();
        let mut form = Form::from_schema(schema).unwrap();
        let result = form.set_value("password", "").unwrap();
        assert_eq!(
            result.message.as_deref(),
            Some("Password must be at least 8 characters")
        );
        let result = form.set_value("password", "short").unwrap();
        assert_eq!(
            result.message.as_deref(),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn parses_json_schema() {
        let schema = FormSchema::from_json_str(
            r#"{
                "form": { "page_size": 3 },
                "fields": [
                    { "id": "zip", "kind": "text", "label": "Zip",
                      "validation": { "rules": ["pattern"], "pattern": "^[0-9]+$" } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(schema.form.page_size, 3);
        assert_eq!(schema.form.title, "Dynamic Form");
        let (_, fields) = schema.into_parts().unwrap();
        assert_eq!(fields[0].rules()[0].rule().name(), "pattern");
    }

    #[test]
    fn missing_rule_parameter() {
        let spec = FieldSpec {
            id: "bio".into(),
            kind: FieldKind::Multiline,
            label: "Bio".into(),
            placeholder: None,
            options: vec![],
            default: None,
            validation: Some(ValidationSpec {
                rules: vec![RuleName::MinLength],
                ..ValidationSpec::default()
            }),
        };
        assert_eq!(
            spec.into_definition().unwrap_err(),
            ConfigError::MissingParameter {
                id: "bio".into(),
                rule: "min-length",
                parameter: "min_length"
            }
        );
    }

    #[test]
    fn invalid_pattern() {
        let spec = FieldSpec {
            id: "code".into(),
            kind: FieldKind::Text,
            label: "Code".into(),
            placeholder: None,
            options: vec![],
            default: None,
            validation: Some(ValidationSpec {
                rules: vec![RuleName::Pattern],
                pattern: Some("([a-z".into()),
                ..ValidationSpec::default()
            }),
        };
        assert!(matches!(
            spec.into_definition(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let err = FormSchema::from_toml_str(
            r#"
            [[fields]]
            id = "x"
            kind = "slider"
            label = "X"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::Toml(_)));
    }

    #[test]
    fn unsupported_extension() {
        let path = std::env::temp_dir().join("stepform-schema-test.yaml");
        std::fs::write(&path, "fields: []").unwrap();
        let err = FormSchema::from_path(&path).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedFormat(ext) if ext == "yaml"));
        let _ = std::fs::remove_file(path);
    }
}
