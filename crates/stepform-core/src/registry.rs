//! The field registry: ordered field definitions, current values, and the
//! latest validation result per field.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ConfigError, FormError};
use crate::field::{FieldDefinition, FieldValue};
use crate::rule::{evaluate, ValidationResult};

/// Validation results keyed by field id.
pub type ValidationMap = BTreeMap<String, ValidationResult>;

/// The current value of every field that has one, keyed by field id.
///
/// Fields with neither a default nor user input are absent.  Serializes as a
/// flat JSON object (`{"name":"Al","terms":true}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormState {
    values: BTreeMap<String, FieldValue>,
}

impl FormState {
    /// The value of `id`, if set.
    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.values.get(id)
    }

    /// Whether `id` has a value.
    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// The number of fields with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field has a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(id, value)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Consume the state and return the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, FieldValue> {
        self.values
    }

    fn insert(&mut self, id: &str, value: FieldValue) {
        self.values.insert(id.to_string(), value);
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Owns the field list, the [`FormState`], and the [`ValidationMap`].
///
/// A field's result is recomputed synchronously on every
/// [`set_value`](FieldRegistry::set_value), so reading it right after always
/// reflects the latest value.  Fields never touched have no result and are
/// treated as valid until the first interaction or a full sweep.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<FieldDefinition>,
    index: HashMap<String, usize>,
    state: FormState,
    results: ValidationMap,
}

impl FieldRegistry {
    /// Register `fields`, rejecting duplicate ids and malformed definitions.
    pub fn new(fields: Vec<FieldDefinition>) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            field.check()?;
            if index.insert(field.id().to_string(), i).is_some() {
                return Err(ConfigError::DuplicateId(field.id().to_string()));
            }
        }

        let mut registry = Self {
            fields,
            index,
            state: FormState::default(),
            results: ValidationMap::new(),
        };
        registry.seed_defaults();
        Ok(registry)
    }

    /// All fields in declared order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// The number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field definition by id.
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.index.get(id).map(|&i| &self.fields[i])
    }

    /// The position of `id` in the field list.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// The current value of `id`, if any.
    pub fn value(&self, id: &str) -> Option<&FieldValue> {
        self.state.get(id)
    }

    /// The current form state.
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// The latest validation results.
    pub fn results(&self) -> &ValidationMap {
        &self.results
    }

    /// The latest validation result for `id`, if it has been validated.
    pub fn result(&self, id: &str) -> Option<&ValidationResult> {
        self.results.get(id)
    }

    /// Overwrite the value of `id` and recompute its validation result.
    ///
    /// Fails with [`FormError::UnknownField`] for an unregistered id,
    /// [`FormError::TypeMismatch`] when the value type does not match the
    /// field kind, and [`FormError::NotAnOption`] when a choice field gets a
    /// value outside its options.  An empty string clears a choice.
    pub fn set_value(
        &mut self,
        id: &str,
        value: impl Into<FieldValue>,
    ) -> Result<&ValidationResult, FormError> {
        let value = value.into();
        let field = self.lookup(id)?;
        let expected = field.kind().value_kind();
        if value.kind() != expected {
            warn!(field = id, %expected, "rejected value of the wrong type");
            return Err(FormError::TypeMismatch {
                id: id.to_string(),
                expected,
            });
        }
        if let Some(text) = value.as_str() {
            if field.kind().has_options() && !field.accepts_option(text) {
                warn!(field = id, value = text, "rejected value outside the options");
                return Err(FormError::NotAnOption {
                    id: id.to_string(),
                    value: text.to_string(),
                });
            }
        }

        let result = evaluate(field.rules(), Some(&value));
        debug!(field = id, valid = result.valid, "field value changed");
        self.state.insert(id, value);
        self.results.insert(id.to_string(), result);
        Ok(&self.results[id])
    }

    /// Evaluate the rules of `id` against its current value.
    ///
    /// This does not record the result.
    pub fn validate(&self, id: &str) -> Result<ValidationResult, FormError> {
        let field = self.lookup(id)?;
        Ok(evaluate(field.rules(), self.state.get(id)))
    }

    /// Evaluate every field, touched or not.
    ///
    /// This does not record the results.
    pub fn validate_all(&self) -> ValidationMap {
        self.fields
            .iter()
            .map(|f| (f.id().to_string(), evaluate(f.rules(), self.state.get(f.id()))))
            .collect()
    }

    /// Validate every field and replace the recorded results with the sweep.
    ///
    /// Returns the ids of invalid fields in declared order.
    pub fn revalidate_all(&mut self) -> Vec<String> {
        self.results = self.validate_all();
        self.invalid_in(0..self.fields.len())
    }

    /// Validate the fields at `range` and merge their results into the
    /// recorded ones, leaving other fields' results untouched.
    ///
    /// Returns the ids of invalid fields in the range, in declared order.
    pub fn revalidate_range(&mut self, range: Range<usize>) -> Vec<String> {
        let range = range.start.min(self.fields.len())..range.end.min(self.fields.len());
        for field in &self.fields[range.clone()] {
            let result = evaluate(field.rules(), self.state.get(field.id()));
            self.results.insert(field.id().to_string(), result);
        }
        self.invalid_in(range)
    }

    /// Restore default values and forget all validation results.
    pub fn reset(&mut self) {
        self.state = FormState::default();
        self.results.clear();
        self.seed_defaults();
    }

    fn invalid_in(&self, range: Range<usize>) -> Vec<String> {
        self.fields[range]
            .iter()
            .filter(|f| self.results.get(f.id()).is_some_and(|r| !r.valid))
            .map(|f| f.id().to_string())
            .collect()
    }

    fn lookup(&self, id: &str) -> Result<&FieldDefinition, FormError> {
        self.field(id).ok_or_else(|| {
            warn!(field = id, "unknown field id");
            FormError::UnknownField { id: id.to_string() }
        })
    }

    fn seed_defaults(&mut self) {
        for field in &self.fields {
            if let Some(value) = field.default_value() {
                self.state.insert(field.id(), value.clone());
            }
        }
    }
}
