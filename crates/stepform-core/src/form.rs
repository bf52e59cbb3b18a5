//! The multi-step form: a [`FieldRegistry`] plus a [`StepNavigator`].

use tracing::{info, warn};

use crate::error::{ConfigError, FormError};
use crate::field::{FieldDefinition, FieldValue};
use crate::navigator::StepNavigator;
use crate::notify::{Notice, Notifier};
use crate::registry::{FieldRegistry, FormState, ValidationMap};
use crate::rule::ValidationResult;
use crate::schema::{FormConfig, FormSchema};

/// Result of [`Form::advance`] and [`Form::retreat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The current step changed.
    Moved {
        /// Step index before the move.
        from: usize,
        /// Step index after the move.
        to: usize,
    },
    /// The current step has invalid fields; their results were recorded.
    Blocked {
        /// Ids of the invalid fields, in declared order.
        invalid: Vec<String>,
    },
    /// Nothing to do: already on the first (retreat) or last (advance) step.
    Unchanged,
}

/// Result of [`Form::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Every field is valid. Carries the finished record.
    Completed(FormState),
    /// Some fields are invalid; the full sweep was recorded.
    Rejected {
        /// Ids of the invalid fields, in declared order.
        invalid: Vec<String>,
    },
    /// Submit was requested before the last step.
    Unavailable {
        /// The current step index.
        step: usize,
    },
}

impl Submission {
    /// Whether the submission completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, Submission::Completed(_))
    }

    /// The user-facing notice for this outcome, if any.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Submission::Completed(_) => Some(Notice::success("Form submitted successfully")),
            Submission::Rejected { invalid } => Some(Notice::error(match invalid.len() {
                1 => "Please fix 1 invalid field".to_string(),
                n => format!("Please fix {n} invalid fields"),
            })),
            Submission::Unavailable { .. } => None,
        }
    }
}

/// Lifecycle phase of a [`Form`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Accepting input.
    #[default]
    Editing,
    /// The last submit completed. Any further change reopens editing.
    Submitted,
}

/// A multi-step form.
///
/// Owns the field values, validation results, and current step.  All
/// operations are synchronous; a read right after a mutation always reflects
/// it.
///
/// # Example
///
/// ```
/// use stepform_core::{FieldDefinition, FieldKind, Form, Rule, Submission};
///
/// let mut form = Form::new(vec![
///     FieldDefinition::new("name", FieldKind::Text, "Name")
///         .with_rule(Rule::Required)
///         .with_rule(Rule::MinLength(2)),
///     FieldDefinition::new("email", FieldKind::Email, "Email")
///         .with_rule(Rule::Required)
///         .with_rule(Rule::Email),
/// ])
/// .unwrap();
///
/// form.set_value("name", "Al").unwrap();
/// form.set_value("email", "a@b.com").unwrap();
/// assert!(matches!(form.submit(), Submission::Completed(_)));
/// ```
#[derive(Debug, Clone)]
pub struct Form {
    config: FormConfig,
    registry: FieldRegistry,
    navigator: StepNavigator,
    phase: Phase,
}

impl Form {
    /// Build a form with the default [`FormConfig`].
    pub fn new(fields: Vec<FieldDefinition>) -> Result<Self, ConfigError> {
        Self::with_config(FormConfig::default(), fields)
    }

    /// Build a form with an explicit configuration.
    pub fn with_config(
        config: FormConfig,
        fields: Vec<FieldDefinition>,
    ) -> Result<Self, ConfigError> {
        if fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        if config.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        let registry = FieldRegistry::new(fields)?;
        let navigator = StepNavigator::new(registry.len(), config.page_size);
        info!(
            title = %config.title,
            fields = registry.len(),
            steps = navigator.total_steps(),
            "form created"
        );
        Ok(Self {
            config,
            registry,
            navigator,
            phase: Phase::Editing,
        })
    }

    /// Build a form from a loaded schema.
    pub fn from_schema(schema: FormSchema) -> Result<Self, ConfigError> {
        let (config, fields) = schema.into_parts()?;
        Self::with_config(config, fields)
    }

    /// The form configuration.
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// The registry backing this form.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// The step navigator.
    pub fn navigator(&self) -> &StepNavigator {
        &self.navigator
    }

    /// The lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    // -- fields & values ----------------------------------------------------

    /// All fields in declared order.
    pub fn fields(&self) -> &[FieldDefinition] {
        self.registry.fields()
    }

    /// The fields of step `n`: `[n * page_size, (n + 1) * page_size)`.
    pub fn fields_for_step(&self, n: usize) -> &[FieldDefinition] {
        &self.registry.fields()[self.navigator.range_for_step(n)]
    }

    /// The fields of the current step.
    pub fn current_fields(&self) -> &[FieldDefinition] {
        self.fields_for_step(self.navigator.current_step())
    }

    /// Set a field value and revalidate that field.
    pub fn set_value(
        &mut self,
        id: &str,
        value: impl Into<FieldValue>,
    ) -> Result<&ValidationResult, FormError> {
        let result = self.registry.set_value(id, value)?;
        self.phase = Phase::Editing;
        Ok(result)
    }

    /// The current value of `id`.
    pub fn value(&self, id: &str) -> Option<&FieldValue> {
        self.registry.value(id)
    }

    /// The current form state.
    pub fn state(&self) -> &FormState {
        self.registry.state()
    }

    /// Validate `id` against its current value without recording it.
    pub fn validate(&self, id: &str) -> Result<ValidationResult, FormError> {
        self.registry.validate(id)
    }

    /// Validate every field without recording the results.
    pub fn validate_all(&self) -> ValidationMap {
        self.registry.validate_all()
    }

    /// The recorded validation results.
    pub fn results(&self) -> &ValidationMap {
        self.registry.results()
    }

    /// The recorded result for `id`.
    pub fn result(&self, id: &str) -> Option<&ValidationResult> {
        self.registry.result(id)
    }

    // -- navigation ---------------------------------------------------------

    /// The current step index.
    pub fn current_step(&self) -> usize {
        self.navigator.current_step()
    }

    /// The number of steps.
    pub fn total_steps(&self) -> usize {
        self.navigator.total_steps()
    }

    /// Whether the current step is the first.
    pub fn is_first_step(&self) -> bool {
        self.navigator.is_first_step()
    }

    /// Whether the current step is the last; submit is only available here.
    pub fn is_last_step(&self) -> bool {
        self.navigator.is_last_step()
    }

    /// Validate the current step's fields and move forward if they all pass.
    ///
    /// Fields on later steps are not validated.  On the last step the fields
    /// are still validated so their messages surface, but the step never
    /// changes: submitting is a separate operation.
    pub fn advance(&mut self) -> StepOutcome {
        let invalid = self
            .registry
            .revalidate_range(self.navigator.current_range());
        if !invalid.is_empty() {
            info!(step = self.current_step(), ?invalid, "advance blocked");
            return StepOutcome::Blocked { invalid };
        }

        let from = self.current_step();
        if !self.navigator.next() {
            return StepOutcome::Unchanged;
        }
        self.phase = Phase::Editing;
        info!(from, to = self.current_step(), "advanced");
        StepOutcome::Moved {
            from,
            to: self.current_step(),
        }
    }

    /// Move back one step without validating. Values are keyed by field id,
    /// so nothing entered on any step is lost.
    pub fn retreat(&mut self) -> StepOutcome {
        let from = self.current_step();
        if !self.navigator.prev() {
            return StepOutcome::Unchanged;
        }
        self.phase = Phase::Editing;
        info!(from, to = self.current_step(), "retreated");
        StepOutcome::Moved {
            from,
            to: self.current_step(),
        }
    }

    /// Validate the whole form and hand back the finished record if valid.
    ///
    /// On rejection every field's result is recorded and the current step is
    /// left as is, even when the first invalid field lives on an earlier step.
    pub fn submit(&mut self) -> Submission {
        if !self.is_last_step() {
            warn!(step = self.current_step(), "submit requested before the last step");
            return Submission::Unavailable {
                step: self.current_step(),
            };
        }

        let invalid = self.registry.revalidate_all();
        if !invalid.is_empty() {
            warn!(?invalid, "submission rejected");
            return Submission::Rejected { invalid };
        }

        self.phase = Phase::Submitted;
        info!(fields = self.registry.len(), "form submitted");
        Submission::Completed(self.registry.state().clone())
    }

    /// [`submit`](Form::submit), then report the outcome to `notifier`.
    pub fn submit_with(&mut self, notifier: &mut impl Notifier) -> Submission {
        let submission = self.submit();
        if let Some(notice) = submission.notice() {
            notifier.notify(notice);
        }
        submission
    }

    /// Restore defaults, clear results, and return to step 0.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.navigator.reset();
        self.phase = Phase::Editing;
        info!("form reset");
    }
}
