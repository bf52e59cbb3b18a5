//! Step partitioning and the current-step cursor.

use std::ops::Range;

/// The default number of fields per step.
pub const DEFAULT_PAGE_SIZE: usize = 2;

/// Partitions `field_count` fields into consecutive pages of `page_size` and
/// tracks the current page.
///
/// `current` is always in `0..total_steps()`.  The navigator itself does not
/// validate; [`Form`](crate::Form) gates [`next`](StepNavigator::next) on the
/// current step's results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepNavigator {
    page_size: usize,
    field_count: usize,
    current: usize,
}

impl StepNavigator {
    /// Create a navigator starting at step 0.
    ///
    /// Both arguments must be non-zero; [`Form::new`](crate::Form::new)
    /// checks this before constructing one.
    pub(crate) fn new(field_count: usize, page_size: usize) -> Self {
        Self {
            page_size,
            field_count,
            current: 0,
        }
    }

    /// Fields per step.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(field_count / page_size)`.
    pub fn total_steps(&self) -> usize {
        self.field_count.div_ceil(self.page_size)
    }

    /// The current step index.
    pub fn current_step(&self) -> usize {
        self.current
    }

    /// Whether the current step is the first one.
    pub fn is_first_step(&self) -> bool {
        self.current == 0
    }

    /// Whether the current step is the last one.
    pub fn is_last_step(&self) -> bool {
        self.current + 1 >= self.total_steps()
    }

    /// The field index range of step `n`.
    ///
    /// The last step may be shorter than `page_size`; steps past the end are
    /// empty.
    pub fn range_for_step(&self, n: usize) -> Range<usize> {
        let start = n.saturating_mul(self.page_size).min(self.field_count);
        let end = start.saturating_add(self.page_size).min(self.field_count);
        start..end
    }

    /// The field index range of the current step.
    pub fn current_range(&self) -> Range<usize> {
        self.range_for_step(self.current)
    }

    /// The step containing field index `i`.
    pub fn step_of(&self, i: usize) -> usize {
        i / self.page_size
    }

    /// Move forward one step. Returns `false` on the last step.
    pub fn next(&mut self) -> bool {
        if self.is_last_step() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move back one step. Returns `false` on the first step.
    pub fn prev(&mut self) -> bool {
        if self.is_first_step() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Return to step 0.
    pub fn reset(&mut self) {
        self.current = 0;
    }
}
