//! The "notify the user of an outcome" capability.
//!
//! The engine never renders anything; it hands [`Notice`]s to whatever
//! [`Notifier`] the presentation layer supplies.

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// The operation succeeded.
    Success,
    /// The operation was rejected.
    Error,
}

/// A short user-facing message about an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub text: String,
}

impl Notice {
    /// A success notice.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    /// An error notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Receives [`Notice`]s produced by the engine.
pub trait Notifier {
    /// Show `notice` to the user.
    fn notify(&mut self, notice: Notice);
}

impl Notifier for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}
