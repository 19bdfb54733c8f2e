//! The `{success, message?}` decision record (spec §4.3, §6.2).
//!
//! Every decision procedure in C3/C4 returns an `Outcome` rather than a
//! `Result` or a panic: failures are local to the call site and never
//! abort the surrounding inference (spec §7, policy 1).

/// The result of a structural decision (equality, assignability,
/// castability, constraint validation, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: Option<String>,
}

impl Outcome {
    /// A successful decision, with no message attached.
    pub fn ok() -> Self {
        Outcome {
            success: true,
            message: None,
        }
    }

    /// A failed decision with an explanatory message.
    pub fn fail(message: impl Into<String>) -> Self {
        Outcome {
            success: false,
            message: Some(message.into()),
        }
    }

    /// A failed decision with no message (used internally where the
    /// caller will attach its own context).
    pub fn fail_silent() -> Self {
        Outcome {
            success: false,
            message: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.success
    }

    /// Attach (or replace) the message, useful for wrapping a sub-decision
    /// with an outer context string.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        if self.success {
            return self;
        }
        let context = context.into();
        let message = match self.message {
            Some(m) => format!("{context}: {m}"),
            None => context,
        };
        Outcome {
            success: false,
            message: Some(message),
        }
    }

    /// Short-circuiting AND: evaluates `other` only if `self` succeeded.
    pub fn and_then(self, other: impl FnOnce() -> Outcome) -> Outcome {
        if !self.success { self } else { other() }
    }
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        if value { Outcome::ok() } else { Outcome::fail_silent() }
    }
}
