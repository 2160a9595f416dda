//! Stage outcome sum.
//!
//! Each pipeline stage returns an [`Outcome`]: either the produced value
//! together with any warnings, or the full diagnostic list when at least
//! one error was reported. Warnings never suppress the pipeline; errors
//! stop it at the end of the stage that found them.

use crate::diagnostic::{Diagnostic, Handler};

/// Result of one pipeline stage.
///
/// # Examples
///
/// ```
/// use iskc_util::diagnostic::Diagnostic;
/// use iskc_util::outcome::Outcome;
///
/// let ok: Outcome<u32> = Outcome::Success {
///     value: 7,
///     warnings: vec![Diagnostic::warning("empty rule")],
/// };
/// assert!(ok.is_success());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    /// The stage produced a value; warnings ride along.
    Success {
        /// The stage's product
        value: T,
        /// Warnings collected while producing it
        warnings: Vec<Diagnostic>,
    },
    /// The stage failed; all collected diagnostics, errors and warnings
    /// alike, in emission order.
    Failure {
        /// Everything the stage reported
        diagnostics: Vec<Diagnostic>,
    },
}

impl<T> Outcome<T> {
    /// Build an outcome from a stage product and its drained handler.
    ///
    /// If the handler saw any error the product is discarded and all
    /// diagnostics are returned; otherwise the warnings accompany the
    /// value.
    pub fn from_handler(value: T, handler: &Handler) -> Self {
        let diagnostics = handler.take();
        if diagnostics.iter().any(Diagnostic::is_error) {
            Outcome::Failure { diagnostics }
        } else {
            Outcome::Success {
                value,
                warnings: diagnostics,
            }
        }
    }

    /// True if the stage succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// The value, if the stage succeeded.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success { value, .. } => Some(value),
            Outcome::Failure { .. } => None,
        }
    }

    /// Consume the outcome, yielding the value if present.
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Success { value, .. } => Some(value),
            Outcome::Failure { .. } => None,
        }
    }

    /// The diagnostics of a failure, or the warnings of a success.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Outcome::Success { warnings, .. } => warnings,
            Outcome::Failure { diagnostics } => diagnostics,
        }
    }

    /// Map the success value, keeping warnings or failure untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success { value, warnings } => Outcome::Success {
                value: f(value),
                warnings,
            },
            Outcome::Failure { diagnostics } => Outcome::Failure { diagnostics },
        }
    }
}
