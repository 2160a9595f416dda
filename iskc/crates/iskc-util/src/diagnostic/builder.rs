//! Fluent builder for diagnostics.
//!
//! The builder is handed out by [`Handler::error`]/[`Handler::warning`]/
//! [`Handler::info`] and emits into its handler when finished:
//!
//! ```
//! use iskc_util::diagnostic::{Handler, Location};
//!
//! let handler = Handler::new();
//! handler
//!     .error("expected 'end'")
//!     .at(Location::new("m.isk", 9, 1, 0))
//!     .emit();
//!
//! assert_eq!(handler.error_count(), 1);
//! ```

use super::{Diagnostic, Handler, Location, Severity};

/// A diagnostic under construction, bound to the handler that will
/// receive it.
#[must_use = "a diagnostic builder does nothing until .emit() is called"]
pub struct DiagnosticBuilder<'a> {
    handler: &'a Handler,
    diagnostic: Diagnostic,
}

impl<'a> DiagnosticBuilder<'a> {
    pub(super) fn new(handler: &'a Handler, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            handler,
            diagnostic: Diagnostic::new(severity, message),
        }
    }

    /// Attach a source location.
    pub fn at(mut self, location: Location) -> Self {
        self.diagnostic.location = Some(location);
        self
    }

    /// Attach the offending element's name.
    pub fn for_element(mut self, element: impl Into<String>) -> Self {
        self.diagnostic.element = Some(element.into());
        self
    }

    /// Finish and hand the diagnostic to the handler.
    pub fn emit(self) {
        self.handler.emit(self.diagnostic);
    }

    /// Finish without emitting, returning the diagnostic instead.
    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}
