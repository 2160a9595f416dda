//! Diagnostic module - Error and warning reporting infrastructure.
//!
//! Every stage of the pipeline (lexer, parser, the four validators, the
//! code generator) reports problems as [`Diagnostic`] values collected by
//! a [`Handler`]. Diagnostics are immutable once created; a stage
//! collects as many as it can before deciding success or failure.
//!
//! A diagnostic is located either by a source [`Location`] (lexer and
//! parser) or by the name of the offending element (the validators),
//! matching the printable forms:
//!
//! ```text
//! error: unterminated string at rules.isk:3:17
//! error: Duplicate fact (item)
//! ```
//!
//! # Examples
//!
//! ```
//! use iskc_util::diagnostic::{Diagnostic, Handler, Location};
//!
//! let handler = Handler::new();
//! handler.emit(Diagnostic::error("unexpected token").at(Location::new("m.isk", 2, 5, 1)));
//!
//! assert!(handler.has_errors());
//! ```

mod builder;

pub use builder::DiagnosticBuilder;

use crate::span::Span;
use std::cell::RefCell;
use std::fmt;

/// Diagnostic severity level
///
/// # Examples
///
/// ```
/// use iskc_util::diagnostic::Severity;
///
/// assert_eq!(format!("{}", Severity::Error), "error");
/// assert_eq!(format!("{}", Severity::Info), "info");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// A problem that stops the pipeline at the end of the current stage
    Error,
    /// A problem worth reporting that never suppresses the pipeline
    Warning,
    /// Additional information
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A resolved source position: file, line, column and width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// Name of the source the diagnostic refers to
    pub source: String,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
    /// Width of the offending text in bytes
    pub length: usize,
}

impl Location {
    /// Create a new location.
    pub fn new(source: impl Into<String>, line: u32, column: u32, length: usize) -> Self {
        Self {
            source: source.into(),
            line,
            column,
            length,
        }
    }

    /// Build a location from a span plus the source name it belongs to.
    pub fn from_span(source: impl Into<String>, span: Span) -> Self {
        Self {
            source: source.into(),
            line: span.line,
            column: span.column,
            length: span.len(),
        }
    }
}

/// A diagnostic message with severity and provenance.
///
/// # Examples
///
/// ```
/// use iskc_util::diagnostic::{Diagnostic, Severity};
///
/// let diag = Diagnostic::error("Duplicate fact").for_element("item");
/// assert_eq!(diag.severity, Severity::Error);
/// assert_eq!(format!("{}", diag), "error: Duplicate fact (item)");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Main message
    pub message: String,
    /// Source location, if known
    pub location: Option<Location>,
    /// Name of the offending element, for analyzer diagnostics
    pub element: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with no provenance yet.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            location: None,
            element: None,
        }
    }

    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create an info diagnostic.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Attach a source location.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach the offending element's name.
    pub fn for_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    /// True if this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}:{}:{}", loc.source, loc.line, loc.column)?;
        } else if let Some(element) = &self.element {
            write!(f, " ({})", element)?;
        }
        Ok(())
    }
}

/// Handler for collecting diagnostics.
///
/// A `Handler` is owned by one stage invocation. It uses interior
/// mutability so emission does not require `&mut` plumbing through every
/// recursive descent function.
///
/// # Examples
///
/// ```
/// use iskc_util::diagnostic::{Diagnostic, Handler};
///
/// let handler = Handler::new();
/// handler.emit(Diagnostic::warning("empty rule").for_element("R1"));
///
/// assert!(!handler.has_errors());
/// assert_eq!(handler.warning_count(), 1);
/// ```
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new, empty handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Emit a diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Start a fluent error builder.
    pub fn error(&self, message: impl Into<String>) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder::new(self, Severity::Error, message)
    }

    /// Start a fluent warning builder.
    pub fn warning(&self, message: impl Into<String>) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder::new(self, Severity::Warning, message)
    }

    /// Start a fluent info builder.
    pub fn info(&self, message: impl Into<String>) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder::new(self, Severity::Info, message)
    }

    /// True if any error-severity diagnostic has been emitted.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().iter().any(Diagnostic::is_error)
    }

    /// Number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Snapshot of all diagnostics in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drain all diagnostics out of the handler, leaving it empty.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }
}
