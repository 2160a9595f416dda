//! iskc-util - Core Utilities and Foundation Types
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate provides the foundation types shared by every stage of the
//! Iskibal compiler: source spans, interned symbols, diagnostics, and the
//! success/failure sum each pipeline stage returns.
//!
//! PIPELINE CONTEXT:
//! -----------------
//! ```text
//! Source text
//!      │
//!      ▼
//!  [iskc-lex]  ──▶ tokens + diagnostics ───┐
//!      │                                   │
//!      ▼                                   │
//!  [iskc-par]  ──▶ Module AST              ├──▶ Handler (this crate)
//!      │                                   │
//!      ▼                                   │
//!  [iskc-sem]  ──▶ validated Module        │
//!      │                                   │
//!      ▼                                   │
//!  [iskc-gen]  ──▶ Java source map ────────┘
//! ```
//!
//! Every stage reports problems through a [`Handler`] and returns an
//! [`Outcome`]: warnings ride along with success, errors turn the whole
//! stage into a failure once the stage has collected as many diagnostics
//! as it can.
//!
//! DESIGN PRINCIPLES:
//! ------------------
//! 1. DIAGNOSTICS ARE VALUES
//!    A [`Diagnostic`] is immutable after creation and carries either a
//!    source location or the name of the offending element, never both
//!    implicitly.
//!
//! 2. NAMES ARE SYMBOLS
//!    Identifiers appear thousands of times in rule modules; interning
//!    makes comparison O(1) and keeps the AST compact.
//!
//! 3. NO HIDDEN STATE
//!    Apart from the global string table, nothing in this crate is
//!    process-global. Handlers and outcomes are plain values owned by
//!    their stage.

pub mod diagnostic;
pub mod outcome;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler, Location, Severity};
pub use outcome::Outcome;
pub use span::Span;
pub use symbol::Symbol;
