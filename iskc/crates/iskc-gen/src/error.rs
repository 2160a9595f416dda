//! Error types for Java code generation
//!
//! This module defines error types for the iskc-gen crate. Generation
//! failures are values, never panics; the public entry point flattens
//! them into the error-string list of [`crate::CompilationResult`].

use thiserror::Error;

/// Error type for code generation
#[derive(Debug, Error)]
pub enum GenError {
    /// An identifier survived analysis without a binding; indicates the
    /// analyzer was skipped or a scope bug
    #[error("Unresolved identifier '{name}' in {element}")]
    UnresolvedIdentifier { name: String, element: String },

    /// An AST shape the generator cannot lower
    #[error("Unsupported construct '{shape}' in {element}")]
    UnsupportedConstruct { shape: String, element: String },

    /// A block argument whose shape does not fit its selector
    #[error("Unsupported block shape for '{selector}' in {element}")]
    UnsupportedBlock { selector: String, element: String },
}

/// Result type alias for code generation operations
pub type Result<T> = std::result::Result<T, GenError>;
