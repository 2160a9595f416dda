//! iskc-lex - Lexical Analyzer for the Iskara rules language
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The lexer turns Iskara source text into a token stream. Iskara is a
//! small Smalltalk-flavored language, and three of its lexical features
//! drive the design here:
//!
//! 1. NEWLINES ARE SEPARATORS
//!    Statements end at line breaks, not semicolons, so line terminators
//!    become `Newline` tokens (consecutive runs collapse into one).
//!
//! 2. LOCALE-SENSITIVE NUMBERS
//!    Number literals use `.` or `,` as the decimal separator depending
//!    on the configured [`locale::Locale`]; the lexer normalizes the
//!    token text to `.` so no later stage cares.
//!
//! 3. INTERPOLATED STRINGS SWITCH MODES
//!    `$"…${expr}…"` requires the lexer to alternate between scanning
//!    literal text and scanning ordinary tokens, tracking brace depth
//!    per `${` opener. See the notes on [`Lexer`].
//!
//! The lexer is total: every input produces a token stream ending in
//! `Eof`, with problems reported as diagnostics rather than panics.
//!
//! # Example
//!
//! ```
//! use iskc_lex::{Lexer, TokenKind};
//! use iskc_lex::locale::Locale;
//! use iskc_util::Handler;
//!
//! let handler = Handler::new();
//! let tokens = Lexer::new("Discount := 0", Locale::EN, "m.isk", &handler).tokenize();
//!
//! assert_eq!(tokens.len(), 4); // ident, :=, number, eof
//! assert_eq!(tokens[1].kind, TokenKind::Assign);
//! assert!(!handler.has_errors());
//! ```

pub mod cursor;
pub mod locale;
mod lexer;
mod token;

#[cfg(test)]
mod edge_cases;

pub use lexer::Lexer;
pub use locale::Locale;
pub use token::{Token, TokenKind};
