//! Symbol module - String interning for identifier handling.
//!
//! Rule modules repeat the same names constantly: every reference to a
//! fact, output or data-table column is the same string again. The
//! [`Symbol`] type is a 4-byte handle to an interned string, making name
//! comparison an integer compare and keeping AST nodes small.
//!
//! Interned strings live for the program's lifetime. That is acceptable
//! here for the same reasons it is in any batch compiler: a compile
//! invocation is finite and the table is bounded by the source size.
//!
//! # Examples
//!
//! ```
//! use iskc_util::symbol::Symbol;
//!
//! let a = Symbol::intern("discount");
//! let b = Symbol::intern("discount");
//! let c = Symbol::intern("rate");
//!
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! assert_eq!(a.as_str(), "discount");
//! ```

use ahash::RandomState;
use dashmap::DashMap;
use std::fmt;
use std::sync::{LazyLock, RwLock};

/// Global string table, initialized on first use.
///
/// Iskara's reserved words are pre-interned so their indices are stable
/// across compile invocations within a process.
static TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    for kw in RESERVED_WORDS {
        table.intern(kw);
    }
    table
});

/// The reserved words of Iskara, in the order the lexer documents them.
pub const RESERVED_WORDS: &[&str] = &[
    "module", "imports", "facts", "globals", "outputs", "rule", "template", "decision", "table",
    "data", "when", "then", "else", "end", "where", "let", "true", "false", "null",
];

/// Thread-safe string table.
///
/// Lookup goes through a `DashMap` keyed by the string itself; retrieval
/// by index goes through a plain vector so `as_str` is O(1). Strings are
/// leaked to obtain `'static` references, which is what lets `Symbol`
/// hand out `&'static str` without lifetime plumbing.
struct StringTable {
    lookup: DashMap<&'static str, u32, RandomState>,
    strings: RwLock<Vec<&'static str>>,
}

impl StringTable {
    fn new() -> Self {
        Self {
            lookup: DashMap::with_hasher(RandomState::new()),
            strings: RwLock::new(Vec::new()),
        }
    }

    fn intern(&self, text: &str) -> u32 {
        if let Some(existing) = self.lookup.get(text) {
            return *existing;
        }
        let mut strings = self.strings.write().expect("string table poisoned");
        // Re-check under the write lock: another thread may have won.
        if let Some(existing) = self.lookup.get(text) {
            return *existing;
        }
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        let index = strings.len() as u32;
        strings.push(leaked);
        self.lookup.insert(leaked, index);
        index
    }

    fn get(&self, index: u32) -> &'static str {
        let strings = self.strings.read().expect("string table poisoned");
        strings[index as usize]
    }
}

/// A compact handle to an interned string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern a string, returning its symbol.
    ///
    /// Interning the same text twice yields the same symbol.
    pub fn intern(text: &str) -> Symbol {
        Symbol(TABLE.intern(text))
    }

    /// The interned text.
    pub fn as_str(&self) -> &'static str {
        TABLE.get(self.0)
    }

    /// True if this symbol is one of Iskara's reserved words.
    pub fn is_reserved(&self) -> bool {
        // Reserved words are interned first, so their indices are dense
        // at the front of the table.
        (self.0 as usize) < RESERVED_WORDS.len()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self {
        Symbol::intern(text)
    }
}
