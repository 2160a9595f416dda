//! Lexical scope for reference checking.
//!
//! A rule's scope starts from the module namespaces (facts, outputs,
//! data-table ids, template columns) and grows as `let` bindings appear.
//! Blocks push a frame for their parameters and locals; leaving the
//! block pops it. Globals are deliberately *not* in the scope chain:
//! they are reached through the `@` sigil and checked against the
//! global namespace directly.

use iskc_util::Symbol;
use rustc_hash::FxHashMap;

/// What a resolved name refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    Fact,
    Output,
    DataTable,
    /// A template rule's data-table column
    Column,
    /// A `let` binding
    Local,
    /// A block parameter
    Parameter,
}

/// A stack of scope frames, innermost last.
pub struct ScopeStack {
    frames: Vec<FxHashMap<Symbol, Binding>>,
}

impl ScopeStack {
    /// A single empty root frame.
    pub fn new() -> Self {
        Self {
            frames: vec![FxHashMap::default()],
        }
    }

    /// Enter a nested scope.
    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Leave the innermost scope. The root frame stays.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Bind a name in the innermost scope, shadowing outer frames.
    pub fn declare(&mut self, name: Symbol, binding: Binding) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, binding);
        }
    }

    /// Resolve a name, innermost frame first.
    pub fn resolve(&self, name: Symbol) -> Option<Binding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(&name).copied())
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_in_root() {
        let mut scope = ScopeStack::new();
        scope.declare(Symbol::intern("item"), Binding::Fact);
        assert_eq!(scope.resolve(Symbol::intern("item")), Some(Binding::Fact));
        assert_eq!(scope.resolve(Symbol::intern("other")), None);
    }

    #[test]
    fn test_inner_shadows_outer() {
        let mut scope = ScopeStack::new();
        scope.declare(Symbol::intern("x"), Binding::Fact);
        scope.push();
        scope.declare(Symbol::intern("x"), Binding::Parameter);
        assert_eq!(scope.resolve(Symbol::intern("x")), Some(Binding::Parameter));
        scope.pop();
        assert_eq!(scope.resolve(Symbol::intern("x")), Some(Binding::Fact));
    }

    #[test]
    fn test_pop_never_removes_root() {
        let mut scope = ScopeStack::new();
        scope.declare(Symbol::intern("x"), Binding::Output);
        scope.pop();
        scope.pop();
        assert_eq!(scope.resolve(Symbol::intern("x")), Some(Binding::Output));
    }

    #[test]
    fn test_locals_visible_after_declaration() {
        let mut scope = ScopeStack::new();
        scope.push();
        scope.declare(Symbol::intern("subtotal"), Binding::Local);
        assert_eq!(
            scope.resolve(Symbol::intern("subtotal")),
            Some(Binding::Local)
        );
    }
}
