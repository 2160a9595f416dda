//! Module namespaces.
//!
//! Facts, globals, outputs, data-table ids and rule ids live in
//! overlapping namespaces (a global may shadow a fact; an output may
//! not). The sets are built once per module and passed by reference to
//! every validator, which keeps each validator a pure function over
//! `(module, env)`.

use iskc_par::ast::Module;
use iskc_util::Symbol;
use rustc_hash::FxHashSet;

/// Name sets of one module, first occurrences included even when a
/// duplicate was declared (the declaration validator reports those).
pub struct ModuleEnv {
    pub facts: FxHashSet<Symbol>,
    pub globals: FxHashSet<Symbol>,
    pub outputs: FxHashSet<Symbol>,
    pub data_tables: FxHashSet<Symbol>,
    pub rules: FxHashSet<Symbol>,
}

impl ModuleEnv {
    /// Collect the namespaces of `module`.
    pub fn build(module: &Module) -> Self {
        Self {
            facts: module.facts.iter().map(|f| f.name).collect(),
            globals: module.globals.iter().map(|g| g.name).collect(),
            outputs: module.outputs.iter().map(|o| o.name).collect(),
            data_tables: module.data_tables.iter().map(|t| t.id).collect(),
            rules: module.rules.iter().map(|r| r.id()).collect(),
        }
    }
}
