//! Declaration validation: duplicate detection.
//!
//! Facts, globals, data tables and rules must each be unique by name
//! within their namespace; outputs must be unique and must not collide
//! with fact names. Globals live in their own namespace and may shadow
//! facts. Row ids are unique within each decision-table rule.

use crate::env::ModuleEnv;
use iskc_par::ast::{Module, Rule};
use iskc_util::{Handler, Symbol};
use rustc_hash::FxHashSet;

/// Report every duplicate declaration in `module`.
pub fn check(module: &Module, env: &ModuleEnv, handler: &Handler) {
    report_duplicates(
        module.facts.iter().map(|f| f.name),
        "Duplicate fact",
        handler,
    );
    report_duplicates(
        module.globals.iter().map(|g| g.name),
        "Duplicate global",
        handler,
    );
    report_duplicates(
        module.outputs.iter().map(|o| o.name),
        "Duplicate output",
        handler,
    );
    report_duplicates(
        module.data_tables.iter().map(|t| t.id),
        "Duplicate data table",
        handler,
    );
    report_duplicates(
        module.rules.iter().map(|r| r.id()),
        "Duplicate rule",
        handler,
    );

    // Outputs share the value namespace with facts.
    for output in &module.outputs {
        if env.facts.contains(&output.name) {
            handler
                .error("Output name collides with fact name")
                .for_element(output.name.as_str())
                .emit();
        }
    }

    // Row ids are scoped to their decision table.
    for rule in &module.rules {
        if let Rule::DecisionTable(table) = rule {
            let mut seen = FxHashSet::default();
            for row in &table.rows {
                if !seen.insert(row.id.clone()) {
                    handler
                        .error("Duplicate row id")
                        .for_element(format!("{}.{}", table.id, row.id))
                        .emit();
                }
            }
        }
    }
}

fn report_duplicates(
    names: impl Iterator<Item = Symbol>,
    message: &str,
    handler: &Handler,
) {
    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name) {
            handler.error(message).for_element(name.as_str()).emit();
        }
    }
}
