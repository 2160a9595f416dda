//! Module merging for multi-file compilation.
//!
//! Merging unions the declaration lists of several modules into one.
//! Two modules may declare the same element only if the declarations are
//! structurally identical; a same-name declaration with different
//! content is a conflict. Order is stable: the output is input-order
//! concatenation with later identical duplicates suppressed, so
//! `merge([m])` returns `m` unchanged and first occurrences win.

use crate::ast::Module;
use iskc_util::{Diagnostic, Symbol};

/// Union the given modules, first occurrences retained.
///
/// # Examples
///
/// ```
/// use iskc_par::merge::merge;
/// use iskc_par::{parse, ParseOptions};
///
/// let a = parse("rule A when then end", &ParseOptions::default())
///     .into_value()
///     .unwrap();
/// let b = parse("rule B when then end", &ParseOptions::default())
///     .into_value()
///     .unwrap();
///
/// let merged = merge(vec![a, b]).unwrap();
/// assert_eq!(merged.rules.len(), 2);
/// ```
pub fn merge(modules: Vec<Module>) -> Result<Module, Vec<Diagnostic>> {
    let mut modules = modules.into_iter();
    let Some(mut merged) = modules.next() else {
        return Ok(Module::default());
    };

    let mut diagnostics = Vec::new();
    for module in modules {
        merge_into(&mut merged, module, &mut diagnostics);
    }

    if diagnostics.is_empty() {
        Ok(merged)
    } else {
        Err(diagnostics)
    }
}

fn merge_into(target: &mut Module, source: Module, diagnostics: &mut Vec<Diagnostic>) {
    if target.name.is_none() {
        target.name = source.name;
    }

    merge_declarations(
        "import",
        &mut target.imports,
        source.imports,
        |import| import.alias,
        diagnostics,
    );
    merge_declarations(
        "fact",
        &mut target.facts,
        source.facts,
        |fact| fact.name,
        diagnostics,
    );
    merge_declarations(
        "global",
        &mut target.globals,
        source.globals,
        |global| global.name,
        diagnostics,
    );
    merge_declarations(
        "output",
        &mut target.outputs,
        source.outputs,
        |output| output.name,
        diagnostics,
    );
    merge_declarations(
        "data table",
        &mut target.data_tables,
        source.data_tables,
        |table| table.id,
        diagnostics,
    );
    merge_declarations(
        "rule",
        &mut target.rules,
        source.rules,
        |rule| rule.id(),
        diagnostics,
    );
}

/// Append `source` items to `target`, suppressing identical duplicates
/// and reporting same-key/different-content conflicts.
fn merge_declarations<T: PartialEq>(
    kind: &str,
    target: &mut Vec<T>,
    source: Vec<T>,
    key: impl Fn(&T) -> Symbol,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for item in source {
        match target.iter().find(|existing| key(existing) == key(&item)) {
            None => target.push(item),
            Some(existing) if *existing == item => {
                // Identical re-declaration across files; keep the first.
            }
            Some(_) => {
                diagnostics.push(
                    Diagnostic::error(format!("Conflicting {}", kind))
                        .for_element(key(&item).as_str()),
                );
            }
        }
    }
}
