//! Section well-formedness.
//!
//! Empty rules and empty tables are worth a warning but compile;
//! a template rule without any data table cannot be expanded and is an
//! error. The disconnected-boolean check catches the silent-loss bug:
//!
//! ```text
//! when
//!   Item.price > 100      <- evaluated, result dropped
//!   Item.type = "WD"
//! ```
//!
//! Only the last condition would take effect; the fix is a comma
//! sequence. Decision-table rows are exempt because their WHEN cells
//! are AND-ed by construction.

use iskc_par::ast::{BinOp, Expr, Literal, Module, Rule, Statement};
use iskc_util::Handler;

/// Check section shape for every rule in `module`.
pub fn check(module: &Module, handler: &Handler) {
    for rule in &module.rules {
        match rule {
            Rule::Simple(rule) => {
                if rule.when.is_empty() && rule.then.is_empty() {
                    handler
                        .warning("Rule has no conditions and no actions")
                        .for_element(rule.id.as_str())
                        .emit();
                }
                check_disconnected_booleans(&rule.when, rule.id.as_str(), handler);
            }
            Rule::Template(rule) => {
                if rule.when.is_empty() && rule.then.is_empty() {
                    handler
                        .warning("Rule has no conditions and no actions")
                        .for_element(rule.id.as_str())
                        .emit();
                }
                match &rule.data_table {
                    None => {
                        handler
                            .error("Template rule has no data table")
                            .for_element(rule.id.as_str())
                            .emit();
                    }
                    Some(table) if table.rows.is_empty() => {
                        handler
                            .warning("Template rule has an empty data table")
                            .for_element(rule.id.as_str())
                            .emit();
                    }
                    Some(_) => {}
                }
                check_disconnected_booleans(&rule.when, rule.id.as_str(), handler);
            }
            Rule::DecisionTable(rule) => {
                if rule.rows.is_empty() {
                    handler
                        .warning("Decision table has no rows")
                        .for_element(rule.id.as_str())
                        .emit();
                }
                for row in &rule.rows {
                    if row.when.is_empty() && row.then.is_empty() {
                        handler
                            .warning("Row has no conditions and no actions")
                            .for_element(format!("{}.{}", rule.id, row.id))
                            .emit();
                    }
                }
            }
        }
    }
}

/// Any non-final `when` statement that is a bare comparison or boolean
/// literal is implicitly dropped at evaluation; reject it.
fn check_disconnected_booleans(when: &[Statement], element: &str, handler: &Handler) {
    let Some((_, leading)) = when.split_last() else {
        return;
    };
    for statement in leading {
        let Statement::Expr(expr) = statement else {
            continue;
        };
        if is_boolean_shaped(expr) {
            handler
                .error("Disconnected boolean condition, use comma to combine conditions")
                .for_element(element)
                .emit();
        }
    }
}

fn is_boolean_shaped(expr: &Expr) -> bool {
    match expr {
        Expr::Binary(binary) => binary.op.is_comparison(),
        Expr::Literal(Literal::Bool(_)) => true,
        _ => false,
    }
}
