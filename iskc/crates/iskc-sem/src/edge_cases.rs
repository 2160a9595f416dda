//! Edge case tests for iskc-sem

use crate::analyze;
use iskc_par::{parse, ParseOptions};
use iskc_util::{Outcome, Severity};

fn messages(source: &str) -> Vec<String> {
    let module = parse(source, &ParseOptions::default())
        .into_value()
        .expect("parses");
    analyze(module)
        .diagnostics()
        .iter()
        .map(|d| d.message.clone())
        .collect()
}

// ==================== NAMESPACE EDGES ====================

#[test]
fn test_edge_output_and_global_may_share_name() {
    // Outputs collide with facts, not with globals.
    let msgs = messages("globals {\n  total : BigDecimal\n}\noutputs {\n  total : BigDecimal\n}");
    assert!(msgs.is_empty(), "{:?}", msgs);
}

#[test]
fn test_edge_fact_and_rule_may_share_name() {
    let msgs = messages(
        "facts {\n  pricing : Pricing\n}\nrule pricing when pricing.active = true then end",
    );
    assert!(
        !msgs.iter().any(|m| m.contains("Duplicate")),
        "{:?}",
        msgs
    );
}

#[test]
fn test_edge_row_ids_unique_per_table_only() {
    // The same row id in two different decision tables is fine.
    let msgs = messages(
        "decision table D1\n{\n| ID 1+| WHEN 1+| THEN\n| h| a h| b\n| X | 1 | 2 |\n}\n\
         decision table D2\n{\n| ID 1+| WHEN 1+| THEN\n| h| a h| b\n| X | 1 | 2 |\n}",
    );
    assert!(
        !msgs.iter().any(|m| m.contains("Duplicate row")),
        "{:?}",
        msgs
    );
}

// ==================== SCOPE EDGES ====================

#[test]
fn test_edge_local_shadows_fact() {
    let msgs = messages(
        "facts {\n  price : BigDecimal\n}\nrule R when let price := 1\nprice > 0 then end",
    );
    assert!(msgs.is_empty(), "{:?}", msgs);
}

#[test]
fn test_edge_nested_blocks_restore_scope() {
    let msgs = messages(
        "facts {\n  items : Item[]\n}\nrule R when items where: [:x | x.price > 1] size > 0, x = 1 then end",
    );
    // `x` leaks out of the block and must be reported.
    assert!(
        msgs.iter().any(|m| m.contains("Undefined identifier 'x'")),
        "{:?}",
        msgs
    );
}

#[test]
fn test_edge_let_in_else_independent_of_then() {
    let msgs = messages(
        "rule R when then let a := 1\na := 2 else a := 3 end",
    );
    assert!(
        msgs.iter().any(|m| m.contains("Undefined identifier 'a'")),
        "{:?}",
        msgs
    );
}

#[test]
fn test_edge_template_column_not_visible_in_other_rule() {
    let msgs = messages(
        "facts {\n  item : Item\n}\noutputs {\n  d : BigDecimal\n}\n\
         template rule T\ndata table {\n| pct |\n| 10 |\n}\nwhen item.price > 0 then d := pct end\n\
         rule R when pct > 0 then end",
    );
    assert!(
        msgs.iter().any(|m| m.contains("Undefined identifier 'pct'")),
        "{:?}",
        msgs
    );
}

// ==================== MIXED SEVERITIES ====================

#[test]
fn test_edge_warnings_and_errors_both_surface_on_failure() {
    let module = parse(
        "rule Empty when then end\nrule Bad when ghost = 1 then end",
        &ParseOptions::default(),
    )
    .into_value()
    .expect("parses");
    let Outcome::Failure { diagnostics } = analyze(module) else {
        panic!("expected failure");
    };
    assert!(diagnostics.iter().any(|d| d.severity == Severity::Warning));
    assert!(diagnostics.iter().any(|d| d.severity == Severity::Error));
}

#[test]
fn test_edge_diagnostic_display_uses_element() {
    let module = parse("facts {\n  a : T\n  a : T\n}", &ParseOptions::default())
        .into_value()
        .expect("parses");
    let Outcome::Failure { diagnostics } = analyze(module) else {
        panic!("expected failure");
    };
    assert_eq!(format!("{}", diagnostics[0]), "error: Duplicate fact (a)");
}

// ==================== DEGENERATE MODULES ====================

#[test]
fn test_edge_empty_module_analyzes_clean() {
    let msgs = messages("");
    assert!(msgs.is_empty(), "{:?}", msgs);
}

#[test]
fn test_edge_declarations_without_rules() {
    let msgs = messages(
        "imports {\n  Money := java.math.BigDecimal\n}\nfacts {\n  item : Item\n}",
    );
    assert!(msgs.is_empty(), "{:?}", msgs);
}

#[test]
fn test_edge_sequence_inside_when_is_not_disconnected() {
    let msgs = messages(
        "facts {\n  a : T\n  b : T\n}\nrule R\nwhen\n  a.x = 1, b.y = 2\n  a.z = 3\nthen\n  a.q := 4\nend",
    );
    // The sequence statement is not a bare comparison; only bare
    // comparisons before the last statement are disconnected.
    assert!(msgs.is_empty(), "{:?}", msgs);
}
