//! Edge case tests for iskc-par

use crate::ast::{Expr, Literal, Rule, Statement};
use crate::{parse, ParseOptions, SourceType};
use iskc_lex::Locale;
use iskc_util::{Outcome, Symbol};

fn parse_ok(source: &str) -> crate::ast::Module {
    match parse(source, &ParseOptions::default()) {
        Outcome::Success { value, .. } => value,
        Outcome::Failure { diagnostics } => panic!("unexpected failure: {:#?}", diagnostics),
    }
}

fn parse_errors(source: &str) -> Vec<String> {
    match parse(source, &ParseOptions::default()) {
        Outcome::Failure { diagnostics } => {
            diagnostics.into_iter().map(|d| d.message).collect()
        }
        Outcome::Success { .. } => panic!("expected failure"),
    }
}

// ==================== DECISION TABLES ====================

#[test]
fn test_edge_decision_table_region_spans() {
    // The layout from the wire format: two WHEN columns, two THEN
    // columns, wildcards dropping cells.
    let module = parse_ok(
        "decision table D\n{\n\
         | ID 2+| WHEN 2+| THEN\n\
         | h| age h| status h| discount h| message\n\
         | A | < 30 | \"active\" | 10 | \"y\" |\n\
         | B | >= 65 | * | 15 | \"s\" |\n\
         }",
    );
    let Rule::DecisionTable(rule) = &module.rules[0] else {
        panic!("expected decision table");
    };
    assert_eq!(rule.rows.len(), 2);

    let row_a = &rule.rows[0];
    assert_eq!(row_a.id, "A");
    assert_eq!(row_a.when.len(), 2);
    assert_eq!(row_a.then.len(), 2);

    let row_b = &rule.rows[1];
    assert_eq!(row_b.id, "B");
    assert_eq!(row_b.when.len(), 1);
    assert_eq!(row_b.then.len(), 2);
}

#[test]
fn test_edge_decision_cell_concatenates_with_header() {
    let module = parse_ok(
        "decision table D\n{\n\
         | ID 1+| WHEN 1+| THEN\n\
         | h| age h| discount\n\
         | A | < 30 | 10 |\n\
         }",
    );
    let Rule::DecisionTable(rule) = &module.rules[0] else {
        panic!("expected decision table");
    };
    // "age" + "< 30" re-parses to the comparison `age < 30`.
    let Statement::Expr(Expr::Binary(cmp)) = &rule.rows[0].when[0] else {
        panic!("expected comparison statement");
    };
    assert_eq!(cmp.op, crate::ast::BinOp::Lt);
    // THEN value cell becomes an assignment `discount := 10`.
    let Statement::Expr(Expr::Assignment(_)) = &rule.rows[0].then[0] else {
        panic!("expected assignment statement");
    };
}

#[test]
fn test_edge_decision_when_value_cell_means_equality() {
    let module = parse_ok(
        "decision table D\n{\n\
         | ID 1+| WHEN 1+| THEN\n\
         | h| status h| discount\n\
         | A | \"active\" | 10 |\n\
         }",
    );
    let Rule::DecisionTable(rule) = &module.rules[0] else {
        panic!("expected decision table");
    };
    let Statement::Expr(Expr::Binary(cmp)) = &rule.rows[0].when[0] else {
        panic!("expected comparison statement");
    };
    assert_eq!(cmp.op, crate::ast::BinOp::Eq);
}

#[test]
fn test_edge_decision_table_property_path_header() {
    let module = parse_ok(
        "decision table D\n{\n\
         | ID 1+| WHEN 1+| THEN\n\
         | h| Customer.age h| discount\n\
         | A | > 40 | 5 |\n\
         }",
    );
    let Rule::DecisionTable(rule) = &module.rules[0] else {
        panic!("expected decision table");
    };
    let Statement::Expr(Expr::Binary(cmp)) = &rule.rows[0].when[0] else {
        panic!("expected comparison statement");
    };
    assert!(matches!(*cmp.left, Expr::Navigation(_)));
}

#[test]
fn test_edge_decision_alias_without_parameters_inlines() {
    let module = parse_ok(
        "decision table D\n{\n\
         | ID 1+| WHEN 1+| THEN\n\
         | h| age | #standard\n\
         | A | < 30 | x |\n\
         }\nwhere standard := [Discount := 10]",
    );
    let Rule::DecisionTable(rule) = &module.rules[0] else {
        panic!("expected decision table");
    };
    // The parameterless alias body is inlined; the cell value is unused.
    assert_eq!(rule.rows[0].then.len(), 1);
    assert!(matches!(
        rule.rows[0].then[0],
        Statement::Expr(Expr::Assignment(_))
    ));
}

#[test]
fn test_edge_decision_alias_wildcard_contributes_nothing() {
    let module = parse_ok(
        "decision table D\n{\n\
         | ID 1+| WHEN 1+| THEN\n\
         | h| age | #standard\n\
         | A | < 30 | * |\n\
         }\nwhere standard := [Discount := 10]",
    );
    let Rule::DecisionTable(rule) = &module.rules[0] else {
        panic!("expected decision table");
    };
    assert!(rule.rows[0].then.is_empty());
}

#[test]
fn test_edge_decision_quoted_alias_name() {
    let module = parse_ok(
        "decision table D\n{\n\
         | ID 1+| WHEN 1+| THEN\n\
         | h| age | #`grant discount`\n\
         | A | < 30 | 10 |\n\
         }\nwhere `grant discount` := [:pct | Discount := pct]",
    );
    let Rule::DecisionTable(rule) = &module.rules[0] else {
        panic!("expected decision table");
    };
    assert_eq!(rule.rows[0].then.len(), 2);
}

#[test]
fn test_edge_decision_unknown_alias_reported() {
    let errors = parse_errors(
        "decision table D\n{\n\
         | ID 1+| WHEN 1+| THEN\n\
         | h| age | #missing\n\
         | A | < 30 | 10 |\n\
         }",
    );
    assert!(errors.iter().any(|e| e.contains("unknown alias")));
}

#[test]
fn test_edge_decision_table_without_rows() {
    let module = parse_ok(
        "decision table D\n{\n\
         | ID 1+| WHEN 1+| THEN\n\
         | h| age h| discount\n\
         }",
    );
    let Rule::DecisionTable(rule) = &module.rules[0] else {
        panic!("expected decision table");
    };
    assert!(rule.rows.is_empty());
}

#[test]
fn test_edge_decision_malformed_header_reported() {
    let errors = parse_errors(
        "decision table D\n{\n\
         | WHAT | EVER |\n\
         | h| age |\n\
         | A | 1 |\n\
         }",
    );
    assert!(errors
        .iter()
        .any(|e| e.contains("ID, WHEN and THEN")));
}

#[test]
fn test_edge_decision_row_width_mismatch_reported() {
    let errors = parse_errors(
        "decision table D\n{\n\
         | ID 1+| WHEN 1+| THEN\n\
         | h| age h| discount\n\
         | A | < 30 |\n\
         }",
    );
    assert!(errors.iter().any(|e| e.contains("cells")));
}

// ==================== DATA TABLES ====================

#[test]
fn test_edge_module_data_table() {
    let module = parse_ok(
        "data table rates {\n\
         | category | pct |\n\
         | \"A\" | 10 |\n\
         | \"B\" | 20 |\n\
         }",
    );
    assert_eq!(module.data_tables.len(), 1);
    let table = &module.data_tables[0];
    assert_eq!(table.id, Symbol::intern("rates"));
    assert_eq!(table.rows.len(), 2);
    assert_eq!(
        table.rows[1].cells[&Symbol::intern("pct")],
        Expr::Literal(Literal::Number("20".into()))
    );
}

#[test]
fn test_edge_data_table_row_width_mismatch() {
    let errors = parse_errors(
        "data table t {\n\
         | a | b |\n\
         | 1 |\n\
         }",
    );
    assert!(errors.iter().any(|e| e.contains("columns")));
}

#[test]
fn test_edge_data_table_negative_literals() {
    let module = parse_ok(
        "data table t {\n\
         | delta |\n\
         | -5 |\n\
         }",
    );
    assert_eq!(
        module.data_tables[0].rows[0].cells[&Symbol::intern("delta")],
        Expr::Literal(Literal::Number("-5".into()))
    );
}

// ==================== LOCALE ====================

#[test]
fn test_edge_comma_locale_module() {
    let options = ParseOptions {
        locale: Locale::from_tag("de_DE"),
        source_type: SourceType::Native,
        source_name: "de.isk".into(),
    };
    let module = parse("outputs {\n  Rabatt : BigDecimal := 0,5\n}", &options)
        .into_value()
        .expect("parses");
    assert_eq!(
        module.outputs[0].initial_value,
        Some(Expr::Literal(Literal::Number("0.5".into())))
    );
}

#[test]
fn test_edge_comma_locale_decision_cell_reparse() {
    // The re-parse of header+cell text must honor the module's locale.
    let options = ParseOptions {
        locale: Locale::from_tag("de_DE"),
        source_type: SourceType::Native,
        source_name: "de.isk".into(),
    };
    let module = parse(
        "decision table D\n{\n\
         | ID 1+| WHEN 1+| THEN\n\
         | h| satz h| rabatt\n\
         | A | > 0,5 | 1,5 |\n\
         }",
        &options,
    )
    .into_value()
    .expect("parses");
    let Rule::DecisionTable(rule) = &module.rules[0] else {
        panic!("expected decision table");
    };
    let Statement::Expr(Expr::Binary(cmp)) = &rule.rows[0].when[0] else {
        panic!("expected comparison");
    };
    assert_eq!(
        *cmp.right,
        Expr::Literal(Literal::Number("0.5".into()))
    );
}

// ==================== RECOVERY ====================

#[test]
fn test_edge_multiple_errors_in_one_run() {
    let errors = parse_errors(
        "facts {\n  : Item\n}\nrule R when ??? then end\nrule S when := then end",
    );
    assert!(errors.len() >= 2, "expected several diagnostics: {:?}", errors);
}

#[test]
fn test_edge_unclosed_section_does_not_hang() {
    let _ = parse("facts {\n  item : Item\n", &ParseOptions::default());
}

#[test]
fn test_edge_unclosed_rule_does_not_hang() {
    let _ = parse("rule R\nwhen\n  x = 1\nthen", &ParseOptions::default());
}

#[test]
fn test_edge_markup_source_type_parses_native_grammar() {
    let options = ParseOptions {
        locale: Locale::EN,
        source_type: SourceType::Markup,
        source_name: "doc.md#fragment".into(),
    };
    let module = parse("rule R when then end", &options)
        .into_value()
        .expect("parses");
    assert_eq!(module.rules.len(), 1);
}

#[test]
fn test_edge_error_location_carries_source_name() {
    let options = ParseOptions {
        locale: Locale::EN,
        source_type: SourceType::Native,
        source_name: "pricing.isk".into(),
    };
    let Outcome::Failure { diagnostics } = parse("rule R when ??? then end", &options) else {
        panic!("expected failure");
    };
    let with_location = diagnostics.iter().find(|d| d.location.is_some()).unwrap();
    assert_eq!(
        with_location.location.as_ref().unwrap().source,
        "pricing.isk"
    );
}

// ==================== STATEMENTS ====================

#[test]
fn test_edge_comma_sequence_is_single_statement() {
    let module = parse_ok("rule R\nwhen\n  a = 1, b = 2\nthen\nend");
    let Rule::Simple(rule) = &module.rules[0] else {
        panic!("expected simple rule");
    };
    assert_eq!(rule.when.len(), 1);
    assert!(matches!(
        rule.when[0],
        Statement::Expr(Expr::Sequence(ref elements)) if elements.len() == 2
    ));
}

#[test]
fn test_edge_statements_split_by_newlines() {
    let module = parse_ok("rule R\nwhen\n  a = 1\n  b = 2\nthen\nend");
    let Rule::Simple(rule) = &module.rules[0] else {
        panic!("expected simple rule");
    };
    assert_eq!(rule.when.len(), 2);
}

#[test]
fn test_edge_interpolated_string_in_then() {
    let module = parse_ok("rule R\nwhen\nthen\n  Message := $\"total ${Total}\"\nend");
    let Rule::Simple(rule) = &module.rules[0] else {
        panic!("expected simple rule");
    };
    let Statement::Expr(Expr::Assignment(assign)) = &rule.then[0] else {
        panic!("expected assignment");
    };
    assert!(matches!(
        *assign.value,
        Expr::Literal(Literal::Interpolated(_))
    ));
}
