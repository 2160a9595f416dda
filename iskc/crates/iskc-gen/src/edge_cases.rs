//! Edge case tests for iskc-gen

use crate::resolver::CatalogResolver;
use crate::types::JavaType;
use crate::{compile, CompilationResult, GenOptions};
use iskc_par::{parse, ParseOptions};

fn generated(source: &str) -> String {
    generated_with(source, GenOptions::default())
}

fn generated_with(source: &str, options: GenOptions) -> String {
    let module = parse(source, &ParseOptions::default())
        .into_value()
        .expect("parses");
    match compile(&module, &options) {
        CompilationResult::Success(files) => files.into_values().next().expect("one file"),
        CompilationResult::Failure(errors) => panic!("generation failed: {:?}", errors),
    }
}

// ==================== MESSAGE LOWERING ====================

#[test]
fn test_edge_where_lowered_to_filter() {
    let source = generated(
        "facts {\n  items : Item[]\n}\nrule R\nwhen\n  items where: [:x | x.price = 1] size > 0\nthen\nend",
    );
    assert!(source.contains("filter(this.items, x ->"));
}

#[test]
fn test_edge_each_lowered_to_foreach() {
    let source = generated(
        "facts {\n  items : Item[]\n}\nrule R\nwhen\nthen\n  items each: [:x | x.done := true]\nend",
    );
    assert!(source.contains(".forEach(x -> {"));
    assert!(source.contains("setDone(true)"));
}

#[test]
fn test_edge_at_lowered_to_get() {
    let source = generated(
        "facts {\n  items : Item[]\n}\nrule R\nwhen\n  items at: 0 = null\nthen\nend",
    );
    assert!(source.contains("this.items.get(new BigDecimal(\"0\"))"));
}

#[test]
fn test_edge_keyword_selector_camel_cased() {
    let source = generated(
        "facts {\n  registry : Registry\n}\nrule R\nwhen\nthen\n  registry at: \"k\" put: 1\nend",
    );
    assert!(source.contains(".atPut(\"k\", new BigDecimal(\"1\"))"));
}

#[test]
fn test_edge_default_message_is_apply() {
    let source = generated(
        "facts {\n  callback : Runnable\n}\nrule R\nwhen\nthen\n  callback !\nend",
    );
    assert!(source.contains(".apply();"));
}

#[test]
fn test_edge_unary_builtins() {
    let source = generated(
        "facts {\n  items : Item[]\n}\nrule R\nwhen\n  items notEmpty, items sum > 1\nthen\nend",
    );
    assert!(source.contains("!this.items.isEmpty()"));
    assert!(source.contains("sumNumeric(this.items)"));
}

// ==================== NAVIGATION ====================

#[test]
fn test_edge_map_navigation_uses_get() {
    let source = generated(
        "facts {\n  rates : [String:BigDecimal]\n}\nrule R\nwhen\n  rates.standard > 1\nthen\nend",
    );
    assert!(source.contains(".map(v0 -> v0.get(\"standard\"))"));
}

#[test]
fn test_edge_collection_navigation_flat_maps() {
    let source = generated(
        "facts {\n  items : Item[]\n}\nrule R\nwhen\n  items.price size > 0\nthen\nend",
    );
    assert!(source.contains("mapProperty(v0, it -> it.getPrice())"));
}

#[test]
fn test_edge_numeric_index_navigation() {
    let source = generated(
        "facts {\n  items : Item[]\n}\nrule R\nwhen\n  items.0 = null\nthen\nend",
    );
    assert!(source.contains(".map(v0 -> v0.get(0))"));
}

#[test]
fn test_edge_navigation_assignment_null_guarded() {
    let source = generated(
        "facts {\n  item : Item\n}\nrule R\nwhen\nthen\n  item.price := 5\nend",
    );
    assert!(source.contains("var __target0 = this.item;"));
    assert!(source.contains("if (__target0 != null) {"));
    assert!(source.contains("__target0.setPrice(new BigDecimal(\"5\"));"));
}

#[test]
fn test_edge_navigation_assignment_direct_without_null_checks() {
    let source = generated_with(
        "facts {\n  item : Item\n}\nrule R\nwhen\nthen\n  item.price := 5\nend",
        GenOptions {
            generate_null_checks: false,
            ..GenOptions::default()
        },
    );
    assert!(source.contains("this.item.setPrice(new BigDecimal(\"5\"));"));
    assert!(!source.contains("__target"));
}

#[test]
fn test_edge_deep_navigation_assignment() {
    let source = generated_with(
        "facts {\n  order : Order\n}\nrule R\nwhen\nthen\n  order.customer.status := \"gold\"\nend",
        GenOptions {
            generate_null_checks: false,
            ..GenOptions::default()
        },
    );
    assert!(source.contains("this.order.getCustomer().setStatus(\"gold\");"));
}

// ==================== NAMING ====================

#[test]
fn test_edge_reserved_word_mangled() {
    let source = generated(
        "facts {\n  class : Category\n}\nrule R\nwhen\n  class = null\nthen\nend",
    );
    assert!(source.contains("private final Category _class;"));
    assert!(source.contains("this._class"));
}

#[test]
fn test_edge_quoted_identifier_sanitized() {
    let source = generated(
        "outputs {\n  `net price` : BigDecimal\n}\nrule R\nwhen\nthen\n  `net price` := 1\nend",
    );
    assert!(source.contains("private BigDecimal net_price = BigDecimal.ZERO;"));
    assert!(source.contains("this.net_price = new BigDecimal(\"1\");"));
    assert!(source.contains("public BigDecimal getNet_price() {"));
}

#[test]
fn test_edge_global_referenced_through_field() {
    let source = generated(
        "globals {\n  clock : Clock\n}\nrule R\nwhen\n  @clock = null\nthen\nend",
    );
    assert!(source.contains("private final Clock clock;"));
    assert!(source.contains("equalsNumericAware(this.clock, null)"));
}

#[test]
fn test_edge_global_shadowing_fact_disambiguates_field() {
    let source = generated(
        "facts {\n  clock : Wall\n}\nglobals {\n  clock : Clock\n}\nrule R\nwhen\n  @clock = clock\nthen\nend",
    );
    assert!(source.contains("private final Wall clock;"));
    assert!(source.contains("private final Clock clockGlobal;"));
    assert!(source.contains("this.clockGlobal"));
}

#[test]
fn test_edge_rule_id_sanitized_in_method_name() {
    let source = generated("rule `weekend surcharge` when then end");
    assert!(source.contains("private void rule_weekend_surcharge() {"));
}

// ==================== LITERALS ====================

#[test]
fn test_edge_collection_literals() {
    let source = generated(
        "outputs {\n  tags : String{}\n}\nrule R\nwhen\nthen\n  tags := #{\"a\", \"b\"}\nend",
    );
    assert!(source.contains("Set.of(\"a\", \"b\")"));
}

#[test]
fn test_edge_map_literal() {
    let source = generated(
        "outputs {\n  m : [String:BigDecimal]\n}\nrule R\nwhen\nthen\n  m := #[\"a\": 1]\nend",
    );
    assert!(source.contains("Map.of(\"a\", new BigDecimal(\"1\"))"));
}

#[test]
fn test_edge_interpolated_string_format() {
    let source = generated(
        "outputs {\n  msg : String\n  n : BigDecimal\n}\nrule R\nwhen\nthen\n  msg := $\"count: ${n} items\"\nend",
    );
    assert!(source.contains("String.format(\"count: %s items\", this.n)"));
}

#[test]
fn test_edge_interpolated_without_expressions_is_plain() {
    let source = generated(
        "outputs {\n  msg : String\n}\nrule R\nwhen\nthen\n  msg := $\"fixed\"\nend",
    );
    assert!(source.contains("this.msg = \"fixed\";"));
    assert!(!source.contains("String.format"));
}

#[test]
fn test_edge_percent_escaped_in_format() {
    let source = generated(
        "outputs {\n  msg : String\n  n : BigDecimal\n}\nrule R\nwhen\nthen\n  msg := $\"${n}%\"\nend",
    );
    assert!(source.contains("String.format(\"%s%%\", this.n)"));
}

#[test]
fn test_edge_negative_number_literal() {
    let source = generated(
        "outputs {\n  d : BigDecimal\n}\nrule R\nwhen\nthen\n  d := -2.5\nend",
    );
    assert!(source.contains("new BigDecimal(\"-2.5\")"));
}

// ==================== CONDITIONS ====================

#[test]
fn test_edge_comma_sequence_is_conjunction() {
    let source = generated(
        "facts {\n  a : T\n  b : T\n}\nrule R\nwhen\n  a = null, b = null\nthen\nend",
    );
    assert!(source.contains("if ((equalsNumericAware(this.a, null)) && (equalsNumericAware(this.b, null))) {"));
}

#[test]
fn test_edge_let_prelude_before_if() {
    let source = generated(
        "facts {\n  item : Item\n}\nrule R\nwhen\n  let p := item.price\n  p = 1\nthen\nend",
    );
    let let_index = source.find("var p = ").expect("let line");
    let if_index = source.find("if (").expect("if line");
    assert!(let_index < if_index);
}

#[test]
fn test_edge_else_branch_emitted() {
    let source = generated(
        "outputs {\n  d : BigDecimal\n}\nrule R\nwhen\n  d = 0\nthen\n  d := 1\nelse\n  d := 2\nend",
    );
    assert!(source.contains("} else {"));
    assert!(source.contains("this.d = new BigDecimal(\"2\");"));
}

#[test]
fn test_edge_decision_row_without_conditions_unconditional() {
    let source = generated(
        "outputs {\n  d : BigDecimal\n}\ndecision table D\n{\n| ID 1+| WHEN 1+| THEN\n| h| x h| d\n| A | * | 7 |\n}",
    );
    assert!(source.contains("this.d = new BigDecimal(\"7\");"));
    // The wildcard row has no conditions, so its action is not guarded.
    assert!(!source.contains("if (true)"));
}

// ==================== RESOLVER-DIRECTED TYPING ====================

#[test]
fn test_edge_catalog_resolver_types_comparison() {
    let resolver = CatalogResolver::new().with_property("Item", "name", JavaType::Text);
    let source = generated_with(
        "facts {\n  item : Item\n}\nrule R\nwhen\n  item.name = \"x\"\nthen\nend",
        GenOptions {
            resolver: Some(Box::new(resolver)),
            ..GenOptions::default()
        },
    );
    // Equality stays numeric-aware even for resolved string properties.
    assert!(source.contains("equalsNumericAware("));
}

#[test]
fn test_edge_evaluate_order_follows_declaration_order() {
    let source = generated(
        "rule First when then end\ntemplate rule Mid\ndata table {\n| c |\n| 1 |\n}\nwhen then end\nrule Last when then end",
    );
    let first = source.find("rule_First();").expect("first call");
    let mid = source.find("rule_Mid_0();").expect("template call");
    let last = source.find("rule_Last();").expect("last call");
    assert!(first < mid && mid < last);
}
