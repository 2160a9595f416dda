//! Generated class assembly.
//!
//! One module becomes one Java class:
//!
//! ```text
//! public class GeneratedRules {
//!     private final Item item;                 // facts
//!     private final Clock clock;               // globals
//!     private BigDecimal discount = ...;       // outputs
//!
//!     public GeneratedRules(Item item, Clock clock) { ... }
//!
//!     public BigDecimal getDiscount() { ... }  // one getter per output
//!
//!     private void rule_R() { ... }            // one method per rule
//!     private void rule_T_0() { ... }          // one per template row
//!     private void rule_T_1() { ... }
//!
//!     public void evaluate() { ... }           // calls all of them
//! }
//! ```
//!
//! Template rules are materialized here: each data-table row yields a
//! cloned method whose prelude declares the row's columns as `var`
//! locals, so the shared `when`/`then` bodies compile against per-row
//! values.

use crate::expr::{capitalize, field_name, sanitize, Emitter};
use crate::infer::TypeCtx;
use crate::resolver::NullResolver;
use crate::types::{import_map, resolve_type_ref, JavaType};
use crate::GenOptions;
use iskc_par::ast::{DataTable, DecisionRow, Module, Rule, Statement, TemplateRule};
use std::collections::BTreeMap;

static NULL_RESOLVER: NullResolver = NullResolver;

/// Indented line collector for one source file.
struct ClassWriter {
    lines: Vec<String>,
    indent: usize,
}

impl ClassWriter {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", "    ".repeat(self.indent), text.as_ref()));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// `header {` and indent.
    fn open(&mut self, header: impl AsRef<str>) {
        self.line(format!("{} {{", header.as_ref()));
        self.indent += 1;
    }

    fn close(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    fn finish(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Generate the source map for `module`.
pub(crate) fn generate(
    module: &Module,
    options: &GenOptions,
) -> Result<BTreeMap<String, String>, Vec<String>> {
    let resolver = options
        .resolver
        .as_deref()
        .unwrap_or(&NULL_RESOLVER);
    let imports = import_map(&module.imports);

    // Root type context: globals first, then facts, so a bare name that
    // is both resolves to the fact (globals are reached via `@`).
    let mut ctx = TypeCtx::new(resolver);
    for global in &module.globals {
        ctx.bind(global.name, resolve_type_ref(&global.type_ref, &imports));
    }
    for fact in &module.facts {
        ctx.bind(fact.name, resolve_type_ref(&fact.type_ref, &imports));
    }
    for output in &module.outputs {
        ctx.bind(output.name, resolve_type_ref(&output.type_ref, &imports));
    }
    for table in &module.data_tables {
        ctx.bind(
            table.id,
            JavaType::List(Box::new(JavaType::Map(
                Box::new(JavaType::Text),
                Box::new(JavaType::Object),
            ))),
        );
    }

    let mut emitter = Emitter::new(module, options, ctx);
    let mut errors: Vec<String> = Vec::new();
    let mut writer = ClassWriter::new();

    if !options.package_name.is_empty() {
        writer.line(format!("package {};", options.package_name));
        writer.blank();
    }
    writer.line("import java.math.BigDecimal;");
    writer.line("import java.util.*;");
    writer.blank();
    writer.line("import static iskara.runtime.RuleRuntime.*;");
    writer.blank();

    writer.open(format!("public class {}", options.class_name));

    emit_fields(module, &mut emitter, &mut writer, &mut errors);
    writer.blank();
    emit_constructor(module, options, &mut writer);
    writer.blank();
    emit_getters(module, &mut writer);

    // Rule methods, one batch of evaluate() calls in declaration order.
    let mut evaluate_calls = Vec::new();
    for rule in &module.rules {
        match rule {
            Rule::Simple(rule) => {
                let method = format!("rule_{}", sanitize(rule.id.as_str()));
                emitter.set_element(rule.id.as_str().to_owned());
                writer.blank();
                writer.open(format!("private void {}()", method));
                match emit_guarded_body(
                    &mut emitter,
                    &rule.when,
                    &rule.then,
                    Some(&rule.else_branch),
                ) {
                    Ok(lines) => {
                        for line in lines {
                            writer.line(line);
                        }
                        evaluate_calls.push(method);
                    }
                    Err(error) => errors.push(error.to_string()),
                }
                writer.close();
            }
            Rule::Template(rule) => {
                evaluate_calls.extend(emit_template_methods(
                    rule,
                    &mut emitter,
                    &mut writer,
                    &mut errors,
                ));
            }
            Rule::DecisionTable(rule) => {
                let method = format!("rule_{}", sanitize(rule.id.as_str()));
                writer.blank();
                writer.open(format!("private void {}()", method));
                let mut ok = true;
                for row in &rule.rows {
                    emitter.set_element(format!("{}.{}", rule.id, row.id));
                    match emit_decision_row(&mut emitter, row) {
                        Ok(lines) => {
                            for line in lines {
                                writer.line(line);
                            }
                        }
                        Err(error) => {
                            errors.push(error.to_string());
                            ok = false;
                        }
                    }
                }
                writer.close();
                if ok {
                    evaluate_calls.push(method);
                }
            }
        }
    }

    writer.blank();
    writer.open("public void evaluate()");
    for call in &evaluate_calls {
        writer.line(format!("{}();", call));
    }
    writer.close();

    writer.close(); // class

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut files = BTreeMap::new();
    files.insert(file_path(options), writer.finish());
    Ok(files)
}

fn file_path(options: &GenOptions) -> String {
    if options.package_name.is_empty() {
        format!("{}.java", options.class_name)
    } else {
        format!(
            "{}/{}.java",
            options.package_name.replace('.', "/"),
            options.class_name
        )
    }
}

fn emit_fields(
    module: &Module,
    emitter: &mut Emitter<'_>,
    writer: &mut ClassWriter,
    errors: &mut Vec<String>,
) {
    let imports = import_map(&module.imports);

    for fact in &module.facts {
        let ty = resolve_type_ref(&fact.type_ref, &imports);
        writer.line(format!(
            "private final {} {};",
            ty.render(),
            field_name(fact.name.as_str())
        ));
    }
    for global in &module.globals {
        let ty = resolve_type_ref(&global.type_ref, &imports);
        writer.line(format!(
            "private final {} {};",
            ty.render(),
            global_field_name(module, global.name.as_str())
        ));
    }
    for table in &module.data_tables {
        match emit_table_literal(emitter, table) {
            Ok(literal) => writer.line(format!(
                "private final List<Map<String, Object>> {} = {};",
                field_name(table.id.as_str()),
                literal
            )),
            Err(error) => errors.push(error.to_string()),
        }
    }
    for output in &module.outputs {
        let ty = resolve_type_ref(&output.type_ref, &imports);
        let initial = match &output.initial_value {
            Some(expr) => {
                emitter.set_element(output.name.as_str().to_owned());
                match emitter.emit_expr(expr) {
                    Ok(code) => code,
                    Err(error) => {
                        errors.push(error.to_string());
                        continue;
                    }
                }
            }
            None => default_value(&ty).to_owned(),
        };
        writer.line(format!(
            "private {} {} = {};",
            ty.render(),
            field_name(output.name.as_str()),
            initial
        ));
    }
}

/// Module-level data tables become immutable row lists.
fn emit_table_literal(
    emitter: &mut Emitter<'_>,
    table: &DataTable,
) -> crate::error::Result<String> {
    let mut rows = Vec::new();
    for row in &table.rows {
        let mut pairs = Vec::new();
        for (column, value) in &row.cells {
            pairs.push(format!("\"{}\"", column));
            pairs.push(emitter.emit_expr(value)?);
        }
        rows.push(format!("Map.of({})", pairs.join(", ")));
    }
    Ok(format!("List.of({})", rows.join(", ")))
}

/// Default output initializer: zero for numerics, empty for
/// collections, null otherwise.
fn default_value(ty: &JavaType) -> &'static str {
    match ty {
        JavaType::Decimal => "BigDecimal.ZERO",
        JavaType::Int => "0",
        JavaType::Boolean => "false",
        JavaType::List(_) => "new ArrayList<>()",
        JavaType::Set(_) => "new HashSet<>()",
        JavaType::Map(_, _) => "new HashMap<>()",
        _ => "null",
    }
}

/// Constructor takes all facts, then all globals, in declaration order.
fn emit_constructor(module: &Module, options: &GenOptions, writer: &mut ClassWriter) {
    let imports = import_map(&module.imports);
    let mut parameters = Vec::new();
    let mut assignments = Vec::new();

    for fact in &module.facts {
        let ty = resolve_type_ref(&fact.type_ref, &imports);
        let name = field_name(fact.name.as_str());
        parameters.push(format!("{} {}", ty.render(), name));
        assignments.push(format!("this.{} = {};", name, name));
    }
    for global in &module.globals {
        let ty = resolve_type_ref(&global.type_ref, &imports);
        let name = global_field_name(module, global.name.as_str());
        parameters.push(format!("{} {}", ty.render(), name));
        assignments.push(format!("this.{} = {};", name, name));
    }

    writer.open(format!(
        "public {}({})",
        options.class_name,
        parameters.join(", ")
    ));
    for assignment in assignments {
        writer.line(assignment);
    }
    writer.close();
}

fn emit_getters(module: &Module, writer: &mut ClassWriter) {
    let imports = import_map(&module.imports);
    for output in &module.outputs {
        let ty = resolve_type_ref(&output.type_ref, &imports);
        let field = field_name(output.name.as_str());
        writer.open(format!(
            "public {} get{}()",
            ty.render(),
            capitalize(output.name.as_str())
        ));
        writer.line(format!("return this.{};", field));
        writer.close();
        writer.blank();
    }
}

/// A global whose name collides with a fact gets a disambiguated field.
fn global_field_name(module: &Module, name: &str) -> String {
    let collides = module.facts.iter().any(|fact| fact.name.as_str() == name);
    if collides {
        format!("{}Global", field_name(name))
    } else {
        field_name(name)
    }
}

/// `when` statements split into a prelude (lets, side effects) and the
/// final condition; `then`/`else` bodies hang off the `if`.
fn emit_guarded_body(
    emitter: &mut Emitter<'_>,
    when: &[Statement],
    then: &[Statement],
    else_branch: Option<&[Statement]>,
) -> crate::error::Result<Vec<String>> {
    emitter.push_scope();
    let result = (|| {
        let mut lines = Vec::new();

        let condition_index = when
            .iter()
            .rposition(|statement| matches!(statement, Statement::Expr(_)));

        for (index, statement) in when.iter().enumerate() {
            if Some(index) == condition_index {
                continue;
            }
            lines.extend(emitter.emit_statement(statement)?);
        }

        let condition = match condition_index {
            Some(index) => {
                let Statement::Expr(expr) = &when[index] else {
                    unreachable!("rposition matched an expression statement");
                };
                Some(emitter.emit_expr(expr)?)
            }
            None => None,
        };

        match condition {
            Some(condition) => {
                lines.push(format!("if ({}) {{", condition));
                for line in emitter.emit_statements(then)? {
                    lines.push(format!("    {}", line));
                }
                if let Some(else_statements) = else_branch {
                    if !else_statements.is_empty() {
                        lines.push("} else {".into());
                        for line in emitter.emit_statements(else_statements)? {
                            lines.push(format!("    {}", line));
                        }
                    }
                }
                lines.push("}".into());
            }
            None => {
                // No condition: the actions run unconditionally.
                lines.extend(emitter.emit_statements(then)?);
            }
        }
        Ok(lines)
    })();
    emitter.pop_scope();
    result
}

/// One method per data-table row, columns declared as `var` locals.
fn emit_template_methods(
    rule: &TemplateRule,
    emitter: &mut Emitter<'_>,
    writer: &mut ClassWriter,
    errors: &mut Vec<String>,
) -> Vec<String> {
    let Some(table) = &rule.data_table else {
        // The analyzer already rejected this shape.
        return Vec::new();
    };

    let mut methods = Vec::new();
    for (index, row) in table.rows.iter().enumerate() {
        let method = format!("rule_{}_{}", sanitize(rule.id.as_str()), index);
        emitter.set_element(format!("{}[{}]", rule.id, index));
        writer.blank();
        writer.open(format!("private void {}()", method));

        emitter.push_scope();
        let emitted: crate::error::Result<Vec<String>> = (|| {
            let mut lines = Vec::new();
            for (column, value) in &row.cells {
                let code = emitter.emit_expr(value)?;
                let ty = emitter.ctx.infer(value);
                emitter.bind_local(*column, ty);
                lines.push(format!("var {} = {};", sanitize(column.as_str()), code));
            }
            lines.extend(emit_guarded_body(emitter, &rule.when, &rule.then, None)?);
            Ok(lines)
        })();
        emitter.pop_scope();

        match emitted {
            Ok(lines) => {
                for line in lines {
                    writer.line(line);
                }
                methods.push(method);
            }
            Err(error) => errors.push(error.to_string()),
        }
        writer.close();
    }
    methods
}

/// One `if` per row: the conjunction of its conditions guards its
/// actions. Rows without conditions act unconditionally.
fn emit_decision_row(
    emitter: &mut Emitter<'_>,
    row: &DecisionRow,
) -> crate::error::Result<Vec<String>> {
    emitter.push_scope();
    let result = (|| {
        let mut lines = Vec::new();
        let mut conditions = Vec::new();

        for statement in &row.when {
            match statement {
                Statement::Expr(expr) => {
                    conditions.push(format!("({})", emitter.emit_expr(expr)?));
                }
                // Alias parameters in a WHEN column arrive as lets.
                Statement::Let(_) => lines.extend(emitter.emit_statement(statement)?),
            }
        }

        if conditions.is_empty() {
            lines.extend(emitter.emit_statements(&row.then)?);
        } else {
            lines.push(format!("if ({}) {{", conditions.join(" && ")));
            for line in emitter.emit_statements(&row.then)? {
                lines.push(format!("    {}", line));
            }
            lines.push("}".into());
        }
        Ok(lines)
    })();
    emitter.pop_scope();
    result
}
