//! Reference validation.
//!
//! Every identifier an expression mentions must resolve: facts,
//! outputs, data-table ids and template columns by bare name, locals
//! and block parameters through the scope chain, globals through the
//! `@` sigil. A bare name that happens to be a global is rejected with
//! a pointer at the missing `@`, which catches the most common slip in
//! rule modules.

use crate::env::ModuleEnv;
use crate::scope::{Binding, ScopeStack};
use iskc_par::ast::{Expr, Literal, Module, Rule, Statement, StringPart};
use iskc_util::Handler;

/// Check every expression of every rule in `module`.
pub fn check(module: &Module, env: &ModuleEnv, handler: &Handler) {
    // Output initializers run at construction, where facts and globals
    // are already bound.
    for output in &module.outputs {
        if let Some(initial) = &output.initial_value {
            let mut scope = root_scope(env);
            let ctx = Ctx {
                env,
                handler,
                element: output.name.as_str().to_owned(),
            };
            walk_expr(initial, &mut scope, &ctx);
        }
    }

    for rule in &module.rules {
        check_rule(rule, env, handler);
    }
}

struct Ctx<'a> {
    env: &'a ModuleEnv,
    handler: &'a Handler,
    /// Name of the element diagnostics point at
    element: String,
}

/// The names every rule sees: facts, outputs, and data-table ids.
fn root_scope(env: &ModuleEnv) -> ScopeStack {
    let mut scope = ScopeStack::new();
    for fact in &env.facts {
        scope.declare(*fact, Binding::Fact);
    }
    for output in &env.outputs {
        scope.declare(*output, Binding::Output);
    }
    for table in &env.data_tables {
        scope.declare(*table, Binding::DataTable);
    }
    scope
}

fn check_rule(rule: &Rule, env: &ModuleEnv, handler: &Handler) {
    let ctx = Ctx {
        env,
        handler,
        element: rule.id().as_str().to_owned(),
    };
    match rule {
        Rule::Simple(rule) => {
            let mut scope = root_scope(env);
            walk_section(&rule.when, &mut scope, &ctx);
            walk_section(&rule.then, &mut scope, &ctx);
            walk_section(&rule.else_branch, &mut scope, &ctx);
        }
        Rule::Template(rule) => {
            let mut scope = root_scope(env);
            if let Some(table) = &rule.data_table {
                for column in table.columns() {
                    scope.declare(column, Binding::Column);
                }
            }
            walk_section(&rule.when, &mut scope, &ctx);
            walk_section(&rule.then, &mut scope, &ctx);
        }
        Rule::DecisionTable(rule) => {
            for row in &rule.rows {
                let ctx = Ctx {
                    env,
                    handler,
                    element: format!("{}.{}", rule.id, row.id),
                };
                let mut scope = root_scope(env);
                walk_section(&row.when, &mut scope, &ctx);
                walk_section(&row.then, &mut scope, &ctx);
            }
        }
    }
}

/// A section is its own block: `let` bindings are visible to later
/// statements of the same section only.
fn walk_section(statements: &[Statement], scope: &mut ScopeStack, ctx: &Ctx<'_>) {
    scope.push();
    walk_statements(statements, scope, ctx);
    scope.pop();
}

fn walk_statements(statements: &[Statement], scope: &mut ScopeStack, ctx: &Ctx<'_>) {
    for statement in statements {
        match statement {
            Statement::Let(binding) => {
                walk_expr(&binding.expr, scope, ctx);
                scope.declare(binding.name, Binding::Local);
            }
            Statement::Expr(expr) => walk_expr(expr, scope, ctx),
        }
    }
}

fn walk_expr(expr: &Expr, scope: &mut ScopeStack, ctx: &Ctx<'_>) {
    match expr {
        Expr::Identifier(identifier) => {
            if identifier.global {
                if !ctx.env.globals.contains(&identifier.name) {
                    ctx.handler
                        .error(format!("Undefined global '@{}'", identifier.name))
                        .for_element(&ctx.element)
                        .emit();
                }
            } else if scope.resolve(identifier.name).is_none() {
                if ctx.env.globals.contains(&identifier.name) {
                    ctx.handler
                        .error(format!(
                            "Global '{}' must be accessed with @ prefix",
                            identifier.name
                        ))
                        .for_element(&ctx.element)
                        .emit();
                } else {
                    ctx.handler
                        .error(format!("Undefined identifier '{}'", identifier.name))
                        .for_element(&ctx.element)
                        .emit();
                }
            }
        }
        Expr::Literal(literal) => walk_literal(literal, scope, ctx),
        Expr::Binary(binary) => {
            walk_expr(&binary.left, scope, ctx);
            walk_expr(&binary.right, scope, ctx);
        }
        Expr::Assignment(assignment) => {
            walk_expr(&assignment.target, scope, ctx);
            walk_expr(&assignment.value, scope, ctx);
        }
        Expr::Navigation(navigation) => {
            // Path segments are host properties, resolved at codegen.
            walk_expr(&navigation.receiver, scope, ctx);
        }
        Expr::MessageSend(send) => {
            walk_expr(&send.receiver, scope, ctx);
            if let iskc_par::ast::Selector::Keyword(parts) = &send.selector {
                for part in parts {
                    walk_expr(&part.argument, scope, ctx);
                }
            }
        }
        Expr::Block(block) => {
            scope.push();
            for parameter in &block.parameters {
                scope.declare(*parameter, Binding::Parameter);
            }
            walk_statements(&block.statements, scope, ctx);
            scope.pop();
        }
        Expr::Sequence(elements) => {
            for element in elements {
                walk_expr(element, scope, ctx);
            }
        }
    }
}

fn walk_literal(literal: &Literal, scope: &mut ScopeStack, ctx: &Ctx<'_>) {
    match literal {
        Literal::List(elements) | Literal::Set(elements) => {
            for element in elements {
                walk_expr(element, scope, ctx);
            }
        }
        Literal::Map(entries) => {
            for (key, value) in entries {
                walk_expr(key, scope, ctx);
                walk_expr(value, scope, ctx);
            }
        }
        Literal::Interpolated(parts) => {
            for part in parts {
                if let StringPart::Expr(expr) = part {
                    walk_expr(expr, scope, ctx);
                }
            }
        }
        Literal::Str(_) | Literal::Number(_) | Literal::Bool(_) | Literal::Null => {}
    }
}
