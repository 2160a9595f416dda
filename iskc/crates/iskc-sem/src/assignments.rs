//! Assignment validation.
//!
//! Facts and globals are read-only everywhere. Outputs may only be
//! assigned in action sections (`then`/`else`). Property-path targets
//! (`a.b := …`) are likewise action-only; inside a `when`, the only
//! legal target is a bare let-bound local.

use crate::env::ModuleEnv;
use iskc_par::ast::{Expr, Literal, Module, Rule, Statement, StringPart};
use iskc_util::Handler;

/// Which kind of section an expression sits in.
#[derive(Clone, Copy, PartialEq)]
enum Section {
    /// `when` - conditions
    Condition,
    /// `then` / `else` - actions
    Action,
}

/// Check every assignment target in `module`.
pub fn check(module: &Module, env: &ModuleEnv, handler: &Handler) {
    for rule in &module.rules {
        let ctx = Ctx {
            env,
            handler,
            element: rule.id().as_str().to_owned(),
        };
        match rule {
            Rule::Simple(rule) => {
                walk_statements(&rule.when, Section::Condition, &ctx);
                walk_statements(&rule.then, Section::Action, &ctx);
                walk_statements(&rule.else_branch, Section::Action, &ctx);
            }
            Rule::Template(rule) => {
                walk_statements(&rule.when, Section::Condition, &ctx);
                walk_statements(&rule.then, Section::Action, &ctx);
            }
            Rule::DecisionTable(rule) => {
                for row in &rule.rows {
                    let ctx = Ctx {
                        env,
                        handler,
                        element: format!("{}.{}", rule.id, row.id),
                    };
                    walk_statements(&row.when, Section::Condition, &ctx);
                    walk_statements(&row.then, Section::Action, &ctx);
                }
            }
        }
    }
}

struct Ctx<'a> {
    env: &'a ModuleEnv,
    handler: &'a Handler,
    element: String,
}

fn walk_statements(statements: &[Statement], section: Section, ctx: &Ctx<'_>) {
    for statement in statements {
        match statement {
            Statement::Let(binding) => walk_expr(&binding.expr, section, ctx),
            Statement::Expr(expr) => walk_expr(expr, section, ctx),
        }
    }
}

fn walk_expr(expr: &Expr, section: Section, ctx: &Ctx<'_>) {
    match expr {
        Expr::Assignment(assignment) => {
            check_target(&assignment.target, section, ctx);
            walk_expr(&assignment.value, section, ctx);
        }
        Expr::Identifier(_) => {}
        Expr::Literal(literal) => walk_literal(literal, section, ctx),
        Expr::Binary(binary) => {
            walk_expr(&binary.left, section, ctx);
            walk_expr(&binary.right, section, ctx);
        }
        Expr::Navigation(navigation) => walk_expr(&navigation.receiver, section, ctx),
        Expr::MessageSend(send) => {
            walk_expr(&send.receiver, section, ctx);
            if let iskc_par::ast::Selector::Keyword(parts) = &send.selector {
                for part in parts {
                    walk_expr(&part.argument, section, ctx);
                }
            }
        }
        Expr::Block(block) => walk_statements(&block.statements, section, ctx),
        Expr::Sequence(elements) => {
            for element in elements {
                walk_expr(element, section, ctx);
            }
        }
    }
}

fn check_target(target: &Expr, section: Section, ctx: &Ctx<'_>) {
    match target {
        Expr::Identifier(identifier) => {
            if identifier.global {
                ctx.handler
                    .error(format!("Cannot assign to global '{}'", identifier.name))
                    .for_element(&ctx.element)
                    .emit();
            } else if ctx.env.facts.contains(&identifier.name) {
                ctx.handler
                    .error(format!("Cannot assign to fact '{}'", identifier.name))
                    .for_element(&ctx.element)
                    .emit();
            } else if ctx.env.outputs.contains(&identifier.name)
                && section == Section::Condition
            {
                ctx.handler
                    .error(format!(
                        "Output '{}' may only be assigned in then/else sections",
                        identifier.name
                    ))
                    .for_element(&ctx.element)
                    .emit();
            }
        }
        Expr::Navigation(navigation) => {
            if section == Section::Condition {
                ctx.handler
                    .error("Cannot assign to a property path in a when section")
                    .for_element(&ctx.element)
                    .emit();
            }
            walk_expr(&navigation.receiver, section, ctx);
        }
        // The parser only produces identifier or navigation targets.
        other => walk_expr(other, section, ctx),
    }
}

fn walk_literal(literal: &Literal, section: Section, ctx: &Ctx<'_>) {
    match literal {
        Literal::List(elements) | Literal::Set(elements) => {
            for element in elements {
                walk_expr(element, section, ctx);
            }
        }
        Literal::Map(entries) => {
            for (key, value) in entries {
                walk_expr(key, section, ctx);
                walk_expr(value, section, ctx);
            }
        }
        Literal::Interpolated(parts) => {
            for part in parts {
                if let StringPart::Expr(expr) = part {
                    walk_expr(expr, section, ctx);
                }
            }
        }
        Literal::Str(_) | Literal::Number(_) | Literal::Bool(_) | Literal::Null => {}
    }
}
