//! Expression emission.
//!
//! Lowers validated expressions to Java source text. The numeric story
//! is centralized in runtime helpers (`addNumeric`, `compareNumeric`,
//! `equalsNumericAware`, …) reached through a static import, so the
//! generated code never cares which numeric kind an operand turned out
//! to be. Navigation chains become null-safe `Optional` pipelines when
//! requested:
//!
//! ```text
//! a.b.c   ->   Optional.ofNullable(this.a)
//!                  .map(v0 -> v0.getB())
//!                  .map(v1 -> v1.getC())
//!                  .orElse(null)
//! ```
//!
//! The monadic shape handles any depth without nested conditionals.

use crate::error::{GenError, Result};
use crate::infer::{keyword_method_name, TypeCtx};
use crate::types::JavaType;
use crate::GenOptions;
use iskc_par::ast::{
    AssignExpr, BinOp, Block, Expr, Literal, MessageExpr, Module, NavExpr, Selector, Statement,
    StringPart,
};
use iskc_util::Symbol;
use rustc_hash::FxHashSet;

/// Java reserved words; identifiers colliding with them get a `_`
/// prefix.
const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "var", "void", "volatile", "while", "yield",
];

/// Per-method expression emitter.
///
/// Tracks the scoped type context and which names are locals (emitted
/// bare) versus module declarations (emitted as `this.` fields).
pub(crate) struct Emitter<'a> {
    pub(crate) ctx: TypeCtx<'a>,
    options: &'a GenOptions,
    facts: FxHashSet<Symbol>,
    globals: FxHashSet<Symbol>,
    outputs: FxHashSet<Symbol>,
    data_tables: FxHashSet<Symbol>,
    locals: Vec<FxHashSet<Symbol>>,
    /// Element name for codegen errors
    element: String,
    temp_counter: usize,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(module: &Module, options: &'a GenOptions, ctx: TypeCtx<'a>) -> Self {
        Self {
            ctx,
            options,
            facts: module.facts.iter().map(|f| f.name).collect(),
            globals: module.globals.iter().map(|g| g.name).collect(),
            outputs: module.outputs.iter().map(|o| o.name).collect(),
            data_tables: module.data_tables.iter().map(|t| t.id).collect(),
            locals: vec![FxHashSet::default()],
            element: String::new(),
            temp_counter: 0,
        }
    }

    pub(crate) fn set_element(&mut self, element: impl Into<String>) {
        self.element = element.into();
    }

    /// Enter a nested scope (block body, generated method).
    pub(crate) fn push_scope(&mut self) {
        self.ctx.push();
        self.locals.push(FxHashSet::default());
    }

    pub(crate) fn pop_scope(&mut self) {
        self.ctx.pop();
        self.locals.pop();
    }

    /// Bind a local (let, block parameter, template column).
    pub(crate) fn bind_local(&mut self, name: Symbol, ty: JavaType) {
        self.ctx.bind(name, ty);
        if let Some(scope) = self.locals.last_mut() {
            scope.insert(name);
        }
    }

    fn is_local(&self, name: Symbol) -> bool {
        self.locals.iter().any(|scope| scope.contains(&name))
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Lower a statement to one or more Java statement lines (without
    /// indentation; the class writer applies that).
    pub(crate) fn emit_statement(&mut self, statement: &Statement) -> Result<Vec<String>> {
        match statement {
            Statement::Let(binding) => {
                let value = self.emit_expr(&binding.expr)?;
                let ty = self.ctx.infer(&binding.expr);
                self.bind_local(binding.name, ty);
                Ok(vec![format!(
                    "var {} = {};",
                    sanitize(binding.name.as_str()),
                    value
                )])
            }
            Statement::Expr(Expr::Assignment(assignment)) => self.emit_assignment(assignment),
            Statement::Expr(expr) => Ok(vec![format!("{};", self.emit_expr(expr)?)]),
        }
    }

    pub(crate) fn emit_statements(&mut self, statements: &[Statement]) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for statement in statements {
            lines.extend(self.emit_statement(statement)?);
        }
        Ok(lines)
    }

    /// Assignment in statement position: output and local targets
    /// become plain Java assignments, navigation targets become setter
    /// calls, null-guarded when requested.
    fn emit_assignment(&mut self, assignment: &AssignExpr) -> Result<Vec<String>> {
        match assignment.target.as_ref() {
            Expr::Identifier(_) => {
                let target = self.emit_expr(&assignment.target)?;
                let value = self.emit_expr(&assignment.value)?;
                Ok(vec![format!("{} = {};", target, value)])
            }
            Expr::Navigation(navigation) => self.emit_navigation_assignment(navigation, assignment),
            other => Err(GenError::UnsupportedConstruct {
                shape: shape_name(other).into(),
                element: self.element.clone(),
            }),
        }
    }

    fn emit_navigation_assignment(
        &mut self,
        navigation: &NavExpr,
        assignment: &AssignExpr,
    ) -> Result<Vec<String>> {
        let Some((last, prefix)) = navigation.path.split_last() else {
            return Err(GenError::UnsupportedConstruct {
                shape: "empty property path".into(),
                element: self.element.clone(),
            });
        };

        // Everything before the last segment is an ordinary read.
        let base = if prefix.is_empty() {
            self.emit_expr(&navigation.receiver)?
        } else {
            self.emit_navigation(&NavExpr {
                receiver: navigation.receiver.clone(),
                path: prefix.to_vec(),
            })?
        };
        let base_ty = if prefix.is_empty() {
            self.ctx.infer(&navigation.receiver)
        } else {
            let mut current = self.ctx.infer(&navigation.receiver);
            for segment in prefix {
                current = self.ctx.property_type(&current, *segment);
            }
            current
        };

        let value = self.emit_expr(&assignment.value)?;
        let write = |target: &str| match &base_ty {
            JavaType::Map(_, _) => format!("{}.put(\"{}\", {});", target, last, value),
            JavaType::List(_) if is_numeric_name(*last) => {
                format!("{}.set({}, {});", target, last, value)
            }
            _ => format!("{}.set{}({});", target, capitalize(last.as_str()), value),
        };

        if self.options.generate_null_checks {
            let temp = format!("__target{}", self.temp_counter);
            self.temp_counter += 1;
            Ok(vec![
                format!("var {} = {};", temp, base),
                format!("if ({} != null) {{", temp),
                format!("    {}", write(&temp)),
                "}".into(),
            ])
        } else {
            Ok(vec![write(&base)])
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    pub(crate) fn emit_expr(&mut self, expr: &Expr) -> Result<String> {
        match expr {
            Expr::Identifier(identifier) => {
                if identifier.global {
                    if !self.globals.contains(&identifier.name) {
                        return Err(GenError::UnresolvedIdentifier {
                            name: format!("@{}", identifier.name),
                            element: self.element.clone(),
                        });
                    }
                    return Ok(format!("this.{}", self.global_field(identifier.name)));
                }
                if self.is_local(identifier.name) {
                    return Ok(sanitize(identifier.name.as_str()));
                }
                if self.facts.contains(&identifier.name)
                    || self.outputs.contains(&identifier.name)
                    || self.data_tables.contains(&identifier.name)
                {
                    return Ok(format!("this.{}", field_name(identifier.name.as_str())));
                }
                Err(GenError::UnresolvedIdentifier {
                    name: identifier.name.as_str().into(),
                    element: self.element.clone(),
                })
            }
            Expr::Literal(literal) => self.emit_literal(literal),
            Expr::Binary(binary) => self.emit_binary(binary),
            Expr::Assignment(assignment) => {
                // Expression position: only identifier targets make
                // sense as a Java assignment expression.
                if matches!(assignment.target.as_ref(), Expr::Identifier(_)) {
                    let target = self.emit_expr(&assignment.target)?;
                    let value = self.emit_expr(&assignment.value)?;
                    Ok(format!("({} = {})", target, value))
                } else {
                    Err(GenError::UnsupportedConstruct {
                        shape: "nested property assignment".into(),
                        element: self.element.clone(),
                    })
                }
            }
            Expr::Navigation(navigation) => self.emit_navigation(navigation),
            Expr::MessageSend(send) => self.emit_send(send),
            Expr::Block(block) => self.emit_block_lambda(block),
            Expr::Sequence(elements) => {
                let parts: Result<Vec<String>> = elements
                    .iter()
                    .map(|element| Ok(format!("({})", self.emit_expr(element)?)))
                    .collect();
                Ok(parts?.join(" && "))
            }
        }
    }

    fn emit_literal(&mut self, literal: &Literal) -> Result<String> {
        Ok(match literal {
            Literal::Str(text) => java_string(text),
            Literal::Number(text) => format!("new BigDecimal(\"{}\")", text),
            Literal::Bool(value) => value.to_string(),
            Literal::Null => "null".into(),
            Literal::List(elements) => format!("List.of({})", self.emit_elements(elements)?),
            Literal::Set(elements) => format!("Set.of({})", self.emit_elements(elements)?),
            Literal::Map(entries) => {
                let mut parts = Vec::new();
                for (key, value) in entries {
                    parts.push(self.emit_expr(key)?);
                    parts.push(self.emit_expr(value)?);
                }
                format!("Map.of({})", parts.join(", "))
            }
            Literal::Interpolated(parts) => self.emit_interpolated(parts)?,
        })
    }

    fn emit_elements(&mut self, elements: &[Expr]) -> Result<String> {
        let parts: Result<Vec<String>> =
            elements.iter().map(|element| self.emit_expr(element)).collect();
        Ok(parts?.join(", "))
    }

    fn emit_interpolated(&mut self, parts: &[StringPart]) -> Result<String> {
        let mut format_string = String::new();
        let mut arguments = Vec::new();
        for part in parts {
            match part {
                StringPart::Text(text) => {
                    format_string.push_str(&text.replace('%', "%%"));
                }
                StringPart::Expr(expr) => {
                    format_string.push_str("%s");
                    arguments.push(self.emit_expr(expr)?);
                }
            }
        }
        if arguments.is_empty() {
            return Ok(java_string(&format_string.replace("%%", "%")));
        }
        Ok(format!(
            "String.format({}, {})",
            java_string(&format_string),
            arguments.join(", ")
        ))
    }

    /// Arithmetic and comparison. Numeric or unknown operands call the
    /// runtime helpers; equality is always numeric-aware.
    fn emit_binary(&mut self, binary: &iskc_par::ast::BinaryExpr) -> Result<String> {
        let left_ty = self.ctx.infer(&binary.left);
        let right_ty = self.ctx.infer(&binary.right);
        let left = self.emit_expr(&binary.left)?;
        let right = self.emit_expr(&binary.right)?;

        let numeric_ish = |ty: &JavaType| ty.is_numeric() || *ty == JavaType::Unknown;
        let helpers = numeric_ish(&left_ty) || numeric_ish(&right_ty);

        Ok(match binary.op {
            BinOp::Eq => format!("equalsNumericAware({}, {})", left, right),
            BinOp::NotEq => format!("!equalsNumericAware({}, {})", left, right),
            BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => {
                if helpers {
                    let relation = match binary.op {
                        BinOp::Lt => "< 0",
                        BinOp::LtEq => "<= 0",
                        BinOp::Gt => "> 0",
                        BinOp::GtEq => ">= 0",
                        _ => unreachable!(),
                    };
                    format!("compareNumeric({}, {}) {}", left, right, relation)
                } else {
                    format!("{} {} {}", left, plain_operator(binary.op), right)
                }
            }
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                if helpers {
                    let helper = match binary.op {
                        BinOp::Add => "addNumeric",
                        BinOp::Sub => "subtractNumeric",
                        BinOp::Mul => "multiplyNumeric",
                        BinOp::Div => "divideNumeric",
                        _ => unreachable!(),
                    };
                    format!("{}({}, {})", helper, left, right)
                } else {
                    format!("{} {} {}", left, plain_operator(binary.op), right)
                }
            }
        })
    }

    /// Navigation chain, null-safe when requested.
    fn emit_navigation(&mut self, navigation: &NavExpr) -> Result<String> {
        let receiver = self.emit_expr(&navigation.receiver)?;
        let mut current_ty = self.ctx.infer(&navigation.receiver);

        if self.options.generate_null_checks {
            let mut code = format!("Optional.ofNullable({})", receiver);
            for (index, segment) in navigation.path.iter().enumerate() {
                let var = format!("v{}", index);
                let access = property_access(&var, &current_ty, *segment);
                code.push_str(&format!(".map({} -> {})", var, access));
                current_ty = self.ctx.property_type(&current_ty, *segment);
            }
            code.push_str(".orElse(null)");
            Ok(code)
        } else {
            let mut code = receiver;
            for segment in &navigation.path {
                code = property_access(&code, &current_ty, *segment);
                current_ty = self.ctx.property_type(&current_ty, *segment);
            }
            Ok(code)
        }
    }

    // ------------------------------------------------------------------
    // Message sends
    // ------------------------------------------------------------------

    fn emit_send(&mut self, send: &MessageExpr) -> Result<String> {
        let receiver = self.emit_expr(&send.receiver)?;
        match &send.selector {
            Selector::Unary(name) => Ok(match name.as_str() {
                "size" | "count" => format!("{}.size()", receiver),
                "isEmpty" => format!("{}.isEmpty()", receiver),
                "notEmpty" | "exists" => format!("!{}.isEmpty()", receiver),
                "sum" => format!("sumNumeric({})", receiver),
                other => format!("{}.{}()", receiver, sanitize(other)),
            }),
            Selector::Keyword(parts) => {
                if parts.len() == 1 {
                    match parts[0].keyword.as_str() {
                        "where" => {
                            if let Expr::Block(block) = &parts[0].argument {
                                let lambda = self.emit_predicate_lambda(block, "where")?;
                                return Ok(format!("filter({}, {})", receiver, lambda));
                            }
                        }
                        "each" => {
                            if let Expr::Block(block) = &parts[0].argument {
                                let lambda = self.emit_body_lambda(block)?;
                                return Ok(format!("{}.forEach({})", receiver, lambda));
                            }
                        }
                        "at" => {
                            // List index and map key both lower to get.
                            let argument = self.emit_expr(&parts[0].argument)?;
                            return Ok(format!("{}.get({})", receiver, argument));
                        }
                        _ => {}
                    }
                }
                let method = keyword_method_name(parts);
                let arguments: Result<Vec<String>> = parts
                    .iter()
                    .map(|part| self.emit_expr(&part.argument))
                    .collect();
                Ok(format!(
                    "{}.{}({})",
                    receiver,
                    sanitize(&method),
                    arguments?.join(", ")
                ))
            }
            Selector::Default => Ok(format!("{}.apply()", receiver)),
        }
    }

    /// A single-expression block as a predicate lambda.
    fn emit_predicate_lambda(&mut self, block: &Block, selector: &str) -> Result<String> {
        let parameter = block
            .parameters
            .first()
            .copied()
            .unwrap_or_else(|| Symbol::intern("it"));
        self.push_scope();
        self.bind_local(parameter, JavaType::Unknown);
        let result = match block.statements.as_slice() {
            [Statement::Expr(expr)] => {
                let body = self.emit_expr(expr)?;
                Ok(format!("{} -> {}", sanitize(parameter.as_str()), body))
            }
            _ => Err(GenError::UnsupportedBlock {
                selector: selector.into(),
                element: self.element.clone(),
            }),
        };
        self.pop_scope();
        result
    }

    /// A statement block as a `forEach`-style lambda.
    fn emit_body_lambda(&mut self, block: &Block) -> Result<String> {
        let parameter = block
            .parameters
            .first()
            .copied()
            .unwrap_or_else(|| Symbol::intern("it"));
        self.push_scope();
        self.bind_local(parameter, JavaType::Unknown);
        let result = (|| {
            let lines = self.emit_statements(&block.statements)?;
            Ok(format!(
                "{} -> {{ {} }}",
                sanitize(parameter.as_str()),
                lines.join(" ")
            ))
        })();
        self.pop_scope();
        result
    }

    /// A first-class block in value position, as a lambda.
    fn emit_block_lambda(&mut self, block: &Block) -> Result<String> {
        self.push_scope();
        for parameter in &block.parameters {
            self.bind_local(*parameter, JavaType::Unknown);
        }
        let result = (|| {
            let parameter_list = match block.parameters.as_slice() {
                [] => "()".to_owned(),
                [single] => sanitize(single.as_str()),
                many => format!(
                    "({})",
                    many.iter()
                        .map(|p| sanitize(p.as_str()))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            };
            match block.statements.as_slice() {
                [Statement::Expr(expr)] => {
                    let body = self.emit_expr(expr)?;
                    Ok(format!("{} -> {}", parameter_list, body))
                }
                _ => {
                    let lines = self.emit_statements(&block.statements)?;
                    Ok(format!("{} -> {{ {} }}", parameter_list, lines.join(" ")))
                }
            }
        })();
        self.pop_scope();
        result
    }

    /// Field name for a global; a `Global` suffix disambiguates when a
    /// fact shares the name (globals may shadow facts).
    fn global_field(&self, name: Symbol) -> String {
        if self.facts.contains(&name) {
            format!("{}Global", field_name(name.as_str()))
        } else {
            field_name(name.as_str())
        }
    }
}

// ----------------------------------------------------------------------
// Naming and literals
// ----------------------------------------------------------------------

/// One navigation step as Java text, dispatched on the receiver type:
/// getter for classes, `get(key)` for maps, index for lists, and the
/// `mapProperty` helper to flat-map over collections.
fn property_access(target: &str, receiver: &JavaType, segment: Symbol) -> String {
    match receiver {
        JavaType::Map(_, _) => format!("{}.get(\"{}\")", target, segment),
        JavaType::List(_) | JavaType::Set(_) if is_numeric_name(segment) => {
            format!("{}.get({})", target, segment)
        }
        JavaType::List(_) | JavaType::Set(_) => format!(
            "mapProperty({}, it -> it.get{}())",
            target,
            capitalize(segment.as_str())
        ),
        _ => format!("{}.get{}()", target, capitalize(segment.as_str())),
    }
}

fn is_numeric_name(name: Symbol) -> bool {
    !name.as_str().is_empty() && name.as_str().chars().all(|c| c.is_ascii_digit())
}

fn plain_operator(op: BinOp) -> &'static str {
    match op {
        BinOp::Lt => "<",
        BinOp::LtEq => "<=",
        BinOp::Gt => ">",
        BinOp::GtEq => ">=",
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Eq | BinOp::NotEq => "==",
    }
}

fn shape_name(expr: &Expr) -> &'static str {
    match expr {
        Expr::Identifier(_) => "identifier",
        Expr::Literal(_) => "literal",
        Expr::Binary(_) => "binary expression",
        Expr::Assignment(_) => "assignment",
        Expr::Navigation(_) => "navigation",
        Expr::MessageSend(_) => "message send",
        Expr::Block(_) => "block",
        Expr::Sequence(_) => "sequence",
    }
}

/// Make an arbitrary Iskara name a valid Java identifier.
pub(crate) fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (index, c) in name.chars().enumerate() {
        if c.is_alphanumeric() {
            if index == 0 && c.is_ascii_digit() {
                out.push('_');
            }
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        out.push('_');
    }
    if JAVA_RESERVED.contains(&out.as_str()) {
        out.insert(0, '_');
    }
    out
}

/// Field name for a declaration: decapitalized and sanitized.
pub(crate) fn field_name(name: &str) -> String {
    sanitize(&decapitalize(name))
}

pub(crate) fn capitalize(name: &str) -> String {
    let sanitized = sanitize(name);
    let mut chars = sanitized.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => sanitized,
    }
}

pub(crate) fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => name.to_owned(),
    }
}

/// A Java string literal with escapes.
pub(crate) fn java_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
