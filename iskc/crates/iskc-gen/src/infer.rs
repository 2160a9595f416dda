//! Type inference over expressions.
//!
//! A scoped context maps names to host types: facts, globals, outputs
//! and data tables at the root, template columns and `let` locals in
//! child scopes. Inference is best-effort; anything unresolvable is
//! `Unknown`, which downstream emission treats as untyped.
//!
//! Navigation over a collection flat-maps: `items.price` on
//! `List<Item>` is `List<BigDecimal>` (the property type of the element
//! type, in the same collection shape). A numeric segment indexes into
//! a list instead.

use crate::resolver::TypeResolver;
use crate::types::JavaType;
use iskc_par::ast::{Expr, KeywordPart, Literal, Selector};
use iskc_util::Symbol;
use rustc_hash::FxHashMap;

/// Scoped name-to-type context for one generated method.
pub(crate) struct TypeCtx<'a> {
    scopes: Vec<FxHashMap<Symbol, JavaType>>,
    resolver: &'a dyn TypeResolver,
}

impl<'a> TypeCtx<'a> {
    pub(crate) fn new(resolver: &'a dyn TypeResolver) -> Self {
        Self {
            scopes: vec![FxHashMap::default()],
            resolver,
        }
    }

    pub(crate) fn push(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub(crate) fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub(crate) fn bind(&mut self, name: Symbol, ty: JavaType) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, ty);
        }
    }

    pub(crate) fn lookup(&self, name: Symbol) -> JavaType {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).cloned())
            .unwrap_or(JavaType::Unknown)
    }

    /// Type of property `name` on a receiver of type `receiver`.
    pub(crate) fn property_type(&self, receiver: &JavaType, name: Symbol) -> JavaType {
        match receiver {
            JavaType::List(element) => {
                if name.as_str().chars().all(|c| c.is_ascii_digit()) {
                    (**element).clone()
                } else {
                    JavaType::List(Box::new(self.property_type(element, name)))
                }
            }
            JavaType::Set(element) => {
                JavaType::Set(Box::new(self.property_type(element, name)))
            }
            JavaType::Map(_, value) => (**value).clone(),
            other => self.resolver.resolve_property(other, name.as_str()),
        }
    }

    /// Infer the host type of `expr`.
    pub(crate) fn infer(&mut self, expr: &Expr) -> JavaType {
        match expr {
            Expr::Identifier(identifier) => self.lookup(identifier.name),
            Expr::Literal(literal) => self.infer_literal(literal),
            Expr::Binary(binary) => {
                if binary.op.is_comparison() {
                    JavaType::Boolean
                } else {
                    JavaType::Decimal
                }
            }
            Expr::Assignment(_) => JavaType::Void,
            Expr::Navigation(navigation) => {
                let mut current = self.infer(&navigation.receiver);
                for segment in &navigation.path {
                    current = self.property_type(&current, *segment);
                }
                current
            }
            Expr::MessageSend(send) => {
                let receiver = self.infer(&send.receiver);
                self.infer_send(&receiver, &send.selector)
            }
            Expr::Block(_) => JavaType::Unknown,
            Expr::Sequence(_) => JavaType::Boolean,
        }
    }

    fn infer_literal(&mut self, literal: &Literal) -> JavaType {
        match literal {
            Literal::Str(_) | Literal::Interpolated(_) => JavaType::Text,
            Literal::Number(_) => JavaType::Decimal,
            Literal::Bool(_) => JavaType::Boolean,
            Literal::Null => JavaType::Object,
            Literal::List(elements) => JavaType::List(Box::new(self.element_type(elements))),
            Literal::Set(elements) => JavaType::Set(Box::new(self.element_type(elements))),
            Literal::Map(entries) => {
                let (key, value) = match entries.first() {
                    Some((key, value)) => (self.infer(key), self.infer(value)),
                    None => (JavaType::Object, JavaType::Object),
                };
                JavaType::Map(Box::new(key), Box::new(value))
            }
        }
    }

    fn element_type(&mut self, elements: &[Expr]) -> JavaType {
        elements
            .first()
            .map(|first| self.infer(first))
            .unwrap_or(JavaType::Object)
    }

    fn infer_send(&mut self, receiver: &JavaType, selector: &Selector) -> JavaType {
        match selector {
            Selector::Unary(name) => match name.as_str() {
                "size" | "count" => JavaType::Int,
                "exists" | "notEmpty" | "isEmpty" => JavaType::Boolean,
                "sum" => JavaType::Decimal,
                other => self.resolver.resolve_method_return(receiver, other),
            },
            Selector::Keyword(parts) => self.infer_keyword_send(receiver, parts),
            Selector::Default => JavaType::Unknown,
        }
    }

    fn infer_keyword_send(&mut self, receiver: &JavaType, parts: &[KeywordPart]) -> JavaType {
        if parts.len() == 1 {
            match parts[0].keyword.as_str() {
                "where" => return receiver.clone(),
                "at" => {
                    return match receiver {
                        JavaType::List(element) | JavaType::Set(element) => (**element).clone(),
                        JavaType::Map(_, value) => (**value).clone(),
                        _ => JavaType::Unknown,
                    };
                }
                "each" => return JavaType::Void,
                _ => {}
            }
        }
        self.resolver
            .resolve_method_return(receiver, &keyword_method_name(parts))
    }
}

/// `k1: a k2: b` concatenates and camel-cases into `k1K2`.
pub(crate) fn keyword_method_name(parts: &[KeywordPart]) -> String {
    let mut name = String::new();
    for (index, part) in parts.iter().enumerate() {
        let keyword = part.keyword.as_str();
        if index == 0 {
            name.push_str(keyword);
        } else {
            let mut chars = keyword.chars();
            if let Some(first) = chars.next() {
                name.extend(first.to_uppercase());
                name.push_str(chars.as_str());
            }
        }
    }
    name
}
