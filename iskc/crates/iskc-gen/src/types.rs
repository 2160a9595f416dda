//! Host type model.
//!
//! The generator thinks in Java types: a closed sum over the handful of
//! shapes the language can produce. Structured [`TypeRef`]s from the AST
//! resolve into this model through the module's import aliases; anything
//! the generator cannot see into becomes [`JavaType::Unknown`] and falls
//! back to untyped emission.

use iskc_par::ast::{Import, TypeRef};
use rustc_hash::FxHashMap;
use iskc_util::Symbol;

/// A host (Java) type as the generator reasons about it.
#[derive(Clone, Debug, PartialEq)]
pub enum JavaType {
    /// Resolution failed; emit untyped
    Unknown,
    /// `java.lang.Object`, the top type
    Object,
    /// `boolean`
    Boolean,
    /// `int` (collection sizes)
    Int,
    /// `java.math.BigDecimal` - every Iskara number
    Decimal,
    /// `java.lang.String`
    Text,
    /// `void`
    Void,
    /// A named class, simple or qualified
    Named(String),
    /// `List<T>`
    List(Box<JavaType>),
    /// `Set<T>`
    Set(Box<JavaType>),
    /// `Map<K,V>`
    Map(Box<JavaType>, Box<JavaType>),
}

impl JavaType {
    /// Java source spelling of the type.
    pub fn render(&self) -> String {
        match self {
            JavaType::Unknown | JavaType::Object => "Object".into(),
            JavaType::Boolean => "boolean".into(),
            JavaType::Int => "int".into(),
            JavaType::Decimal => "BigDecimal".into(),
            JavaType::Text => "String".into(),
            JavaType::Void => "void".into(),
            JavaType::Named(name) => name.clone(),
            JavaType::List(element) => format!("List<{}>", element.render_boxed()),
            JavaType::Set(element) => format!("Set<{}>", element.render_boxed()),
            JavaType::Map(key, value) => {
                format!("Map<{}, {}>", key.render_boxed(), value.render_boxed())
            }
        }
    }

    /// Spelling inside generics, where primitives box.
    fn render_boxed(&self) -> String {
        match self {
            JavaType::Boolean => "Boolean".into(),
            JavaType::Int => "Integer".into(),
            other => other.render(),
        }
    }

    /// True for BigDecimal and int.
    pub fn is_numeric(&self) -> bool {
        matches!(self, JavaType::Decimal | JavaType::Int)
    }

    /// True for list and set shapes.
    pub fn is_collection(&self) -> bool {
        matches!(self, JavaType::List(_) | JavaType::Set(_))
    }

    /// Element type of a collection, if this is one.
    pub fn element_type(&self) -> Option<&JavaType> {
        match self {
            JavaType::List(element) | JavaType::Set(element) => Some(element),
            _ => None,
        }
    }
}

/// Alias table from the module's imports.
pub fn import_map(imports: &[Import]) -> FxHashMap<Symbol, String> {
    imports
        .iter()
        .map(|import| (import.alias, import.qualified_name.clone()))
        .collect()
}

/// Resolve a structured type reference to a host type, expanding import
/// aliases and recognizing the well-known Java names.
pub fn resolve_type_ref(type_ref: &TypeRef, imports: &FxHashMap<Symbol, String>) -> JavaType {
    match type_ref {
        TypeRef::Simple(name) => {
            let expanded = imports
                .get(&Symbol::intern(name))
                .cloned()
                .unwrap_or_else(|| name.clone());
            named_type(&expanded)
        }
        TypeRef::List(element) => {
            JavaType::List(Box::new(resolve_type_ref(element, imports)))
        }
        TypeRef::Set(element) => JavaType::Set(Box::new(resolve_type_ref(element, imports))),
        TypeRef::Map(key, value) => JavaType::Map(
            Box::new(resolve_type_ref(key, imports)),
            Box::new(resolve_type_ref(value, imports)),
        ),
    }
}

fn named_type(name: &str) -> JavaType {
    match name {
        "BigDecimal" | "java.math.BigDecimal" | "Number" => JavaType::Decimal,
        "String" | "java.lang.String" => JavaType::Text,
        "Boolean" | "boolean" | "java.lang.Boolean" => JavaType::Boolean,
        "Integer" | "int" | "java.lang.Integer" => JavaType::Int,
        "Object" | "java.lang.Object" => JavaType::Object,
        other => JavaType::Named(other.to_owned()),
    }
}
