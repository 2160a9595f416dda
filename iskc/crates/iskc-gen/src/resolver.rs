//! Type resolver capability.
//!
//! Property and method types on domain classes live outside the
//! compiler: the generator asks a [`TypeResolver`] and treats
//! [`JavaType::Unknown`] as "emit untyped". Host integrations back this
//! with reflection over a class loader; tests and catalogs use
//! [`CatalogResolver`]; with nothing configured, [`NullResolver`] keeps
//! everything untyped.

use crate::types::JavaType;
use rustc_hash::FxHashMap;

/// Resolution of property and method types on host classes.
///
/// Implementations must be cheap to call repeatedly; the generator does
/// not cache.
pub trait TypeResolver {
    /// Type of property `name` on `receiver`, or `Unknown`.
    fn resolve_property(&self, receiver: &JavaType, name: &str) -> JavaType;

    /// Return type of method `name` on `receiver`, or `Unknown`.
    fn resolve_method_return(&self, receiver: &JavaType, name: &str) -> JavaType;
}

/// The no-configuration resolver: everything is `Unknown`.
pub struct NullResolver;

impl TypeResolver for NullResolver {
    fn resolve_property(&self, _receiver: &JavaType, _name: &str) -> JavaType {
        JavaType::Unknown
    }

    fn resolve_method_return(&self, _receiver: &JavaType, _name: &str) -> JavaType {
        JavaType::Unknown
    }
}

/// A resolver backed by an explicit type catalog.
///
/// # Examples
///
/// ```
/// use iskc_gen::resolver::{CatalogResolver, TypeResolver};
/// use iskc_gen::types::JavaType;
///
/// let resolver = CatalogResolver::new()
///     .with_property("Item", "price", JavaType::Decimal)
///     .with_property("Item", "type", JavaType::Text);
///
/// let item = JavaType::Named("Item".into());
/// assert_eq!(resolver.resolve_property(&item, "price"), JavaType::Decimal);
/// assert_eq!(resolver.resolve_property(&item, "weight"), JavaType::Unknown);
/// ```
#[derive(Default)]
pub struct CatalogResolver {
    properties: FxHashMap<(String, String), JavaType>,
    methods: FxHashMap<(String, String), JavaType>,
}

impl CatalogResolver {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property type on a class.
    pub fn with_property(
        mut self,
        class: impl Into<String>,
        name: impl Into<String>,
        ty: JavaType,
    ) -> Self {
        self.properties.insert((class.into(), name.into()), ty);
        self
    }

    /// Register a method return type on a class.
    pub fn with_method(
        mut self,
        class: impl Into<String>,
        name: impl Into<String>,
        ty: JavaType,
    ) -> Self {
        self.methods.insert((class.into(), name.into()), ty);
        self
    }

    fn class_key(receiver: &JavaType) -> Option<String> {
        match receiver {
            JavaType::Named(name) => Some(name.clone()),
            _ => None,
        }
    }
}

impl TypeResolver for CatalogResolver {
    fn resolve_property(&self, receiver: &JavaType, name: &str) -> JavaType {
        Self::class_key(receiver)
            .and_then(|class| self.properties.get(&(class, name.to_owned())).cloned())
            .unwrap_or(JavaType::Unknown)
    }

    fn resolve_method_return(&self, receiver: &JavaType, name: &str) -> JavaType {
        Self::class_key(receiver)
            .and_then(|class| self.methods.get(&(class, name.to_owned())).cloned())
            .unwrap_or(JavaType::Unknown)
    }
}
