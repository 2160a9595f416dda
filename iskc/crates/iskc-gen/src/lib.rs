//! iskc-gen - Java Code Generation
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The final stage: a validated [`Module`] becomes Java source text.
//! One class per module, facts and globals as constructor-injected
//! immutable fields, outputs as mutable fields with getters, one private
//! method per rule (one per data-table *row* for template rules), and a
//! public `evaluate()` that fires everything in declaration order.
//!
//! TYPES:
//! ------
//! Emission is type-directed where it can be: a scoped inference context
//! ([`infer`]) resolves declaration types through import aliases and
//! consults the [`resolver::TypeResolver`] capability for domain
//! properties. Whatever cannot be resolved is `Unknown` and falls back
//! to untyped emission through the runtime helpers, which own numeric
//! coercion at run time.
//!
//! OUTPUT CONTRACT:
//! ----------------
//! The produced map has one entry,
//! `<package-as-dirs>/<ClassName>.java`, whose text compiles against
//! `java.math.BigDecimal`, `java.util.*` and a static import of the
//! `iskara.runtime.RuleRuntime` helper surface (`addNumeric`,
//! `compareNumeric`, `equalsNumericAware`, `sumNumeric`, `filter`,
//! `mapProperty`, …).

pub mod resolver;
pub mod types;

mod class;
mod error;
mod expr;
mod infer;

#[cfg(test)]
mod edge_cases;

pub use error::GenError;

use iskc_par::ast::Module;
use resolver::TypeResolver;
use std::collections::BTreeMap;

/// Options for one code generation invocation.
pub struct GenOptions {
    /// Java package; empty emits at the top level
    pub package_name: String,
    /// Class name; defaults to `GeneratedRules`
    pub class_name: String,
    /// Emit null-safe Optional pipelines for navigation
    pub generate_null_checks: bool,
    /// Domain type resolution; `None` keeps everything untyped
    pub resolver: Option<Box<dyn TypeResolver>>,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            package_name: String::new(),
            class_name: "GeneratedRules".into(),
            generate_null_checks: true,
            resolver: None,
        }
    }
}

/// Result of code generation: the source map, or error strings.
#[derive(Debug)]
pub enum CompilationResult {
    /// Generated files, keyed by relative path
    Success(BTreeMap<String, String>),
    /// Everything that went wrong
    Failure(Vec<String>),
}

impl CompilationResult {
    /// True if generation produced files.
    pub fn is_success(&self) -> bool {
        matches!(self, CompilationResult::Success(_))
    }

    /// The file map, if generation succeeded.
    pub fn files(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            CompilationResult::Success(files) => Some(files),
            CompilationResult::Failure(_) => None,
        }
    }

    /// The error list, if generation failed.
    pub fn errors(&self) -> Option<&[String]> {
        match self {
            CompilationResult::Success(_) => None,
            CompilationResult::Failure(errors) => Some(errors),
        }
    }
}

/// Generate Java source for a validated module.
///
/// The module is expected to have passed `iskc_sem::analyze`; shapes the
/// analyzer would have rejected surface here as codegen errors rather
/// than panics.
///
/// # Examples
///
/// ```
/// use iskc_gen::{compile, GenOptions};
/// use iskc_par::{parse, ParseOptions};
///
/// let module = parse(
///     "outputs {\n  total : BigDecimal := 0\n}\nrule R when then total := 1 end",
///     &ParseOptions::default(),
/// )
/// .into_value()
/// .unwrap();
///
/// let result = compile(&module, &GenOptions::default());
/// let files = result.files().expect("generates");
/// assert!(files.contains_key("GeneratedRules.java"));
/// ```
pub fn compile(module: &Module, options: &GenOptions) -> CompilationResult {
    match class::generate(module, options) {
        Ok(files) => CompilationResult::Success(files),
        Err(errors) => CompilationResult::Failure(errors),
    }
}
