//! iskc-sem - Semantic Analyzer
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! Semantic analysis checks the meaning of a parsed module: are names
//! declared once, do references resolve, are assignments legal, are the
//! rule sections well-formed? It runs as a pipeline of four validators
//! over the immutable [`Module`]:
//!
//! 1. DECLARATIONS - duplicates within each namespace, output/fact
//!    collisions, duplicate row ids ([`declarations`])
//! 2. REFERENCES  - undefined names, missing `@` on globals, scope and
//!    shadowing for locals and block parameters ([`references`])
//! 3. ASSIGNMENTS - read-only facts and globals, outputs and property
//!    paths confined to action sections ([`assignments`])
//! 4. SECTIONS    - empty rules/tables, missing template tables, the
//!    disconnected-boolean check ([`sections`])
//!
//! All four always run, so one invocation reports everything it can;
//! an error from any of them turns the result into a failure at the
//! end. Each validator is a top-level function over `(module, env)`,
//! with the module namespaces built once in [`env::ModuleEnv`] and
//! passed by reference.

pub mod env;
pub mod scope;

mod assignments;
mod declarations;
mod references;
mod sections;

#[cfg(test)]
mod edge_cases;

use env::ModuleEnv;
use iskc_par::ast::Module;
use iskc_util::{Handler, Outcome};

/// Result of analysis: the module plus warnings, or all diagnostics.
pub type AnalysisResult = Outcome<Module>;

/// Run all four validators over `module`.
///
/// Returns `Success` exactly when no validator reported an error;
/// warnings ride along either way.
///
/// # Examples
///
/// ```
/// use iskc_par::{parse, ParseOptions};
/// use iskc_sem::analyze;
///
/// let module = parse(
///     "outputs {\n  total : BigDecimal\n}\nrule R when then total := 1 end",
///     &ParseOptions::default(),
/// )
/// .into_value()
/// .unwrap();
///
/// assert!(analyze(module).is_success());
/// ```
pub fn analyze(module: Module) -> AnalysisResult {
    let handler = Handler::new();
    let env = ModuleEnv::build(&module);

    declarations::check(&module, &env, &handler);
    references::check(&module, &env, &handler);
    assignments::check(&module, &env, &handler);
    sections::check(&module, &handler);

    Outcome::from_handler(module, &handler)
}
