//! iskc-drv - Compiler Driver
//!
//! ============================================================================
//! COMPILATION PIPELINE
//! ============================================================================
//!
//! The driver runs the phases in order and owns the fail-fast policy
//! between them:
//!
//! ```text
//! Source text(s)
//!      │
//!      ▼
//! [Lexer + Parser] ──▶ Module per file       (iskc-lex, iskc-par)
//!      │
//!      ▼
//! [Merger]         ──▶ one Module            (iskc-par::merge)
//!      │
//!      ▼
//! [Analyzer]       ──▶ validated Module      (iskc-sem, via registry)
//!      │
//!      ▼
//! [Generator]      ──▶ { path -> Java text } (iskc-gen, via registry)
//! ```
//!
//! Every stage collects as many diagnostics as it can before the driver
//! decides. Warnings never stop the pipeline; they accumulate across
//! stages and accompany whichever outcome the caller receives. Errors
//! stop the pipeline at the end of the stage that found them, and the
//! caller gets that stage's full diagnostic list plus all earlier
//! warnings.
//!
//! The driver is a library; reading files, argument parsing and exit
//! codes belong to the embedding tool.

pub mod registry;

use iskc_gen::{CompilationResult, GenOptions};
use iskc_lex::Locale;
use iskc_par::ast::Module;
use iskc_par::{merge, ParseOptions, SourceType};
use iskc_util::{Diagnostic, Outcome};
use registry::Registry;
use std::collections::BTreeMap;

/// Options for a compiler instance.
pub struct CompilerOptions {
    /// Locale for number literals in every source
    pub locale: Locale,
    /// Provenance of the sources
    pub source_type: SourceType,
    /// Code generation options
    pub generation: GenOptions,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            locale: Locale::EN,
            source_type: SourceType::Native,
            generation: GenOptions::default(),
        }
    }
}

/// A successful compile: the generated sources plus every warning the
/// pipeline produced along the way.
#[derive(Debug)]
pub struct CompileOutput {
    /// Generated files, keyed by relative path
    pub files: BTreeMap<String, String>,
    /// Warnings from all stages, in stage order
    pub warnings: Vec<Diagnostic>,
}

/// The full pipeline behind one options set.
///
/// # Examples
///
/// ```
/// use iskc_drv::{Compiler, CompilerOptions};
///
/// let compiler = Compiler::new(CompilerOptions::default());
/// let output = compiler
///     .compile_source(
///         "pricing.isk",
///         "outputs {\n  total : BigDecimal := 0\n}\nrule R when then total := 1 end",
///     )
///     .expect("compiles");
///
/// assert!(output.files.contains_key("GeneratedRules.java"));
/// ```
pub struct Compiler {
    options: CompilerOptions,
    registry: Registry,
}

impl Compiler {
    /// A compiler with the standard back-ends.
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            registry: Registry::standard(),
        }
    }

    /// A compiler with substituted back-ends.
    pub fn with_registry(options: CompilerOptions, registry: Registry) -> Self {
        Self { options, registry }
    }

    /// Compile a single source text.
    pub fn compile_source(
        &self,
        source_name: &str,
        text: &str,
    ) -> Result<CompileOutput, Vec<Diagnostic>> {
        let (module, warnings) = self.parse_one(source_name, text)?;
        self.finish(module, warnings)
    }

    /// Compile several sources as one merged module.
    ///
    /// All files are parsed before the first failure is reported, so a
    /// broken file does not hide problems in the others.
    pub fn compile_sources(
        &self,
        sources: &[(&str, &str)],
    ) -> Result<CompileOutput, Vec<Diagnostic>> {
        let mut warnings = Vec::new();
        let mut modules = Vec::new();
        let mut failures = Vec::new();

        for (source_name, text) in sources {
            match self.parse_one(source_name, text) {
                Ok((module, mut file_warnings)) => {
                    warnings.append(&mut file_warnings);
                    modules.push(module);
                }
                Err(mut diagnostics) => failures.append(&mut diagnostics),
            }
        }
        if !failures.is_empty() {
            warnings.append(&mut failures);
            return Err(warnings);
        }

        let merged = match merge::merge(modules) {
            Ok(merged) => merged,
            Err(mut conflicts) => {
                warnings.append(&mut conflicts);
                return Err(warnings);
            }
        };

        self.finish(merged, warnings)
    }

    fn parse_one(
        &self,
        source_name: &str,
        text: &str,
    ) -> Result<(Module, Vec<Diagnostic>), Vec<Diagnostic>> {
        let options = ParseOptions {
            locale: self.options.locale,
            source_type: self.options.source_type,
            source_name: source_name.to_owned(),
        };
        match iskc_par::parse(text, &options) {
            Outcome::Success { value, warnings } => Ok((value, warnings)),
            Outcome::Failure { diagnostics } => Err(diagnostics),
        }
    }

    /// Analysis and generation, shared by both entry points.
    fn finish(
        &self,
        module: Module,
        mut warnings: Vec<Diagnostic>,
    ) -> Result<CompileOutput, Vec<Diagnostic>> {
        let module = match self.registry.analyzer().analyze(module) {
            Outcome::Success {
                value,
                warnings: mut stage_warnings,
            } => {
                warnings.append(&mut stage_warnings);
                value
            }
            Outcome::Failure { mut diagnostics } => {
                warnings.append(&mut diagnostics);
                return Err(warnings);
            }
        };

        match self
            .registry
            .generator()
            .generate(&module, &self.options.generation)
        {
            CompilationResult::Success(files) => Ok(CompileOutput { files, warnings }),
            CompilationResult::Failure(errors) => {
                warnings.extend(errors.into_iter().map(Diagnostic::error));
                Err(warnings)
            }
        }
    }
}
