//! Back-end registry.
//!
//! The analyzer and generator back-ends sit behind traits so
//! alternative implementations can be substituted per compiler
//! instance: a stricter analyzer, a different target language, an
//! instrumented generator for tooling. The registry is a plain value
//! handed to [`crate::Compiler`]; there is no global mutable state and
//! nothing is discovered implicitly.
//!
//! # Examples
//!
//! ```
//! use iskc_drv::registry::Registry;
//!
//! // The standard pipeline back-ends.
//! let registry = Registry::standard();
//! # let _ = registry;
//! ```

use iskc_gen::{CompilationResult, GenOptions};
use iskc_par::ast::Module;
use iskc_sem::AnalysisResult;

/// A semantic analysis back-end.
pub trait Analyzer {
    /// Validate `module`, producing it back on success.
    fn analyze(&self, module: Module) -> AnalysisResult;
}

/// A code generation back-end.
pub trait Generator {
    /// Lower `module` to a source map.
    fn generate(&self, module: &Module, options: &GenOptions) -> CompilationResult;
}

/// The standard analyzer: the four-validator pipeline of `iskc-sem`.
pub struct StandardAnalyzer;

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, module: Module) -> AnalysisResult {
        iskc_sem::analyze(module)
    }
}

/// The standard generator: the Java emitter of `iskc-gen`.
pub struct StandardGenerator;

impl Generator for StandardGenerator {
    fn generate(&self, module: &Module, options: &GenOptions) -> CompilationResult {
        iskc_gen::compile(module, options)
    }
}

/// The back-ends one compiler instance uses.
pub struct Registry {
    analyzer: Box<dyn Analyzer>,
    generator: Box<dyn Generator>,
}

impl Registry {
    /// The standard pipeline.
    pub fn standard() -> Self {
        Self {
            analyzer: Box::new(StandardAnalyzer),
            generator: Box::new(StandardGenerator),
        }
    }

    /// Replace the analyzer back-end.
    pub fn with_analyzer(mut self, analyzer: Box<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Replace the generator back-end.
    pub fn with_generator(mut self, generator: Box<dyn Generator>) -> Self {
        self.generator = generator;
        self
    }

    pub(crate) fn analyzer(&self) -> &dyn Analyzer {
        self.analyzer.as_ref()
    }

    pub(crate) fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
