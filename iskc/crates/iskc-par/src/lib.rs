//! iskc-par - Parser (Syntactic Analyzer)
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! A recursive descent parser from the token stream of `iskc-lex` to the
//! [`ast::Module`] tree. The grammar is LL-style: every construct is
//! decided by at most two tokens of lookahead, and expressions use an
//! iterative precedence ladder (no left recursion).
//!
//! MODULE GRAMMAR:
//! ---------------
//! ```ebnf
//! module      = [ "module" identifier ] { section } { rule } ;
//!
//! section     = "imports" "{" { import } "}"
//!             | "facts"   "{" { fact } "}"
//!             | "globals" "{" { global } "}"
//!             | "outputs" "{" { output } "}"
//!             | "data" "table" identifier "{" table-rows "}" ;
//!
//! import      = identifier ":=" qualified-name [ string ] ;
//! fact        = identifier ":" type-ref [ string ] ;
//! global      = identifier ":" type-ref [ string ] ;
//! output      = identifier ":" type-ref [ ":=" expression ] [ string ] ;
//!
//! rule        = simple-rule | template-rule | decision-table ;
//! ```
//!
//! Declarations inside a section end at line breaks; sections may appear
//! in any order and rules follow them.
//!
//! ERROR RECOVERY:
//! ---------------
//! A syntax error reports a diagnostic with the offending token's
//! location, then skips to a synchronization point: the next top-level
//! keyword, a closing `}`, or `end`. A single file therefore yields as
//! many diagnostics as possible.
//!
//! ENTRY POINTS:
//! -------------
//! [`parse`] turns a whole source into a module. The fragment entries
//! ([`parse_expression_fragment`], [`parse_statements_fragment`],
//! [`parse_rule_fragment`]) serve the markup frontend, which extracts
//! Iskara snippets from prose documents and parses them piecewise; the
//! decision-table reader also uses the expression fragment entry to
//! re-parse combined header/cell text.

pub mod ast;
pub mod merge;

mod expr;
mod rules;
mod table;
mod types;

#[cfg(test)]
mod edge_cases;

use ast::{Module, Rule, Statement};
use iskc_lex::{Lexer, Locale, Token, TokenKind};
use iskc_util::{Handler, Location, Outcome, Span, Symbol};

/// How the source reached the compiler.
///
/// Markup documents are pre-extracted by an external frontend; the core
/// parser sees the same native grammar either way, so the flag only
/// travels into diagnostics via the source name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceType {
    Native,
    Markup,
}

/// Options for a parse invocation.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Locale governing the number-literal decimal separator
    pub locale: Locale,
    /// Provenance of the source text
    pub source_type: SourceType,
    /// Name used in diagnostic locations
    pub source_name: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            locale: Locale::EN,
            source_type: SourceType::Native,
            source_name: "<input>".into(),
        }
    }
}

/// Result of parsing: the module plus warnings, or all diagnostics.
pub type ParseResult = Outcome<Module>;

/// Parse a complete Iskara source into a [`Module`].
///
/// Lexical and syntactic diagnostics accumulate together; any error
/// turns the result into a failure once the whole input has been
/// examined.
///
/// # Examples
///
/// ```
/// use iskc_par::{parse, ParseOptions};
///
/// let result = parse("rule R when then end", &ParseOptions::default());
/// let module = result.into_value().expect("parses");
/// assert_eq!(module.rules.len(), 1);
/// ```
pub fn parse(source: &str, options: &ParseOptions) -> ParseResult {
    let handler = Handler::new();
    let tokens = Lexer::new(source, options.locale, &options.source_name, &handler).tokenize();
    let mut parser = Parser::new(source, tokens, &handler, options);
    let module = parser.parse_module();
    Outcome::from_handler(module, &handler)
}

/// Parse a single expression, e.g. one extracted markup fragment.
pub fn parse_expression_fragment(source: &str, options: &ParseOptions) -> Outcome<ast::Expr> {
    let handler = Handler::new();
    let tokens = Lexer::new(source, options.locale, &options.source_name, &handler).tokenize();
    let mut parser = Parser::new(source, tokens, &handler, options);
    parser.skip_newlines();
    let expr = parser.parse_expr();
    parser.skip_newlines();
    if !parser.at_end() {
        parser.error_here("unexpected trailing input after expression");
    }
    let expr = expr.unwrap_or(ast::Expr::Literal(ast::Literal::Null));
    Outcome::from_handler(expr, &handler)
}

/// Parse a statement list, e.g. the body of a tagged markup section.
pub fn parse_statements_fragment(
    source: &str,
    options: &ParseOptions,
) -> Outcome<Vec<Statement>> {
    let handler = Handler::new();
    let tokens = Lexer::new(source, options.locale, &options.source_name, &handler).tokenize();
    let mut parser = Parser::new(source, tokens, &handler, options);
    let statements = parser.parse_statements(&[TokenKind::Eof]);
    Outcome::from_handler(statements, &handler)
}

/// Parse a single rule of any kind, e.g. one extracted markup section.
pub fn parse_rule_fragment(source: &str, options: &ParseOptions) -> Outcome<Rule> {
    let handler = Handler::new();
    let tokens = Lexer::new(source, options.locale, &options.source_name, &handler).tokenize();
    let mut parser = Parser::new(source, tokens, &handler, options);
    parser.skip_newlines();
    let rule = match parser.peek() {
        TokenKind::Rule => parser.parse_simple_rule().map(Rule::Simple),
        TokenKind::Template => parser.parse_template_rule().map(Rule::Template),
        TokenKind::Decision => parser.parse_decision_table_rule().map(Rule::DecisionTable),
        other => {
            let message = format!("expected a rule, found {}", other);
            parser.error_here(message);
            None
        }
    };
    let rule = rule.unwrap_or(Rule::Simple(ast::SimpleRule {
        id: Symbol::intern("<error>"),
        description: None,
        when: vec![],
        then: vec![],
        else_branch: vec![],
    }));
    Outcome::from_handler(rule, &handler)
}

// ============================================================================
// PARSER STRUCTURE
// ============================================================================

/// Recursive descent parser over a pre-lexed token vector.
pub(crate) struct Parser<'a> {
    /// Original source text; decision-table cells are sliced back out of
    /// it by token span
    pub(crate) source: &'a str,
    /// Token stream from the lexer, `Eof`-terminated
    tokens: Vec<Token>,
    /// Current position in the token stream
    position: usize,
    /// Diagnostic sink shared with the lexer
    pub(crate) handler: &'a Handler,
    /// Parse options, threaded into cell re-parses
    pub(crate) options: &'a ParseOptions,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        source: &'a str,
        tokens: Vec<Token>,
        handler: &'a Handler,
        options: &'a ParseOptions,
    ) -> Self {
        Self {
            source,
            tokens,
            position: 0,
            handler,
            options,
        }
    }

    // ------------------------------------------------------------------
    // Module and sections
    // ------------------------------------------------------------------

    /// Parse a complete module.
    pub(crate) fn parse_module(&mut self) -> Module {
        let mut module = Module::default();

        self.skip_newlines();
        if self.eat(&TokenKind::Module) {
            module.name = self.expect_identifier("module name");
            self.expect_terminator();
        }

        loop {
            self.skip_newlines();
            match self.peek() {
                TokenKind::Eof => break,
                TokenKind::Imports => self.parse_imports(&mut module),
                TokenKind::Facts => self.parse_facts(&mut module),
                TokenKind::Globals => self.parse_globals(&mut module),
                TokenKind::Outputs => self.parse_outputs(&mut module),
                TokenKind::Data => match self.parse_module_data_table() {
                    Some(data_table) => module.data_tables.push(data_table),
                    None => self.recover_to_sync_point(),
                },
                TokenKind::Rule => match self.parse_simple_rule() {
                    Some(rule) => module.rules.push(Rule::Simple(rule)),
                    None => self.recover_to_sync_point(),
                },
                TokenKind::Template => match self.parse_template_rule() {
                    Some(rule) => module.rules.push(Rule::Template(rule)),
                    None => self.recover_to_sync_point(),
                },
                TokenKind::Decision => match self.parse_decision_table_rule() {
                    Some(rule) => module.rules.push(Rule::DecisionTable(rule)),
                    None => self.recover_to_sync_point(),
                },
                other => {
                    let message = format!("expected a declaration, found {}", other);
                    self.error_here(message);
                    self.recover_to_sync_point();
                }
            }
        }

        module
    }

    fn parse_imports(&mut self, module: &mut Module) {
        self.advance();
        if self.expect(&TokenKind::LBrace).is_none() {
            self.recover_to_sync_point();
            return;
        }
        self.skip_newlines();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            match self.parse_import() {
                Some(import) => module.imports.push(import),
                None => self.recover_within_braces(),
            }
            self.skip_newlines();
        }
        self.expect(&TokenKind::RBrace);
    }

    fn parse_import(&mut self) -> Option<ast::Import> {
        let alias = self.expect_identifier("import alias")?;
        self.expect(&TokenKind::Assign)?;
        let qualified_name = self.parse_qualified_name()?;
        let description = self.eat_description();
        self.expect_terminator_in_braces();
        Some(ast::Import {
            alias,
            qualified_name,
            description,
        })
    }

    fn parse_facts(&mut self, module: &mut Module) {
        self.advance();
        if self.expect(&TokenKind::LBrace).is_none() {
            self.recover_to_sync_point();
            return;
        }
        self.skip_newlines();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            match self.parse_typed_declaration("fact") {
                Some((name, type_ref, description)) => module.facts.push(ast::Fact {
                    name,
                    type_ref,
                    description,
                }),
                None => self.recover_within_braces(),
            }
            self.skip_newlines();
        }
        self.expect(&TokenKind::RBrace);
    }

    fn parse_globals(&mut self, module: &mut Module) {
        self.advance();
        if self.expect(&TokenKind::LBrace).is_none() {
            self.recover_to_sync_point();
            return;
        }
        self.skip_newlines();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            match self.parse_typed_declaration("global") {
                Some((name, type_ref, description)) => module.globals.push(ast::Global {
                    name,
                    type_ref,
                    description,
                }),
                None => self.recover_within_braces(),
            }
            self.skip_newlines();
        }
        self.expect(&TokenKind::RBrace);
    }

    fn parse_outputs(&mut self, module: &mut Module) {
        self.advance();
        if self.expect(&TokenKind::LBrace).is_none() {
            self.recover_to_sync_point();
            return;
        }
        self.skip_newlines();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            match self.parse_output() {
                Some(output) => module.outputs.push(output),
                None => self.recover_within_braces(),
            }
            self.skip_newlines();
        }
        self.expect(&TokenKind::RBrace);
    }

    fn parse_output(&mut self) -> Option<ast::Output> {
        let name = self.expect_identifier("output name")?;
        self.expect(&TokenKind::Colon)?;
        let type_ref = self.parse_type_ref()?;
        let initial_value = if self.eat(&TokenKind::Assign) {
            Some(self.parse_assignment_level()?)
        } else {
            None
        };
        let description = self.eat_description();
        self.expect_terminator_in_braces();
        Some(ast::Output {
            name,
            type_ref,
            initial_value,
            description,
        })
    }

    /// `name : type-ref [ "description" ]` - shared by facts and globals.
    fn parse_typed_declaration(
        &mut self,
        what: &str,
    ) -> Option<(Symbol, ast::TypeRef, Option<String>)> {
        let name = self.expect_identifier(&format!("{} name", what))?;
        self.expect(&TokenKind::Colon)?;
        let type_ref = self.parse_type_ref()?;
        let description = self.eat_description();
        self.expect_terminator_in_braces();
        Some((name, type_ref, description))
    }

    /// Dotted host type path: `java.math.BigDecimal`.
    pub(crate) fn parse_qualified_name(&mut self) -> Option<String> {
        let mut name = self.expect_identifier("type name")?.as_str().to_owned();
        while self.eat(&TokenKind::Dot) {
            name.push('.');
            name.push_str(self.expect_identifier("type name segment")?.as_str());
        }
        Some(name)
    }

    /// A trailing string literal is a description.
    pub(crate) fn eat_description(&mut self) -> Option<String> {
        if let TokenKind::Str(text) = self.peek() {
            let text = text.clone();
            self.advance();
            Some(text)
        } else {
            None
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Parse newline-separated statements until one of `until` (or end
    /// of input) is reached. The terminating token is not consumed.
    pub(crate) fn parse_statements(&mut self, until: &[TokenKind]) -> Vec<Statement> {
        let mut statements = Vec::new();
        self.skip_newlines();
        while !self.at_end() && !until.iter().any(|k| self.check(k)) {
            match self.parse_statement() {
                Some(statement) => statements.push(statement),
                None => self.recover_within_statements(until),
            }
            // A statement ends at a line break or at the section end.
            if self.check(&TokenKind::Newline) {
                self.skip_newlines();
            } else if !self.at_end() && !until.iter().any(|k| self.check(k)) {
                let message = format!("expected end of statement, found {}", self.peek());
                self.error_here(message);
                self.recover_within_statements(until);
                self.skip_newlines();
            }
        }
        statements
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        if self.eat(&TokenKind::Let) {
            let name = self.expect_identifier("binding name")?;
            self.expect(&TokenKind::Assign)?;
            let expr = self.parse_expr()?;
            Some(Statement::Let(ast::LetStatement { name, expr }))
        } else {
            Some(Statement::Expr(self.parse_expr()?))
        }
    }

    // ------------------------------------------------------------------
    // Token plumbing
    // ------------------------------------------------------------------

    pub(crate) fn peek(&self) -> &TokenKind {
        &self.tokens[self.position.min(self.tokens.len() - 1)].kind
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> &TokenKind {
        let index = (self.position + n).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens[self.position.min(self.tokens.len() - 1)].span
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.position.min(self.tokens.len() - 1)].clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    /// Same-variant check, ignoring payloads.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            let message = format!("expected {}, found {}", kind, self.peek());
            self.error_here(message);
            None
        }
    }

    /// An identifier, plain or backtick-quoted.
    pub(crate) fn expect_identifier(&mut self, what: &str) -> Option<Symbol> {
        match self.peek() {
            TokenKind::Ident(name) | TokenKind::QuotedIdent(name) => {
                let name = *name;
                self.advance();
                Some(name)
            }
            other => {
                let message = format!("expected {}, found {}", what, other);
                self.error_here(message);
                None
            }
        }
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    /// A declaration ends at a newline or end of input.
    fn expect_terminator(&mut self) {
        if self.check(&TokenKind::Newline) {
            self.skip_newlines();
        } else if !self.at_end() {
            let message = format!("expected end of line, found {}", self.peek());
            self.error_here(message);
        }
    }

    /// Inside a `{ … }` section a declaration may also end right before
    /// the closing brace.
    fn expect_terminator_in_braces(&mut self) {
        if self.check(&TokenKind::Newline) {
            self.skip_newlines();
        } else if !self.check(&TokenKind::RBrace) && !self.at_end() {
            let message = format!("expected end of line, found {}", self.peek());
            self.error_here(message);
        }
    }

    // ------------------------------------------------------------------
    // Diagnostics and recovery
    // ------------------------------------------------------------------

    pub(crate) fn error_here(&mut self, message: impl Into<String>) {
        let span = self.current_span();
        self.handler
            .error(message)
            .at(self.location(span))
            .emit();
    }

    pub(crate) fn location(&self, span: Span) -> Location {
        Location::from_span(&self.options.source_name, span)
    }

    /// Skip to the next top-level keyword, `end`, or closing brace.
    pub(crate) fn recover_to_sync_point(&mut self) {
        loop {
            match self.peek() {
                TokenKind::Eof => return,
                TokenKind::End | TokenKind::RBrace => {
                    self.advance();
                    return;
                }
                kind if kind.starts_top_level() => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip to the end of the current brace-enclosed declaration: the
    /// next line break (consumed) or the closing brace (left in place).
    fn recover_within_braces(&mut self) {
        loop {
            match self.peek() {
                TokenKind::Eof | TokenKind::RBrace => return,
                TokenKind::Newline => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip to the end of the current statement: the next line break or
    /// any of the section-ending tokens.
    fn recover_within_statements(&mut self, until: &[TokenKind]) {
        loop {
            if self.at_end()
                || self.check(&TokenKind::Newline)
                || until.iter().any(|k| self.check(k))
            {
                return;
            }
            self.advance();
        }
    }
}
