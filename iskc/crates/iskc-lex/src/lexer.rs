//! The Iskara lexer.
//!
//! A direct-coded scanner: `next_token` skips trivia, records the token
//! start, and dispatches on the first character. Errors are reported
//! through the [`Handler`] and never abort the scan; an unknown
//! character produces a diagnostic and skips one codepoint.
//!
//! INTERPOLATED STRINGS:
//! ---------------------
//! `$"` switches the lexer into text mode, where it emits runs of
//! [`TokenKind::TemplateText`] interleaved with embedded expressions.
//! `${` pushes an expression mode that tracks brace depth *per opener*:
//! inner `{ }` pairs nest freely, and only the `}` that balances the
//! opener pops back to text mode. Because the modes form a stack, an
//! interpolated string inside an embedded expression works too:
//!
//! ```text
//! $"total: ${ #[ "a": 1 ].size } items"
//!           │                 │
//!           └── depth 1 ──────┘  (the map's braces never pop the mode)
//! ```
//!
//! NEWLINES:
//! ---------
//! Newlines separate statements, so they are tokens; consecutive line
//! terminators collapse into a single [`TokenKind::Newline`]. Spaces,
//! tabs, `//` comments and (possibly nested) `/* */` comments are
//! skipped.

use crate::cursor::Cursor;
use crate::locale::Locale;
use crate::token::{Token, TokenKind};
use iskc_util::{Handler, Location, Span, Symbol};

/// Lexer mode, stacked to support nested interpolation.
#[derive(Debug)]
enum Mode {
    /// Inside `$"…"`, scanning literal text
    TemplateText,
    /// Inside `${…}`, scanning ordinary tokens; `depth` counts inner
    /// unbalanced `{` so only the matching `}` pops the mode
    TemplateExpr { depth: u32 },
}

/// The Iskara tokenizer.
///
/// # Example
///
/// ```
/// use iskc_lex::{Lexer, TokenKind};
/// use iskc_lex::locale::Locale;
/// use iskc_util::Handler;
///
/// let handler = Handler::new();
/// let mut lexer = Lexer::new("rule R", Locale::EN, "m.isk", &handler);
///
/// assert_eq!(lexer.next_token().kind, TokenKind::Rule);
/// assert!(matches!(lexer.next_token().kind, TokenKind::Ident(_)));
/// assert_eq!(lexer.next_token().kind, TokenKind::Eof);
/// ```
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    handler: &'a Handler,
    locale: Locale,
    source_name: String,
    modes: Vec<Mode>,
    token_start: usize,
    token_line: u32,
    token_column: u32,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `source`.
    pub fn new(
        source: &'a str,
        locale: Locale,
        source_name: impl Into<String>,
        handler: &'a Handler,
    ) -> Self {
        let mut cursor = Cursor::new(source);
        // A leading byte-order mark is not part of the language.
        if cursor.peek() == '\u{feff}' {
            cursor.bump();
        }
        Self {
            cursor,
            handler,
            locale,
            source_name: source_name.into(),
            modes: Vec::new(),
            token_start: 0,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Produce the next token. Returns [`TokenKind::Eof`] forever once
    /// the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        // Unknown characters are reported, skipped, and the scan
        // continues; the loop (rather than recursion) keeps long runs of
        // garbage from growing the stack.
        loop {
            if let Some(token) = self.scan_token() {
                return token;
            }
        }
    }

    /// One scan attempt. `None` means an unknown character was reported
    /// and skipped; the caller retries.
    fn scan_token(&mut self) -> Option<Token> {
        if matches!(self.modes.last(), Some(Mode::TemplateText)) {
            return Some(self.lex_template_text());
        }

        self.skip_trivia();

        if self.at_line_terminator() {
            self.start_token();
            while self.at_line_terminator() {
                self.cursor.bump();
                self.skip_trivia();
            }
            return Some(self.make(TokenKind::Newline));
        }

        self.start_token();

        if self.cursor.is_at_end() {
            return Some(self.make(TokenKind::Eof));
        }

        let c = self.cursor.peek();
        let token = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ',' => self.single(TokenKind::Comma),
            '{' => {
                self.cursor.bump();
                if let Some(Mode::TemplateExpr { depth }) = self.modes.last_mut() {
                    *depth += 1;
                }
                self.make(TokenKind::LBrace)
            }
            '}' => {
                self.cursor.bump();
                match self.modes.last_mut() {
                    Some(Mode::TemplateExpr { depth }) if *depth == 0 => {
                        self.modes.pop();
                        self.make(TokenKind::TemplateExprEnd)
                    }
                    Some(Mode::TemplateExpr { depth }) => {
                        *depth -= 1;
                        self.make(TokenKind::RBrace)
                    }
                    _ => self.make(TokenKind::RBrace),
                }
            }
            ':' => {
                self.cursor.bump();
                if self.cursor.eat('=') {
                    self.make(TokenKind::Assign)
                } else {
                    self.make(TokenKind::Colon)
                }
            }
            '~' => {
                self.cursor.bump();
                if self.cursor.eat('=') {
                    self.make(TokenKind::NotEq)
                } else {
                    self.report_unknown('~');
                    return None;
                }
            }
            '=' => self.single(TokenKind::Eq),
            '<' => {
                self.cursor.bump();
                if self.cursor.eat('=') {
                    self.make(TokenKind::LtEq)
                } else {
                    self.make(TokenKind::Lt)
                }
            }
            '>' => {
                self.cursor.bump();
                if self.cursor.eat('=') {
                    self.make(TokenKind::GtEq)
                } else {
                    self.make(TokenKind::Gt)
                }
            }
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '/' => self.single(TokenKind::Slash),
            '.' => {
                self.cursor.bump();
                if self.cursor.eat('.') {
                    self.make(TokenKind::DotDot)
                } else {
                    self.make(TokenKind::Dot)
                }
            }
            '!' => self.single(TokenKind::Bang),
            '@' => self.single(TokenKind::At),
            '|' => self.single(TokenKind::Pipe),
            '#' => {
                self.cursor.bump();
                match self.cursor.peek() {
                    '(' => {
                        self.cursor.bump();
                        self.make(TokenKind::HashLParen)
                    }
                    '{' => {
                        self.cursor.bump();
                        // A set literal's closer is a plain `}`, so it
                        // participates in interpolation depth tracking.
                        if let Some(Mode::TemplateExpr { depth }) = self.modes.last_mut() {
                            *depth += 1;
                        }
                        self.make(TokenKind::HashLBrace)
                    }
                    '[' => {
                        self.cursor.bump();
                        self.make(TokenKind::HashLBracket)
                    }
                    _ => self.make(TokenKind::Hash),
                }
            }
            '$' => {
                self.cursor.bump();
                if self.cursor.eat('"') {
                    self.modes.push(Mode::TemplateText);
                    self.make(TokenKind::TemplateStart)
                } else {
                    self.report_unknown('$');
                    return None;
                }
            }
            '"' | '\'' => self.lex_string(c),
            '`' => self.lex_quoted_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if is_identifier_start(c) => self.lex_identifier(),
            other => {
                self.report_unknown(other);
                return None;
            }
        };
        Some(token)
    }

    /// Drain the rest of the input into a vector, ending with the `Eof`
    /// token.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    // ------------------------------------------------------------------
    // Trivia
    // ------------------------------------------------------------------

    /// Skip spaces, tabs and comments. Stops at line terminators, which
    /// are tokens in this language.
    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.peek() {
                ' ' | '\t' => {
                    self.cursor.bump();
                }
                '/' if self.cursor.peek_ahead(1) == '/' => {
                    while !self.cursor.is_at_end() && !self.at_line_terminator() {
                        self.cursor.bump();
                    }
                }
                '/' if self.cursor.peek_ahead(1) == '*' => self.skip_block_comment(),
                _ => return,
            }
        }
    }

    /// Skip a `/* … */` comment, honoring nesting.
    fn skip_block_comment(&mut self) {
        let line = self.cursor.line();
        let column = self.cursor.column();
        self.cursor.bump();
        self.cursor.bump();
        let mut nesting = 1u32;
        while nesting > 0 {
            if self.cursor.is_at_end() {
                self.handler
                    .error("unterminated block comment")
                    .at(Location::new(&self.source_name, line, column, 2))
                    .emit();
                return;
            }
            if self.cursor.peek() == '/' && self.cursor.peek_ahead(1) == '*' {
                self.cursor.bump();
                self.cursor.bump();
                nesting += 1;
            } else if self.cursor.peek() == '*' && self.cursor.peek_ahead(1) == '/' {
                self.cursor.bump();
                self.cursor.bump();
                nesting -= 1;
            } else {
                self.cursor.bump();
            }
        }
    }

    fn at_line_terminator(&self) -> bool {
        matches!(self.cursor.peek(), '\n' | '\r')
    }

    // ------------------------------------------------------------------
    // Literals and names
    // ------------------------------------------------------------------

    /// Lex a quoted string, decoding escapes.
    fn lex_string(&mut self, quote: char) -> Token {
        self.cursor.bump();
        let mut text = String::new();
        loop {
            match self.cursor.peek() {
                c if c == quote => {
                    self.cursor.bump();
                    return self.make(TokenKind::Str(text));
                }
                '\0' if self.cursor.is_at_end() => {
                    self.error_at_token("unterminated string");
                    return self.make(TokenKind::Str(text));
                }
                '\n' | '\r' => {
                    self.error_at_token("unterminated string");
                    return self.make(TokenKind::Str(text));
                }
                '\\' => self.decode_escape(&mut text),
                _ => text.push(self.cursor.bump()),
            }
        }
    }

    /// Decode one escape sequence into `buf`. The cursor sits on `\`.
    ///
    /// Recognized: `\b \t \n \f \r \" \' \\ \$` and `\uXXXX`.
    fn decode_escape(&mut self, buf: &mut String) {
        let line = self.cursor.line();
        let column = self.cursor.column();
        self.cursor.bump();
        match self.cursor.bump() {
            'b' => buf.push('\u{0008}'),
            't' => buf.push('\t'),
            'n' => buf.push('\n'),
            'f' => buf.push('\u{000C}'),
            'r' => buf.push('\r'),
            '"' => buf.push('"'),
            '\'' => buf.push('\''),
            '\\' => buf.push('\\'),
            '$' => buf.push('$'),
            'u' => {
                let mut value = 0u32;
                let mut valid = true;
                for _ in 0..4 {
                    match self.cursor.peek().to_digit(16) {
                        Some(d) if !self.cursor.is_at_end() => {
                            value = value * 16 + d;
                            self.cursor.bump();
                        }
                        _ => {
                            valid = false;
                            break;
                        }
                    }
                }
                match char::from_u32(value).filter(|_| valid) {
                    Some(c) => buf.push(c),
                    None => {
                        self.handler
                            .error("invalid unicode escape")
                            .at(Location::new(&self.source_name, line, column, 2))
                            .emit();
                    }
                }
            }
            other => {
                self.handler
                    .error(format!("invalid escape sequence '\\{}'", other))
                    .at(Location::new(&self.source_name, line, column, 2))
                    .emit();
            }
        }
    }

    /// Lex a number literal. The decimal separator comes from the
    /// configured locale and is consumed only when a digit follows, so
    /// `1..10` and `f(1, 2)` lex as expected under either locale. The
    /// token text is normalized to a `.` separator.
    fn lex_number(&mut self) -> Token {
        let separator = self.locale.decimal_separator();
        let start = self.cursor.position();
        while self.cursor.peek().is_ascii_digit() {
            self.cursor.bump();
        }
        if self.cursor.peek() == separator && self.cursor.peek_ahead(1).is_ascii_digit() {
            self.cursor.bump();
            while self.cursor.peek().is_ascii_digit() {
                self.cursor.bump();
            }
        }
        let text = self.cursor.slice_from(start).replace(separator, ".");
        self.make(TokenKind::Number(text))
    }

    /// Lex a plain identifier or reserved word.
    fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.position();
        self.cursor.bump();
        while is_identifier_continue(self.cursor.peek()) {
            self.cursor.bump();
        }
        let text = self.cursor.slice_from(start);
        match TokenKind::keyword(text) {
            Some(keyword) => self.make(keyword),
            None => self.make(TokenKind::Ident(Symbol::intern(text))),
        }
    }

    /// Lex a backtick-quoted identifier: arbitrary text excluding the
    /// backtick itself.
    fn lex_quoted_identifier(&mut self) -> Token {
        self.cursor.bump();
        let start = self.cursor.position();
        loop {
            match self.cursor.peek() {
                '`' => {
                    let text = self.cursor.slice_from(start);
                    let symbol = Symbol::intern(text);
                    self.cursor.bump();
                    return self.make(TokenKind::QuotedIdent(symbol));
                }
                '\n' | '\r' => {
                    self.error_at_token("unterminated quoted identifier");
                    let text = self.cursor.slice_from(start);
                    return self.make(TokenKind::QuotedIdent(Symbol::intern(text)));
                }
                '\0' if self.cursor.is_at_end() => {
                    self.error_at_token("unterminated quoted identifier");
                    let text = self.cursor.slice_from(start);
                    return self.make(TokenKind::QuotedIdent(Symbol::intern(text)));
                }
                _ => {
                    self.cursor.bump();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Interpolation text mode
    // ------------------------------------------------------------------

    /// Produce the next token inside `$"…"` text.
    fn lex_template_text(&mut self) -> Token {
        self.start_token();

        match self.cursor.peek() {
            '"' => {
                self.cursor.bump();
                self.modes.pop();
                self.make(TokenKind::TemplateEnd)
            }
            '$' if self.cursor.peek_ahead(1) == '{' => {
                self.cursor.bump();
                self.cursor.bump();
                self.modes.push(Mode::TemplateExpr { depth: 0 });
                self.make(TokenKind::TemplateExprStart)
            }
            '\0' if self.cursor.is_at_end() => {
                self.error_at_token("unterminated interpolated string");
                self.modes.pop();
                self.make(TokenKind::TemplateEnd)
            }
            _ => {
                let mut text = String::new();
                loop {
                    match self.cursor.peek() {
                        '"' => break,
                        '$' if self.cursor.peek_ahead(1) == '{' => break,
                        '\0' if self.cursor.is_at_end() => break,
                        '\\' => self.decode_escape(&mut text),
                        _ => text.push(self.cursor.bump()),
                    }
                }
                self.make(TokenKind::TemplateText(text))
            }
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn start_token(&mut self) {
        self.token_start = self.cursor.position();
        self.token_line = self.cursor.line();
        self.token_column = self.cursor.column();
    }

    fn make(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            Span::new(
                self.token_start,
                self.cursor.position(),
                self.token_line,
                self.token_column,
            ),
        )
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.bump();
        self.make(kind)
    }

    fn error_at_token(&self, message: &str) {
        self.handler
            .error(message)
            .at(Location::new(
                &self.source_name,
                self.token_line,
                self.token_column,
                self.cursor.position().saturating_sub(self.token_start),
            ))
            .emit();
    }

    /// Report an unknown character and skip one codepoint if nothing
    /// was consumed yet.
    fn report_unknown(&mut self, c: char) {
        self.handler
            .error(format!("unknown character '{}'", c))
            .at(Location::new(
                &self.source_name,
                self.token_line,
                self.token_column,
                c.len_utf8(),
            ))
            .emit();
        if self.cursor.position() == self.token_start {
            self.cursor.bump();
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic()
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<TokenKind> {
        let handler = Handler::new();
        let tokens = Lexer::new(source, Locale::EN, "test.isk", &handler).tokenize();
        assert!(
            !handler.has_errors(),
            "unexpected errors: {:?}",
            handler.diagnostics()
        );
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn lex_with_errors(source: &str) -> (Vec<TokenKind>, Vec<String>) {
        let handler = Handler::new();
        let tokens = Lexer::new(source, Locale::EN, "test.isk", &handler).tokenize();
        let errors = handler
            .diagnostics()
            .into_iter()
            .map(|d| d.message)
            .collect();
        (tokens.into_iter().map(|t| t.kind).collect(), errors)
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(Symbol::intern(name))
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(lex(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_keywords_and_idents() {
        assert_eq!(
            lex("rule Pricing when"),
            vec![
                TokenKind::Rule,
                ident("Pricing"),
                TokenKind::When,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            lex(":= = ~= >= <= > < + - * / . .. ! : @ |"),
            vec![
                TokenKind::Assign,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::GtEq,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::Lt,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Dot,
                TokenKind::DotDot,
                TokenKind::Bang,
                TokenKind::Colon,
                TokenKind::At,
                TokenKind::Pipe,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_composite_openers() {
        assert_eq!(
            lex("#( #{ #[ #x"),
            vec![
                TokenKind::HashLParen,
                TokenKind::HashLBrace,
                TokenKind::HashLBracket,
                TokenKind::Hash,
                ident("x"),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            lex(r#""a\tb\n\"q\" A""#),
            vec![TokenKind::Str("a\tb\n\"q\" A".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_single_quoted_string() {
        assert_eq!(
            lex("'hi there'"),
            vec![TokenKind::Str("hi there".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_number_en_locale() {
        assert_eq!(
            lex("42 3.14"),
            vec![
                TokenKind::Number("42".into()),
                TokenKind::Number("3.14".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_number_comma_locale() {
        let handler = Handler::new();
        let tokens = Lexer::new("3,14", Locale::COMMA, "t", &handler).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Number("3.14".into()));
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_comma_locale_list_elements_untouched() {
        let handler = Handler::new();
        let tokens = Lexer::new("#(1, 2)", Locale::COMMA, "t", &handler).tokenize();
        let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::HashLParen,
                TokenKind::Number("1".into()),
                TokenKind::Comma,
                TokenKind::Number("2".into()),
                TokenKind::RParen,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_dotdot_after_number() {
        assert_eq!(
            lex("1..10"),
            vec![
                TokenKind::Number("1".into()),
                TokenKind::DotDot,
                TokenKind::Number("10".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_quoted_identifier() {
        assert_eq!(
            lex("`net price`"),
            vec![
                TokenKind::QuotedIdent(Symbol::intern("net price")),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_newlines_collapse() {
        assert_eq!(
            lex("a\n\n\nb"),
            vec![ident("a"), TokenKind::Newline, ident("b"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_line_comment() {
        assert_eq!(
            lex("a // note\nb"),
            vec![ident("a"), TokenKind::Newline, ident("b"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_nested_block_comment() {
        assert_eq!(
            lex("a /* outer /* inner */ still */ b"),
            vec![ident("a"), ident("b"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_interpolated_string_plain() {
        assert_eq!(
            lex(r#"$"hello""#),
            vec![
                TokenKind::TemplateStart,
                TokenKind::TemplateText("hello".into()),
                TokenKind::TemplateEnd,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_interpolated_string_with_expression() {
        assert_eq!(
            lex(r#"$"n: ${count} items""#),
            vec![
                TokenKind::TemplateStart,
                TokenKind::TemplateText("n: ".into()),
                TokenKind::TemplateExprStart,
                ident("count"),
                TokenKind::TemplateExprEnd,
                TokenKind::TemplateText(" items".into()),
                TokenKind::TemplateEnd,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_interpolation_inner_braces_do_not_pop() {
        assert_eq!(
            lex(r#"$"${ { x } }""#),
            vec![
                TokenKind::TemplateStart,
                TokenKind::TemplateExprStart,
                TokenKind::LBrace,
                ident("x"),
                TokenKind::RBrace,
                TokenKind::TemplateExprEnd,
                TokenKind::TemplateEnd,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_interpolation_nested_template() {
        assert_eq!(
            lex(r#"$"a${ $"b" }c""#),
            vec![
                TokenKind::TemplateStart,
                TokenKind::TemplateText("a".into()),
                TokenKind::TemplateExprStart,
                TokenKind::TemplateStart,
                TokenKind::TemplateText("b".into()),
                TokenKind::TemplateEnd,
                TokenKind::TemplateExprEnd,
                TokenKind::TemplateText("c".into()),
                TokenKind::TemplateEnd,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_escaped_dollar_stays_text() {
        assert_eq!(
            lex(r#"$"cost: \$5""#),
            vec![
                TokenKind::TemplateStart,
                TokenKind::TemplateText("cost: $5".into()),
                TokenKind::TemplateEnd,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_unknown_character_reported_and_skipped() {
        let (tokens, errors) = lex_with_errors("a ; b");
        assert_eq!(tokens, vec![ident("a"), ident("b"), TokenKind::Eof]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("unknown character"));
    }

    #[test]
    fn test_unterminated_string_reported() {
        let (_, errors) = lex_with_errors("\"oops\nx");
        assert!(errors.iter().any(|e| e.contains("unterminated string")));
    }

    #[test]
    fn test_unterminated_template_reported() {
        let (tokens, errors) = lex_with_errors(r#"$"dangling"#);
        assert!(errors
            .iter()
            .any(|e| e.contains("unterminated interpolated string")));
        assert!(tokens.contains(&TokenKind::TemplateEnd));
        assert_eq!(*tokens.last().unwrap(), TokenKind::Eof);
    }

    #[test]
    fn test_spans_line_and_column() {
        let handler = Handler::new();
        let tokens = Lexer::new("rule\n  R", Locale::EN, "t", &handler).tokenize();
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[0].span.column, 1);
        // Ident "R" on line 2 column 3
        assert_eq!(tokens[2].span.line, 2);
        assert_eq!(tokens[2].span.column, 3);
    }

    #[test]
    fn test_bom_skipped() {
        assert_eq!(lex("\u{feff}rule"), vec![TokenKind::Rule, TokenKind::Eof]);
    }
}
