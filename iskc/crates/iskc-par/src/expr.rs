//! Expression parsing.
//!
//! An iterative precedence ladder (no left recursion). Binding, from
//! tightest to loosest:
//!
//! | Level | Construct |
//! |-------|-----------|
//! | 1 | primary: literal, identifier, `@global`, block, `(…)` |
//! | 2 | dotted navigation `a.b.c` |
//! | 3 | message sends: unary, keyword, default `!` (left-assoc chain) |
//! | 4 | unary minus |
//! | 5 | `*` `/` |
//! | 6 | `+` `-` |
//! | 7 | comparisons `=` `~=` `<` `<=` `>` `>=` |
//! | 8 | `:=` (right-associative) |
//! | 9 | `,` sequence (combines conditions in a `when`) |
//!
//! A keyword message's arguments parse at navigation level, never as
//! keyword messages themselves; `a k1: b k2: c` is therefore one send
//! whose selector has two parts, and a trailing unary name applies to
//! the whole send.

use crate::ast::{
    AssignExpr, BinOp, BinaryExpr, Block, Expr, IdentExpr, KeywordPart, Literal, MessageExpr,
    NavExpr, Selector, StringPart,
};
use crate::Parser;
use iskc_lex::TokenKind;
use iskc_util::Symbol;

impl<'a> Parser<'a> {
    /// Full expression: the comma-sequence level.
    pub(crate) fn parse_expr(&mut self) -> Option<Expr> {
        let first = self.parse_assignment_level()?;
        if !self.check(&TokenKind::Comma) {
            return Some(first);
        }
        let mut elements = vec![first];
        while self.eat(&TokenKind::Comma) {
            self.skip_newlines();
            elements.push(self.parse_assignment_level()?);
        }
        Some(Expr::Sequence(elements))
    }

    /// `target := value`, right-associative.
    pub(crate) fn parse_assignment_level(&mut self) -> Option<Expr> {
        let left = self.parse_comparison_level()?;
        if !self.eat(&TokenKind::Assign) {
            return Some(left);
        }
        if !matches!(left, Expr::Identifier(_) | Expr::Navigation(_)) {
            self.error_here("assignment target must be a name or a property path");
            return None;
        }
        let value = self.parse_assignment_level()?;
        Some(Expr::Assignment(AssignExpr {
            target: Box::new(left),
            value: Box::new(value),
        }))
    }

    fn parse_comparison_level(&mut self) -> Option<Expr> {
        let mut left = self.parse_additive_level()?;
        loop {
            let op = match self.peek() {
                TokenKind::Eq => BinOp::Eq,
                TokenKind::NotEq => BinOp::NotEq,
                TokenKind::Lt => BinOp::Lt,
                TokenKind::LtEq => BinOp::LtEq,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::GtEq => BinOp::GtEq,
                _ => return Some(left),
            };
            self.advance();
            let right = self.parse_additive_level()?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
    }

    fn parse_additive_level(&mut self) -> Option<Expr> {
        let mut left = self.parse_multiplicative_level()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => return Some(left),
            };
            self.advance();
            let right = self.parse_multiplicative_level()?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
    }

    fn parse_multiplicative_level(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary_level()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => return Some(left),
            };
            self.advance();
            let right = self.parse_unary_level()?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
    }

    fn parse_unary_level(&mut self) -> Option<Expr> {
        if self.eat(&TokenKind::Minus) {
            let operand = self.parse_unary_level()?;
            Some(negate(operand))
        } else {
            self.parse_message_level()
        }
    }

    /// Message sends: a receiver accumulates any sequence of unary and
    /// keyword messages, plus the `!` default send.
    fn parse_message_level(&mut self) -> Option<Expr> {
        let mut receiver = self.parse_navigation_level()?;
        loop {
            match self.peek() {
                TokenKind::Ident(_) | TokenKind::QuotedIdent(_)
                    if *self.peek_ahead(1) == TokenKind::Colon =>
                {
                    let mut parts = Vec::new();
                    while matches!(self.peek(), TokenKind::Ident(_) | TokenKind::QuotedIdent(_))
                        && *self.peek_ahead(1) == TokenKind::Colon
                    {
                        let keyword = self.expect_identifier("keyword")?;
                        self.advance(); // the ':'
                        self.skip_newlines();
                        let argument = self.parse_keyword_argument()?;
                        parts.push(KeywordPart { keyword, argument });
                    }
                    receiver = Expr::MessageSend(MessageExpr {
                        receiver: Box::new(receiver),
                        selector: Selector::Keyword(parts),
                    });
                }
                TokenKind::Ident(name) | TokenKind::QuotedIdent(name) => {
                    let name = *name;
                    self.advance();
                    receiver = Expr::MessageSend(MessageExpr {
                        receiver: Box::new(receiver),
                        selector: Selector::Unary(name),
                    });
                }
                TokenKind::Bang => {
                    self.advance();
                    receiver = Expr::MessageSend(MessageExpr {
                        receiver: Box::new(receiver),
                        selector: Selector::Default,
                    });
                }
                _ => return Some(receiver),
            }
        }
    }

    /// A keyword argument: navigation level, with a leading minus
    /// allowed for negative literals.
    fn parse_keyword_argument(&mut self) -> Option<Expr> {
        if self.eat(&TokenKind::Minus) {
            let operand = self.parse_navigation_level()?;
            Some(negate(operand))
        } else {
            self.parse_navigation_level()
        }
    }

    /// `receiver.prop.prop…`; numeric segments index into lists.
    pub(crate) fn parse_navigation_level(&mut self) -> Option<Expr> {
        let receiver = self.parse_primary()?;
        if !self.check(&TokenKind::Dot) {
            return Some(receiver);
        }
        let mut path = Vec::new();
        while self.eat(&TokenKind::Dot) {
            match self.peek() {
                TokenKind::Ident(name) | TokenKind::QuotedIdent(name) => {
                    path.push(*name);
                    self.advance();
                }
                TokenKind::Number(text) => {
                    path.push(Symbol::intern(text));
                    self.advance();
                }
                other => {
                    let message = format!("expected property name, found {}", other);
                    self.error_here(message);
                    return None;
                }
            }
        }
        Some(Expr::Navigation(NavExpr {
            receiver: Box::new(receiver),
            path,
        }))
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        match self.peek().clone() {
            TokenKind::Number(text) => {
                self.advance();
                Some(Expr::Literal(Literal::Number(text)))
            }
            TokenKind::Str(text) => {
                self.advance();
                Some(Expr::Literal(Literal::Str(text)))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::Literal(Literal::Bool(true)))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::Literal(Literal::Bool(false)))
            }
            TokenKind::Null => {
                self.advance();
                Some(Expr::Literal(Literal::Null))
            }
            TokenKind::At => {
                self.advance();
                let name = self.expect_identifier("global name")?;
                Some(Expr::Identifier(IdentExpr { name, global: true }))
            }
            TokenKind::Ident(name) | TokenKind::QuotedIdent(name) => {
                self.advance();
                Some(Expr::Identifier(IdentExpr {
                    name,
                    global: false,
                }))
            }
            TokenKind::LParen => {
                self.advance();
                self.skip_newlines();
                let inner = self.parse_expr()?;
                self.skip_newlines();
                self.expect(&TokenKind::RParen)?;
                Some(inner)
            }
            TokenKind::TemplateStart => self.parse_interpolated(),
            TokenKind::HashLParen => {
                self.advance();
                let elements = self.parse_element_list(&TokenKind::RParen)?;
                Some(Expr::Literal(Literal::List(elements)))
            }
            TokenKind::HashLBrace => {
                self.advance();
                let elements = self.parse_element_list(&TokenKind::RBrace)?;
                Some(Expr::Literal(Literal::Set(elements)))
            }
            TokenKind::HashLBracket => {
                self.advance();
                let entries = self.parse_map_entries()?;
                Some(Expr::Literal(Literal::Map(entries)))
            }
            TokenKind::LBracket => {
                self.advance();
                let block = self.parse_block_body(&TokenKind::RBracket)?;
                Some(Expr::Block(block))
            }
            TokenKind::LBrace => {
                self.advance();
                let statements = self.parse_statements(&[TokenKind::RBrace]);
                self.expect(&TokenKind::RBrace)?;
                Some(Expr::Block(Block {
                    parameters: vec![],
                    statements,
                }))
            }
            other => {
                let message = format!("expected expression, found {}", other);
                self.error_here(message);
                None
            }
        }
    }

    /// `$"text ${expr} …"` into an interpolated literal.
    fn parse_interpolated(&mut self) -> Option<Expr> {
        self.advance(); // TemplateStart
        let mut parts = Vec::new();
        loop {
            match self.peek().clone() {
                TokenKind::TemplateText(text) => {
                    self.advance();
                    parts.push(StringPart::Text(text));
                }
                TokenKind::TemplateExprStart => {
                    self.advance();
                    self.skip_newlines();
                    let expr = self.parse_expr()?;
                    self.skip_newlines();
                    self.expect(&TokenKind::TemplateExprEnd)?;
                    parts.push(StringPart::Expr(expr));
                }
                TokenKind::TemplateEnd => {
                    self.advance();
                    return Some(Expr::Literal(Literal::Interpolated(parts)));
                }
                other => {
                    let message =
                        format!("expected interpolated string content, found {}", other);
                    self.error_here(message);
                    return None;
                }
            }
        }
    }

    /// Comma-separated elements of a list or set literal.
    fn parse_element_list(&mut self, closer: &TokenKind) -> Option<Vec<Expr>> {
        let mut elements = Vec::new();
        self.skip_newlines();
        if self.eat(closer) {
            return Some(elements);
        }
        loop {
            elements.push(self.parse_assignment_level()?);
            self.skip_newlines();
            if self.eat(&TokenKind::Comma) {
                self.skip_newlines();
            } else {
                break;
            }
        }
        self.expect(closer)?;
        Some(elements)
    }

    /// `key: value` pairs of a map literal.
    fn parse_map_entries(&mut self) -> Option<Vec<(Expr, Expr)>> {
        let mut entries = Vec::new();
        self.skip_newlines();
        if self.eat(&TokenKind::RBracket) {
            return Some(entries);
        }
        loop {
            let key = self.parse_assignment_level()?;
            self.expect(&TokenKind::Colon)?;
            self.skip_newlines();
            let value = self.parse_assignment_level()?;
            entries.push((key, value));
            self.skip_newlines();
            if self.eat(&TokenKind::Comma) {
                self.skip_newlines();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Some(entries)
    }

    /// The inside of a block, after the opener:
    /// `[:p1 :p2 | stmts]`, `[| expr]` (implicit `it`), `[stmts]`.
    pub(crate) fn parse_block_body(&mut self, closer: &TokenKind) -> Option<Block> {
        let parameters = if self.check(&TokenKind::Colon) {
            let mut names = Vec::new();
            while self.eat(&TokenKind::Colon) {
                names.push(self.expect_identifier("block parameter")?);
            }
            self.expect(&TokenKind::Pipe)?;
            names
        } else if self.eat(&TokenKind::Pipe) {
            vec![Symbol::intern("it")]
        } else {
            vec![]
        };
        let statements = self.parse_statements(std::slice::from_ref(closer));
        self.expect(closer)?;
        Some(Block {
            parameters,
            statements,
        })
    }
}

/// Fold a unary minus into a number literal, or subtract from zero.
fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Literal(Literal::Number(text)) => {
            Expr::Literal(Literal::Number(format!("-{}", text)))
        }
        other => Expr::Binary(BinaryExpr {
            left: Box::new(Expr::Literal(Literal::Number("0".into()))),
            op: BinOp::Sub,
            right: Box::new(other),
        }),
    }
}
