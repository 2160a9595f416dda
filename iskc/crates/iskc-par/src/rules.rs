//! Rule parsing.
//!
//! ```ebnf
//! simple-rule    = "rule" identifier [ string ]
//!                  "when" statements "then" statements
//!                  [ "else" statements ] "end" ;
//!
//! template-rule  = "template" "rule" identifier [ string ]
//!                  [ "data" "table" "{" table-rows "}" ]
//!                  "when" statements "then" statements "end" ;
//!
//! decision-table = "decision" "table" identifier [ string ]
//!                  "{" table-rows "}"
//!                  [ "where" alias { "," alias } ] ;
//!
//! alias          = identifier ":=" block ;
//! ```
//!
//! A template rule's embedded table has no id of its own; it takes the
//! rule's. A missing `data table` clause parses (the analyzer rejects
//! it) so one run can still report everything else about the rule.

use crate::ast::{Block, DecisionTableRule, SimpleRule, TemplateRule};
use crate::Parser;
use indexmap::IndexMap;
use iskc_lex::TokenKind;
use iskc_util::Symbol;

impl<'a> Parser<'a> {
    /// `rule <id> … end`
    pub(crate) fn parse_simple_rule(&mut self) -> Option<SimpleRule> {
        self.advance(); // 'rule'
        let id = self.expect_identifier("rule id")?;
        let description = self.eat_description();
        self.skip_newlines();

        self.expect(&TokenKind::When)?;
        let when = self.parse_statements(&[TokenKind::Then, TokenKind::Else, TokenKind::End]);
        self.expect(&TokenKind::Then)?;
        let then = self.parse_statements(&[TokenKind::Else, TokenKind::End]);
        let else_branch = if self.eat(&TokenKind::Else) {
            self.parse_statements(&[TokenKind::End])
        } else {
            Vec::new()
        };
        self.expect(&TokenKind::End)?;

        Some(SimpleRule {
            id,
            description,
            when,
            then,
            else_branch,
        })
    }

    /// `template rule <id> data table { … } when … then … end`
    pub(crate) fn parse_template_rule(&mut self) -> Option<TemplateRule> {
        self.advance(); // 'template'
        self.expect(&TokenKind::Rule)?;
        let id = self.expect_identifier("rule id")?;
        let description = self.eat_description();
        self.skip_newlines();

        let data_table = if self.eat(&TokenKind::Data) {
            self.expect(&TokenKind::Table)?;
            self.skip_newlines();
            Some(self.parse_data_table_body(id)?)
        } else {
            None
        };
        self.skip_newlines();

        self.expect(&TokenKind::When)?;
        let when = self.parse_statements(&[TokenKind::Then, TokenKind::End]);
        self.expect(&TokenKind::Then)?;
        let then = self.parse_statements(&[TokenKind::End]);
        self.expect(&TokenKind::End)?;

        Some(TemplateRule {
            id,
            description,
            data_table,
            when,
            then,
        })
    }

    /// `decision table <id> { … } where …`
    pub(crate) fn parse_decision_table_rule(&mut self) -> Option<DecisionTableRule> {
        self.advance(); // 'decision'
        self.expect(&TokenKind::Table)?;
        let id = self.expect_identifier("decision table id")?;
        let description = self.eat_description();
        self.skip_newlines();

        let raw = self.parse_raw_table()?;
        self.skip_newlines();

        let aliases = if self.eat(&TokenKind::Where) {
            self.parse_alias_declarations()?
        } else {
            IndexMap::new()
        };

        let rows = self.build_decision_rows(&raw, &aliases);

        Some(DecisionTableRule {
            id,
            description,
            rows,
            aliases,
        })
    }

    /// `name := [ … ], name := [ … ]`
    fn parse_alias_declarations(&mut self) -> Option<IndexMap<Symbol, Block>> {
        let mut aliases = IndexMap::new();
        loop {
            self.skip_newlines();
            let name = self.expect_identifier("alias name")?;
            self.expect(&TokenKind::Assign)?;
            self.skip_newlines();
            let block = self.parse_alias_block()?;
            if aliases.insert(name, block).is_some() {
                let span = self.current_span();
                self.handler
                    .error(format!("duplicate alias '{}'", name))
                    .at(self.location(span))
                    .emit();
            }
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                return Some(aliases);
            }
        }
    }

    /// An alias's value must be a block expression.
    fn parse_alias_block(&mut self) -> Option<Block> {
        if self.eat(&TokenKind::LBracket) {
            self.parse_block_body(&TokenKind::RBracket)
        } else if self.eat(&TokenKind::LBrace) {
            let statements = self.parse_statements(&[TokenKind::RBrace]);
            self.expect(&TokenKind::RBrace)?;
            Some(Block {
                parameters: vec![],
                statements,
            })
        } else {
            let message = format!("expected a block, found {}", self.peek());
            self.error_here(message);
            None
        }
    }
}
