//! Type reference parsing.
//!
//! ```ebnf
//! type-ref = ( map-ref | qualified-name ) { "[]" | "{}" } ;
//! map-ref  = "[" type-ref ":" type-ref "]" ;
//! ```
//!
//! `T[]` is a list, `T{}` a set, `[K:V]` a map. Collection suffixes
//! stack, so `T[][]` is a list of lists. The suffixes need two tokens of
//! lookahead because a bare `{` after a type ends the declaration line
//! in some contexts.

use crate::ast::TypeRef;
use crate::Parser;
use iskc_lex::TokenKind;

impl<'a> Parser<'a> {
    /// Parse a type reference into its structured form.
    pub(crate) fn parse_type_ref(&mut self) -> Option<TypeRef> {
        let mut type_ref = if self.check(&TokenKind::LBracket) {
            self.advance();
            let key = self.parse_type_ref()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_type_ref()?;
            self.expect(&TokenKind::RBracket)?;
            TypeRef::Map(Box::new(key), Box::new(value))
        } else {
            TypeRef::Simple(self.parse_qualified_name()?)
        };

        loop {
            if self.check(&TokenKind::LBracket) && *self.peek_ahead(1) == TokenKind::RBracket {
                self.advance();
                self.advance();
                type_ref = TypeRef::List(Box::new(type_ref));
            } else if self.check(&TokenKind::LBrace) && *self.peek_ahead(1) == TokenKind::RBrace {
                self.advance();
                self.advance();
                type_ref = TypeRef::Set(Box::new(type_ref));
            } else {
                break;
            }
        }

        Some(type_ref)
    }
}
