//! Declaration parsing implementation
//!
//! This module handles parsing of top-level function declarations and their
//! parameter lists:
//!
//! # Grammar
//!
//! ```text
//! program   ::= func_decl*
//! func_decl ::= IDENT IDENT "(" func_args? ")" compound_stmt
//! func_args ::= IDENT IDENT ("," IDENT IDENT)*
//! ```
//!
//! Types are plain identifiers; whether a type name exists is a question for
//! later stages.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use tracing::trace;

impl Parser<'_> {
    /// Parse function definition: type name(params) { body }
    pub(crate) fn parse_func_decl(&mut self) -> Result<FuncDecl, ParseError> {
        trace!("parse_func_decl");

        let return_type = self.eat(TokenKind::Identifier)?;
        let name = self.eat(TokenKind::Identifier)?;

        self.eat(TokenKind::LeftParen)?;

        let params = if self.peek()?.is(TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_func_args()?
        };

        self.eat(TokenKind::RightParen)?;
        let body = self.parse_compound_stmt()?;

        Ok(FuncDecl {
            return_type,
            name,
            params,
            body,
        })
    }

    /// Parse parameter list: type name, type name, ...
    fn parse_func_args(&mut self) -> Result<Vec<VarDecl>, ParseError> {
        trace!("parse_func_args");

        let mut params = Vec::new();

        loop {
            let var_type = self.eat(TokenKind::Identifier)?;
            let name = self.eat(TokenKind::Identifier)?;
            params.push(VarDecl {
                var_type,
                name,
                init: None,
            });

            if !self.peek()?.is(TokenKind::Comma) {
                break;
            }
            self.eat(TokenKind::Comma)?;
        }

        Ok(params)
    }
}
