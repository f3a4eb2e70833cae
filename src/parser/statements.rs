//! Statement parsing implementation
//!
//! This module handles parsing of all minic statement types:
//!
//! - Variable declarations: `int x = 42;`, `int arr[5];`
//! - Control flow: `for`, `while`, `if`/`else`, `return`
//! - Compound statements: `{ ... }`
//! - Empty statements: `;`
//! - Expression statements: calls, assignments, bare references
//!
//! # Grammar
//!
//! ```text
//! stmt          ::= for_stmt | while_stmt | if_stmt | return_stmt
//!                 | compound_stmt | ";"
//!                 | IDENT IDENT ("[" INT "]" | ("=" expr)?) ";"
//!                 | expr ";"
//! for_stmt      ::= "for" "(" for_init expr ";" expr ")" stmt
//! for_init      ::= IDENT IDENT ("=" expr)? ";" | ";" | expr ";"
//! while_stmt    ::= "while" "(" expr ")" stmt
//! if_stmt       ::= "if" "(" expr ")" stmt ("else" stmt)?
//! return_stmt   ::= "return" expr? ";"
//! compound_stmt ::= "{" stmt* "}"
//! ```
//!
//! A leading identifier starts a declaration only when the second token is
//! also an identifier (type then name).
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ParseError, Parser};
use tracing::trace;

impl Parser<'_> {
    /// Parse a statement
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        trace!("parse_stmt");
        self.nested("Statement", Self::dispatch_stmt)
    }

    fn dispatch_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek()?.kind {
            TokenKind::Identifier => {
                if self.peek_next()?.is(TokenKind::Identifier) {
                    self.parse_declaration()
                } else {
                    // Variable ref, array ref, call or assignment
                    self.parse_expr_stmt()
                }
            }
            TokenKind::LeftBrace => Ok(Stmt::Compound(self.parse_compound_stmt()?)),
            TokenKind::Semicolon => {
                self.eat(TokenKind::Semicolon)?;
                Ok(Stmt::Empty)
            }
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parse compound statement: { stmt* }
    pub(crate) fn parse_compound_stmt(&mut self) -> Result<CompoundStmt, ParseError> {
        trace!("parse_compound_stmt");

        self.eat(TokenKind::LeftBrace)?;

        let mut statements = Vec::new();
        while !self.peek()?.is(TokenKind::RightBrace) {
            statements.push(self.parse_stmt()?);
        }

        self.eat(TokenKind::RightBrace)?;
        Ok(CompoundStmt::new(statements))
    }

    /// Parse expression statement: expr ;
    fn parse_expr_stmt(&mut self) -> Result<Stmt, ParseError> {
        trace!("parse_expr_stmt");

        let expr = self.parse_expression()?;
        self.eat_or(TokenKind::Semicolon, "Expected ';' after expression")?;
        Ok(Stmt::Expr(expr))
    }

    /// Parse scalar or array declaration: type name ([size] | (= init)?) ;
    fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        trace!("parse_declaration");

        let var_type = self.eat(TokenKind::Identifier)?;
        let name = self.eat(TokenKind::Identifier)?;

        if self.peek()?.is(TokenKind::LeftBracket) {
            self.eat(TokenKind::LeftBracket)?;
            let size = self.parse_int_literal()?;
            self.eat_or(TokenKind::RightBracket, "Expected ']' after array size")?;
            self.eat_or(TokenKind::Semicolon, "Expected ';' after array declaration")?;

            return Ok(Stmt::ArrayDecl(ArrayDecl {
                elem_type: var_type,
                name,
                size,
            }));
        }

        Ok(Stmt::VarDecl(self.finish_var_decl(var_type, name)?))
    }

    /// Parse the optional initializer and the closing `;` of a scalar declaration
    fn finish_var_decl(&mut self, var_type: Token, name: Token) -> Result<VarDecl, ParseError> {
        let init = if self.peek()?.is(TokenKind::Equals) {
            self.eat(TokenKind::Equals)?;
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.eat_or(
            TokenKind::Semicolon,
            "Expected ';' after variable declaration",
        )?;

        Ok(VarDecl {
            var_type,
            name,
            init,
        })
    }

    /// Parse for statement and rewrite it into blocks and a while loop:
    ///
    /// ```text
    /// for (INIT; COND; INC) BODY   =>   { INIT; while (COND) { { BODY } INC; } }
    /// ```
    fn parse_for_stmt(&mut self) -> Result<Stmt, ParseError> {
        trace!("parse_for_stmt");

        self.eat(TokenKind::For)?;
        self.eat_or(TokenKind::LeftParen, "Expected '(' after 'for'")?;

        let init = self.parse_for_init()?;
        let condition = self.parse_expression()?;
        self.eat_or(TokenKind::Semicolon, "Expected ';' after for condition")?;
        let increment = self.parse_expression()?;
        self.eat_or(TokenKind::RightParen, "Expected ')' after for clauses")?;

        let body = self.parse_stmt()?;

        let body_block = Stmt::Compound(CompoundStmt::new(vec![body]));
        let loop_body = CompoundStmt::new(vec![body_block, Stmt::Expr(increment)]);
        let while_stmt = Stmt::While(WhileStmt {
            condition,
            body: Box::new(Stmt::Compound(loop_body)),
        });

        Ok(Stmt::Compound(CompoundStmt::new(vec![init, while_stmt])))
    }

    /// Parse for init: a scalar declaration, an empty statement or an
    /// expression statement (each includes its `;`)
    fn parse_for_init(&mut self) -> Result<Stmt, ParseError> {
        trace!("parse_for_init");

        if self.peek()?.is(TokenKind::Identifier) && self.peek_next()?.is(TokenKind::Identifier) {
            let var_type = self.eat(TokenKind::Identifier)?;
            let name = self.eat(TokenKind::Identifier)?;
            return Ok(Stmt::VarDecl(self.finish_var_decl(var_type, name)?));
        }

        if self.peek()?.is(TokenKind::Semicolon) {
            self.eat(TokenKind::Semicolon)?;
            return Ok(Stmt::Empty);
        }

        self.parse_expr_stmt()
    }

    /// Parse while statement
    fn parse_while_stmt(&mut self) -> Result<Stmt, ParseError> {
        trace!("parse_while_stmt");

        self.eat(TokenKind::While)?;
        let condition = self.parse_condition("while")?;
        let body = self.parse_stmt()?;

        Ok(Stmt::While(WhileStmt {
            condition,
            body: Box::new(body),
        }))
    }

    /// Parse if statement; `else` binds to the nearest `if`
    fn parse_if_stmt(&mut self) -> Result<Stmt, ParseError> {
        trace!("parse_if_stmt");

        self.eat(TokenKind::If)?;
        let condition = self.parse_condition("if")?;
        let then_branch = Box::new(self.parse_stmt()?);

        let else_branch = if self.check(TokenKind::Else) {
            self.eat(TokenKind::Else)?;
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };

        Ok(Stmt::If(IfStmt {
            condition,
            then_branch,
            else_branch,
        }))
    }

    /// Parse return statement: return expr? ;
    fn parse_return_stmt(&mut self) -> Result<Stmt, ParseError> {
        trace!("parse_return_stmt");

        let keyword = self.eat(TokenKind::Return)?;

        let value = if self.peek()?.is(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.eat_or(TokenKind::Semicolon, "Expected ';' after return")?;

        Ok(Stmt::Return(ReturnStmt { keyword, value }))
    }

    /// Parse a parenthesized condition: ( expr )
    fn parse_condition(&mut self, keyword: &str) -> Result<Expr, ParseError> {
        self.eat_or(
            TokenKind::LeftParen,
            &format!("Expected '(' after '{keyword}'"),
        )?;
        let condition = self.parse_expression()?;
        self.eat_or(
            TokenKind::RightParen,
            &format!("Expected ')' after {keyword} condition"),
        )?;
        Ok(condition)
    }
}
