//! Expression parsing implementation
//!
//! This module handles parsing of minic expressions with one recursive descent
//! method per precedence level.
//!
//! # Supported Expressions
//!
//! - Literals: integers, floats, strings
//! - Variable references, array references `a[i]`, calls `f(x, y)`
//! - Binary operators: assignment, equality, comparison, arithmetic, power
//! - Unary operators: `+`, `-`
//! - Parenthesized expressions
//!
//! # Precedence
//!
//! ```text
//! expr           ::= assignment
//! assignment     ::= equality ("=" assignment)?
//! equality       ::= comparison (("==" | "!=") comparison)*
//! comparison     ::= additive (("<" | "<=" | ">" | ">=") additive)*
//! additive       ::= multiplicative (("+" | "-") multiplicative)*
//! multiplicative ::= unary (("*" | "/" | "%") unary)*
//! unary          ::= ("+" | "-") unary | power
//! power          ::= atom ("^" power)?
//! atom           ::= INT | FLOAT | STRING | IDENT | IDENT "[" expr "]"
//!                  | IDENT "(" (expr ("," expr)*)? ")" | "(" expr ")"
//! ```
//!
//! Assignment and `^` are right-associative; every other binary level is
//! left-associative.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use tracing::trace;

const EQUALITY_OPS: [(TokenKind, BinOp); 2] = [
    (TokenKind::EqualsEquals, BinOp::Eq),
    (TokenKind::BangEquals, BinOp::Ne),
];

const COMPARISON_OPS: [(TokenKind, BinOp); 4] = [
    (TokenKind::LessThan, BinOp::Lt),
    (TokenKind::LessThanEquals, BinOp::Le),
    (TokenKind::GreaterThan, BinOp::Gt),
    (TokenKind::GreaterThanEquals, BinOp::Ge),
];

const ADDITIVE_OPS: [(TokenKind, BinOp); 2] = [
    (TokenKind::Plus, BinOp::Add),
    (TokenKind::Minus, BinOp::Sub),
];

const MULTIPLICATIVE_OPS: [(TokenKind, BinOp); 3] = [
    (TokenKind::Star, BinOp::Mul),
    (TokenKind::Slash, BinOp::Div),
    (TokenKind::Percent, BinOp::Mod),
];

const UNARY_OPS: [(TokenKind, UnOp); 2] = [
    (TokenKind::Plus, UnOp::Plus),
    (TokenKind::Minus, UnOp::Neg),
];

impl Parser<'_> {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_expression");
        self.nested("Expression", Self::parse_assignment)
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_assignment");

        let lhs = self.parse_equality()?;

        if let Some((op, operator)) = self.match_operator(&[(TokenKind::Equals, BinOp::Assign)]) {
            let rhs = self.nested("Expression", Self::parse_assignment)?;
            return Ok(Expr::binary(op, operator, lhs, rhs));
        }

        Ok(lhs)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_equality");

        let mut lhs = self.parse_comparison()?;

        while let Some((op, operator)) = self.match_operator(&EQUALITY_OPS) {
            let rhs = self.parse_comparison()?;
            lhs = Expr::binary(op, operator, lhs, rhs);
        }

        Ok(lhs)
    }

    /// Parse comparison (< <= > >=)
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_comparison");

        let mut lhs = self.parse_additive()?;

        while let Some((op, operator)) = self.match_operator(&COMPARISON_OPS) {
            let rhs = self.parse_additive()?;
            lhs = Expr::binary(op, operator, lhs, rhs);
        }

        Ok(lhs)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_additive");

        let mut lhs = self.parse_multiplicative()?;

        while let Some((op, operator)) = self.match_operator(&ADDITIVE_OPS) {
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::binary(op, operator, lhs, rhs);
        }

        Ok(lhs)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_multiplicative");

        let mut lhs = self.parse_unary()?;

        while let Some((op, operator)) = self.match_operator(&MULTIPLICATIVE_OPS) {
            let rhs = self.parse_unary()?;
            lhs = Expr::binary(op, operator, lhs, rhs);
        }

        Ok(lhs)
    }

    /// Parse unary (+ -), which applies to the whole following unary expression
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_unary");

        if let Some((op, operator)) = self.match_operator(&UNARY_OPS) {
            let operand = self.nested("Expression", Self::parse_unary)?;
            return Ok(Expr::unary(op, operator, operand));
        }

        self.parse_power()
    }

    /// Parse power (^, right-associative)
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_power");

        let lhs = self.parse_atom()?;

        if let Some((op, operator)) = self.match_operator(&[(TokenKind::Caret, BinOp::Pow)]) {
            let rhs = self.nested("Expression", Self::parse_power)?;
            return Ok(Expr::binary(op, operator, lhs, rhs));
        }

        Ok(lhs)
    }

    /// Parse atom (literals, references, calls, parenthesized expressions)
    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_atom");

        let token = self.peek()?;
        match token.kind {
            TokenKind::IntLiteral => Ok(Expr::IntLiteral(self.parse_int_literal()?)),
            TokenKind::FloatLiteral => self.parse_float_literal(),
            TokenKind::StringLiteral => self.parse_string_literal(),
            TokenKind::Identifier => {
                if self.check_next(TokenKind::LeftBracket) {
                    self.parse_array_ref()
                } else if self.check_next(TokenKind::LeftParen) {
                    self.parse_func_call()
                } else {
                    let name = self.eat(TokenKind::Identifier)?;
                    Ok(Expr::VarRef(VarRefExpr { name }))
                }
            }
            TokenKind::LeftParen => {
                self.eat(TokenKind::LeftParen)?;
                let expr = self.parse_expression()?;
                self.eat_or(TokenKind::RightParen, "Expected ')' after expression")?;
                Ok(expr)
            }
            kind => Err(self.error(format!("Unexpected token type '{kind}' for atom"))),
        }
    }

    /// Parse integer literal into its numeric value
    pub(crate) fn parse_int_literal(&mut self) -> Result<IntLiteral, ParseError> {
        trace!("parse_int_literal");

        let token = self.eat(TokenKind::IntLiteral)?;
        let value = token.lexeme.parse::<i64>().map_err(|_| {
            ParseError::at(
                &token,
                format!("Integer literal '{}' is out of range", token.lexeme),
            )
        })?;

        Ok(IntLiteral { value, token })
    }

    /// Parse float literal; lexemes with more than one decimal point are rejected here
    fn parse_float_literal(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_float_literal");

        let token = self.eat(TokenKind::FloatLiteral)?;
        let value = token.lexeme.parse::<f64>().map_err(|_| {
            ParseError::at(
                &token,
                format!("Malformed float literal '{}'", token.lexeme),
            )
        })?;

        Ok(Expr::FloatLiteral(FloatLiteral { value, token }))
    }

    /// Parse string literal, stripping the delimiting quotes
    fn parse_string_literal(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_string_literal");

        let token = self.eat(TokenKind::StringLiteral)?;
        let value = token
            .lexeme
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap_or(&token.lexeme)
            .to_string();

        Ok(Expr::StringLiteral(StringLiteral { value, token }))
    }

    /// Parse array reference: name [ expr ]
    fn parse_array_ref(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_array_ref");

        let name = self.eat(TokenKind::Identifier)?;
        self.eat(TokenKind::LeftBracket)?;
        let index = self.parse_expression()?;
        self.eat_or(TokenKind::RightBracket, "Expected ']' after array index")?;

        Ok(Expr::ArrayRef(ArrayRefExpr {
            name,
            index: Box::new(index),
        }))
    }

    /// Parse function call: name ( args )
    fn parse_func_call(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_func_call");

        let name = self.eat(TokenKind::Identifier)?;
        self.eat(TokenKind::LeftParen)?;

        let mut args = Vec::new();
        if !self.peek()?.is(TokenKind::RightParen) {
            args.push(self.parse_expression()?);

            while self.peek()?.is(TokenKind::Comma) {
                self.eat(TokenKind::Comma)?;
                args.push(self.parse_expression()?);
            }
        }

        self.eat_or(TokenKind::RightParen, "Expected ')' after function arguments")?;

        Ok(Expr::FuncCall(FuncCallExpr { name, args }))
    }
}
