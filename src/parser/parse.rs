//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry points.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, token cursor helpers, and coordination
//! - `declarations`: Parsing the program and function declarations
//! - `statements`: Parsing statements (`for`, `while`, `if`, blocks, ...)
//! - `expressions`: Parsing expressions, one method per precedence level
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! The parser reads an immutable token slice and never backtracks; at most two
//! tokens of lookahead decide between productions. The first syntax error
//! aborts the parse.
//!
//! Nesting of statements and expressions is capped at [`MAX_DEPTH`] levels, so
//! deeply nested input is reported as a syntax error instead of exhausting the
//! call stack.

use crate::diagnostics::{Diagnostic, Stage};
use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use thiserror::Error;
use tracing::{debug, trace};

/// Deepest nesting of statements and expressions the parser accepts
pub const MAX_DEPTH: usize = 256;

/// Parser error type
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
    /// The token that triggered the error, `None` past the end of input
    pub token: Option<Token>,
}

impl ParseError {
    /// Error pointing at a specific token
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: token.begin,
            token: Some(token.clone()),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(Stage::Parser, self.location, self.message.clone())
    }
}

/// Output of a parser run
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    /// `None` whenever a syntax error occurred
    pub program: Option<Program>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    pub fn had_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Parse a complete program. A syntax error is reported as a single
/// diagnostic and no tree is returned.
pub fn parse(tokens: &[Token]) -> Parsed {
    let mut parser = Parser::new(tokens);

    match parser.parse_program() {
        Ok(program) => {
            debug!(functions = program.functions.len(), "parsed program");
            Parsed {
                program: Some(program),
                diagnostics: Vec::new(),
            }
        }
        Err(err) => {
            debug!(
                line = err.location.line,
                column = err.location.column,
                "parse failed: {err}"
            );
            Parsed {
                program: None,
                diagnostics: vec![err.to_diagnostic()],
            }
        }
    }
}

/// Parse a single expression that must span the whole token slice.
pub fn parse_expression(tokens: &[Token]) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expression()?;

    if let Some(token) = parser.current() {
        return Err(ParseError::at(
            token,
            format!("Unexpected trailing token {token} after expression"),
        ));
    }

    Ok(expr)
}

/// Recursive descent parser for minic
pub struct Parser<'a> {
    pub(crate) tokens: &'a [Token],
    pub(crate) position: usize,
    /// Current nesting level, see [`Parser::nested`]
    pub(crate) depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Parse the entire program (top-level declarations)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        trace!("parse_program");

        let mut program = Program::new();

        while !self.is_at_end() {
            let decl = self.parse_func_decl()?;
            program.functions.push(decl);
        }

        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    /// Current token, or `None` at end of input
    pub(crate) fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    /// Current token; running out of input is a syntax error.
    pub(crate) fn peek(&self) -> Result<&'a Token, ParseError> {
        self.current()
            .ok_or_else(|| self.error("Cannot peek beyond end of input"))
    }

    /// Token after the current one; running out of input is a syntax error.
    pub(crate) fn peek_next(&self) -> Result<&'a Token, ParseError> {
        self.tokens
            .get(self.position + 1)
            .ok_or_else(|| self.error("Cannot peek beyond end of input"))
    }

    /// Whether the current token has the given kind. False at end of input.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|token| token.is(kind))
    }

    /// Whether the token after the current one has the given kind.
    /// False at end of input.
    pub(crate) fn check_next(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.position + 1)
            .is_some_and(|token| token.is(kind))
    }

    /// Consume the current token if its kind appears in `table`, returning the
    /// associated value together with the token.
    pub(crate) fn match_operator<T: Copy>(
        &mut self,
        table: &[(TokenKind, T)],
    ) -> Option<(T, Token)> {
        let token = self.current()?;
        let (_, value) = table.iter().find(|(kind, _)| token.is(*kind))?;
        self.advance();
        Some((*value, token.clone()))
    }

    /// Run `parse` one nesting level deeper. Past [`MAX_DEPTH`] levels this
    /// fails at the current token with "`what` nested too deeply".
    pub(crate) fn nested<T>(
        &mut self,
        what: &str,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("{what} nested too deeply")));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Consume a token of the expected kind, or fail with a generated message.
    pub(crate) fn eat(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let token = self.peek()?;
        if token.is(expected) {
            self.advance();
            return Ok(token.clone());
        }

        Err(self.error(format!(
            "Expected token type '{}', but got '{}'",
            expected, token.kind
        )))
    }

    /// Consume a token of the expected kind, or fail with `message`.
    pub(crate) fn eat_or(
        &mut self,
        expected: TokenKind,
        message: &str,
    ) -> Result<Token, ParseError> {
        let token = self.peek()?;
        if token.is(expected) {
            self.advance();
            return Ok(token.clone());
        }

        Err(self.error(message))
    }

    /// Error at the current position. Past the end of input the error points
    /// just after the last token.
    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        match self.current() {
            Some(token) => ParseError::at(token, message),
            None => ParseError {
                message: message.into(),
                location: self
                    .tokens
                    .last()
                    .map(|token| token.end)
                    .unwrap_or_default(),
                token: None,
            },
        }
    }
}
