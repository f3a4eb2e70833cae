//! minic source code parser
//!
//! This module transforms minic source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), split across `declarations`,
//!   `statements` and `expressions`
//! - [`ast`]: AST node definitions
//! - [`printer`]: AST → canonical source text
//!
//! # Supported language
//!
//! - Top level: function definitions only, `type name(type a, type b) { ... }`
//! - Types: any identifier; no type checking happens here
//! - Statements: declarations (scalars and fixed-size arrays), `for`, `while`,
//!   `if`/`else`, `return`, blocks, empty statements, expression statements
//! - Expressions: assignment, equality, comparison, arithmetic, `^` (power),
//!   unary `+`/`-`, array indexing, calls, parentheses
//! - Line comments with `//`
//!
//! `for` loops are rewritten during parsing, so the tree only ever contains
//! `while` loops.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one method per precedence level.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod printer;
mod statements;

use crate::error::CompileError;
use ast::Program;
use tracing::info;

/// Tokenize and parse `source` in one go.
///
/// Parsing is skipped when the tokenizer reported anything, and all lexical
/// diagnostics are returned together.
pub fn parse_source(source: &str) -> Result<Program, CompileError> {
    let lexed = lexer::tokenize(source);
    if lexed.had_error() {
        return Err(CompileError::Lex(lexed.diagnostics));
    }

    let program = parse::Parser::new(&lexed.tokens).parse_program()?;
    info!(
        tokens = lexed.tokens.len(),
        functions = program.functions.len(),
        "parsed source"
    );

    Ok(program)
}
